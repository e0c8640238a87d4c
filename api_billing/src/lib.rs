use actix_web::web::{self};

pub mod routes {
    pub mod order;
    pub mod pay;
    pub mod sub;
}

pub mod models {
    pub mod plan;
}

mod services {
    pub(crate) mod order;
    pub(crate) mod pay;
    pub(crate) mod sub;
}

mod dtos {
    pub(crate) mod order;
    pub(crate) mod pay;
    pub(crate) mod sub;
}

pub fn mount_billing() -> actix_web::Scope {
    web::scope("/billing")
        .service(routes::order::post_order)
        .service(routes::pay::post_verify)
        .service(routes::pay::post_status)
        .service(routes::sub::get_sub)
}
pub fn mount_webhook() -> actix_web::Scope {
    web::scope("/pay").service(routes::pay::post_webhook)
}
