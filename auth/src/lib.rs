use common::env_config::IdentityConfig;
use middleware::auth::AuthMiddleware;

pub mod middleware {
    pub mod auth;
}

pub mod services {
    pub mod identity;
}

pub use services::identity::AuthUser;

pub fn auth_middleware(config: &IdentityConfig) -> AuthMiddleware {
    AuthMiddleware::new(config.url.clone(), config.api_key.clone())
}
