use std::sync::Arc;

use actix_web::{Responder, get, web};
use auth::AuthUser;
use common::error::Res;
use common::http::Success;
use sqlx::PgPool;

use crate::services;

/// Retrieves the caller's current subscription.
///
/// Returns the newest active, unexpired row plus `is_premium` and the
/// rounded-up days remaining; a user with no such row is simply not
/// premium.
#[get("/sub")]
pub async fn get_sub(
    user: web::ReqData<AuthUser>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let response = services::sub::current_subscription(pg_pool, &user).await?;
    Success::ok(response)
}
