use std::sync::Arc;

use actix_web::{Responder, post, web};
use auth::AuthUser;
use common::env_config::Config;
use common::error::Res;
use common::http::Success;
use common::razorpay::RazorpayClient;
use sqlx::PgPool;

use crate::dtos::order::OrderCreateRequest;
use crate::services;

/// Creates a hosted payment page for a subscription plan.
///
/// # Input
/// - `user`: Authenticated caller resolved by the auth middleware
/// - `req`: JSON payload with order details:
///   - `planId`: One of `monthly`, `quarterly`, `yearly`
///   - `callbackUrl`: (Optional) URL the hosted page redirects back to
/// - `pool`: Database connection pool
/// - `config`: Application configuration with Razorpay credentials
///
/// # Output
/// - Success: Returns the hosted checkout URL and its payment link id
/// - Error: 400 for an unknown plan, 401 without a valid token,
///   502/503 when the payment processor fails
///
/// # Frontend Example
/// ```javascript
/// // Using fetch API
/// const response = await fetch('/api/billing/order', {
///   method: 'POST',
///   headers: {
///     'Content-Type': 'application/json',
///     'Authorization': `Bearer ${session.access_token}`
///   },
///   body: JSON.stringify({
///     planId: "yearly",
///     callbackUrl: `${window.location.origin}/payment-status`
///   })
/// });
///
/// if (response.ok) {
///   const data = await response.json();
///   // Open the hosted page; no processor SDK is needed on this side
///   window.location.href = data.paymentUrl;
///   // Keep data.paymentLinkId around to poll /api/billing/status
///   // after the redirect back
/// }
/// ```
#[post("/order")]
pub async fn post_order(
    user: web::ReqData<AuthUser>,
    req: web::Json<OrderCreateRequest>,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let client = RazorpayClient::from_config(&config.razorpay)?;

    let response =
        services::order::create_order(&client, pg_pool, &user, req.into_inner()).await?;

    Success::ok(response)
}
