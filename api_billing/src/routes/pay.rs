use std::sync::Arc;

use actix_web::{Responder, post, web};
use auth::AuthUser;
use common::env_config::Config;
use common::error::{AppError, Res};
use common::http::Success;
use common::signature;
use sqlx::PgPool;

use crate::dtos::pay::{StatusRequest, VerifyRequest, VerifyResponse, WebhookAck, WebhookEvent};
use crate::services;

/// Handles Razorpay webhook deliveries for payment events.
///
/// # Input
/// - `body`: Raw request body, verified byte-for-byte against the
///   `X-Razorpay-Signature` header before any parsing
/// - `pool`: Database connection pool
/// - `config`: Application configuration with the webhook secret
///
/// # Output
/// - Success: `200 {ok: true}` for every authentic delivery, including
///   ones that carry nothing actionable
/// - Error: 400 for a missing or invalid signature, 500 when the secret
///   is not configured
///
/// # Note
/// This endpoint is not called from the frontend. Razorpay's servers call
/// it when a hosted payment page is paid. Configure the URL and secret in
/// the Razorpay Dashboard under Webhooks and subscribe to the
/// `payment_link.paid` event; the same payment is also reconciled by the
/// status poll below, so delivery races are safe in either order.
#[post("/webhook")]
pub async fn post_webhook(
    body: web::Bytes,
    req: actix_web::HttpRequest,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let secret = &config.razorpay.webhook_secret;
    if secret.is_empty() {
        return Err(AppError::Configuration(
            "RAZORPAY_WEBHOOK_SECRET must be set".to_string(),
        ));
    }

    let signature_header = req
        .headers()
        .get("x-razorpay-signature")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    if signature_header.is_empty() {
        return Err(AppError::SignatureInvalid(
            "Webhook signature missing".to_string(),
        ));
    }
    if !signature::verify(&body, signature_header, secret) {
        return Err(AppError::SignatureInvalid(
            "Webhook signature mismatch".to_string(),
        ));
    }

    // authentic from here on; an undecodable body is inert, not an error
    match serde_json::from_slice::<WebhookEvent>(&body) {
        Ok(event) => services::pay::process_webhook_event(&pool, event).await?,
        Err(e) => log::error!("Undecodable webhook body: {}", e),
    }

    Success::ok(WebhookAck { ok: true })
}

/// Verifies a checkout result submitted by the client and activates the
/// subscription.
///
/// # Input
/// - `user`: Authenticated caller
/// - `req`: The processor's checkout result as handed to the client:
///   `razorpay_order_id`, `razorpay_payment_id`, `razorpay_signature`,
///   plus the `planId` being purchased
///
/// # Output
/// - Success: `{success: true, subscription}` with the stored row
/// - Error: 400 for a signature mismatch or unknown plan
#[post("/verify")]
pub async fn post_verify(
    user: web::ReqData<AuthUser>,
    req: web::Json<VerifyRequest>,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;

    let subscription =
        services::pay::verify_payment(pg_pool, &config, &user, req.into_inner()).await?;

    Success::ok(VerifyResponse {
        success: true,
        subscription,
    })
}

/// Reports a payment link's current state, reconciling a paid link that
/// the webhook has not caught up with yet.
///
/// # Input
/// - `user`: Authenticated caller
/// - `req`: JSON payload with `paymentLinkId` as returned by the order
///   endpoint
///
/// # Output
/// - Success: `{status: "paid" | "pending" | "unknown"}`; `unknown` means
///   the processor could not be consulted and the caller should poll
///   again, never that the payment failed
#[post("/status")]
pub async fn post_status(
    user: web::ReqData<AuthUser>,
    req: web::Json<StatusRequest>,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;

    let response =
        services::pay::check_status(pg_pool, &config, &user, &req.payment_link_id).await?;

    Success::ok(response)
}
