use auth::AuthUser;
use common::env_config::Config;
use common::error::{AppError, Res};
use common::razorpay::RazorpayClient;
use common::signature;
use db::models::subscription::{Activation, Subscription};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::pay::{StatusResponse, VerifyRequest, WebhookEvent};
use crate::models::plan::Plan;

/// Processes a signature-verified webhook delivery.
///
/// Only `payment_link.paid` is actionable. Missing entities, unusable
/// correlation notes and unknown plans are inert: the delivery is
/// acknowledged so the processor does not redeliver garbage forever.
/// A storage failure propagates, since at that point money has been
/// collected and redelivery is the remaining chance to grant the
/// entitlement.
pub async fn process_webhook_event(pool: &PgPool, event: WebhookEvent) -> Res<()> {
    if event.event != "payment_link.paid" {
        log::info!("Ignoring webhook event: {}", event.event);
        return Ok(());
    }

    let (Some(link), Some(payment)) = (event.payload.payment_link, event.payload.payment) else {
        log::error!("Missing payment data in webhook");
        return Ok(());
    };
    let link = link.entity;
    let payment = payment.entity;

    let user_id = link.note("user_id").and_then(|id| Uuid::parse_str(id).ok());
    let plan = link.note("plan_id").and_then(Plan::lookup);
    let (Some(user_id), Some(plan)) = (user_id, plan) else {
        log::error!("Unusable correlation notes on payment link {}", link.id);
        return Ok(());
    };

    let amount = if link.amount > 0 {
        link.amount / 100
    } else {
        plan.amount
    };

    let subscription = activate_paid(
        pool,
        Activation {
            user_id,
            plan: plan.id.to_string(),
            amount,
            currency: plan.currency.to_string(),
            razorpay_order_id: link.id,
            razorpay_payment_id: Some(payment.id),
            duration_days: plan.duration_days,
        },
    )
    .await?;

    log::info!(
        "Subscription {} activated for user {} (plan {})",
        subscription.id,
        user_id,
        plan.id
    );
    Ok(())
}

/// Verifies a client-reported checkout and activates the subscription.
///
/// The signature covers the pipe-joined `order_id|payment_id` string;
/// a mismatch always rejects and is never retried.
pub async fn verify_payment(
    pool: &PgPool,
    config: &Config,
    user: &AuthUser,
    req: VerifyRequest,
) -> Res<Subscription> {
    let secret = &config.razorpay.key_secret;
    if secret.is_empty() {
        return Err(AppError::Configuration(
            "RAZORPAY_KEY_SECRET must be set".to_string(),
        ));
    }

    let payload = signature::payment_payload(&req.razorpay_order_id, &req.razorpay_payment_id);
    if !signature::verify(payload.as_bytes(), &req.razorpay_signature, secret) {
        return Err(AppError::SignatureInvalid(
            "Payment signature mismatch".to_string(),
        ));
    }

    let plan = Plan::lookup(&req.plan_id)
        .ok_or_else(|| AppError::InvalidPlan(req.plan_id.clone()))?;

    activate_paid(
        pool,
        Activation {
            user_id: user.id,
            plan: plan.id.to_string(),
            amount: plan.amount,
            currency: plan.currency.to_string(),
            razorpay_order_id: req.razorpay_order_id,
            razorpay_payment_id: Some(req.razorpay_payment_id),
            duration_days: plan.duration_days,
        },
    )
    .await
}

/// Polls the processor for a payment link's state and reconciles locally
/// when it is already paid, so the caller observes consistent state
/// without waiting for the webhook.
///
/// Processor errors degrade to `unknown` rather than `failed`, keeping
/// the poll retryable from the client.
pub async fn check_status(
    pool: &PgPool,
    config: &Config,
    user: &AuthUser,
    link_id: &str,
) -> Res<StatusResponse> {
    if link_id.is_empty() {
        return Ok(StatusResponse {
            status: "unknown".to_string(),
        });
    }
    let Ok(client) = RazorpayClient::from_config(&config.razorpay) else {
        return Ok(StatusResponse {
            status: "unknown".to_string(),
        });
    };

    let link = match client.fetch_payment_link(link_id).await {
        Ok(link) => link,
        Err(e) => {
            log::warn!("Status poll for {} failed: {}", link_id, e);
            return Ok(StatusResponse {
                status: "unknown".to_string(),
            });
        }
    };

    if link.status == "paid" {
        // webhook may not have fired yet; reconcile inline
        if let Some(plan) = link.note("plan_id").and_then(Plan::lookup) {
            let amount = if link.amount > 0 {
                link.amount / 100
            } else {
                plan.amount
            };
            let payment_id = link.captured_payment_id().map(str::to_string);
            activate_paid(
                pool,
                Activation {
                    user_id: user.id,
                    plan: plan.id.to_string(),
                    amount,
                    currency: plan.currency.to_string(),
                    razorpay_order_id: link.id,
                    razorpay_payment_id: payment_id,
                    duration_days: plan.duration_days,
                },
            )
            .await?;
        } else {
            log::error!("Paid link {} carries no usable plan note", link_id);
        }
        return Ok(StatusResponse {
            status: "paid".to_string(),
        });
    }

    Ok(StatusResponse {
        status: "pending".to_string(),
    })
}

/// Runs the reconciler for a confirmed payment, logging loudly when
/// storage fails: money has been collected with no entitlement granted.
async fn activate_paid(pool: &PgPool, data: Activation) -> Res<Subscription> {
    let order_ref = data.razorpay_order_id.clone();
    let user_id = data.user_id;
    db::subscription::activate(pool, data).await.map_err(|e| {
        log::error!(
            "PAID BUT UNENTITLED: failed to record paid subscription {} for user {}: {}",
            order_ref,
            user_id,
            e
        );
        e
    })
}
