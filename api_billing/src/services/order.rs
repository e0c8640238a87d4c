use auth::AuthUser;
use chrono::Utc;
use common::error::{AppError, Res};
use common::razorpay::{CreatePaymentLink, PaymentNotes, RazorpayClient};
use db::models::subscription::PendingSubscription;
use sqlx::PgPool;

use crate::dtos::order::{OrderCreateRequest, OrderCreateResponse};
use crate::models::plan::Plan;

/// Creates a hosted payment page for the chosen plan and records the
/// matching pending subscription.
///
/// The plan is validated before anything else; an unknown identifier
/// makes zero processor calls and zero storage writes. A processor
/// failure likewise writes nothing.
pub async fn create_order(
    client: &RazorpayClient,
    pool: &PgPool,
    user: &AuthUser,
    req: OrderCreateRequest,
) -> Res<OrderCreateResponse> {
    let plan = Plan::lookup(&req.plan_id)
        .ok_or_else(|| AppError::InvalidPlan(req.plan_id.clone()))?;

    // receipt max 40 chars
    let user_ref = user.id.simple().to_string();
    let reference_id = format!("rcpt_{}_{}", &user_ref[..8], Utc::now().timestamp());

    let link = client
        .create_payment_link(&CreatePaymentLink {
            amount: plan.amount_minor(),
            currency: plan.currency.to_string(),
            description: plan.name.to_string(),
            reference_id,
            notes: PaymentNotes {
                user_id: user.id.to_string(),
                plan_id: plan.id.to_string(),
            },
            callback_url: req.callback_url.clone(),
            callback_method: req.callback_url.as_ref().map(|_| "get".to_string()),
        })
        .await?;

    let pending = db::subscription::insert_pending(
        pool,
        PendingSubscription {
            user_id: user.id,
            plan: plan.id.to_string(),
            amount: plan.amount,
            currency: plan.currency.to_string(),
            razorpay_order_id: link.id.clone(),
        },
    )
    .await?;

    log::info!(
        "Created payment link {} for user {} (plan {})",
        pending.razorpay_order_id,
        user.id,
        plan.id
    );

    Ok(OrderCreateResponse {
        payment_url: link.short_url,
        payment_link_id: link.id,
    })
}
