use chrono::{DateTime, Duration, Utc};
use common::error::{AppError, Res};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::models::subscription::{Activation, PendingSubscription, Subscription};

/// Computes the `[starts_at, expires_at)` entitlement window opening now.
///
/// The window always opens at activation time, not order-creation time:
/// the most recent payment resets the clock rather than extending a prior
/// expiry.
pub fn entitlement_window(duration_days: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    let starts_at = Utc::now();
    (starts_at, starts_at + Duration::days(duration_days))
}

/// Inserts the pending row written at order-creation time.
///
/// The placeholder expiry equals the start timestamp, so a pending row
/// never counts as an entitlement.
pub async fn insert_pending<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: PendingSubscription,
) -> Res<Subscription> {
    sqlx::query_as::<_, Subscription>(
        r#"
        INSERT INTO subscriptions
            (user_id, plan, status, amount, currency, starts_at, expires_at, razorpay_order_id)
        VALUES ($1, $2, 'pending', $3, $4, now(), now(), $5)
        RETURNING *
        "#,
    )
    .bind(data.user_id)
    .bind(&data.plan)
    .bind(data.amount)
    .bind(&data.currency)
    .bind(&data.razorpay_order_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Reconciles a confirmed payment into an active subscription.
///
/// Single entry point for the webhook, the status poller and the
/// synchronous verification flow, so at-least-once delivery converges on
/// one row. First updates the row matched by `(razorpay_order_id,
/// user_id)`; a row that is already active keeps its original window, so
/// duplicate deliveries never move the expiry. When no row matches (the
/// webhook won the race against the pending insert, or no pending row was
/// ever written), a complete active row is inserted instead.
pub async fn activate(pool: &PgPool, data: Activation) -> Res<Subscription> {
    let (starts_at, expires_at) = entitlement_window(data.duration_days);

    let updated = sqlx::query_as::<_, Subscription>(
        r#"
        UPDATE subscriptions
        SET status = 'active',
            razorpay_payment_id = COALESCE($1, razorpay_payment_id),
            starts_at = CASE WHEN status = 'active' THEN starts_at ELSE $2 END,
            expires_at = CASE WHEN status = 'active' THEN expires_at ELSE $3 END
        WHERE razorpay_order_id = $4 AND user_id = $5
        RETURNING *
        "#,
    )
    .bind(&data.razorpay_payment_id)
    .bind(starts_at)
    .bind(expires_at)
    .bind(&data.razorpay_order_id)
    .bind(data.user_id)
    .fetch_optional(pool)
    .await
    .map_err(AppError::from)?;

    if let Some(subscription) = updated {
        return Ok(subscription);
    }

    sqlx::query_as::<_, Subscription>(
        r#"
        INSERT INTO subscriptions
            (user_id, plan, status, amount, currency, starts_at, expires_at,
             razorpay_order_id, razorpay_payment_id)
        VALUES ($1, $2, 'active', $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(data.user_id)
    .bind(&data.plan)
    .bind(data.amount)
    .bind(&data.currency)
    .bind(starts_at)
    .bind(expires_at)
    .bind(&data.razorpay_order_id)
    .bind(&data.razorpay_payment_id)
    .fetch_one(pool)
    .await
    .map_err(AppError::from)
}

/// Newest unexpired active subscription for a user, if any.
///
/// Duplicate rows from the documented webhook/poll race are harmless
/// here: any matching row grants the entitlement.
pub async fn get_active_for_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<Subscription>> {
    sqlx::query_as::<_, Subscription>(
        r#"
        SELECT * FROM subscriptions
        WHERE user_id = $1 AND status = 'active' AND expires_at >= now()
        ORDER BY expires_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_opens_now_and_spans_the_plan_duration() {
        let before = Utc::now();
        let (starts_at, expires_at) = entitlement_window(365);
        let after = Utc::now();

        assert!(starts_at >= before && starts_at <= after);
        assert_eq!(expires_at - starts_at, Duration::days(365));
    }

    #[test]
    fn zero_duration_window_is_empty() {
        let (starts_at, expires_at) = entitlement_window(0);
        assert_eq!(starts_at, expires_at);
    }
}
