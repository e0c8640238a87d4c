use auth::AuthUser;
use chrono::Utc;
use common::error::Res;
use sqlx::PgPool;

use crate::dtos::sub::UserSubscriptionResponse;

/// Premium status for a user: any active row with a future expiry counts.
pub async fn current_subscription(pool: &PgPool, user: &AuthUser) -> Res<UserSubscriptionResponse> {
    let subscription = db::subscription::get_active_for_user(pool, user.id).await?;

    let days_remaining = subscription
        .as_ref()
        .map(|sub| {
            let seconds = (sub.expires_at - Utc::now()).num_seconds().max(0);
            // round up, matching the "N days left" banner
            (seconds + 86_399) / 86_400
        })
        .unwrap_or(0);

    Ok(UserSubscriptionResponse {
        is_premium: subscription.is_some(),
        days_remaining,
        subscription,
    })
}
