use db::models::subscription::Subscription;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UserSubscriptionResponse {
    pub subscription: Option<Subscription>,
    pub is_premium: bool,
    pub days_remaining: i64,
}
