use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    pub starts_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a pending subscription at order time.
#[derive(Debug, Clone)]
pub struct PendingSubscription {
    pub user_id: Uuid,
    pub plan: String,
    pub amount: i64,
    pub currency: String,
    pub razorpay_order_id: String,
}

/// Fields required to reconcile a confirmed payment into an active
/// subscription.
#[derive(Debug, Clone)]
pub struct Activation {
    pub user_id: Uuid,
    pub plan: String,
    pub amount: i64,
    pub currency: String,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: Option<String>,
    /// Entitlement length granted by the paid plan.
    pub duration_days: i64,
}
