use db::models::subscription::Subscription;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    #[serde(default)]
    pub payment_link_id: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Checkout result a client submits directly after the hosted page
/// completes. Field names are the processor's own.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    #[serde(rename = "planId")]
    pub plan_id: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub subscription: Subscription,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub ok: bool,
}

/// Webhook delivery body: `{event, payload: {payment_link: {entity},
/// payment: {entity}}}`.
///
/// Both entities are optional on the wire; a verified but incomplete
/// delivery must stay inert rather than fail.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub payload: WebhookPayload,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub payment_link: Option<Wrapped<PaymentLinkEntity>>,
    #[serde(default)]
    pub payment: Option<Wrapped<PaymentEntity>>,
}

#[derive(Debug, Deserialize)]
pub struct Wrapped<T> {
    pub entity: T,
}

#[derive(Debug, Deserialize)]
pub struct PaymentLinkEntity {
    pub id: String,
    /// Amount in minor currency units.
    #[serde(default)]
    pub amount: i64,
    /// Correlation payload echoed from link creation; may be missing or
    /// malformed on the wire.
    #[serde(default)]
    pub notes: Value,
}

#[derive(Debug, Deserialize)]
pub struct PaymentEntity {
    pub id: String,
}

impl PaymentLinkEntity {
    pub fn note(&self, key: &str) -> Option<&str> {
        self.notes.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_paid_event() {
        let event: WebhookEvent = serde_json::from_str(
            r#"{
                "event": "payment_link.paid",
                "payload": {
                    "payment_link": {"entity": {"id": "plink_1", "amount": 1900,
                        "notes": {"user_id": "6f0e8a60-0000-0000-0000-000000000001", "plan_id": "yearly"}}},
                    "payment": {"entity": {"id": "pay_1"}}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(event.event, "payment_link.paid");
        let link = event.payload.payment_link.unwrap().entity;
        assert_eq!(link.id, "plink_1");
        assert_eq!(link.amount, 1900);
        assert_eq!(link.note("plan_id"), Some("yearly"));
        assert_eq!(event.payload.payment.unwrap().entity.id, "pay_1");
    }

    #[test]
    fn tolerates_missing_payload_entities() {
        let event: WebhookEvent =
            serde_json::from_str(r#"{"event": "payment_link.paid"}"#).unwrap();
        assert!(event.payload.payment_link.is_none());
        assert!(event.payload.payment.is_none());
    }

    #[test]
    fn tolerates_malformed_notes() {
        let event: WebhookEvent = serde_json::from_str(
            r#"{
                "event": "payment_link.paid",
                "payload": {
                    "payment_link": {"entity": {"id": "plink_1", "notes": []}},
                    "payment": {"entity": {"id": "pay_1"}}
                }
            }"#,
        )
        .unwrap();
        let link = event.payload.payment_link.unwrap().entity;
        assert_eq!(link.note("user_id"), None);
    }
}
