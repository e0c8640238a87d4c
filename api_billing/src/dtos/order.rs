use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateRequest {
    pub plan_id: String,
    /// Return URL the hosted page redirects to after checkout.
    #[serde(default)]
    pub callback_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateResponse {
    pub payment_url: String,
    pub payment_link_id: String,
}
