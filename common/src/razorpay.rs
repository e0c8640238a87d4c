use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::sleep;

use crate::env_config::RazorpayConfig;
use crate::error::{AppError, Res};
use crate::retry::RetryConfig;

/// Thin client over the Razorpay REST API.
///
/// Razorpay has no maintained Rust SDK, so the two endpoints the billing
/// pipeline consumes are called directly: create payment link and fetch
/// payment link. Every call authenticates with Basic auth and runs through
/// the bounded retry loop in [`call`](RazorpayClient::call).
pub struct RazorpayClient {
    http: Client,
    api_url: String,
    key_id: String,
    key_secret: String,
    retry: RetryConfig,
}

/// Request body for `POST /v1/payment_links`.
///
/// `notes` round-trips `{user_id, plan_id}` through the processor; it is
/// the only correlation between a payment event and the local schema.
#[derive(Debug, Serialize)]
pub struct CreatePaymentLink {
    /// Amount in minor currency units.
    pub amount: i64,
    pub currency: String,
    pub description: String,
    /// Receipt-style reference, max 40 characters.
    pub reference_id: String,
    pub notes: PaymentNotes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentNotes {
    pub user_id: String,
    pub plan_id: String,
}

/// Payment link entity as returned by create and fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentLink {
    pub id: String,
    #[serde(default)]
    pub short_url: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub amount: i64,
    /// Provider-held metadata; may arrive missing, empty, or as an
    /// empty array instead of an object.
    #[serde(default)]
    pub notes: Value,
    #[serde(default)]
    pub payments: Vec<LinkPayment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkPayment {
    #[serde(default)]
    pub payment_id: String,
    #[serde(default)]
    pub status: String,
}

impl PaymentLink {
    /// Reads a string entry from the notes payload, tolerating missing or
    /// malformed notes.
    pub fn note(&self, key: &str) -> Option<&str> {
        self.notes.get(key).and_then(Value::as_str)
    }

    /// Id of the captured payment echoed on the link, when present.
    pub fn captured_payment_id(&self) -> Option<&str> {
        self.payments
            .iter()
            .find(|p| p.status == "captured")
            .or_else(|| self.payments.first())
            .map(|p| p.payment_id.as_str())
            .filter(|id| !id.is_empty())
    }
}

impl RazorpayClient {
    /// Builds a client from the application configuration, failing with a
    /// configuration error when the processor credentials are absent.
    pub fn from_config(config: &RazorpayConfig) -> Res<Self> {
        config.ensure_configured()?;
        Self::new(
            &config.key_id,
            &config.key_secret,
            &config.api_url,
            RetryConfig::default(),
        )
    }

    pub fn new(key_id: &str, key_secret: &str, api_url: &str, retry: RetryConfig) -> Res<Self> {
        let http = Client::builder()
            .timeout(retry.attempt_timeout)
            .build()
            .map_err(AppError::from)?;
        Ok(RazorpayClient {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            key_id: key_id.to_string(),
            key_secret: key_secret.to_string(),
            retry,
        })
    }

    /// Creates a hosted payment page and returns its entity.
    ///
    /// The returned `short_url` is browser-renderable from any client; no
    /// processor SDK is required on the caller's side.
    pub async fn create_payment_link(&self, req: &CreatePaymentLink) -> Res<PaymentLink> {
        let body = serde_json::to_value(req)
            .map_err(|e| AppError::Internal(format!("Failed to encode payment link: {}", e)))?;
        let value = self
            .call(Method::POST, "/v1/payment_links", Some(&body))
            .await?;
        serde_json::from_value(value)
            .map_err(|e| AppError::Provider(format!("Unexpected payment link shape: {}", e)))
    }

    /// Fetches a payment link by id, bypassing the webhook path.
    pub async fn fetch_payment_link(&self, link_id: &str) -> Res<PaymentLink> {
        let path = format!("/v1/payment_links/{}", link_id);
        let value = self.call(Method::GET, &path, None).await?;
        serde_json::from_value(value)
            .map_err(|e| AppError::Provider(format!("Unexpected payment link shape: {}", e)))
    }

    /// Sends one API call through the retry policy.
    ///
    /// 4xx responses and undecodable success bodies surface immediately;
    /// network failures, timeouts and 5xx responses consume the retry
    /// budget with exponential backoff. Exhaustion aggregates into a
    /// single error naming the attempt count and last cause.
    async fn call(&self, method: Method, path: &str, body: Option<&Value>) -> Res<Value> {
        let url = format!("{}{}", self.api_url, path);
        let mut attempt: u32 = 0;
        let mut last_error;

        loop {
            attempt += 1;
            let mut request = self
                .http
                .request(method.clone(), &url)
                .basic_auth(&self.key_id, Some(&self.key_secret));
            if let Some(body) = body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    match response.text().await {
                        Ok(text) if status.is_client_error() => {
                            return Err(AppError::Provider(provider_description(&text, status)));
                        }
                        Ok(text) if status.is_success() => {
                            return serde_json::from_str(&text).map_err(|_| {
                                AppError::Provider(format!("Non-JSON response from {}", path))
                            });
                        }
                        Ok(text) => last_error = provider_description(&text, status),
                        Err(e) => last_error = e.to_string(),
                    }
                }
                Err(e) => last_error = e.to_string(),
            }

            if !self.retry.can_retry(attempt) {
                break;
            }
            let delay = self.retry.delay_after_attempt(attempt);
            log::warn!(
                "Razorpay {} {} failed (attempt {}/{}): {}. Retrying in {:?}",
                method,
                path,
                attempt,
                self.retry.max_attempts,
                last_error,
                delay
            );
            sleep(delay).await;
        }

        Err(AppError::ProviderUnavailable(format!(
            "{} {} failed after {} attempts: {}",
            method, path, attempt, last_error
        )))
    }
}

/// Pulls the processor's own error description out of a failure body,
/// falling back to the bare status line rather than inventing a reason.
fn provider_description(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("description"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("HTTP {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn notes_tolerate_provider_shapes() {
        let link: PaymentLink = serde_json::from_value(json!({
            "id": "plink_1",
            "notes": {"user_id": "u-1", "plan_id": "yearly"}
        }))
        .unwrap();
        assert_eq!(link.note("user_id"), Some("u-1"));
        assert_eq!(link.note("plan_id"), Some("yearly"));

        // Razorpay serializes empty notes as an array
        let empty: PaymentLink =
            serde_json::from_value(json!({"id": "plink_2", "notes": []})).unwrap();
        assert_eq!(empty.note("user_id"), None);
    }

    #[test]
    fn captured_payment_wins_over_attempts() {
        let link: PaymentLink = serde_json::from_value(json!({
            "id": "plink_1",
            "payments": [
                {"payment_id": "pay_failed", "status": "failed"},
                {"payment_id": "pay_ok", "status": "captured"}
            ]
        }))
        .unwrap();
        assert_eq!(link.captured_payment_id(), Some("pay_ok"));
    }

    #[test]
    fn description_comes_from_the_processor() {
        assert_eq!(
            provider_description(
                r#"{"error":{"code":"BAD_REQUEST_ERROR","description":"amount too small"}}"#,
                StatusCode::BAD_REQUEST
            ),
            "amount too small"
        );
        assert_eq!(
            provider_description("<html>oops</html>", StatusCode::BAD_GATEWAY),
            "HTTP 502 Bad Gateway"
        );
    }
}
