use std::time::Duration;

use common::error::AppError;
use common::razorpay::{CreatePaymentLink, PaymentNotes, RazorpayClient};
use common::retry::RetryConfig;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
        attempt_timeout: Duration::from_secs(5),
    }
}

fn client(server: &MockServer) -> RazorpayClient {
    RazorpayClient::new("rzp_test_key", "rzp_test_secret", &server.uri(), test_retry()).unwrap()
}

fn link_request() -> CreatePaymentLink {
    CreatePaymentLink {
        amount: 1900,
        currency: "USD".to_string(),
        description: "Yearly Premium".to_string(),
        reference_id: "rcpt_6f0e8a60_1700000000".to_string(),
        notes: PaymentNotes {
            user_id: "6f0e8a60-0000-0000-0000-000000000001".to_string(),
            plan_id: "yearly".to_string(),
        },
        callback_url: Some("https://fluxo.app/payment-status".to_string()),
        callback_method: Some("get".to_string()),
    }
}

#[tokio::test]
async fn create_payment_link_decodes_the_hosted_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/payment_links"))
        .and(body_partial_json(json!({
            "amount": 1900,
            "currency": "USD",
            "notes": {"user_id": "6f0e8a60-0000-0000-0000-000000000001", "plan_id": "yearly"},
            "callback_url": "https://fluxo.app/payment-status",
            "callback_method": "get"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "plink_1",
            "short_url": "https://rzp.io/l/plink_1",
            "status": "created",
            "amount": 1900,
            "notes": {"user_id": "6f0e8a60-0000-0000-0000-000000000001", "plan_id": "yearly"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let link = client(&server)
        .create_payment_link(&link_request())
        .await
        .unwrap();

    assert_eq!(link.id, "plink_1");
    assert_eq!(link.short_url, "https://rzp.io/l/plink_1");
    assert_eq!(link.note("plan_id"), Some("yearly"));
}

#[tokio::test]
async fn fetch_payment_link_queries_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/payment_links/plink_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "plink_1",
            "status": "paid",
            "amount": 1900,
            "payments": [{"payment_id": "pay_1", "status": "captured"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let link = client(&server).fetch_payment_link("plink_1").await.unwrap();

    assert_eq!(link.status, "paid");
    assert_eq!(link.captured_payment_id(), Some("pay_1"));
}

#[tokio::test]
async fn transient_failures_use_the_full_retry_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/payment_links/plink_1"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/payment_links/plink_1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "plink_1", "status": "paid"})),
        )
        .mount(&server)
        .await;

    let link = client(&server).fetch_payment_link("plink_1").await.unwrap();

    assert_eq!(link.status, "paid");
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn client_errors_are_never_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/payment_links"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": "BAD_REQUEST_ERROR", "description": "amount too small"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .create_payment_link(&link_request())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Provider(_)), "{err}");
    assert!(err.to_string().contains("amount too small"));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn non_json_success_bodies_are_a_hard_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/payment_links/plink_1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).fetch_payment_link("plink_1").await.unwrap_err();

    assert!(matches!(err, AppError::Provider(_)), "{err}");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn exhausted_retries_aggregate_into_one_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/payment_links/plink_1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server).fetch_payment_link("plink_1").await.unwrap_err();

    assert!(matches!(err, AppError::ProviderUnavailable(_)), "{err}");
    assert!(err.to_string().contains("3 attempts"));
}
