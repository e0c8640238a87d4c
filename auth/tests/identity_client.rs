use auth::services::identity::IdentityClient;
use common::error::AppError;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn resolves_a_valid_token() {
    let server = MockServer::start().await;
    let user_id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("apikey", "anon_key"))
        .and(header("Authorization", "Bearer tok_valid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": user_id,
            "email": "user@example.com",
            "role": "authenticated"
        })))
        .mount(&server)
        .await;

    let client = IdentityClient::new(server.uri(), "anon_key".to_string());
    let user = client.get_user("tok_valid").await.unwrap();

    assert_eq!(user.id, user_id);
    assert_eq!(user.email, "user@example.com");
}

#[tokio::test]
async fn rejected_tokens_collapse_to_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "invalid JWT"})),
        )
        .mount(&server)
        .await;

    let client = IdentityClient::new(server.uri(), "anon_key".to_string());
    let err = client.get_user("tok_expired").await.unwrap_err();

    assert!(matches!(err, AppError::Unauthorized(_)), "{err}");
    assert!(err.to_string().contains("invalid JWT"));
}
