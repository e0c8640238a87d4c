use common::error::{AppError, Res};
use log::{info, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated caller as resolved by the identity provider.
///
/// This service never issues or validates session tokens itself; the
/// provider owns sign-up and session issuance, and this is the only shape
/// it hands back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

pub struct IdentityClient {
    client: Client,
    identity_url: String,
    api_key: String,
}

impl IdentityClient {
    pub fn new(identity_url: String, api_key: String) -> Self {
        IdentityClient {
            client: Client::new(),
            identity_url,
            api_key,
        }
    }

    /// Resolves a bearer token to the user it belongs to.
    ///
    /// Forwards the caller's credential to the hosted provider; any
    /// failure collapses to `Unauthorized` since the caller cannot
    /// distinguish a bad token from a rejected one.
    pub async fn get_user(&self, token: &str) -> Res<AuthUser> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.identity_url))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            let error_response = response
                .json::<serde_json::Value>()
                .await
                .unwrap_or(serde_json::json!({"message": "Failed to resolve user"}));
            let message = error_response["message"]
                .as_str()
                .unwrap_or("Failed to resolve user")
                .to_string();
            warn!("Token resolution failed: {}", message);
            return Err(AppError::Unauthorized(message));
        }

        let user = response.json::<AuthUser>().await?;
        info!("Token resolved for user_id: {}", user.id);
        Ok(user)
    }
}
