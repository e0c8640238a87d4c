use actix_web::HttpResponse;
use thiserror::Error;

pub type Res<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    // === APPLICATION ERRORS ===
    #[error("Authorization error: {0}")]
    Unauthorized(String),

    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Payment provider error: {0}")]
    Provider(String),

    #[error("Payment provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Invalid signature: {0}")]
    SignatureInvalid(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn to_http_response(&self) -> HttpResponse {
        let is_dev = cfg!(debug_assertions);

        let to_internal_json = |err_msg: &str| {
            if is_dev {
                serde_json::json!({ "error": err_msg })
            } else {
                serde_json::json!({ "error": "Internal server error" })
            }
        };

        match self {
            // === CONVERSION ERRORS ===
            AppError::Database(error) => {
                log::error!("Database error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(&error.to_string()))
            }
            AppError::Reqwest(error) => {
                log::error!("Reqwest error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(&error.to_string()))
            }

            // === APPLICATION ERRORS ===
            AppError::Unauthorized(_) => {
                HttpResponse::Unauthorized().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::InvalidPlan(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::Configuration(error) => {
                log::error!("Configuration error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(&error.to_string()))
            }
            AppError::Provider(_) => {
                log::error!("Payment provider error: {}", self);
                HttpResponse::BadGateway().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::ProviderUnavailable(_) => {
                log::error!("Payment provider unavailable: {}", self);
                HttpResponse::ServiceUnavailable()
                    .json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::SignatureInvalid(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::NotFound(_) => {
                HttpResponse::NotFound().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::BadRequest(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": self.to_string() }))
            }

            AppError::Internal(error) => {
                log::error!("Internal error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(&error.to_string()))
            }
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        self.to_http_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        let cases = [
            (AppError::Unauthorized("no token".into()), StatusCode::UNAUTHORIZED),
            (AppError::InvalidPlan("weekly".into()), StatusCode::BAD_REQUEST),
            (AppError::SignatureInvalid("mismatch".into()), StatusCode::BAD_REQUEST),
            (AppError::Provider("bad shape".into()), StatusCode::BAD_GATEWAY),
            (
                AppError::ProviderUnavailable("timed out".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Configuration("missing keys".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::NotFound("row".into()), StatusCode::NOT_FOUND),
        ];

        for (err, expected) in cases {
            assert_eq!(err.to_http_response().status(), expected, "{err}");
        }
    }
}
