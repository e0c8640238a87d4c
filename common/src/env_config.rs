use std::{env, sync::Arc};

use crate::error::{AppError, Res};

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// This struct holds all the necessary configuration parameters
/// required to initialize and run the server.
/// It includes database connection details, server host and port,
/// number of worker threads, CORS settings, logging preferences,
/// the identity provider used to resolve bearer tokens, and the
/// Razorpay credentials used by the billing pipeline.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to.
    pub database_url: String,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origin for CORS (Cross-Origin Resource Sharing).
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Configuration for the hosted identity provider.
    pub identity: IdentityConfig,
    /// Configuration for the Razorpay payment processor.
    pub razorpay: RazorpayConfig,
}

#[derive(Clone, Debug)]
/// `IdentityConfig` holds the settings needed to resolve an inbound
/// bearer token into an authenticated user.
///
/// The identity provider is an external collaborator: this service never
/// issues or validates session tokens itself, it only forwards the
/// caller's credential and consumes the resulting `{id, email}` pair.
pub struct IdentityConfig {
    /// Base URL of the identity provider.
    pub url: String,
    /// The public API key sent alongside the forwarded credential.
    pub api_key: String,
}

#[derive(Clone, Debug)]
/// Credentials and endpoint settings for the Razorpay HTTP API.
///
/// Key id and key secret authenticate outbound calls via Basic auth; the
/// webhook secret verifies inbound deliveries. All three may be absent in
/// development; the billing endpoints then fail with a configuration
/// error.
pub struct RazorpayConfig {
    /// Razorpay key id (Basic auth username).
    pub key_id: String,
    /// Razorpay key secret (Basic auth password, HMAC key for the
    /// synchronous verification flow).
    pub key_secret: String,
    /// Secret used to verify webhook signatures.
    pub webhook_secret: String,
    /// Base URL of the Razorpay API.
    pub api_url: String,
}

impl RazorpayConfig {
    /// Fails fast when the processor credentials are absent.
    /// Checked once at startup and again wherever a client is built.
    pub fn ensure_configured(&self) -> Res<()> {
        if self.key_id.is_empty() || self.key_secret.is_empty() {
            return Err(AppError::Configuration(
                "RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET must be set".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `ENVIRONMENT`: "development" or "production"
    /// - `DATABASE_URL`: Connection string for the database
    /// - `IDENTITY_URL`: Base URL of the identity provider
    ///
    /// Optional (with defaults):
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `CORS_ALLOWED_ORIGIN`: Allowed CORS origin (default: "http://localhost:3000")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - `IDENTITY_API_KEY`: Public API key for the identity provider
    /// - `RAZORPAY_KEY_ID` / `RAZORPAY_KEY_SECRET` / `RAZORPAY_WEBHOOK_SECRET`
    /// - `RAZORPAY_API_URL` (default: "https://api.razorpay.com")
    ///
    /// # Panics
    ///
    /// This function will panic if required environment variables are
    /// missing or if numeric values cannot be parsed correctly.
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();

        Arc::new(Config {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_host: env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            num_workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(4),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            identity: IdentityConfig {
                url: env::var("IDENTITY_URL").expect("IDENTITY_URL must be set"),
                api_key: env::var("IDENTITY_API_KEY").unwrap_or_default(),
            },
            razorpay: RazorpayConfig {
                key_id: env::var("RAZORPAY_KEY_ID").unwrap_or_default(),
                key_secret: env::var("RAZORPAY_KEY_SECRET").unwrap_or_default(),
                webhook_secret: env::var("RAZORPAY_WEBHOOK_SECRET").unwrap_or_default(),
                api_url: env::var("RAZORPAY_API_URL")
                    .unwrap_or_else(|_| "https://api.razorpay.com".to_string()),
            },
        })
    }
}
