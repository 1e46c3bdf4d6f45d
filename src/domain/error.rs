use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer from the Mollie API.
    #[error("mollie api ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("config: {0}")]
    Config(String),

    #[error("crypto: {0}")]
    Crypto(String),
}

impl GatewayError {
    /// The API answered 404 for the requested resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Provider { status: 404, .. })
    }
}
