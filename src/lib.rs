pub mod adapters;
pub mod config;
pub mod domain;
pub mod i18n;
pub mod infra;
pub mod services;

use {
    axum::{
        Router,
        extract::DefaultBodyLimit,
        routing::{get, post},
    },
    config::{CALLBACK_PATH, GatewayConfig},
    domain::{error::GatewayError, provider::PaymentProvider},
    infra::{
        crypto::CustomerIdCipher,
        nonce::{DEFAULT_TTL_SECONDS, NonceGenerator},
        session::SessionNonces,
    },
    secrecy::{ExposeSecret, SecretString},
    std::{sync::Arc, time::Duration},
    tower::ServiceBuilder,
    tower_http::timeout::TimeoutLayer,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub config: Arc<GatewayConfig>,
    pub provider: Arc<dyn PaymentProvider>,
    pub cipher: Arc<CustomerIdCipher>,
    pub nonces: Arc<NonceGenerator>,
    pub sessions: Arc<SessionNonces>,
}

impl AppState {
    pub fn new(
        pool: sqlx::PgPool,
        config: GatewayConfig,
        provider: Arc<dyn PaymentProvider>,
    ) -> Result<Self, GatewayError> {
        let cipher = CustomerIdCipher::from_base64(config.customer_id_key.expose_secret())?;
        let nonces = NonceGenerator::new(
            SecretString::new(config.nonce_secret.expose_secret().into()),
            DEFAULT_TTL_SECONDS,
        );

        Ok(Self {
            pool,
            config: Arc::new(config),
            provider,
            cipher: Arc::new(cipher),
            nonces: Arc::new(nonces),
            sessions: Arc::new(SessionNonces::new(DEFAULT_TTL_SECONDS)),
        })
    }
}

pub fn router(state: AppState) -> Router {
    use adapters::{gateway, mollie::webhook};

    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/gateway/metadata", get(gateway::metadata_handler))
        .route("/gateway/config", get(gateway::config_handler))
        .route("/gateway/link", post(gateway::link_handler))
        .route("/gateway/refund", post(gateway::refund_handler))
        .route("/gateway/admin-status", post(gateway::admin_status_handler))
        .route(CALLBACK_PATH, post(webhook::callback_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(DefaultBodyLimit::max(64 * 1024)),
        )
        .with_state(state)
}
