use {
    mollie_gateway::{
        AppState, adapters::mollie::client::MollieClient, config::GatewayConfig,
        infra::postgres::ensure_schema,
    },
    secrecy::ExposeSecret,
    sqlx::postgres::PgPoolOptions,
    std::{sync::Arc, time::Duration},
    tokio::signal,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();
    let config = GatewayConfig::from_env().expect("invalid gateway configuration");

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(3))
        .connect(config.database_url.expose_secret())
        .await
        .expect("failed to connect to database");

    ensure_schema(&pool)
        .await
        .expect("failed to create gateway tables");

    if !config.is_active() {
        tracing::warn!(
            sandbox = config.sandbox,
            "no API key for the current mode, gateway stays inactive"
        );
    }

    let api_key = config
        .api_key()
        .map(|key| key.expose_secret().to_string())
        .unwrap_or_default();
    let client =
        MollieClient::new(&config.api_base, api_key).expect("failed to build mollie client");

    let listen_addr = config.listen_addr.clone();
    let state = AppState::new(pool, config, Arc::new(client)).expect("failed to build app state");
    let app = mollie_gateway::router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .expect("failed to bind listener");
    tracing::info!("listening on {listen_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
