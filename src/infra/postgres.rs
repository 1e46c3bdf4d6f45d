pub mod billing_repo;
pub mod customer_repo;
pub mod transaction_repo;

use {crate::domain::error::GatewayError, sqlx::PgPool};

/// Create the gateway tables (and the billing tables for standalone
/// deployments) when they are missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), GatewayError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
