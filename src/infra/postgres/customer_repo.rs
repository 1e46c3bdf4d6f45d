use {
    crate::domain::{error::GatewayError, id::ClientId},
    sqlx::PgExecutor,
};

/// Encrypted Mollie customer id stored for a billing client.
pub async fn find<'e, E: PgExecutor<'e>>(
    executor: E,
    client_id: ClientId,
) -> Result<Option<String>, GatewayError> {
    let stored: Option<String> =
        sqlx::query_scalar("SELECT customerid FROM mod_mollie_customers WHERE clientid = $1")
            .bind(client_id.get())
            .fetch_optional(executor)
            .await?;

    Ok(stored)
}

/// Insert or replace the client's customer id.
pub async fn upsert<'e, E: PgExecutor<'e>>(
    executor: E,
    client_id: ClientId,
    encrypted_customer_id: &str,
) -> Result<(), GatewayError> {
    sqlx::query(
        r#"
        INSERT INTO mod_mollie_customers (clientid, customerid)
        VALUES ($1, $2)
        ON CONFLICT (clientid) DO UPDATE SET customerid = EXCLUDED.customerid
        "#,
    )
    .bind(client_id.get())
    .bind(encrypted_customer_id)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn delete<'e, E: PgExecutor<'e>>(
    executor: E,
    client_id: ClientId,
) -> Result<bool, GatewayError> {
    let result = sqlx::query("DELETE FROM mod_mollie_customers WHERE clientid = $1")
        .bind(client_id.get())
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
