use {
    crate::domain::{
        error::GatewayError,
        id::{InvoiceId, PaymentId},
        payment::TransactionStatus,
    },
    sqlx::PgExecutor,
};

#[derive(Debug, sqlx::FromRow)]
pub struct TransactionRow {
    pub invoiceid: i32,
    pub transid: Option<String>,
    pub status: String,
}

pub async fn find<'e, E: PgExecutor<'e>>(
    executor: E,
    invoice_id: InvoiceId,
) -> Result<Option<TransactionRow>, GatewayError> {
    let row = sqlx::query_as::<_, TransactionRow>(
        "SELECT invoiceid, transid, status FROM mod_mollie_transactions WHERE invoiceid = $1",
    )
    .bind(invoice_id.get())
    .fetch_optional(executor)
    .await?;

    Ok(row)
}

pub async fn has_status<'e, E: PgExecutor<'e>>(
    executor: E,
    invoice_id: InvoiceId,
    status: TransactionStatus,
) -> Result<bool, GatewayError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM mod_mollie_transactions WHERE invoiceid = $1 AND status = $2)",
    )
    .bind(invoice_id.get())
    .bind(status.as_str())
    .fetch_one(executor)
    .await?;

    Ok(exists)
}

pub async fn has_pending<'e, E: PgExecutor<'e>>(
    executor: E,
    invoice_id: InvoiceId,
) -> Result<bool, GatewayError> {
    has_status(executor, invoice_id, TransactionStatus::Pending).await
}

pub async fn has_failed<'e, E: PgExecutor<'e>>(
    executor: E,
    invoice_id: InvoiceId,
) -> Result<bool, GatewayError> {
    has_status(executor, invoice_id, TransactionStatus::Failed).await
}

/// Record the latest attempt for the invoice, replacing any earlier one.
pub async fn update_status<'e, E: PgExecutor<'e>>(
    executor: E,
    invoice_id: InvoiceId,
    status: TransactionStatus,
    payment_id: Option<&PaymentId>,
) -> Result<(), GatewayError> {
    sqlx::query(
        r#"
        INSERT INTO mod_mollie_transactions (invoiceid, transid, status)
        VALUES ($1, $2, $3)
        ON CONFLICT (invoiceid) DO UPDATE
        SET transid = EXCLUDED.transid, status = EXCLUDED.status
        "#,
    )
    .bind(invoice_id.get())
    .bind(payment_id.map(PaymentId::as_str))
    .bind(status.as_str())
    .execute(executor)
    .await?;

    Ok(())
}

/// Mark the invoice's attempt failed, unless the row already tracks a newer
/// payment. Returns `false` when the row was left alone.
pub async fn mark_failed<'e, E: PgExecutor<'e>>(
    executor: E,
    invoice_id: InvoiceId,
    payment_id: &PaymentId,
) -> Result<bool, GatewayError> {
    let result = sqlx::query(
        r#"
        INSERT INTO mod_mollie_transactions (invoiceid, transid, status)
        VALUES ($1, $2, $3)
        ON CONFLICT (invoiceid) DO UPDATE
        SET transid = EXCLUDED.transid, status = EXCLUDED.status
        WHERE mod_mollie_transactions.transid IS NULL
           OR mod_mollie_transactions.transid = EXCLUDED.transid
        "#,
    )
    .bind(invoice_id.get())
    .bind(payment_id.as_str())
    .bind(TransactionStatus::Failed.as_str())
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn remove<'e, E: PgExecutor<'e>>(
    executor: E,
    invoice_id: InvoiceId,
) -> Result<u64, GatewayError> {
    let result = sqlx::query("DELETE FROM mod_mollie_transactions WHERE invoiceid = $1")
        .bind(invoice_id.get())
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
