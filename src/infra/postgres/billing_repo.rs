//! Reads and writes against the billing platform's own tables.

use {
    crate::domain::{
        error::GatewayError,
        id::{ClientId, InvoiceId, PaymentId},
        money::{Money, MoneyAmount},
    },
    sqlx::{PgExecutor, Postgres, Transaction},
};

pub const INVOICE_PAID: &str = "Paid";
pub const INVOICE_UNPAID: &str = "Unpaid";

pub struct InvoicePayment<'a> {
    pub invoice_id: InvoiceId,
    pub transaction_id: &'a PaymentId,
    pub amount: &'a Money,
    pub fees: MoneyAmount,
    pub gateway: &'a str,
    /// Suppress the payment confirmation email.
    pub no_email: bool,
}

pub struct ClientTransaction<'a> {
    pub client_id: ClientId,
    /// 0 selects the client's default currency.
    pub currency_id: i32,
    pub description: &'a str,
    pub amount_in: MoneyAmount,
    pub fees: MoneyAmount,
    pub amount_out: MoneyAmount,
    pub gateway: &'a str,
    pub transaction_id: &'a PaymentId,
    pub invoice_id: InvoiceId,
}

pub async fn invoice_exists<'e, E: PgExecutor<'e>>(
    executor: E,
    invoice_id: InvoiceId,
) -> Result<bool, GatewayError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM invoices WHERE id = $1)")
        .bind(invoice_id.get())
        .fetch_one(executor)
        .await?;

    Ok(exists)
}

/// Client that owns the invoice.
pub async fn invoice_client<'e, E: PgExecutor<'e>>(
    executor: E,
    invoice_id: InvoiceId,
) -> Result<Option<ClientId>, GatewayError> {
    let user_id: Option<i32> = sqlx::query_scalar("SELECT userid FROM invoices WHERE id = $1")
        .bind(invoice_id.get())
        .fetch_optional(executor)
        .await?;

    user_id.map(ClientId::new).transpose()
}

/// Whether a payment with this transaction id was already applied.
pub async fn payment_recorded<'e, E: PgExecutor<'e>>(
    executor: E,
    transaction_id: &PaymentId,
) -> Result<bool, GatewayError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM invoice_payments WHERE transid = $1)")
            .bind(transaction_id.as_str())
            .fetch_one(executor)
            .await?;

    Ok(exists)
}

/// Whether a client transaction was already booked for this payment.
pub async fn transaction_booked<'e, E: PgExecutor<'e>>(
    executor: E,
    transaction_id: &PaymentId,
) -> Result<bool, GatewayError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM client_transactions WHERE transid = $1)")
            .bind(transaction_id.as_str())
            .fetch_one(executor)
            .await?;

    Ok(exists)
}

/// Apply a payment to the invoice and mark it paid once fully covered.
/// Returns `true` when this payment settled the invoice.
pub async fn add_invoice_payment(
    tx: &mut Transaction<'_, Postgres>,
    payment: &InvoicePayment<'_>,
) -> Result<bool, GatewayError> {
    sqlx::query(
        r#"
        INSERT INTO invoice_payments (invoiceid, transid, amount, fees, currency, gateway, no_email)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(payment.invoice_id.get())
    .bind(payment.transaction_id.as_str())
    .bind(payment.amount.amount().minor())
    .bind(payment.fees.minor())
    .bind(payment.amount.currency().as_str())
    .bind(payment.gateway)
    .bind(payment.no_email)
    .execute(&mut **tx)
    .await?;

    let settled = sqlx::query(
        r#"
        UPDATE invoices
        SET status = $2, datepaid = now()
        WHERE id = $1
          AND status <> $2
          AND total <= (SELECT COALESCE(SUM(amount), 0) FROM invoice_payments WHERE invoiceid = $1)
        "#,
    )
    .bind(payment.invoice_id.get())
    .bind(INVOICE_PAID)
    .execute(&mut **tx)
    .await?;

    Ok(settled.rows_affected() > 0)
}

pub async fn mark_invoice_unpaid<'e, E: PgExecutor<'e>>(
    executor: E,
    invoice_id: InvoiceId,
) -> Result<(), GatewayError> {
    sqlx::query("UPDATE invoices SET status = $2, datepaid = NULL WHERE id = $1")
        .bind(invoice_id.get())
        .bind(INVOICE_UNPAID)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn add_transaction<'e, E: PgExecutor<'e>>(
    executor: E,
    transaction: &ClientTransaction<'_>,
) -> Result<(), GatewayError> {
    sqlx::query(
        r#"
        INSERT INTO client_transactions
            (userid, currency, description, amountin, fees, amountout, gateway, transid, invoiceid)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(transaction.client_id.get())
    .bind(transaction.currency_id)
    .bind(transaction.description)
    .bind(transaction.amount_in.minor())
    .bind(transaction.fees.minor())
    .bind(transaction.amount_out.minor())
    .bind(transaction.gateway)
    .bind(transaction.transaction_id.as_str())
    .bind(transaction.invoice_id.get())
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn insert_gateway_log<'e, E: PgExecutor<'e>>(
    executor: E,
    gateway: &str,
    data: &str,
    result: &str,
) -> Result<(), GatewayError> {
    sqlx::query("INSERT INTO gateway_log (gateway, data, result) VALUES ($1, $2, $3)")
        .bind(gateway)
        .bind(data)
        .bind(result)
        .execute(executor)
        .await?;

    Ok(())
}
