//! Webhook reconciliation.
//!
//! Mollie only tells us *which* payment changed. The payment is fetched back
//! from the API and its current status decides what happens to the invoice.

use {
    crate::{
        AppState,
        domain::{
            error::GatewayError,
            id::{InvoiceId, PaymentId},
            money::MoneyAmount,
            payment::{FetchedPayment, PaymentMode, PaymentStatus, WebhookAction},
        },
        infra::postgres::{
            billing_repo::{self, ClientTransaction, InvoicePayment},
            transaction_repo,
        },
        services::gateway_log,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Payment recorded against the invoice.
    Paid { invoice_id: InvoiceId, settled: bool },
    /// Payment or charge-back was already booked earlier.
    Duplicate,
    /// Invoice reopened after a charge-back.
    ChargedBack { invoice_id: InvoiceId },
    /// Attempt marked failed for the admin status message.
    Failed { invoice_id: InvoiceId },
    /// Status needs no local action.
    Unhandled(PaymentStatus),
    /// Processing failed; details went to the gateway log.
    Errored,
}

/// Handle one webhook notification. Errors are written to the gateway log
/// rather than returned, so the caller can always answer Mollie with 200.
#[tracing::instrument(name = "callback", skip(state, status_override))]
pub async fn process(
    state: &AppState,
    payment_id: &str,
    status_override: Option<&str>,
) -> CallbackOutcome {
    let result = match PaymentId::new(payment_id) {
        Ok(id) => reconcile(state, &id, status_override).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(outcome) => {
            tracing::info!(?outcome, "webhook processed");
            outcome
        }
        Err(e) => {
            tracing::error!(error = %e, "webhook processing failed");
            gateway_log::log_transaction(
                state,
                &format!("Payment {payment_id} failed with an error - {e}."),
                gateway_log::ERROR,
            )
            .await;
            CallbackOutcome::Errored
        }
    }
}

async fn reconcile(
    state: &AppState,
    payment_id: &PaymentId,
    status_override: Option<&str>,
) -> Result<CallbackOutcome, GatewayError> {
    let mut payment = state.provider.get_payment(payment_id).await?;

    let invoice_id = payment.invoice_id().ok_or_else(|| {
        GatewayError::Validation("Invoice ID is missing from transaction metadata".into())
    })?;

    if !billing_repo::invoice_exists(&state.pool, invoice_id).await? {
        return Err(GatewayError::Validation(format!(
            "Invoice ID {invoice_id} not found"
        )));
    }

    // Test payments can be pushed to any status by hand in sandbox mode.
    if state.config.sandbox && payment.mode == PaymentMode::Test {
        if let Some(status) = status_override.filter(|s| !s.is_empty()) {
            payment.status = PaymentStatus::try_from(status)?;
            tracing::info!(status = %payment.status, "status overridden for test payment");
        }
    }

    match payment.status.action() {
        WebhookAction::RecordPayment => handle_paid(state, invoice_id, &payment).await,
        WebhookAction::ChargeBack => handle_charged_back(state, invoice_id, &payment).await,
        WebhookAction::MarkFailed => handle_failed(state, invoice_id, &payment).await,
        WebhookAction::Ignore => Ok(CallbackOutcome::Unhandled(payment.status)),
    }
}

async fn handle_paid(
    state: &AppState,
    invoice_id: InvoiceId,
    payment: &FetchedPayment,
) -> Result<CallbackOutcome, GatewayError> {
    if billing_repo::payment_recorded(&state.pool, &payment.id).await? {
        tracing::info!(payment_id = %payment.id, "payment already recorded");
        return Ok(CallbackOutcome::Duplicate);
    }

    let mut tx = state.pool.begin().await?;
    let settled = billing_repo::add_invoice_payment(
        &mut tx,
        &InvoicePayment {
            invoice_id,
            transaction_id: &payment.id,
            amount: &payment.amount,
            fees: MoneyAmount::zero(),
            gateway: &state.config.payment_method,
            no_email: false,
        },
    )
    .await?;
    transaction_repo::remove(&mut *tx, invoice_id).await?;
    tx.commit().await?;

    gateway_log::log_transaction(
        state,
        &format!(
            "Payment {} completed successfully - invoice {invoice_id}.",
            payment.id
        ),
        gateway_log::SUCCESS,
    )
    .await;

    Ok(CallbackOutcome::Paid {
        invoice_id,
        settled,
    })
}

/// The payer's bank reversed a completed payment: reopen the invoice and book
/// the outgoing amount against the client.
async fn handle_charged_back(
    state: &AppState,
    invoice_id: InvoiceId,
    payment: &FetchedPayment,
) -> Result<CallbackOutcome, GatewayError> {
    let description = format!(
        "Payment {} charged back by customer - invoice {invoice_id}.",
        payment.id
    );

    let mut tx = state.pool.begin().await?;
    if billing_repo::transaction_booked(&mut *tx, &payment.id).await? {
        tracing::info!(payment_id = %payment.id, "charge-back already booked");
        return Ok(CallbackOutcome::Duplicate);
    }

    let client_id = billing_repo::invoice_client(&mut *tx, invoice_id)
        .await?
        .ok_or_else(|| GatewayError::Validation(format!("Invoice ID {invoice_id} not found")))?;

    billing_repo::mark_invoice_unpaid(&mut *tx, invoice_id).await?;
    billing_repo::add_transaction(
        &mut *tx,
        &ClientTransaction {
            client_id,
            currency_id: 0,
            description: &description,
            amount_in: MoneyAmount::zero(),
            fees: MoneyAmount::zero(),
            amount_out: payment.amount.amount(),
            gateway: &state.config.payment_method,
            transaction_id: &payment.id,
            invoice_id,
        },
    )
    .await?;
    transaction_repo::remove(&mut *tx, invoice_id).await?;
    tx.commit().await?;

    gateway_log::log_transaction(state, &description, gateway_log::CHARGED_BACK).await;

    Ok(CallbackOutcome::ChargedBack { invoice_id })
}

async fn handle_failed(
    state: &AppState,
    invoice_id: InvoiceId,
    payment: &FetchedPayment,
) -> Result<CallbackOutcome, GatewayError> {
    if !transaction_repo::mark_failed(&state.pool, invoice_id, &payment.id).await? {
        tracing::info!(
            payment_id = %payment.id,
            "invoice tracks a newer attempt, keeping its status"
        );
    }

    gateway_log::log_transaction(
        state,
        &format!(
            "Payment {} {} - invoice {invoice_id}.",
            payment.id, payment.status
        ),
        gateway_log::FAILED,
    )
    .await;

    Ok(CallbackOutcome::Failed { invoice_id })
}
