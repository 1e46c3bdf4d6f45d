//! Status banner on the admin invoice page.

use {
    crate::{
        AppState,
        domain::{
            error::GatewayError,
            id::{ClientId, InvoiceId},
        },
        i18n::Translator,
        infra::postgres::{billing_repo::INVOICE_UNPAID, transaction_repo},
        services::customers,
    },
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Clone, Deserialize)]
pub struct AdminStatusRequest {
    pub invoice_id: InvoiceId,
    pub status: String,
    pub user_id: ClientId,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Info,
    Error,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AdminStatusMessage {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub msg: String,
    pub title: String,
}

#[tracing::instrument(name = "admin_status", skip_all, fields(invoice_id = %req.invoice_id))]
pub async fn run(
    state: &AppState,
    req: &AdminStatusRequest,
) -> Result<Option<AdminStatusMessage>, GatewayError> {
    let t = Translator::for_locale(req.locale.as_deref());
    let message = |kind, msg: &str| AdminStatusMessage {
        kind,
        msg: msg.to_string(),
        title: state.config.gateway_name.clone(),
    };

    if !state.config.is_active() {
        return Ok(Some(message(
            MessageType::Error,
            &t.dgettext("Please enter your API key(s) to use this payment gateway."),
        )));
    }

    if req.status != INVOICE_UNPAID
        || customers::customer_id(state, req.user_id).await?.is_none()
    {
        return Ok(None);
    }

    if transaction_repo::has_pending(&state.pool, req.invoice_id).await? {
        return Ok(Some(message(
            MessageType::Info,
            &t.dgettext(
                "There is a payment pending for this invoice. Status will be automatically updated once a confirmation is received from Mollie.",
            ),
        )));
    }

    if transaction_repo::has_failed(&state.pool, req.invoice_id).await? {
        return Ok(Some(message(
            MessageType::Error,
            &t.dgettext(
                "Automatic payment for this invoice has failed. Please check the gateway logs for details.",
            ),
        )));
    }

    Ok(None)
}
