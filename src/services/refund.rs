use {
    crate::{
        AppState,
        domain::{
            error::GatewayError,
            id::PaymentId,
            money::{Currency, Money},
            provider::Refund,
        },
    },
    serde::{Deserialize, Serialize},
    serde_json::{Value, json},
};

#[derive(Debug, Clone, Deserialize)]
pub struct RefundRequest {
    pub transaction_id: String,
    pub amount: String,
    pub currency: Currency,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RefundStatus {
    Success,
    Error,
}

/// Result handed back to the billing platform's refund screen.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RefundResult {
    pub status: RefundStatus,
    pub rawdata: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transid: Option<String>,
}

#[tracing::instrument(name = "refund", skip_all, fields(transaction_id = %req.transaction_id))]
pub async fn run(state: &AppState, req: &RefundRequest) -> RefundResult {
    if !state.config.is_active() {
        tracing::warn!("refund requested while gateway inactive");
        return RefundResult {
            status: RefundStatus::Error,
            rawdata: json!({
                "message": format!(
                    "Failed to create refund for transaction {} - API key is missing!",
                    req.transaction_id
                ),
            }),
            transid: None,
        };
    }

    match create(state, req).await {
        Ok((refund, amount)) => {
            tracing::info!(refund_id = %refund.id, amount = %amount, "refund created");
            RefundResult {
                status: RefundStatus::Success,
                rawdata: json!({
                    "message": format!(
                        "Successfully refunded {} {} of {}",
                        amount.currency(),
                        req.amount,
                        req.transaction_id
                    ),
                    "refund_id": refund.id.as_str(),
                }),
                transid: Some(refund.id.into_inner()),
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "refund failed");
            RefundResult {
                status: RefundStatus::Error,
                rawdata: json!({
                    "message": format!(
                        "Failed to create refund for transaction {}.",
                        req.transaction_id
                    ),
                    "exception": e.to_string(),
                }),
                transid: None,
            }
        }
    }
}

async fn create(state: &AppState, req: &RefundRequest) -> Result<(Refund, Money), GatewayError> {
    let payment_id = PaymentId::new(req.transaction_id.as_str())?;
    let amount = Money::parse(&req.amount, req.currency)?;
    let refund = state.provider.create_refund(&payment_id, &amount).await?;
    Ok((refund, amount))
}
