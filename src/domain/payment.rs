use {
    super::error::GatewayError,
    super::id::{InvoiceId, PaymentId},
    super::money::Money,
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Metadata key carrying the billing invoice number on a Mollie payment.
pub const INVOICE_METADATA_KEY: &str = "billing_invoice";

/// Metadata key carrying the billing client number on a Mollie customer.
pub const CLIENT_METADATA_KEY: &str = "billing_client_id";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Open,
    Pending,
    Authorized,
    Paid,
    Canceled,
    Expired,
    Failed,
    ChargedBack,
}

/// What the webhook does locally for a given remote status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookAction {
    RecordPayment,
    ChargeBack,
    MarkFailed,
    Ignore,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Pending => "pending",
            Self::Authorized => "authorized",
            Self::Paid => "paid",
            Self::Canceled => "canceled",
            Self::Expired => "expired",
            Self::Failed => "failed",
            Self::ChargedBack => "charged_back",
        }
    }

    pub fn action(&self) -> WebhookAction {
        match self {
            Self::Paid => WebhookAction::RecordPayment,
            Self::ChargedBack => WebhookAction::ChargeBack,
            Self::Failed | Self::Canceled | Self::Expired => WebhookAction::MarkFailed,
            Self::Open | Self::Pending | Self::Authorized => WebhookAction::Ignore,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = GatewayError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "open" => Ok(Self::Open),
            "pending" => Ok(Self::Pending),
            "authorized" => Ok(Self::Authorized),
            "paid" => Ok(Self::Paid),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            "expired" => Ok(Self::Expired),
            "failed" => Ok(Self::Failed),
            "charged_back" => Ok(Self::ChargedBack),
            other => Err(GatewayError::Validation(format!(
                "unknown payment status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    Live,
    Test,
}

impl TryFrom<&str> for PaymentMode {
    type Error = GatewayError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "live" => Ok(Self::Live),
            "test" => Ok(Self::Test),
            other => Err(GatewayError::Validation(format!(
                "unknown payment mode: {other}"
            ))),
        }
    }
}

/// Payment as returned by the provider API.
#[derive(Debug, Clone)]
pub struct FetchedPayment {
    pub id: PaymentId,
    pub mode: PaymentMode,
    pub status: PaymentStatus,
    pub amount: Money,
    pub metadata: serde_json::Value,
    pub checkout_url: Option<String>,
}

impl FetchedPayment {
    /// Invoice number stored in the payment metadata, as a number or a
    /// numeric string.
    pub fn invoice_id(&self) -> Option<InvoiceId> {
        let raw = self.metadata.get(INVOICE_METADATA_KEY)?;
        let id = match raw {
            serde_json::Value::Number(n) => n.as_i64()?,
            serde_json::Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };
        InvoiceId::new(i32::try_from(id).ok()?).ok()
    }
}

/// Gateway-side state of the latest payment attempt for an invoice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = GatewayError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "pending" => Ok(Self::Pending),
            "failed" => Ok(Self::Failed),
            other => Err(GatewayError::Validation(format!(
                "unknown transaction status: {other}"
            ))),
        }
    }
}
