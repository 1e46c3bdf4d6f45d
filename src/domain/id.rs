use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::error::GatewayError;

/// Mollie payment identifier (`tr_xxx`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(String);

impl PaymentId {
    pub fn new(id: impl Into<String>) -> Result<Self, GatewayError> {
        let id = id.into();
        if !id.starts_with("tr_") || id.len() <= 3 {
            return Err(GatewayError::Validation(format!(
                "PaymentId must start with tr_, got: {id}"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Mollie customer identifier (`cst_xxx`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Result<Self, GatewayError> {
        let id = id.into();
        if !id.starts_with("cst_") || id.len() <= 4 {
            return Err(GatewayError::Validation(format!(
                "CustomerId must start with cst_, got: {id}"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Mollie refund identifier (`re_xxx`).
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefundId(String);

impl RefundId {
    pub fn new(id: impl Into<String>) -> Result<Self, GatewayError> {
        let id = id.into();
        if !id.starts_with("re_") {
            return Err(GatewayError::Validation(format!(
                "RefundId must start with re_, got: {id}"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Billing platform invoice number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct InvoiceId(i32);

impl InvoiceId {
    pub fn new(id: i32) -> Result<Self, GatewayError> {
        if id <= 0 {
            return Err(GatewayError::Validation(format!(
                "InvoiceId must be positive, got: {id}"
            )));
        }
        Ok(Self(id))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for InvoiceId {
    type Error = GatewayError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<InvoiceId> for i32 {
    fn from(id: InvoiceId) -> Self {
        id.0
    }
}

/// Billing platform client (user) number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct ClientId(i32);

impl ClientId {
    pub fn new(id: i32) -> Result<Self, GatewayError> {
        if id <= 0 {
            return Err(GatewayError::Validation(format!(
                "ClientId must be positive, got: {id}"
            )));
        }
        Ok(Self(id))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for ClientId {
    type Error = GatewayError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<ClientId> for i32 {
    fn from(id: ClientId) -> Self {
        id.0
    }
}
