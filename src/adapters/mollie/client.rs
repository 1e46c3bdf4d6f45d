use {
    crate::domain::{
        error::GatewayError,
        id::{CustomerId, PaymentId, RefundId},
        money::{Currency, Money},
        payment::{
            CLIENT_METADATA_KEY, FetchedPayment, INVOICE_METADATA_KEY, PaymentMode, PaymentStatus,
        },
        provider::{Customer, NewCustomer, NewPayment, PaymentProvider, ProviderFuture, Refund},
    },
    secrecy::{ExposeSecret, SecretString},
    serde::{Deserialize, Serialize, de::DeserializeOwned},
    std::time::Duration,
};

/// Mollie v2 REST client.
pub struct MollieClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl MollieClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("mollie_gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: SecretString::new(api_key.into().into()),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await?;

        decode(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(body)
            .send()
            .await?;

        decode(response).await
    }

    async fn create_customer_inner(&self, customer: &NewCustomer) -> Result<Customer, GatewayError> {
        let body = CreateCustomerBody {
            name: &customer.name,
            email: &customer.email,
            metadata: serde_json::json!({ CLIENT_METADATA_KEY: customer.client_id.get() }),
        };
        let created: CustomerResponse = self.post("/customers", &body).await?;
        tracing::info!(customer_id = %created.id, client_id = %customer.client_id, "mollie customer created");
        created.try_into()
    }

    async fn get_customer_inner(&self, id: &CustomerId) -> Result<Customer, GatewayError> {
        let customer: CustomerResponse = self.get(&format!("/customers/{id}")).await?;
        customer.try_into()
    }

    async fn create_payment_inner(&self, payment: &NewPayment) -> Result<FetchedPayment, GatewayError> {
        let body = CreatePaymentBody {
            amount: MollieAmount::from(&payment.amount),
            description: &payment.description,
            redirect_url: &payment.redirect_url,
            webhook_url: payment.webhook_url.as_deref(),
            metadata: serde_json::json!({ INVOICE_METADATA_KEY: payment.invoice_id.get() }),
        };
        let created: PaymentResponse = self
            .post(&format!("/customers/{}/payments", payment.customer_id), &body)
            .await?;
        tracing::info!(payment_id = %created.id, invoice_id = %payment.invoice_id, "mollie payment created");
        created.try_into()
    }

    async fn get_payment_inner(&self, id: &PaymentId) -> Result<FetchedPayment, GatewayError> {
        let payment: PaymentResponse = self.get(&format!("/payments/{id}")).await?;
        payment.try_into()
    }

    async fn create_refund_inner(
        &self,
        payment_id: &PaymentId,
        amount: &Money,
    ) -> Result<Refund, GatewayError> {
        let body = CreateRefundBody {
            amount: MollieAmount::from(amount),
        };
        let refund: RefundResponse = self
            .post(&format!("/payments/{payment_id}/refunds"), &body)
            .await?;
        tracing::info!(refund_id = %refund.id, payment_id = %payment_id, "mollie refund created");

        Ok(Refund {
            id: RefundId::new(refund.id)?,
            amount: refund.amount.try_into()?,
        })
    }
}

impl PaymentProvider for MollieClient {
    fn create_customer<'a>(&'a self, customer: &'a NewCustomer) -> ProviderFuture<'a, Customer> {
        Box::pin(self.create_customer_inner(customer))
    }

    fn get_customer<'a>(&'a self, id: &'a CustomerId) -> ProviderFuture<'a, Customer> {
        Box::pin(self.get_customer_inner(id))
    }

    fn create_payment<'a>(&'a self, payment: &'a NewPayment) -> ProviderFuture<'a, FetchedPayment> {
        Box::pin(self.create_payment_inner(payment))
    }

    fn get_payment<'a>(&'a self, id: &'a PaymentId) -> ProviderFuture<'a, FetchedPayment> {
        Box::pin(self.get_payment_inner(id))
    }

    fn create_refund<'a>(
        &'a self,
        payment_id: &'a PaymentId,
        amount: &'a Money,
    ) -> ProviderFuture<'a, Refund> {
        Box::pin(self.create_refund_inner(payment_id, amount))
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.detail)
        .unwrap_or(body);

    Err(GatewayError::Provider {
        status: status.as_u16(),
        message,
    })
}

// ── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct MollieAmount {
    currency: String,
    value: String,
}

impl From<&Money> for MollieAmount {
    fn from(money: &Money) -> Self {
        Self {
            currency: money.currency().as_str().to_string(),
            value: money.value_string(),
        }
    }
}

impl TryFrom<MollieAmount> for Money {
    type Error = GatewayError;

    fn try_from(amount: MollieAmount) -> Result<Self, Self::Error> {
        let currency = Currency::try_from(amount.currency.as_str())?;
        Money::parse(&amount.value, currency)
    }
}

#[derive(Serialize)]
struct CreateCustomerBody<'a> {
    name: &'a str,
    email: &'a str,
    metadata: serde_json::Value,
}

#[derive(Deserialize)]
struct CustomerResponse {
    id: String,
}

impl TryFrom<CustomerResponse> for Customer {
    type Error = GatewayError;

    fn try_from(c: CustomerResponse) -> Result<Self, Self::Error> {
        Ok(Customer {
            id: CustomerId::new(c.id)?,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePaymentBody<'a> {
    amount: MollieAmount,
    description: &'a str,
    redirect_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    webhook_url: Option<&'a str>,
    metadata: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentResponse {
    id: String,
    mode: String,
    status: String,
    amount: MollieAmount,
    #[serde(default)]
    amount_charged_back: Option<MollieAmount>,
    #[serde(default)]
    metadata: serde_json::Value,
    #[serde(rename = "_links", default)]
    links: Option<PaymentLinks>,
}

#[derive(Deserialize)]
struct PaymentLinks {
    checkout: Option<Link>,
}

#[derive(Deserialize)]
struct Link {
    href: String,
}

impl TryFrom<PaymentResponse> for FetchedPayment {
    type Error = GatewayError;

    fn try_from(p: PaymentResponse) -> Result<Self, Self::Error> {
        let mut status = PaymentStatus::try_from(p.status.as_str())?;

        // v2 reports chargebacks on a paid payment through amountChargedBack.
        let charged_back = match p.amount_charged_back {
            Some(amount) => !Money::try_from(amount)?.amount().is_zero(),
            None => false,
        };
        if status == PaymentStatus::Paid && charged_back {
            status = PaymentStatus::ChargedBack;
        }

        Ok(FetchedPayment {
            id: PaymentId::new(p.id)?,
            mode: PaymentMode::try_from(p.mode.as_str())?,
            status,
            amount: p.amount.try_into()?,
            metadata: p.metadata,
            checkout_url: p.links.and_then(|l| l.checkout).map(|l| l.href),
        })
    }
}

#[derive(Serialize)]
struct CreateRefundBody {
    amount: MollieAmount,
}

#[derive(Deserialize)]
struct RefundResponse {
    id: String,
    amount: MollieAmount,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}
