use {
    super::error::GatewayError,
    super::id::{ClientId, CustomerId, InvoiceId, PaymentId, RefundId},
    super::money::Money,
    super::payment::FetchedPayment,
    std::{future::Future, pin::Pin},
};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, GatewayError>> + Send + 'a>>;

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub client_id: ClientId,
}

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: CustomerId,
}

/// A payment on behalf of a stored customer.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub customer_id: CustomerId,
    pub amount: Money,
    pub description: String,
    pub redirect_url: String,
    pub invoice_id: InvoiceId,
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Refund {
    pub id: RefundId,
    pub amount: Money,
}

pub trait PaymentProvider: Send + Sync {
    fn create_customer<'a>(&'a self, customer: &'a NewCustomer) -> ProviderFuture<'a, Customer>;

    fn get_customer<'a>(&'a self, id: &'a CustomerId) -> ProviderFuture<'a, Customer>;

    fn create_payment<'a>(&'a self, payment: &'a NewPayment) -> ProviderFuture<'a, FetchedPayment>;

    fn get_payment<'a>(&'a self, id: &'a PaymentId) -> ProviderFuture<'a, FetchedPayment>;

    fn create_refund<'a>(
        &'a self,
        payment_id: &'a PaymentId,
        amount: &'a Money,
    ) -> ProviderFuture<'a, Refund>;
}
