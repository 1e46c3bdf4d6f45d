//! Invoice page "pay now" link.
//!
//! Renders the pay-now form for an unpaid invoice and, when the form comes
//! back with a valid nonce, starts a Mollie payment and sends the client to
//! the checkout page.

use {
    crate::{
        AppState,
        domain::{
            error::GatewayError,
            id::{ClientId, InvoiceId},
            money::{Currency, Money},
            payment::TransactionStatus,
            provider::{Customer, NewCustomer, NewPayment},
        },
        i18n::Translator,
        infra::{nonce::tokens_match, postgres::transaction_repo},
        services::{customers, gateway_log},
    },
    serde::{Deserialize, Serialize},
};

pub const PAY_NOW_ACTION: &str = "paynow";

const SANDBOX_BANNER: &str = r#"<strong style="color: red;">SANDBOX MODE</strong><br />"#;

#[derive(Debug, Clone, Deserialize)]
pub struct ClientDetails {
    pub user_id: ClientId,
    pub full_name: String,
    pub email: String,
}

/// Pay-now form as posted back by the client's browser.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkForm {
    pub action: String,
    #[serde(default)]
    pub nonce: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkRequest {
    pub invoice_id: InvoiceId,
    pub amount: String,
    pub currency: Currency,
    pub description: String,
    pub return_url: String,
    pub lang_pay_now: String,
    pub client: ClientDetails,
    pub session_id: String,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub form: Option<LinkForm>,
}

impl LinkRequest {
    /// Nonces are bound to the client and the browser session.
    fn nonce_token(&self) -> String {
        format!("{}{}", self.client.user_id, self.session_id)
    }

    fn is_pay_now_submission(&self) -> bool {
        self.form
            .as_ref()
            .is_some_and(|f| f.action == PAY_NOW_ACTION)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkResponse {
    /// Markup for the invoice page. `refresh` asks the page to reload itself.
    Html { html: String, refresh: bool },
    /// Send the browser to the Mollie checkout.
    Redirect { url: String },
}

#[tracing::instrument(
    name = "link",
    skip_all,
    fields(invoice_id = %req.invoice_id, client_id = %req.client.user_id)
)]
pub async fn run(state: &AppState, req: &LinkRequest) -> LinkResponse {
    let t = Translator::for_locale(req.locale.as_deref());
    let sandbox = state.config.sandbox;

    if !state.config.is_active() {
        return LinkResponse::Html {
            html: status_message(
                sandbox,
                &t.dgettext(
                    "This payment gateway is currently disabled. Please contact the administrator.",
                ),
            ),
            refresh: false,
        };
    }

    let error_message = || {
        status_message(
            sandbox,
            &t.dgettext(
                "Error occurred, please select a different payment method or try again later.",
            ),
        )
    };

    match pay_now(state, req, &t).await {
        Ok(response) => response,
        Err(e) if e.is_not_found() => {
            tracing::warn!(error = %e, "mollie resource not found, forgetting stored customer");
            if let Err(e) = customers::clear_customer_id(state, req.client.user_id).await {
                tracing::error!(error = %e, "failed to clear stored customer id");
            }
            LinkResponse::Html {
                html: error_message(),
                refresh: true,
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "pay-now link failed");
            LinkResponse::Html {
                html: error_message(),
                refresh: false,
            }
        }
    }
}

async fn pay_now(
    state: &AppState,
    req: &LinkRequest,
    t: &Translator,
) -> Result<LinkResponse, GatewayError> {
    let customer = get_or_create_customer(state, &req.client).await?;

    if req.is_pay_now_submission() {
        // The parked nonce is consumed whether or not it validates.
        let parked = state.sessions.take(&req.session_id);
        let submitted = req.form.as_ref().and_then(|f| f.nonce.as_deref());

        let valid = match (parked.as_deref(), submitted) {
            (Some(parked), Some(submitted)) => {
                tokens_match(parked, submitted) && state.nonces.check(parked, &req.nonce_token())
            }
            _ => false,
        };

        if valid {
            let url = start_payment(state, req, &customer).await?;
            return Ok(LinkResponse::Redirect { url });
        }

        tracing::warn!("pay-now submission without a valid nonce, showing form again");
    }

    let pending = transaction_repo::has_pending(&state.pool, req.invoice_id).await?;
    let nonce = state.nonces.create(&req.nonce_token());
    state.sessions.put(&req.session_id, nonce.clone());

    Ok(LinkResponse::Html {
        html: pay_now_form(state.config.sandbox, pending, &nonce, &req.lang_pay_now, t),
        refresh: false,
    })
}

async fn get_or_create_customer(
    state: &AppState,
    client: &ClientDetails,
) -> Result<Customer, GatewayError> {
    if let Some(id) = customers::customer_id(state, client.user_id).await? {
        return state.provider.get_customer(&id).await;
    }

    let new_customer = NewCustomer {
        name: client.full_name.clone(),
        email: client.email.clone(),
        client_id: client.user_id,
    };
    let customer = state.provider.create_customer(&new_customer).await?;
    customers::set_customer_id(state, client.user_id, &customer.id).await?;

    Ok(customer)
}

/// Create the payment, remember it as pending and return the checkout URL.
async fn start_payment(
    state: &AppState,
    req: &LinkRequest,
    customer: &Customer,
) -> Result<String, GatewayError> {
    let new_payment = NewPayment {
        customer_id: customer.id.clone(),
        amount: Money::parse(&req.amount, req.currency)?,
        description: req.description.clone(),
        redirect_url: req.return_url.clone(),
        invoice_id: req.invoice_id,
        webhook_url: state.config.webhook_url(),
    };

    let payment = state.provider.create_payment(&new_payment).await?;
    let checkout_url = payment.checkout_url.clone().ok_or_else(|| {
        GatewayError::Validation(format!("payment {} has no checkout URL", payment.id))
    })?;

    transaction_repo::update_status(
        &state.pool,
        req.invoice_id,
        TransactionStatus::Pending,
        Some(&payment.id),
    )
    .await?;

    gateway_log::log_transaction(
        state,
        &format!(
            "Payment attempted for invoice {}. Awaiting payment confirmation from callback for transaction {}.",
            req.invoice_id, payment.id
        ),
        gateway_log::SUCCESS,
    )
    .await;

    Ok(checkout_url)
}

pub fn status_message(sandbox: bool, message: &str) -> String {
    let banner = if sandbox { SANDBOX_BANNER } else { "" };
    format!("{banner}<p>{}</p>", escape_html(message))
}

pub fn pay_now_form(
    sandbox: bool,
    pending: bool,
    nonce: &str,
    label: &str,
    t: &Translator,
) -> String {
    let mut html = String::new();

    if sandbox {
        html.push_str(SANDBOX_BANNER);
    }

    if pending {
        html.push_str("<p>");
        html.push_str(&escape_html(&t.dgettext(
            "Your payment is currently pending and will be processed automatically.",
        )));
        html.push_str("</p>");
    }

    html.push_str(&format!(
        r#"<form action="" method="POST">
    <input type="hidden" name="action" value="{PAY_NOW_ACTION}" />
    <input type="hidden" name="nonce" value="{}" />
    <input type="submit" value="{}" />
</form>"#,
        escape_html(nonce),
        escape_html(label)
    ));

    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
