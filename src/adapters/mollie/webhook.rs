use {
    crate::{AppState, services::callback},
    axum::{
        body::Bytes,
        extract::{Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    serde::Deserialize,
};

/// Mollie posts `id=tr_...` as a form body and nothing else.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackForm {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    /// Forced status for test payments in sandbox mode.
    #[serde(default)]
    pub status: Option<String>,
}

#[tracing::instrument(
    name = "webhook",
    skip_all,
    fields(payment_id = tracing::field::Empty)
)]
pub async fn callback_handler(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
    body: Bytes,
) -> Response {
    let form: CallbackForm = match serde_urlencoded::from_bytes(&body) {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable webhook body");
            CallbackForm::default()
        }
    };

    let Some(payment_id) = form.id.filter(|id| !id.is_empty()) else {
        tracing::debug!("webhook without payment id");
        return StatusCode::OK.into_response();
    };

    tracing::Span::current().record("payment_id", tracing::field::display(&payment_id));

    if !state.config.is_active() {
        tracing::warn!("webhook received while gateway inactive");
        return (StatusCode::NOT_IMPLEMENTED, "Gateway not activated.").into_response();
    }

    callback::process(&state, &payment_id, query.status.as_deref()).await;

    StatusCode::OK.into_response()
}
