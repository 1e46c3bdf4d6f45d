//! JSON endpoints the billing platform calls into.

use {
    crate::{
        AppState,
        adapters::api_errors::ApiError,
        config::{self, ConfigField, GatewayMetadata},
        i18n::Translator,
        services::{
            admin_status::{self, AdminStatusMessage, AdminStatusRequest},
            link::{self, LinkRequest, LinkResponse},
            refund::{self, RefundRequest, RefundResult},
        },
    },
    axum::{
        Json,
        extract::{Query, State},
    },
    serde::Deserialize,
};

#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

pub async fn metadata_handler() -> Json<GatewayMetadata> {
    Json(config::metadata())
}

pub async fn config_handler(Query(query): Query<LocaleQuery>) -> Json<Vec<ConfigField>> {
    let t = Translator::for_locale(query.locale.as_deref());
    Json(config::config_fields(&t))
}

pub async fn link_handler(
    State(state): State<AppState>,
    Json(req): Json<LinkRequest>,
) -> Json<LinkResponse> {
    Json(link::run(&state, &req).await)
}

pub async fn refund_handler(
    State(state): State<AppState>,
    Json(req): Json<RefundRequest>,
) -> Json<RefundResult> {
    Json(refund::run(&state, &req).await)
}

pub async fn admin_status_handler(
    State(state): State<AppState>,
    Json(req): Json<AdminStatusRequest>,
) -> Result<Json<Option<AdminStatusMessage>>, ApiError> {
    let message = admin_status::run(&state, &req).await?;
    Ok(Json(message))
}
