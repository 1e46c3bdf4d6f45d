use {
    crate::{
        AppState,
        domain::{
            error::GatewayError,
            id::{ClientId, CustomerId},
        },
        infra::postgres::customer_repo,
    },
};

/// Mollie customer stored for the client.
///
/// A missing row, an empty value and a value that no longer decrypts (key
/// rotated, row tampered with) all read as "no customer".
pub async fn customer_id(
    state: &AppState,
    client_id: ClientId,
) -> Result<Option<CustomerId>, GatewayError> {
    let Some(stored) = customer_repo::find(&state.pool, client_id).await? else {
        return Ok(None);
    };

    let decrypted = match state.cipher.decrypt(&stored) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(client_id = %client_id, error = %e, "stored customer id unreadable");
            return Ok(None);
        }
    };

    if decrypted.is_empty() {
        return Ok(None);
    }

    match CustomerId::new(decrypted) {
        Ok(id) => Ok(Some(id)),
        Err(e) => {
            tracing::warn!(client_id = %client_id, error = %e, "stored customer id invalid");
            Ok(None)
        }
    }
}

pub async fn set_customer_id(
    state: &AppState,
    client_id: ClientId,
    customer_id: &CustomerId,
) -> Result<(), GatewayError> {
    let encrypted = state.cipher.encrypt(customer_id.as_str())?;
    customer_repo::upsert(&state.pool, client_id, &encrypted).await
}

pub async fn clear_customer_id(state: &AppState, client_id: ClientId) -> Result<(), GatewayError> {
    if customer_repo::delete(&state.pool, client_id).await? {
        tracing::info!(client_id = %client_id, "stored customer id cleared");
    }
    Ok(())
}
