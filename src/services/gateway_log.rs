use {crate::AppState, crate::infra::postgres::billing_repo};

pub const SUCCESS: &str = "success";
pub const ERROR: &str = "error";
pub const FAILED: &str = "failed";
pub const CHARGED_BACK: &str = "charged Back";

/// Write an entry to the billing platform's gateway log.
///
/// Sandbox entries are prefixed so they stand out when debugging. A failure to
/// persist the entry is reported through tracing and otherwise ignored.
pub async fn log_transaction(state: &AppState, description: &str, status: &str) {
    let description = entry_description(state.config.sandbox, description);
    let status = ucfirst(status);

    tracing::info!(gateway = %state.config.gateway_name, status = %status, "{description}");

    if let Err(e) = billing_repo::insert_gateway_log(
        &state.pool,
        &state.config.gateway_name,
        &description,
        &status,
    )
    .await
    {
        tracing::error!(error = %e, "failed to write gateway log");
    }
}

fn entry_description(sandbox: bool, description: &str) -> String {
    if sandbox {
        format!("[SANDBOX] {description}")
    } else {
        description.to_string()
    }
}

fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
