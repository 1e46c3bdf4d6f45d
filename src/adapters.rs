pub mod api_errors;
pub mod gateway;
pub mod mollie;
