pub mod admin_status;
pub mod callback;
pub mod customers;
pub mod gateway_log;
pub mod link;
pub mod refund;
