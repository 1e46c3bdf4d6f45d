pub mod client;
pub mod webhook;
