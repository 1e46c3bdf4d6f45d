pub mod crypto;
pub mod nonce;
pub mod postgres;
pub mod session;
