//! At-rest encryption for stored Mollie customer ids.
//!
//! Stored form: base64(`[12 bytes nonce][ciphertext + 16 bytes tag]`),
//! AES-256-GCM with a random nonce per value.

use {
    crate::domain::error::GatewayError,
    aes_gcm::{
        Aes256Gcm, Key, Nonce,
        aead::{Aead, KeyInit},
    },
    base64::{Engine, engine::general_purpose::STANDARD},
};

const NONCE_SIZE: usize = 12;
const TAG_SIZE: usize = 16;

pub struct CustomerIdCipher {
    cipher: Aes256Gcm,
}

impl CustomerIdCipher {
    pub fn new(key: &[u8; 32]) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        }
    }

    /// Build from a base64-encoded 32-byte key.
    pub fn from_base64(encoded: &str) -> Result<Self, GatewayError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| GatewayError::Config(format!("customer id key is not base64: {e}")))?;
        let key: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            GatewayError::Config(format!("customer id key must be 32 bytes, got {}", b.len()))
        })?;
        Ok(Self::new(&key))
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, GatewayError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|e| GatewayError::Crypto(format!("encryption failed: {e}")))?;

        let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(out))
    }

    pub fn decrypt(&self, stored: &str) -> Result<String, GatewayError> {
        let bytes = STANDARD
            .decode(stored.trim())
            .map_err(|e| GatewayError::Crypto(format!("stored value is not base64: {e}")))?;

        if bytes.len() < NONCE_SIZE + TAG_SIZE {
            return Err(GatewayError::Crypto("stored value too short".into()));
        }

        let (nonce, ciphertext) = bytes.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| GatewayError::Crypto("authentication failed".into()))?;

        String::from_utf8(plaintext).map_err(|e| GatewayError::Crypto(e.to_string()))
    }
}
