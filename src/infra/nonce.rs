//! Single-use tokens for the pay-now form.
//!
//! A nonce is `salt.expires.signature`, where the signature is an
//! HMAC-SHA256 over the salt, the expiry and the binding token (client id
//! followed by session id). Verification is stateless; single use comes from
//! the session slot the issued nonce is parked in.

use {
    base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD},
    chrono::{DateTime, Duration, Utc},
    hmac::{Hmac, Mac},
    rand::Rng,
    secrecy::{ExposeSecret, SecretString},
    sha2::Sha256,
    subtle::ConstantTimeEq,
};

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_TTL_SECONDS: i64 = 30 * 60;

pub struct NonceGenerator {
    secret: SecretString,
    ttl: Duration,
}

impl NonceGenerator {
    pub fn new(secret: SecretString, ttl_seconds: i64) -> Self {
        Self {
            secret,
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    pub fn create(&self, token: &str) -> String {
        self.create_at(token, Utc::now())
    }

    pub fn create_at(&self, token: &str, now: DateTime<Utc>) -> String {
        let salt_bytes: [u8; 16] = rand::thread_rng().r#gen();
        let salt = URL_SAFE_NO_PAD.encode(salt_bytes);
        let expires = (now + self.ttl).timestamp();
        let signature = self.sign(&salt, expires, token);
        format!("{salt}.{expires}.{signature}")
    }

    pub fn check(&self, nonce: &str, token: &str) -> bool {
        self.check_at(nonce, token, Utc::now())
    }

    pub fn check_at(&self, nonce: &str, token: &str, now: DateTime<Utc>) -> bool {
        let mut parts = nonce.splitn(3, '.');
        let (Some(salt), Some(expires), Some(signature)) = (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };

        let Ok(expires) = expires.parse::<i64>() else {
            return false;
        };

        if now.timestamp() > expires {
            return false;
        }

        let expected = self.sign(salt, expires, token);
        tokens_match(signature, &expected)
    }

    fn sign(&self, salt: &str, expires: i64, token: &str) -> String {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(salt.as_bytes());
        mac.update(b".");
        mac.update(expires.to_string().as_bytes());
        mac.update(b".");
        mac.update(token.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }
}

/// Constant-time string comparison.
pub fn tokens_match(a: &str, b: &str) -> bool {
    a.len() == b.len() && bool::from(a.as_bytes().ct_eq(b.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> NonceGenerator {
        NonceGenerator::new(
            SecretString::new("test_secret_key_32_bytes_long!!!".into()),
            DEFAULT_TTL_SECONDS,
        )
    }

    #[test]
    fn valid_nonce_checks() {
        let nonces = generator();
        let nonce = nonces.create("42session");
        assert!(nonces.check(&nonce, "42session"));
    }

    #[test]
    fn nonce_is_bound_to_token() {
        let nonces = generator();
        let nonce = nonces.create("42session");
        assert!(!nonces.check(&nonce, "43session"));
    }

    #[test]
    fn nonce_expires() {
        let nonces = generator();
        let issued = Utc::now() - Duration::seconds(DEFAULT_TTL_SECONDS + 1);
        let nonce = nonces.create_at("42session", issued);
        assert!(!nonces.check(&nonce, "42session"));
    }

    #[test]
    fn wrong_secret_rejected() {
        let nonce = generator().create("42session");
        let other = NonceGenerator::new(
            SecretString::new("wrong_secret_key_32_bytes_long!!".into()),
            DEFAULT_TTL_SECONDS,
        );
        assert!(!other.check(&nonce, "42session"));
    }

    #[test]
    fn malformed_nonces_rejected() {
        let nonces = generator();
        assert!(!nonces.check("", "42session"));
        assert!(!nonces.check("abc.def", "42session"));
        assert!(!nonces.check("abc.notanumber.sig", "42session"));
    }

    #[test]
    fn nonces_are_unique() {
        let nonces = generator();
        assert_ne!(nonces.create("42session"), nonces.create("42session"));
    }
}
