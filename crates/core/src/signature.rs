//! Request signing
//!
//! The signature is HMAC-SHA256 keyed with the API secret over the bytes of
//! `timestamp || content`, rendered as lowercase hex. Any change to the
//! content, whitespace included, changes the signature, which is why the
//! request envelope is serialized canonically before signing.

use std::fmt;

use corezoid_domain::{CorezoidError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::ports::Clock;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 signer keyed once with the API secret.
#[derive(Clone)]
pub struct Signer {
    mac: HmacSha256,
}

impl Signer {
    /// Key a signer with `secret`.
    ///
    /// # Errors
    /// Returns `CorezoidError::Config` if the key is rejected by the MAC.
    pub fn new(secret: &str) -> Result<Self> {
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|err| CorezoidError::Config(format!("invalid API secret: {err}")))?;
        Ok(Self { mac })
    }

    /// Signature over `timestamp || content`, 64 lowercase hex characters.
    pub fn sign(&self, timestamp: &str, content: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(timestamp.as_bytes());
        mac.update(content.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Recompute and compare in constant time.
    ///
    /// Only the exact lowercase hex string produced by [`Signer::sign`] is
    /// accepted.
    pub fn verify(&self, signature: &str, timestamp: &str, content: &str) -> bool {
        let expected = self.sign(timestamp, content);
        expected.as_bytes().ct_eq(signature.as_bytes()).into()
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer").field("algorithm", &"HMAC-SHA256").finish_non_exhaustive()
    }
}

/// Sign `timestamp || content` with `secret`.
///
/// # Errors
/// Returns `CorezoidError::Config` if the secret cannot key the MAC.
pub fn sign(secret: &str, timestamp: &str, content: &str) -> Result<String> {
    Ok(Signer::new(secret)?.sign(timestamp, content))
}

/// Check a signature, e.g. on an inbound callback from the engine.
pub fn verify(signature: &str, secret: &str, timestamp: &str, content: &str) -> bool {
    Signer::new(secret).is_ok_and(|signer| signer.verify(signature, timestamp, content))
}

/// Current time as the `X-API-Timestamp` header value.
pub fn timestamp(clock: &dyn Clock) -> String {
    clock.unix_seconds().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOX: &str = "The quick brown fox jumps over the lazy dog";
    const FOX_MAC: &str = "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8";

    #[test]
    fn matches_known_hmac_sha256_vector() {
        assert_eq!(sign("key", "", FOX).unwrap(), FOX_MAC);
    }

    #[test]
    fn signs_the_concatenation_of_timestamp_and_content() {
        assert_eq!(sign("key", "The quick ", "brown fox jumps over the lazy dog").unwrap(), FOX_MAC);
        assert_eq!(
            sign("test-secret", "1234567890", r#"{"ops":[]}"#).unwrap(),
            "d75bf4df74fae7d034438a926538fb7d0983bb67ff2ea1cea9c8a6b381340b32"
        );
    }

    #[test]
    fn output_is_deterministic_lowercase_hex() {
        let signer = Signer::new("S").unwrap();
        let first = signer.sign("1700000000", r#"{"ops":[{"type":"get"}]}"#);
        let second = signer.sign("1700000000", r#"{"ops":[{"type":"get"}]}"#);
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn whitespace_changes_the_signature() {
        let signer = Signer::new("S").unwrap();
        let compact = signer.sign("1", r#"{"ops":[]}"#);
        let spaced = signer.sign("1", r#"{"ops": []}"#);
        assert_ne!(compact, spaced);
    }

    #[test]
    fn verify_accepts_only_the_produced_signature() {
        let signature = sign("S", "42", "body").unwrap();
        assert!(verify(&signature, "S", "42", "body"));
        assert!(!verify(&signature.to_uppercase(), "S", "42", "body"));
        assert!(!verify(&signature, "S", "43", "body"));
        assert!(!verify(&signature, "T", "42", "body"));
        assert!(!verify(&signature, "S", "42", "body "));
        assert!(!verify(&signature[..63], "S", "42", "body"));
        assert!(!verify("", "S", "42", "body"));
    }

    #[test]
    fn empty_secret_is_still_a_valid_hmac_key() {
        assert_eq!(sign("", "", "").unwrap().len(), 64);
    }

    #[test]
    fn debug_does_not_expose_key_material() {
        let signer = Signer::new("very-secret").unwrap();
        assert!(!format!("{signer:?}").contains("very-secret"));
    }
}
