// HMAC-SHA256 signing of QR payloads.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;

use crate::domain::entities::UnsignedView;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug)]
pub enum SigningKeyError {
    Empty,
}

impl fmt::Display for SigningKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningKeyError::Empty => write!(f, "signing key must not be empty"),
        }
    }
}

impl std::error::Error for SigningKeyError {}

/// Keyed signer shared by generation and validation.
///
/// The keyed MAC state is built once and cloned per signature, so signing
/// has no failure path after construction.
#[derive(Clone)]
pub struct PayloadSigner {
    mac: HmacSha256,
}

impl PayloadSigner {
    pub fn new(secret: &[u8]) -> Result<Self, SigningKeyError> {
        if secret.is_empty() {
            return Err(SigningKeyError::Empty);
        }
        let mac = HmacSha256::new_from_slice(secret).map_err(|_| SigningKeyError::Empty)?;
        Ok(Self { mac })
    }

    /// Lowercase hex HMAC over the compact JSON of the unsigned fields.
    pub fn sign(&self, payload: &UnsignedView<'_>) -> Result<String, serde_json::Error> {
        let message = serde_json::to_vec(payload)?;
        let mut mac = self.mac.clone();
        mac.update(&message);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Compares the carried signature text against a fresh one.
    ///
    /// Comparison is on the hex text, not decoded bytes, so a case flip in
    /// the carried signature is treated as tampering.
    pub fn verify(&self, payload: &UnsignedView<'_>, signature: &str) -> bool {
        let Ok(expected) = self.sign(payload) else {
            return false;
        };
        expected.as_bytes().ct_eq(signature.as_bytes()).into()
    }
}

impl fmt::Debug for PayloadSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadSigner").finish_non_exhaustive()
    }
}

/// SHA-256 hex digest used as the render cache key.
pub fn content_hash(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}
