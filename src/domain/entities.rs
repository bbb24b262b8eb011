use serde::{Deserialize, Serialize};
use std::time::Duration;

// Format tag written into every newly issued code.
pub const CURRENT_VERSION: u32 = 1;

// Versions the validator knows how to interpret.
pub const SUPPORTED_VERSIONS: &[u32] = &[CURRENT_VERSION];

// How long an issued code stays scannable.
pub const VALIDITY_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

// Rendered edge length in pixels for local and remote renders.
pub const QR_IMAGE_SIZE: u32 = 250;

// Quiet zone around the symbol, in modules.
pub const QR_MARGIN_MODULES: u32 = 1;

// Unsigned fields covered by the HMAC, in signing order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub guest_id: String,
    pub event_id: String,
    pub timestamp: u64,
    pub nonce: String,
}

impl QrPayload {
    /// Attaches a signature and the current format version.
    pub fn into_signed(self, signature: String) -> SignedQrPayload {
        SignedQrPayload {
            guest_id: self.guest_id,
            event_id: self.event_id,
            timestamp: self.timestamp,
            nonce: self.nonce,
            signature,
            version: CURRENT_VERSION,
        }
    }
}

/// The record embedded in the QR image and later handed back by scanners.
///
/// Field order here is the wire order. Unknown fields are rejected so a
/// mangled key can never be skipped over during parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignedQrPayload {
    pub guest_id: String,
    pub event_id: String,
    pub timestamp: u64,
    pub nonce: String,
    pub signature: String,
    pub version: u32,
}

impl SignedQrPayload {
    /// Borrowed view of the fields the signature covers.
    pub fn unsigned(&self) -> UnsignedView<'_> {
        UnsignedView {
            guest_id: &self.guest_id,
            event_id: &self.event_id,
            timestamp: self.timestamp,
            nonce: &self.nonce,
        }
    }

    pub fn to_qr_data(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_qr_data(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

// Serializes identically to `QrPayload` without cloning the strings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedView<'a> {
    pub guest_id: &'a str,
    pub event_id: &'a str,
    pub timestamp: u64,
    pub nonce: &'a str,
}

impl<'a> From<&'a QrPayload> for UnsignedView<'a> {
    fn from(payload: &'a QrPayload) -> Self {
        Self {
            guest_id: &payload.guest_id,
            event_id: &payload.event_id,
            timestamp: payload.timestamp,
            nonce: &payload.nonce,
        }
    }
}

// Result of a successful generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedQrCode {
    pub qr_code_url: String,
    pub qr_code_data: String,
}

// Identity carried by a code that passed every check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedQrCode {
    pub guest_id: String,
    pub event_id: String,
    pub issued_at_ms: u64,
}
