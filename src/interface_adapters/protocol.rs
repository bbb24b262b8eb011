use serde::{Deserialize, Serialize};

// Request payload for QR generation.
#[derive(Debug, Deserialize)]
pub struct GenerateQrRequest {
    pub guest_id: String,
    pub event_id: String,
}

// Response payload for QR generation.
#[derive(Debug, Serialize)]
pub struct GenerateQrResponse {
    pub qr_code_url: String,
    pub qr_code_data: String,
}

// Request payload for scan-time validation.
#[derive(Debug, Deserialize)]
pub struct ValidateQrRequest {
    pub qr_code_data: String,
}

// Response payload for validation. Identity is only present on success.
#[derive(Debug, Serialize)]
pub struct ValidateQrResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache_entries: u64,
}

// Simple error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
