use crate::domain::errors::QrError;
use crate::interface_adapters::protocol::{
    ErrorResponse, GenerateQrRequest, GenerateQrResponse, HealthResponse, ValidateQrRequest,
    ValidateQrResponse,
};
use crate::interface_adapters::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use tracing::{error, info};

// Handler for issuing a signed QR code for a guest registration.
#[tracing::instrument(
    name = "generate_qr",
    skip_all,
    fields(guest_id = %payload.guest_id, event_id = %payload.event_id)
)]
pub async fn generate_qr(
    State(state): State<AppState>,
    Json(payload): Json<GenerateQrRequest>,
) -> Result<Json<GenerateQrResponse>, (StatusCode, Json<ErrorResponse>)> {
    let generated = state
        .qr
        .generate(&payload.guest_id, &payload.event_id)
        .await
        .map_err(map_qr_error)?;

    info!("qr code issued");

    Ok(Json(GenerateQrResponse {
        qr_code_url: generated.qr_code_url,
        qr_code_data: generated.qr_code_data,
    }))
}

// Handler for scan-time validation. Invalid codes are a normal 200 answer.
#[tracing::instrument(name = "validate_qr", skip_all)]
pub async fn validate_qr(
    State(state): State<AppState>,
    Json(payload): Json<ValidateQrRequest>,
) -> Json<ValidateQrResponse> {
    match state.qr.verify(&payload.qr_code_data) {
        Some(verified) => {
            info!(guest_id = %verified.guest_id, event_id = %verified.event_id, "qr code accepted");
            Json(ValidateQrResponse {
                valid: true,
                guest_id: Some(verified.guest_id),
                event_id: Some(verified.event_id),
            })
        }
        None => {
            info!("qr code rejected");
            Json(ValidateQrResponse {
                valid: false,
                guest_id: None,
                event_id: None,
            })
        }
    }
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache_entries: state.cache.entry_count(),
    })
}

// Helper to build a JSON error response.
fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
        }),
    )
}

fn map_qr_error(err: QrError) -> (StatusCode, Json<ErrorResponse>) {
    error!(error = %err, "qr code generation failed");
    match err {
        QrError::GenerationFailed => {
            error_response(StatusCode::SERVICE_UNAVAILABLE, "qr code generation failed")
        }
        QrError::Encoding(_) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "qr payload encoding failed")
        }
    }
}
