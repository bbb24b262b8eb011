// Process-wide QR service built once at startup.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{GeneratedQrCode, VerifiedQrCode};
use crate::domain::errors::QrError;
use crate::domain::ports::{Clock, NonceSource, RenderCache};
use crate::domain::signing::PayloadSigner;
use crate::use_cases::generate_qr_code::GenerateQrCodeUseCase;
use crate::use_cases::render_chain::RenderChain;
use crate::use_cases::validate_qr_code::ValidateQrCodeUseCase;

/// Owns the signing key, renderer chain and render cache.
///
/// Every dependency is injected, so handlers and tests share one
/// construction path and nothing lives in a global.
#[derive(Clone)]
pub struct QrCodeService {
    clock: Arc<dyn Clock>,
    nonces: Arc<dyn NonceSource>,
    cache: Arc<dyn RenderCache>,
    signer: Arc<PayloadSigner>,
    renderers: RenderChain,
    validity_window: Duration,
}

impl QrCodeService {
    pub fn new(
        clock: Arc<dyn Clock>,
        nonces: Arc<dyn NonceSource>,
        cache: Arc<dyn RenderCache>,
        signer: PayloadSigner,
        renderers: RenderChain,
        validity_window: Duration,
    ) -> Self {
        Self {
            clock,
            nonces,
            cache,
            signer: Arc::new(signer),
            renderers,
            validity_window,
        }
    }

    pub async fn generate(
        &self,
        guest_id: &str,
        event_id: &str,
    ) -> Result<GeneratedQrCode, QrError> {
        let use_case = GenerateQrCodeUseCase {
            clock: self.clock.clone(),
            nonces: self.nonces.clone(),
            cache: self.cache.clone(),
            signer: self.signer.clone(),
            renderers: self.renderers.clone(),
        };
        use_case.execute(guest_id, event_id).await
    }

    pub fn verify(&self, qr_code_data: &str) -> Option<VerifiedQrCode> {
        self.validator().execute(qr_code_data)
    }

    pub fn validate(&self, qr_code_data: &str) -> bool {
        self.validator().is_valid(qr_code_data)
    }

    pub fn renderer_names(&self) -> Vec<String> {
        self.renderers.names()
    }

    fn validator(&self) -> ValidateQrCodeUseCase<Arc<dyn Clock>> {
        ValidateQrCodeUseCase {
            clock: self.clock.clone(),
            signer: self.signer.clone(),
            validity_window: self.validity_window,
        }
    }
}
