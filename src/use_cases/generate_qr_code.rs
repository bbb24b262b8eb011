use std::sync::Arc;

use tracing::debug;

use crate::domain::entities::{GeneratedQrCode, QrPayload};
use crate::domain::errors::QrError;
use crate::domain::ports::{Clock, NonceSource, RenderCache};
use crate::domain::signing::{PayloadSigner, content_hash};
use crate::use_cases::render_chain::RenderChain;

// QR generation use case with injected dependencies.
pub struct GenerateQrCodeUseCase<C, N, K> {
    pub clock: C,
    pub nonces: N,
    pub cache: K,
    pub signer: Arc<PayloadSigner>,
    pub renderers: RenderChain,
}

impl<C, N, K> GenerateQrCodeUseCase<C, N, K>
where
    C: Clock,
    N: NonceSource,
    K: RenderCache,
{
    pub async fn execute(
        &self,
        guest_id: &str,
        event_id: &str,
    ) -> Result<GeneratedQrCode, QrError> {
        let payload = QrPayload {
            guest_id: guest_id.to_string(),
            event_id: event_id.to_string(),
            timestamp: self.clock.now_epoch_millis(),
            nonce: hex::encode(self.nonces.nonce()),
        };

        let signature = self
            .signer
            .sign(&(&payload).into())
            .map_err(|err| QrError::Encoding(err.to_string()))?;
        let qr_code_data = payload
            .into_signed(signature)
            .to_qr_data()
            .map_err(|err| QrError::Encoding(err.to_string()))?;

        let cache_key = content_hash(&qr_code_data);
        if let Some(qr_code_url) = self.cache.get(&cache_key) {
            debug!(%cache_key, "qr render cache hit");
            return Ok(GeneratedQrCode {
                qr_code_url,
                qr_code_data,
            });
        }

        // Only a complete render reaches the cache.
        let qr_code_url = self.renderers.render(&qr_code_data).await?;
        self.cache.insert(cache_key, qr_code_url.clone());

        Ok(GeneratedQrCode {
            qr_code_url,
            qr_code_data,
        })
    }
}
