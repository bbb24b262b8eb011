use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{SUPPORTED_VERSIONS, SignedQrPayload, VerifiedQrCode};
use crate::domain::ports::Clock;
use crate::domain::signing::PayloadSigner;

// QR validation use case. Pure: no cache, no network.
pub struct ValidateQrCodeUseCase<C> {
    pub clock: C,
    pub signer: Arc<PayloadSigner>,
    pub validity_window: Duration,
}

impl<C> ValidateQrCodeUseCase<C>
where
    C: Clock,
{
    /// Returns the carried identity only when every check passes.
    ///
    /// Failure reasons are deliberately collapsed into `None`.
    pub fn execute(&self, qr_code_data: &str) -> Option<VerifiedQrCode> {
        let signed = SignedQrPayload::from_qr_data(qr_code_data).ok()?;

        if !SUPPORTED_VERSIONS.contains(&signed.version) {
            return None;
        }

        if !self.within_window(signed.timestamp) {
            return None;
        }

        if !self.signer.verify(&signed.unsigned(), &signed.signature) {
            return None;
        }

        Some(VerifiedQrCode {
            guest_id: signed.guest_id,
            event_id: signed.event_id,
            issued_at_ms: signed.timestamp,
        })
    }

    pub fn is_valid(&self, qr_code_data: &str) -> bool {
        self.execute(qr_code_data).is_some()
    }

    // Only elapsed time counts; a timestamp ahead of this host's clock has zero age.
    fn within_window(&self, issued_at_ms: u64) -> bool {
        let elapsed = self.clock.now_epoch_millis().saturating_sub(issued_at_ms);
        elapsed <= duration_millis(self.validity_window)
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
