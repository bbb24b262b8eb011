use rand::RngCore;
use rand::rngs::OsRng;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::ports::{Clock, NonceSource};
use crate::interface_adapters::cache::InMemoryRenderCache;
use crate::use_cases::QrCodeService;

// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub qr: Arc<QrCodeService>,
    // Same cache the service writes into; kept for health reporting and sweeping.
    pub cache: Arc<InMemoryRenderCache>,
}

// System clock adapter used by the QR use cases.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

// Nonces drawn from the operating system CSPRNG.
#[derive(Clone)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn nonce(&self) -> [u8; 16] {
        let mut nonce = [0u8; 16];
        OsRng.fill_bytes(&mut nonce);
        nonce
    }
}
