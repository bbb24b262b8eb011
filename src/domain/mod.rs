// Domain layer: QR payload model, signing and ports.

pub mod entities;
pub mod errors;
pub mod ports;
pub mod signing;

pub use entities::{GeneratedQrCode, QrPayload, SignedQrPayload, VerifiedQrCode};
pub use errors::{QrError, RenderError};
pub use ports::{Clock, NonceSource, QrRenderer, RenderCache, UrlProbe};
pub use signing::PayloadSigner;
