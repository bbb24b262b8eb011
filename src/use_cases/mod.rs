// Use cases layer: QR issuing and scanning workflows.

pub mod generate_qr_code;
pub mod qr_code_service;
pub mod render_chain;
pub mod validate_qr_code;

#[cfg(test)]
pub(crate) mod test_support;

pub use qr_code_service::QrCodeService;
pub use render_chain::RenderChain;
