use std::fmt;
use std::time::Duration;

// Errors surfaced by QR generation.
#[derive(Debug)]
pub enum QrError {
    // The signed record could not be serialized.
    Encoding(String),
    // Every renderer in the chain failed.
    GenerationFailed,
}

impl fmt::Display for QrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QrError::Encoding(message) => write!(f, "qr payload encoding error: {message}"),
            QrError::GenerationFailed => write!(f, "qr code generation failed"),
        }
    }
}

impl std::error::Error for QrError {}

// Errors from a single rendering attempt. The chain logs these and moves on.
#[derive(Debug)]
pub enum RenderError {
    // Data did not fit a QR symbol at the requested error-correction level.
    Encode(String),
    // Pixel or image encoding failed.
    Image(String),
    // The remote endpoint could not be reached.
    Transport(String),
    // The remote endpoint answered with a non-success status.
    Upstream { status: u16 },
    // The attempt did not finish in time.
    TimedOut(Duration),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Encode(message) => write!(f, "qr encode error: {message}"),
            RenderError::Image(message) => write!(f, "image encode error: {message}"),
            RenderError::Transport(message) => write!(f, "fallback transport error: {message}"),
            RenderError::Upstream { status } => write!(f, "fallback upstream status {status}"),
            RenderError::TimedOut(limit) => {
                write!(f, "render attempt timed out after {}ms", limit.as_millis())
            }
        }
    }
}

impl std::error::Error for RenderError {}
