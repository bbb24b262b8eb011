// Ordered rendering strategies, each bounded by a timeout.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::errors::{QrError, RenderError};
use crate::domain::ports::QrRenderer;

/// Local renderers first, then fallback services, tried strictly in order.
#[derive(Clone)]
pub struct RenderChain {
    renderers: Vec<Arc<dyn QrRenderer>>,
    attempt_timeout: Duration,
}

impl RenderChain {
    pub fn new(renderers: Vec<Arc<dyn QrRenderer>>, attempt_timeout: Duration) -> Self {
        Self {
            renderers,
            attempt_timeout,
        }
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.renderers.iter().map(|r| r.name().to_string()).collect()
    }

    /// Returns the first successful render. No attempt runs concurrently with another.
    pub async fn render(&self, data: &str) -> Result<String, QrError> {
        for renderer in &self.renderers {
            match self.attempt(renderer.as_ref(), data).await {
                Ok(url) => {
                    debug!(renderer = renderer.name(), "qr code rendered");
                    return Ok(url);
                }
                Err(error) => {
                    warn!(renderer = renderer.name(), %error, "qr renderer failed");
                }
            }
        }

        Err(QrError::GenerationFailed)
    }

    async fn attempt(&self, renderer: &dyn QrRenderer, data: &str) -> Result<String, RenderError> {
        match tokio::time::timeout(self.attempt_timeout, renderer.render(data)).await {
            Ok(result) => result,
            Err(_) => Err(RenderError::TimedOut(self.attempt_timeout)),
        }
    }
}
