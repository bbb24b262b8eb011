use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

use crate::domain::entities::QR_IMAGE_SIZE;
use crate::domain::errors::RenderError;
use crate::domain::ports::{QrRenderer, UrlProbe};

/// Third-party QR endpoint used once local rendering has failed.
///
/// The returned URL is fetched by the client directly, so the endpoint is
/// probed first and only trusted when it answers successfully.
pub struct FallbackServiceRenderer {
    name: String,
    endpoint: Url,
    probe: Arc<dyn UrlProbe>,
}

impl FallbackServiceRenderer {
    pub fn new(endpoint: Url, probe: Arc<dyn UrlProbe>) -> Self {
        let name = format!("fallback:{}", endpoint.host_str().unwrap_or("unknown"));
        Self {
            name,
            endpoint,
            probe,
        }
    }

    pub fn image_url(&self, data: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("size", &format!("{QR_IMAGE_SIZE}x{QR_IMAGE_SIZE}"))
            .append_pair("data", data);
        url
    }
}

#[async_trait]
impl QrRenderer for FallbackServiceRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn render(&self, data: &str) -> Result<String, RenderError> {
        let url = self.image_url(data);
        self.probe.probe(url.as_str()).await?;
        Ok(url.into())
    }
}
