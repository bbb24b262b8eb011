use async_trait::async_trait;
use std::time::Duration;

use crate::domain::errors::RenderError;
use crate::domain::ports::UrlProbe;

// Thin reqwest client for HEAD-probing fallback QR endpoints.
#[derive(Clone)]
pub struct HttpProbeClient {
    http: reqwest::Client,
}

impl HttpProbeClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl UrlProbe for HttpProbeClient {
    async fn probe(&self, url: &str) -> Result<(), RenderError> {
        let response = self
            .http
            .head(url)
            .send()
            .await
            .map_err(|err| RenderError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(RenderError::Upstream {
            status: status.as_u16(),
        })
    }
}
