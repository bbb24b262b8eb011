use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::errors::RenderError;

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_millis(&self) -> u64;
}

// Port for per-code randomness.
pub trait NonceSource: Send + Sync {
    fn nonce(&self) -> [u8; 16];
}

// One strategy in the rendering chain. Returns a URL an image element can load.
#[async_trait]
pub trait QrRenderer: Send + Sync {
    fn name(&self) -> &str;
    async fn render(&self, data: &str) -> Result<String, RenderError>;
}

// Port for the rendered-image cache, keyed by content hash.
pub trait RenderCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn insert(&self, key: String, url: String);
}

// Port for the lightweight existence check made before trusting a remote URL.
#[async_trait]
pub trait UrlProbe: Send + Sync {
    async fn probe(&self, url: &str) -> Result<(), RenderError>;
}

// Shared handles satisfy the ports so the service can hold `Arc<dyn ...>`.
impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now_epoch_millis(&self) -> u64 {
        (**self).now_epoch_millis()
    }
}

impl<T: NonceSource + ?Sized> NonceSource for Arc<T> {
    fn nonce(&self) -> [u8; 16] {
        (**self).nonce()
    }
}

impl<T: RenderCache + ?Sized> RenderCache for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn insert(&self, key: String, url: String) {
        (**self).insert(key, url)
    }
}
