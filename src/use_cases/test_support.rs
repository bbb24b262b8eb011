use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::RenderError;
use crate::domain::ports::{Clock, NonceSource, QrRenderer, RenderCache};
use crate::domain::signing::PayloadSigner;
use crate::use_cases::render_chain::RenderChain;

pub(crate) const TEST_SECRET: &[u8] = b"use-case-test-secret";
pub(crate) const TEST_NOW_MS: u64 = 1_700_000_000_000;

pub(crate) fn test_signer() -> Arc<PayloadSigner> {
    Arc::new(PayloadSigner::new(TEST_SECRET).expect("test signer"))
}

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_millis(&self) -> u64 {
        self.0
    }
}

// Always returns the same nonce so two generations serialize identically.
pub(crate) struct FixedNonce(pub(crate) [u8; 16]);

impl NonceSource for FixedNonce {
    fn nonce(&self) -> [u8; 16] {
        self.0
    }
}

// Counts up from zero, one nonce per call.
#[derive(Default)]
pub(crate) struct SequenceNonce {
    next: AtomicUsize,
}

impl NonceSource for SequenceNonce {
    fn nonce(&self) -> [u8; 16] {
        let value = self.next.fetch_add(1, Ordering::Relaxed) as u128;
        value.to_be_bytes()
    }
}

#[derive(Clone, Copy)]
pub(crate) enum Script {
    Succeed,
    Fail,
    Hang(Duration),
}

// Renderer double that records every call into a shared journal.
pub(crate) struct ScriptedRenderer {
    name: String,
    script: Script,
    calls: Arc<AtomicUsize>,
    journal: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRenderer {
    pub(crate) fn new(name: &str, script: Script, journal: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.to_string(),
            script,
            calls: Arc::new(AtomicUsize::new(0)),
            journal,
        }
    }

    pub(crate) fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl QrRenderer for ScriptedRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn render(&self, data: &str) -> Result<String, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.journal
            .lock()
            .expect("journal mutex poisoned")
            .push(self.name.clone());

        match self.script {
            Script::Succeed => Ok(format!("test://{}/{}", self.name, data.len())),
            Script::Fail => Err(RenderError::Encode(format!("{} forced failure", self.name))),
            Script::Hang(delay) => {
                tokio::time::sleep(delay).await;
                Ok(format!("test://{}/late", self.name))
            }
        }
    }
}

pub(crate) fn journal() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn chain_of(renderers: Vec<ScriptedRenderer>, attempt_timeout: Duration) -> RenderChain {
    RenderChain::new(
        renderers
            .into_iter()
            .map(|renderer| Arc::new(renderer) as Arc<dyn QrRenderer>)
            .collect(),
        attempt_timeout,
    )
}

// Unbounded cache double with inspectable contents.
#[derive(Clone, Default)]
pub(crate) struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryCache {
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").len()
    }

    pub(crate) fn seed(&self, key: impl Into<String>, url: impl Into<String>) {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .insert(key.into(), url.into());
    }
}

impl RenderCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .get(key)
            .cloned()
    }

    fn insert(&self, key: String, url: String) {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .insert(key, url);
    }
}
