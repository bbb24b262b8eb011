// Framework bootstrap for the QR service runtime.

use crate::domain::entities::VALIDITY_WINDOW;
use crate::domain::ports::QrRenderer;
use crate::domain::signing::PayloadSigner;
use crate::frameworks::config::{QrServiceConfig, SecretOrigin};
use crate::interface_adapters::cache::InMemoryRenderCache;
use crate::interface_adapters::clients::HttpProbeClient;
use crate::interface_adapters::renderers::{
    FallbackServiceRenderer, PngCanvasRenderer, SvgRenderer,
};
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::{AppState, OsNonceSource, SystemClock};
use crate::use_cases::{QrCodeService, RenderChain};

use std::io::{Error, Result};
use std::net::SocketAddr;
use std::sync::Arc;

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, config: QrServiceConfig) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state(&config)?;
    spawn_cache_sweeper(state.cache.clone(), &config);

    let app = app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let config = QrServiceConfig::load().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        Error::other(e)
    })?;

    let address = SocketAddr::from(([0, 0, 0, 0], config.http_port));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, config).await
}

/// Builds the single QR service instance and the state handlers share.
pub fn build_state(config: &QrServiceConfig) -> Result<AppState> {
    let (secret, origin) = config.resolve_secret().map_err(Error::other)?;
    if origin == SecretOrigin::Ephemeral {
        tracing::warn!(
            "QR_SECRET_KEY not set; signing with a per-process key, issued codes will not validate after restart"
        );
    }
    let signer = PayloadSigner::new(&secret).map_err(Error::other)?;

    let probe = HttpProbeClient::new(config.probe_timeout())
        .map_err(|e| Error::other(format!("failed to initialize probe client: {e}")))?;
    let probe = Arc::new(probe);

    // Local renderers first, then every fallback service in configured order.
    let mut renderers: Vec<Arc<dyn QrRenderer>> = Vec::new();
    renderers.push(Arc::new(SvgRenderer));
    renderers.push(Arc::new(PngCanvasRenderer));
    for endpoint in config.fallback_urls().map_err(Error::other)? {
        renderers.push(Arc::new(FallbackServiceRenderer::new(endpoint, probe.clone())));
    }
    let chain = RenderChain::new(renderers, config.render_timeout());

    let cache = Arc::new(InMemoryRenderCache::new(
        config.cache_capacity,
        config.cache_ttl(),
    ));

    tracing::info!(
        renderers = ?chain.names(),
        cache_capacity = config.cache_capacity,
        cache_ttl_secs = config.cache_ttl_secs,
        secret_origin = ?origin,
        "qr service configured"
    );
    tracing::debug!(
        render_timeout_ms = config.render_timeout_ms,
        probe_timeout_ms = config.probe_timeout_ms,
        "render timeouts"
    );

    let qr = QrCodeService::new(
        Arc::new(SystemClock),
        Arc::new(OsNonceSource),
        cache.clone(),
        signer,
        chain,
        VALIDITY_WINDOW,
    );

    Ok(AppState {
        qr: Arc::new(qr),
        cache,
    })
}

// Periodically drop expired renders so unread keys do not pin memory.
fn spawn_cache_sweeper(cache: Arc<InMemoryRenderCache>, config: &QrServiceConfig) {
    let period = config.cache_sweep_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            cache.run_pending_tasks();
            tracing::debug!(remaining = cache.entry_count(), "qr render cache maintained");
        }
    });
}
