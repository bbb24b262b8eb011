// One-time QR server bootstrap shared by every test in a binary.
use std::{
    // `OnceLock` slots are written once by the server thread and read by tests.
    sync::{Arc, OnceLock},
    // Polling intervals for the readiness loops below.
    time::Duration,
};

use qr_server::QrServiceConfig;

// Base URL every test talks to once the server has bound its port.
static SERVER_URL: OnceLock<String> = OnceLock::new();
// Guards the bootstrap so concurrent tests start a single server.
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Configuration for test servers: fixed secret, local renderers only.
pub fn test_config() -> QrServiceConfig {
    QrServiceConfig {
        // Fixed so codes issued by one test validate in another.
        secret_key: Some("integration-test-secret".to_string()),
        // No fallback services, so nothing leaves the machine.
        fallback_services: Vec::new(),
        cache_capacity: 64,
        ..QrServiceConfig::default()
    }
}

// Start the server on first use and return its base URL.
pub fn ensure_server() -> &'static str {
    // Later callers block here until the first bootstrap completes.
    SERVER_READY.get_or_init(|| {
        // Slot the server thread fills with its bound address.
        let published_url = Arc::new(OnceLock::<String>::new());
        // Second handle moved into the server thread.
        let published_url_thread = Arc::clone(&published_url);
        // A dedicated OS thread keeps the server alive across `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            // The server gets its own multi-threaded runtime.
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // Port 0 lets the OS pick a free port.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                // Read back the port the OS assigned.
                let addr = listener.local_addr().expect("get local addr");
                // Hand the address to the waiting test thread.
                let _ = published_url_thread.set(format!("http://{}", addr));
                // Serve until the test binary exits.
                qr_server::run(listener, test_config())
                    .await
                    .expect("server failed");
            });
        });
        // Return only once the socket accepts connections.
        wait_for_server_url_and_readiness(published_url);
    });

    // Every test in this binary shares the same URL.
    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

// Wait for the address to be published, then for the socket to accept.
fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    // Spin until the server thread has bound and published.
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        // Short sleep instead of a busy loop.
        std::thread::sleep(Duration::from_millis(10));
    };

    // Record the URL for later `ensure_server` calls.
    let _ = SERVER_URL.set(base_url.clone());

    // Raw TCP connects need host:port without the scheme.
    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    // Bind happens before serve starts, so retry briefly.
    for _ in 0..100 {
        // A completed connect means the listener is accepting.
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    // Startup never reached an accepting state.
    panic!("test server did not become ready at {base_url}");
}
