// One-time server bootstrap shared by the integration tests in a binary.
#![allow(dead_code)]

use payments_server::domain::pricing::Pricing;
use payments_server::interface_adapters::clients::stripe::StripeClient;
use payments_server::interface_adapters::clients::webhook_signature::StripeSignatureVerifier;
use payments_server::interface_adapters::state::{
    AppState, Argon2PasswordHasher, LoggingEventHandler, SystemClock,
};
use payments_server::interface_adapters::stores::InMemoryAccountStore;
use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

pub const WEBHOOK_SECRET: &str = "whsec_integration";
pub const PUBLISHABLE_KEY: &str = "pk_integration";

// Base URL of the payments server, published once it is bound.
static SERVER_URL: OnceLock<String> = OnceLock::new();
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Ensure the test server is running and return the shared base URL.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // The server and its fake provider outlive individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // Stands in for the provider API for the life of the process.
                let mut stripe = mockito::Server::new_async().await;
                let _customers = stripe
                    .mock("POST", "/v1/customers")
                    .with_status(200)
                    .with_header("content-type", "application/json")
                    .with_body(r#"{"id":"cus_integration","object":"customer"}"#)
                    .create_async()
                    .await;
                let _intents = stripe
                    .mock("POST", "/v1/payment_intents")
                    .with_status(200)
                    .with_header("content-type", "application/json")
                    .with_body(
                        r#"{"id":"pi_integration","client_secret":"pi_integration_secret"}"#,
                    )
                    .create_async()
                    .await;

                let provider =
                    StripeClient::new(&stripe.url(), "sk_integration", Duration::from_secs(5))
                        .expect("stripe client");
                let state = Arc::new(AppState {
                    accounts: Arc::new(InMemoryAccountStore::default()),
                    provider: Arc::new(provider),
                    hasher: Arc::new(Argon2PasswordHasher),
                    verifier: Arc::new(StripeSignatureVerifier::new(WEBHOOK_SECRET, SystemClock)),
                    events: Arc::new(LoggingEventHandler),
                    pricing: Pricing::default(),
                    publishable_key: PUBLISHABLE_KEY.to_string(),
                });

                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));
                payments_server::run(listener, state)
                    .await
                    .expect("server failed");
            });
        });
        wait_for_server_url_and_readiness(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

// Wait for URL publication and then for the server socket to accept TCP connections.
fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}
