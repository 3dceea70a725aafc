// Framework bootstrap for the payments server runtime.

use crate::domain::ports::AccountStore;
use crate::domain::pricing::Pricing;
use crate::frameworks::{config, db};
use crate::interface_adapters::clients::stripe::StripeClient;
use crate::interface_adapters::clients::webhook_signature::StripeSignatureVerifier;
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::{
    AppState, Argon2PasswordHasher, LoggingEventHandler, SystemClock,
};
use crate::interface_adapters::stores::{InMemoryAccountStore, PostgresAccountStore};

use std::io::{Error, Result};
use std::net::SocketAddr;
use std::sync::Arc;

fn init_runtime() {
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

pub async fn run(listener: tokio::net::TcpListener, state: Arc<AppState>) -> Result<()> {
    let address = listener.local_addr()?;
    let app = app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let state = build_state().await.inspect_err(|e| {
        tracing::error!(error = %e, "failed to build state");
    })?;
    let address = SocketAddr::from(([0, 0, 0, 0], config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, state).await
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value.ok_or_else(|| Error::other(format!("{name} must be set")))
}

async fn build_accounts() -> Result<Arc<dyn AccountStore>> {
    let Some(database_url) = config::database_url() else {
        tracing::warn!("DATABASE_URL not set; accounts are kept in memory");
        return Ok(Arc::new(InMemoryAccountStore::default()));
    };

    let pool = db::connect_pool(&database_url)
        .await
        .map_err(|e| Error::other(format!("failed to connect to database: {e}")))?;
    db::run_migrations(&pool)
        .await
        .map_err(|e| Error::other(format!("failed to run migrations: {e}")))?;
    tracing::debug!("account store connected");

    Ok(Arc::new(PostgresAccountStore { db: pool }))
}

async fn build_state() -> Result<Arc<AppState>> {
    let secret_key = required(config::stripe_secret_key(), "STRIPE_SECRET_KEY")?;
    let publishable_key = config::stripe_public_key();
    let webhook_secret = required(config::stripe_webhook_secret(), "STRIPE_WEBHOOK_SECRET")?;

    let api_base = config::stripe_api_base();
    let timeout = config::provider_timeout();
    let provider = StripeClient::new(&api_base, secret_key, timeout)
        .map_err(|e| Error::other(format!("failed to initialize stripe client: {e}")))?;
    tracing::debug!(
        api_base = %api_base,
        provider_timeout_ms = timeout.as_millis(),
        "stripe client configured"
    );

    let accounts = build_accounts().await?;

    Ok(Arc::new(AppState {
        accounts,
        provider: Arc::new(provider),
        hasher: Arc::new(Argon2PasswordHasher),
        verifier: Arc::new(StripeSignatureVerifier::new(webhook_secret, SystemClock)),
        events: Arc::new(LoggingEventHandler),
        pricing: Pricing::default(),
        publishable_key,
    }))
}
