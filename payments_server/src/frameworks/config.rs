use std::{env, time::Duration};

use crate::interface_adapters::clients::stripe::DEFAULT_API_BASE;

// Runtime/server settings read from the environment.

pub fn http_port() -> u16 {
    env::var("PAYMENTS_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000)
}

// Unset means accounts live in memory for the lifetime of the process.
pub fn database_url() -> Option<String> {
    env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty())
}

pub fn stripe_secret_key() -> Option<String> {
    required("STRIPE_SECRET_KEY")
}

pub fn stripe_public_key() -> String {
    env::var("STRIPE_PUBLIC_KEY").unwrap_or_default()
}

pub fn stripe_webhook_secret() -> Option<String> {
    required("STRIPE_WEBHOOK_SECRET")
}

pub fn stripe_api_base() -> String {
    env::var("STRIPE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
}

pub fn provider_timeout() -> Duration {
    let millis = env::var("PROVIDER_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(10_000);
    Duration::from_millis(millis)
}

fn required(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
