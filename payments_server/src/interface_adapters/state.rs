use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher as _, SaltString};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

use crate::domain::ports::{
    AccountStore, Clock, EventVerifier, PasswordHasher, PaymentProvider, WebhookEventHandler,
};
use crate::domain::pricing::Pricing;

#[derive(Clone)]
pub struct AppState {
    // Arc<dyn Trait> lets each adapter be swapped (Postgres or in-memory, Stripe or fake).
    pub accounts: Arc<dyn AccountStore>,
    pub provider: Arc<dyn PaymentProvider>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub verifier: Arc<dyn EventVerifier>,
    pub events: Arc<dyn WebhookEventHandler>,
    pub pricing: Pricing,
    // Returned to clients alongside new payment intents.
    pub publishable_key: String,
}

// System clock adapter used by the webhook verifier.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

// Argon2id with default params; produces PHC strings.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| err.to_string())
    }
}

// Default webhook hooks: record the event and accept it.
#[derive(Clone, Default)]
pub struct LoggingEventHandler;

fn object_id(object: &Value) -> &str {
    object.get("id").and_then(Value::as_str).unwrap_or_default()
}

#[async_trait]
impl WebhookEventHandler for LoggingEventHandler {
    async fn payment_intent_succeeded(&self, object: &Value) -> Result<(), String> {
        info!(payment_intent = object_id(object), "payment intent succeeded");
        Ok(())
    }

    async fn payment_intent_failed(&self, object: &Value) -> Result<(), String> {
        info!(payment_intent = object_id(object), "payment intent failed");
        Ok(())
    }

    async fn charge_refunded(&self, object: &Value) -> Result<(), String> {
        info!(charge = object_id(object), "charge refunded");
        Ok(())
    }

    async fn charge_refund_updated(&self, object: &Value) -> Result<(), String> {
        info!(refund = object_id(object), "charge refund updated");
        Ok(())
    }
}
