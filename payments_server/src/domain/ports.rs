use async_trait::async_trait;
use serde_json::Value;

use crate::domain::entities::{
    Account, AccountChanges, CardList, CardUpdate, CustomerProfile, NewAccount, PaymentIntent,
    PaymentIntentDraft, WebhookEvent,
};
use crate::domain::errors::{ProviderError, StoreError, WebhookError};

// Port for account persistence used by the use cases.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;
    async fn get(&self, id: i64) -> Result<Option<Account>, StoreError>;
    async fn update(&self, id: i64, changes: AccountChanges)
    -> Result<Option<Account>, StoreError>;
    async fn remove(&self, id: i64) -> Result<bool, StoreError>;
    // True when another account (any account if `except_id` is None) holds `username`.
    async fn username_taken(&self, username: &str, except_id: Option<i64>)
    -> Result<bool, StoreError>;
    // Conditional write: stores `customer_id` only when no linkage exists yet and
    // returns whichever linkage is stored afterwards (None if the account is gone).
    async fn link_customer(&self, id: i64, customer_id: &str)
    -> Result<Option<String>, StoreError>;
}

// Port for the external payment provider. Responses the API passes through
// untouched are returned as raw JSON.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_customer(&self, profile: &CustomerProfile) -> Result<String, ProviderError>;
    async fn retrieve_customer(&self, customer_id: &str) -> Result<Value, ProviderError>;
    async fn modify_customer(
        &self,
        customer_id: &str,
        profile: &CustomerProfile,
    ) -> Result<Value, ProviderError>;
    async fn delete_customer(&self, customer_id: &str) -> Result<Value, ProviderError>;

    async fn create_payment_intent(
        &self,
        draft: &PaymentIntentDraft,
    ) -> Result<PaymentIntent, ProviderError>;
    async fn cancel_payment_intent(&self, payment_intent: &str) -> Result<Value, ProviderError>;

    async fn list_refunds(&self, payment_intent: &str) -> Result<Vec<Value>, ProviderError>;
    async fn create_refund(&self, payment_intent: &str) -> Result<Value, ProviderError>;

    async fn token_fingerprint(&self, token_id: &str) -> Result<String, ProviderError>;
    async fn list_cards(&self, customer_id: &str) -> Result<CardList, ProviderError>;
    async fn create_card(&self, customer_id: &str, source_id: &str)
    -> Result<Value, ProviderError>;
    async fn update_card(
        &self,
        customer_id: &str,
        card_id: &str,
        update: &CardUpdate,
    ) -> Result<Value, ProviderError>;
    async fn delete_card(&self, customer_id: &str, card_id: &str) -> Result<Value, ProviderError>;
    async fn set_default_card(
        &self,
        customer_id: &str,
        card_id: &str,
    ) -> Result<Value, ProviderError>;
}

// Port for turning a signed webhook delivery into a trusted event.
pub trait EventVerifier: Send + Sync {
    fn construct_event(&self, payload: &[u8], signature: &str)
    -> Result<WebhookEvent, WebhookError>;
}

// Extension point for acting on verified provider events. Every hook
// defaults to doing nothing.
#[async_trait]
pub trait WebhookEventHandler: Send + Sync {
    async fn payment_intent_succeeded(&self, _object: &Value) -> Result<(), String> {
        Ok(())
    }

    async fn payment_intent_failed(&self, _object: &Value) -> Result<(), String> {
        Ok(())
    }

    async fn charge_refunded(&self, _object: &Value) -> Result<(), String> {
        Ok(())
    }

    async fn charge_refund_updated(&self, _object: &Value) -> Result<(), String> {
        Ok(())
    }
}

// Port for one-way password hashing.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, String>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}
