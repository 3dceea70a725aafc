use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use crate::domain::entities::{
    Account, AccountChanges, CardList, CardUpdate, CustomerProfile, NewAccount, PaymentIntent,
    PaymentIntentDraft,
};
use crate::domain::errors::{ProviderError, StoreError};
use crate::domain::ports::{AccountStore, Clock, PasswordHasher, PaymentProvider};

// Ordered log of collaborator calls, shared between fakes so tests can assert
// on cross-collaborator ordering.
pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

pub(crate) fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }
}

// Reversible stand-in for argon2 so assertions can read the stored hash.
pub(crate) struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, String> {
        Ok(format!("plain${password}"))
    }
}

pub(crate) fn test_account(id: i64, customer_id: Option<&str>) -> Account {
    let at = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid fixture timestamp");
    Account {
        id,
        username: format!("pilot{id}"),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: format!("pilot{id}@example.com"),
        phone_number: Some("+15550100".to_string()),
        password_hash: "plain$secret".to_string(),
        customer_id: customer_id.map(str::to_string),
        created_on: at,
        modified_on: at,
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub insert: bool,
    pub get: bool,
    pub update: bool,
    pub remove: bool,
    pub link: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingAccounts {
    accounts: Arc<Mutex<HashMap<i64, Account>>>,
    log: CallLog,
    failures: FailureFlags,
    // Linkage another request already stored; link_customer reports it instead
    // of the caller's id.
    competing_link: Option<String>,
}

impl RecordingAccounts {
    pub(crate) fn new() -> Self {
        Self::sharing(new_log())
    }

    pub(crate) fn sharing(log: CallLog) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(HashMap::new())),
            log,
            failures: FailureFlags::default(),
            competing_link: None,
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn with_competing_link(mut self, customer_id: &str) -> Self {
        self.competing_link = Some(customer_id.to_string());
        self
    }

    pub(crate) fn seed(&self, account: Account) {
        let mut guard = self.accounts.lock().expect("accounts mutex poisoned");
        guard.insert(account.id, account);
    }

    pub(crate) fn stored(&self, id: i64) -> Option<Account> {
        let guard = self.accounts.lock().expect("accounts mutex poisoned");
        guard.get(&id).cloned()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.log.lock().expect("log mutex poisoned").clone()
    }

    fn record(&self, call: &str) {
        self.log
            .lock()
            .expect("log mutex poisoned")
            .push(call.to_string());
    }
}

#[async_trait]
impl AccountStore for RecordingAccounts {
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        self.record("store.insert");
        if self.failures.insert {
            return Err(StoreError::Backend("insert failed".to_string()));
        }

        let mut guard = self.accounts.lock().expect("accounts mutex poisoned");
        if guard.values().any(|stored| stored.username == account.username) {
            return Err(StoreError::UsernameTaken);
        }
        let id = guard.keys().max().copied().unwrap_or(0) + 1;
        let mut stored = test_account(id, account.customer_id.as_deref());
        stored.username = account.username;
        stored.first_name = account.first_name;
        stored.last_name = account.last_name;
        stored.email = account.email;
        stored.phone_number = account.phone_number;
        stored.password_hash = account.password_hash;
        guard.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: i64) -> Result<Option<Account>, StoreError> {
        self.record("store.get");
        if self.failures.get {
            return Err(StoreError::Backend("get failed".to_string()));
        }

        Ok(self.stored(id))
    }

    async fn update(
        &self,
        id: i64,
        changes: AccountChanges,
    ) -> Result<Option<Account>, StoreError> {
        self.record("store.update");
        if self.failures.update {
            return Err(StoreError::Backend("update failed".to_string()));
        }

        let mut guard = self.accounts.lock().expect("accounts mutex poisoned");
        let Some(account) = guard.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = changes.username {
            account.username = username;
        }
        if let Some(first_name) = changes.first_name {
            account.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            account.last_name = last_name;
        }
        if let Some(email) = changes.email {
            account.email = email;
        }
        if let Some(phone_number) = changes.phone_number {
            account.phone_number = Some(phone_number);
        }
        if let Some(password_hash) = changes.password_hash {
            account.password_hash = password_hash;
        }
        Ok(Some(account.clone()))
    }

    async fn remove(&self, id: i64) -> Result<bool, StoreError> {
        self.record("store.remove");
        if self.failures.remove {
            return Err(StoreError::Backend("remove failed".to_string()));
        }

        let mut guard = self.accounts.lock().expect("accounts mutex poisoned");
        Ok(guard.remove(&id).is_some())
    }

    async fn username_taken(
        &self,
        username: &str,
        except_id: Option<i64>,
    ) -> Result<bool, StoreError> {
        self.record("store.username_taken");
        let guard = self.accounts.lock().expect("accounts mutex poisoned");
        Ok(guard
            .values()
            .any(|stored| Some(stored.id) != except_id && stored.username == username))
    }

    async fn link_customer(
        &self,
        id: i64,
        customer_id: &str,
    ) -> Result<Option<String>, StoreError> {
        self.record("store.link_customer");
        if self.failures.link {
            return Err(StoreError::Backend("link failed".to_string()));
        }

        let mut guard = self.accounts.lock().expect("accounts mutex poisoned");
        let Some(account) = guard.get_mut(&id) else {
            return Ok(None);
        };
        if account.customer_id.is_none() {
            let winner = self
                .competing_link
                .clone()
                .unwrap_or_else(|| customer_id.to_string());
            account.customer_id = Some(winner);
        }
        Ok(account.customer_id.clone())
    }
}

#[derive(Default)]
struct ProviderData {
    next_customer: u32,
    refunds: HashMap<String, Vec<Value>>,
    cards: HashMap<String, Vec<Value>>,
    tokens: HashMap<String, String>,
    default_sources: HashMap<String, String>,
    intents: Vec<PaymentIntentDraft>,
    profiles: Vec<(String, CustomerProfile)>,
    card_updates: Vec<CardUpdate>,
}

// In-memory payment provider that records every call it receives.
#[derive(Clone)]
pub(crate) struct FakeProvider {
    data: Arc<Mutex<ProviderData>>,
    log: CallLog,
    failing: HashSet<&'static str>,
}

impl FakeProvider {
    pub(crate) fn new() -> Self {
        Self::sharing(new_log())
    }

    pub(crate) fn sharing(log: CallLog) -> Self {
        Self {
            data: Arc::new(Mutex::new(ProviderData::default())),
            log,
            failing: HashSet::new(),
        }
    }

    // Makes the named operation fail with an upstream error.
    pub(crate) fn failing(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    pub(crate) fn with_refund(self, payment_intent: &str) -> Self {
        self.data
            .lock()
            .expect("provider mutex poisoned")
            .refunds
            .entry(payment_intent.to_string())
            .or_default()
            .push(json!({"id": "re_existing", "payment_intent": payment_intent}));
        self
    }

    pub(crate) fn with_card(self, customer_id: &str, card_id: &str, fingerprint: &str) -> Self {
        self.data
            .lock()
            .expect("provider mutex poisoned")
            .cards
            .entry(customer_id.to_string())
            .or_default()
            .push(json!({"id": card_id, "object": "card", "fingerprint": fingerprint}));
        self
    }

    pub(crate) fn with_token(self, token_id: &str, fingerprint: &str) -> Self {
        self.data
            .lock()
            .expect("provider mutex poisoned")
            .tokens
            .insert(token_id.to_string(), fingerprint.to_string());
        self
    }

    pub(crate) fn with_default_source(self, customer_id: &str, card_id: &str) -> Self {
        self.data
            .lock()
            .expect("provider mutex poisoned")
            .default_sources
            .insert(customer_id.to_string(), card_id.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.log.lock().expect("log mutex poisoned").clone()
    }

    pub(crate) fn call_count(&self, call: &str) -> usize {
        let name = format!("provider.{call}");
        self.calls().iter().filter(|entry| **entry == name).count()
    }

    pub(crate) fn intents(&self) -> Vec<PaymentIntentDraft> {
        self.data
            .lock()
            .expect("provider mutex poisoned")
            .intents
            .clone()
    }

    pub(crate) fn profiles(&self) -> Vec<(String, CustomerProfile)> {
        self.data
            .lock()
            .expect("provider mutex poisoned")
            .profiles
            .clone()
    }

    pub(crate) fn card_updates(&self) -> Vec<CardUpdate> {
        self.data
            .lock()
            .expect("provider mutex poisoned")
            .card_updates
            .clone()
    }

    fn enter(&self, operation: &'static str) -> Result<(), ProviderError> {
        self.log
            .lock()
            .expect("log mutex poisoned")
            .push(format!("provider.{operation}"));
        if self.failing.contains(operation) {
            return Err(ProviderError::Upstream {
                status: 402,
                message: Some(format!("{operation} declined by fake provider")),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentProvider for FakeProvider {
    async fn create_customer(&self, profile: &CustomerProfile) -> Result<String, ProviderError> {
        self.enter("create_customer")?;
        let mut data = self.data.lock().expect("provider mutex poisoned");
        data.next_customer += 1;
        let customer_id = format!("cus_{}", data.next_customer);
        data.profiles.push((customer_id.clone(), profile.clone()));
        Ok(customer_id)
    }

    async fn retrieve_customer(&self, customer_id: &str) -> Result<Value, ProviderError> {
        self.enter("retrieve_customer")?;
        let data = self.data.lock().expect("provider mutex poisoned");
        Ok(json!({
            "id": customer_id,
            "object": "customer",
            "default_source": data.default_sources.get(customer_id),
        }))
    }

    async fn modify_customer(
        &self,
        customer_id: &str,
        profile: &CustomerProfile,
    ) -> Result<Value, ProviderError> {
        self.enter("modify_customer")?;
        let mut data = self.data.lock().expect("provider mutex poisoned");
        data.profiles
            .push((customer_id.to_string(), profile.clone()));
        Ok(json!({"id": customer_id, "object": "customer", "name": profile.name}))
    }

    async fn delete_customer(&self, customer_id: &str) -> Result<Value, ProviderError> {
        self.enter("delete_customer")?;
        Ok(json!({"id": customer_id, "object": "customer", "deleted": true}))
    }

    async fn create_payment_intent(
        &self,
        draft: &PaymentIntentDraft,
    ) -> Result<PaymentIntent, ProviderError> {
        self.enter("create_payment_intent")?;
        let mut data = self.data.lock().expect("provider mutex poisoned");
        data.intents.push(draft.clone());
        let id = format!("pi_{}", data.intents.len());
        Ok(PaymentIntent {
            client_secret: format!("{id}_secret"),
            id,
        })
    }

    async fn cancel_payment_intent(&self, payment_intent: &str) -> Result<Value, ProviderError> {
        self.enter("cancel_payment_intent")?;
        Ok(json!({"id": payment_intent, "status": "canceled"}))
    }

    async fn list_refunds(&self, payment_intent: &str) -> Result<Vec<Value>, ProviderError> {
        self.enter("list_refunds")?;
        let data = self.data.lock().expect("provider mutex poisoned");
        Ok(data
            .refunds
            .get(payment_intent)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_refund(&self, payment_intent: &str) -> Result<Value, ProviderError> {
        self.enter("create_refund")?;
        let refund = json!({"id": "re_new", "payment_intent": payment_intent, "status": "succeeded"});
        self.data
            .lock()
            .expect("provider mutex poisoned")
            .refunds
            .entry(payment_intent.to_string())
            .or_default()
            .push(refund.clone());
        Ok(refund)
    }

    async fn token_fingerprint(&self, token_id: &str) -> Result<String, ProviderError> {
        self.enter("token_fingerprint")?;
        let data = self.data.lock().expect("provider mutex poisoned");
        data.tokens
            .get(token_id)
            .cloned()
            .ok_or_else(|| ProviderError::Upstream {
                status: 404,
                message: Some(format!("No such token: '{token_id}'")),
            })
    }

    async fn list_cards(&self, customer_id: &str) -> Result<CardList, ProviderError> {
        self.enter("list_cards")?;
        let data = self.data.lock().expect("provider mutex poisoned");
        let cards = data.cards.get(customer_id).cloned().unwrap_or_default();
        Ok(CardList {
            raw: json!({"object": "list", "data": cards}),
        })
    }

    async fn create_card(
        &self,
        customer_id: &str,
        source_id: &str,
    ) -> Result<Value, ProviderError> {
        self.enter("create_card")?;
        Ok(json!({"id": "card_new", "customer": customer_id, "source": source_id}))
    }

    async fn update_card(
        &self,
        customer_id: &str,
        card_id: &str,
        update: &CardUpdate,
    ) -> Result<Value, ProviderError> {
        self.enter("update_card")?;
        self.data
            .lock()
            .expect("provider mutex poisoned")
            .card_updates
            .push(update.clone());
        Ok(json!({"id": card_id, "customer": customer_id, "name": update.name}))
    }

    async fn delete_card(&self, customer_id: &str, card_id: &str) -> Result<Value, ProviderError> {
        self.enter("delete_card")?;
        Ok(json!({"id": card_id, "customer": customer_id, "deleted": true}))
    }

    async fn set_default_card(
        &self,
        customer_id: &str,
        card_id: &str,
    ) -> Result<Value, ProviderError> {
        self.enter("set_default_card")?;
        self.data
            .lock()
            .expect("provider mutex poisoned")
            .default_sources
            .insert(customer_id.to_string(), card_id.to_string());
        Ok(json!({"id": customer_id, "object": "customer", "default_source": card_id}))
    }
}
