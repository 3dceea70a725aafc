use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

// Local account record, including the linkage to the provider customer.
#[derive(Clone, Debug, PartialEq)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub customer_id: Option<String>,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}

impl Account {
    // Profile pushed to the provider when the customer record is created or synced.
    pub fn customer_profile(&self) -> CustomerProfile {
        CustomerProfile {
            name: self.username.clone(),
            email: non_empty(&self.email),
            phone: self.phone_number.clone(),
        }
    }
}

// Public representation of an account. Credentials and linkage stay private.
#[derive(Clone, Debug, Serialize)]
pub struct AccountView {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            username: account.username.clone(),
            email: account.email.clone(),
            phone_number: account.phone_number.clone(),
            created_on: account.created_on,
            modified_on: account.modified_on,
        }
    }
}

// Account data for insertion; the store assigns id and timestamps.
#[derive(Clone, Debug)]
pub struct NewAccount {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub customer_id: Option<String>,
}

// Partial update. `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default)]
pub struct AccountChanges {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub password_hash: Option<String>,
}

// Customer fields mirrored on the provider side.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomerProfile {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShippingAddress {
    pub line1: &'static str,
    pub postal_code: &'static str,
    pub city: &'static str,
    pub state: &'static str,
    pub country: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShippingDetails {
    pub name: &'static str,
    pub address: ShippingAddress,
}

// Everything the provider needs to open a payment intent.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentIntentDraft {
    pub amount_minor: i64,
    pub currency: &'static str,
    pub customer_id: String,
    pub receipt_email: Option<String>,
    pub shipping: ShippingDetails,
    pub description: &'static str,
    pub account_id: i64,
}

// Subset of the provider's payment intent the API hands back to clients.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

// Card-list object as returned by the provider, kept verbatim for the response.
#[derive(Clone, Debug, PartialEq)]
pub struct CardList {
    pub raw: Value,
}

impl CardList {
    pub fn fingerprints(&self) -> impl Iterator<Item = &str> {
        self.raw
            .get("data")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|card| card.get("fingerprint").and_then(Value::as_str))
    }

    pub fn contains_fingerprint(&self, fingerprint: &str) -> bool {
        self.fingerprints().any(|stored| stored == fingerprint)
    }
}

// Card fields a holder may change. Absent fields are not sent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardUpdate {
    pub name: Option<String>,
    pub exp_month: Option<String>,
    pub exp_year: Option<String>,
}

// Event types the webhook endpoint branches on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    PaymentIntentSucceeded,
    PaymentIntentFailed,
    ChargeRefunded,
    ChargeRefundUpdated,
    Other(String),
}

impl EventKind {
    pub fn parse(value: &str) -> Self {
        match value {
            "payment_intent.succeeded" => Self::PaymentIntentSucceeded,
            "payment_intent.payment_failed" => Self::PaymentIntentFailed,
            "charge.refunded" => Self::ChargeRefunded,
            "charge.refund.updated" => Self::ChargeRefundUpdated,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::PaymentIntentSucceeded => "payment_intent.succeeded",
            Self::PaymentIntentFailed => "payment_intent.payment_failed",
            Self::ChargeRefunded => "charge.refunded",
            Self::ChargeRefundUpdated => "charge.refund.updated",
            Self::Other(value) => value,
        }
    }
}

// Verified provider event.
#[derive(Clone, Debug, PartialEq)]
pub struct WebhookEvent {
    pub id: String,
    pub kind: EventKind,
    pub object: Value,
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
