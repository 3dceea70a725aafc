use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Request bodies. Every field is optional so presence checks produce the
// envelope's missing-parameter message instead of a deserializer rejection.

// Request payload for payment intent creation.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePaymentIntentRequest {
    // Unit count; accepted as a number or numeric string.
    pub no_count: Option<Value>,
}

// Identifier fields take any JSON scalar; non-strings are sent as their text.

// Request payload for refund and cancel.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentIntentRequest {
    pub payment_intent: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddCardRequest {
    pub source_id: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCardRequest {
    pub card_id: Option<Value>,
    pub name: Option<String>,
    pub exp_month: Option<Value>,
    pub exp_year: Option<Value>,
}

// Request payload for card deletion and default card selection.
#[derive(Debug, Default, Deserialize)]
pub struct CardRequest {
    pub card_id: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateAccountRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

// Envelope data for a new payment intent.
#[derive(Debug, Serialize)]
pub struct PaymentIntentCreated {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
    pub payment_intent: String,
    pub stripe_public_key: String,
}

// Envelope data for a canceled payment intent.
#[derive(Debug, Serialize)]
pub struct PaymentIntentCanceled {
    pub cancel_intent: Value,
}
