use async_trait::async_trait;
use reqwest::{Method, header::CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::{Url, form_urlencoded};
use uuid::Uuid;

use crate::domain::entities::{
    CardList, CardUpdate, CustomerProfile, PaymentIntent, PaymentIntentDraft,
};
use crate::domain::errors::ProviderError;
use crate::domain::ports::PaymentProvider;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

#[derive(Debug, Error)]
pub enum StripeClientError {
    #[error("invalid provider base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    message: Option<String>,
}

// Form fields for a single request, in the order they are sent.
type Form<'a> = Vec<(&'a str, String)>;

// Thin reqwest client for the Stripe REST API: bearer key auth, form-encoded
// bodies, idempotency keys on creates.
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    base_url: Url,
    secret_key: String,
}

impl StripeClient {
    pub fn new(
        base_url: &str,
        secret_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StripeClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            secret_key: secret_key.into(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Transport("base url cannot hold a path".to_string()))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Value, ProviderError> {
        let mut url = self.endpoint(segments)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        self.send(Method::GET, url, None, false).await
    }

    async fn post(&self, segments: &[&str], form: Form<'_>) -> Result<Value, ProviderError> {
        let url = self.endpoint(segments)?;
        self.send(Method::POST, url, Some(form), false).await
    }

    async fn create(&self, segments: &[&str], form: Form<'_>) -> Result<Value, ProviderError> {
        let url = self.endpoint(segments)?;
        self.send(Method::POST, url, Some(form), true).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<Value, ProviderError> {
        let url = self.endpoint(segments)?;
        self.send(Method::DELETE, url, None, false).await
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        form: Option<Form<'_>>,
        idempotent: bool,
    ) -> Result<Value, ProviderError> {
        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(&self.secret_key);
        if let Some(form) = form {
            request = request
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(encode_form(&form));
        }
        if idempotent {
            request = request.header("Idempotency-Key", Uuid::new_v4().to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;
        let status = response.status();

        // Keep upstream status and message for the server-side log.
        if !status.is_success() {
            let message = response
                .json::<StripeErrorResponse>()
                .await
                .ok()
                .and_then(|payload| payload.error.message);
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| ProviderError::Decode(err.to_string()))
    }
}

fn encode_form(form: &[(&str, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

fn profile_form(profile: &CustomerProfile) -> Form<'static> {
    let mut form = vec![("name", profile.name.clone())];
    if let Some(email) = &profile.email {
        form.push(("email", email.clone()));
    }
    if let Some(phone) = &profile.phone {
        form.push(("phone", phone.clone()));
    }
    form
}

fn intent_form(draft: &PaymentIntentDraft) -> Form<'static> {
    let shipping = &draft.shipping;
    let mut form = vec![
        ("amount", draft.amount_minor.to_string()),
        ("currency", draft.currency.to_string()),
        ("customer", draft.customer_id.clone()),
        ("shipping[name]", shipping.name.to_string()),
        ("shipping[address][line1]", shipping.address.line1.to_string()),
        (
            "shipping[address][postal_code]",
            shipping.address.postal_code.to_string(),
        ),
        ("shipping[address][city]", shipping.address.city.to_string()),
        ("shipping[address][state]", shipping.address.state.to_string()),
        ("shipping[address][country]", shipping.address.country.to_string()),
        ("description", draft.description.to_string()),
        ("metadata[user_id]", draft.account_id.to_string()),
    ];
    if let Some(email) = &draft.receipt_email {
        form.push(("receipt_email", email.clone()));
    }
    form
}

fn card_update_form(update: &CardUpdate) -> Form<'static> {
    [
        ("name", &update.name),
        ("exp_month", &update.exp_month),
        ("exp_year", &update.exp_year),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.clone().map(|value| (key, value)))
    .collect()
}

fn text_at(value: &Value, pointer: &str) -> Result<String, ProviderError> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ProviderError::Decode(format!("response is missing {pointer}")))
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_customer(&self, profile: &CustomerProfile) -> Result<String, ProviderError> {
        let customer = self.create(&["customers"], profile_form(profile)).await?;
        text_at(&customer, "/id")
    }

    async fn retrieve_customer(&self, customer_id: &str) -> Result<Value, ProviderError> {
        self.get(&["customers", customer_id], &[]).await
    }

    async fn modify_customer(
        &self,
        customer_id: &str,
        profile: &CustomerProfile,
    ) -> Result<Value, ProviderError> {
        self.post(&["customers", customer_id], profile_form(profile))
            .await
    }

    async fn delete_customer(&self, customer_id: &str) -> Result<Value, ProviderError> {
        self.delete(&["customers", customer_id]).await
    }

    async fn create_payment_intent(
        &self,
        draft: &PaymentIntentDraft,
    ) -> Result<PaymentIntent, ProviderError> {
        let intent = self.create(&["payment_intents"], intent_form(draft)).await?;
        Ok(PaymentIntent {
            id: text_at(&intent, "/id")?,
            client_secret: text_at(&intent, "/client_secret")?,
        })
    }

    async fn cancel_payment_intent(&self, payment_intent: &str) -> Result<Value, ProviderError> {
        self.post(&["payment_intents", payment_intent, "cancel"], Vec::new())
            .await
    }

    async fn list_refunds(&self, payment_intent: &str) -> Result<Vec<Value>, ProviderError> {
        let list = self
            .get(&["refunds"], &[("payment_intent", payment_intent)])
            .await?;
        list.get("data")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| ProviderError::Decode("refund list is missing data".to_string()))
    }

    async fn create_refund(&self, payment_intent: &str) -> Result<Value, ProviderError> {
        self.create(&["refunds"], vec![("payment_intent", payment_intent.to_string())])
            .await
    }

    async fn token_fingerprint(&self, token_id: &str) -> Result<String, ProviderError> {
        let token = self.get(&["tokens", token_id], &[]).await?;
        text_at(&token, "/card/fingerprint")
    }

    async fn list_cards(&self, customer_id: &str) -> Result<CardList, ProviderError> {
        let raw = self
            .get(&["customers", customer_id, "sources"], &[("object", "card")])
            .await?;
        Ok(CardList { raw })
    }

    async fn create_card(
        &self,
        customer_id: &str,
        source_id: &str,
    ) -> Result<Value, ProviderError> {
        self.create(
            &["customers", customer_id, "sources"],
            vec![("source", source_id.to_string())],
        )
        .await
    }

    async fn update_card(
        &self,
        customer_id: &str,
        card_id: &str,
        update: &CardUpdate,
    ) -> Result<Value, ProviderError> {
        self.post(
            &["customers", customer_id, "sources", card_id],
            card_update_form(update),
        )
        .await
    }

    async fn delete_card(&self, customer_id: &str, card_id: &str) -> Result<Value, ProviderError> {
        self.delete(&["customers", customer_id, "sources", card_id])
            .await
    }

    async fn set_default_card(
        &self,
        customer_id: &str,
        card_id: &str,
    ) -> Result<Value, ProviderError> {
        self.post(
            &["customers", customer_id],
            vec![("default_source", card_id.to_string())],
        )
        .await
    }
}
