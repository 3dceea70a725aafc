use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::entities::{EventKind, WebhookEvent};
use crate::domain::errors::WebhookError;
use crate::domain::ports::{Clock, EventVerifier};

pub const DEFAULT_TOLERANCE_SECONDS: u64 = 300;

// Parsed `Stripe-Signature` header: `t=<unix>,v1=<hex>[,v1=<hex>...]`.
#[derive(Debug, PartialEq)]
struct SignatureHeader<'a> {
    timestamp: i64,
    signatures: Vec<&'a str>,
}

fn parse_signature_header(header: &str) -> Result<SignatureHeader<'_>, WebhookError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) if !value.is_empty() => signatures.push(value),
            _ => {}
        }
    }

    match timestamp {
        Some(timestamp) if !signatures.is_empty() => Ok(SignatureHeader {
            timestamp,
            signatures,
        }),
        _ => Err(WebhookError::InvalidSignature(
            "unable to extract timestamp and signatures from header".to_string(),
        )),
    }
}

// Verifies webhook deliveries with HMAC-SHA256 over `"{t}.{body}"`.
pub struct StripeSignatureVerifier<C> {
    secret: String,
    tolerance_seconds: u64,
    clock: C,
}

impl<C: Clock> StripeSignatureVerifier<C> {
    pub fn new(secret: impl Into<String>, clock: C) -> Self {
        Self {
            secret: secret.into(),
            tolerance_seconds: DEFAULT_TOLERANCE_SECONDS,
            clock,
        }
    }

    fn expected_signature(&self, timestamp: i64, payload: &[u8]) -> Result<String, WebhookError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.as_bytes())
            .map_err(|_| WebhookError::InvalidSignature("invalid signing secret".to_string()))?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn verify(&self, payload: &[u8], header: &str) -> Result<(), WebhookError> {
        let header = parse_signature_header(header)?;
        let expected = self.expected_signature(header.timestamp, payload)?;

        let matched = header
            .signatures
            .iter()
            .any(|candidate| bool::from(expected.as_bytes().ct_eq(candidate.as_bytes())));
        if !matched {
            return Err(WebhookError::InvalidSignature(
                "no signatures found matching the expected signature for payload".to_string(),
            ));
        }

        let now = i64::try_from(self.clock.now_epoch_seconds()).unwrap_or(i64::MAX);
        if now.abs_diff(header.timestamp) > self.tolerance_seconds {
            return Err(WebhookError::InvalidSignature(
                "timestamp outside the tolerance zone".to_string(),
            ));
        }
        Ok(())
    }
}

impl<C: Clock> EventVerifier for StripeSignatureVerifier<C> {
    fn construct_event(&self, payload: &[u8], signature: &str) -> Result<WebhookEvent, WebhookError> {
        self.verify(payload, signature)?;

        let body: Value = serde_json::from_slice(payload)
            .map_err(|err| WebhookError::MalformedPayload(err.to_string()))?;
        let id = body
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| WebhookError::MalformedPayload("event is missing id".to_string()))?;
        let kind = body
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| WebhookError::MalformedPayload("event is missing type".to_string()))?;
        let object = body
            .pointer("/data/object")
            .cloned()
            .ok_or_else(|| WebhookError::MalformedPayload("event is missing data.object".to_string()))?;

        Ok(WebhookEvent {
            id: id.to_string(),
            kind: EventKind::parse(kind),
            object,
        })
    }
}
