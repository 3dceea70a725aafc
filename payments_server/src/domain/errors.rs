use thiserror::Error;

// Outcome taxonomy shared by all use cases.
#[derive(Debug, Error)]
pub enum PaymentsError {
    #[error("missing required parameter {0}")]
    MissingParameter(&'static str),
    #[error("invalid value for parameter {0}")]
    InvalidParameter(&'static str),
    #[error("account has no linked customer")]
    MissingCustomer,
    #[error("account does not exist")]
    AccountNotFound,
    #[error("payment intent already refunded")]
    AlreadyRefunded,
    #[error("card fingerprint already stored for customer")]
    CardAlreadyExists,
    #[error("invalid username")]
    InvalidUsername,
    #[error("username already taken")]
    UsernameTaken,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("credential hashing failed: {0}")]
    Credentials(String),
}

// Failures reported by the payment provider adapter.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider transport error: {0}")]
    Transport(String),
    #[error("provider returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Upstream {
        status: u16,
        message: Option<String>,
    },
    #[error("provider response decode error: {0}")]
    Decode(String),
}

// Failures reported by the account store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already taken")]
    UsernameTaken,
    #[error("account store backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for PaymentsError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UsernameTaken => PaymentsError::UsernameTaken,
            StoreError::Backend(message) => PaymentsError::Storage(message),
        }
    }
}

// Webhook rejection reasons. All of them answer a bare 400.
#[derive(Debug, Error, PartialEq)]
pub enum WebhookError {
    #[error("missing signature header")]
    MissingSignature,
    #[error("malformed webhook payload: {0}")]
    MalformedPayload(String),
    #[error("webhook signature verification failed: {0}")]
    InvalidSignature(String),
    #[error("webhook event handler failed: {0}")]
    HandlerFailed(String),
}
