use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{StatusCode, request::Parts},
};
use serde::de::DeserializeOwned;

use crate::domain::messages::{MALFORMED_BODY, NOT_AUTHENTICATED};
use crate::interface_adapters::envelope::ApiResponse;

// Header set by the authenticating gateway in front of this service.
pub const ACTING_ACCOUNT_HEADER: &str = "x-user-id";

// Id of the account a request runs on behalf of.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActingAccount(pub i64);

impl<S> FromRequestParts<S> for ActingAccount
where
    S: Send + Sync,
{
    type Rejection = ApiResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(ACTING_ACCOUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .map(ActingAccount)
            .ok_or_else(|| {
                ApiResponse::failure(NOT_AUTHENTICATED).with_status(StatusCode::UNAUTHORIZED)
            })
    }
}

// JSON body extractor that treats an empty body as `{}` and answers
// malformed input with the envelope instead of axum's plain-text rejection.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let malformed = || ApiResponse::failure(MALFORMED_BODY).with_status(StatusCode::BAD_REQUEST);

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| malformed())?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|_| malformed())
    }
}
