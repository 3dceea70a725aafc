use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Serialize, Serializer};
use serde_json::Value;

// Outcome flag carried in every envelope body: 1 for success, 0 for failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvelopeStatus {
    Failure,
    Success,
}

impl EnvelopeStatus {
    pub fn code(self) -> u8 {
        match self {
            Self::Failure => 0,
            Self::Success => 1,
        }
    }
}

impl Serialize for EnvelopeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

// Uniform `{status, data, message}` response body.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub status: EnvelopeStatus,
    pub data: Option<Value>,
    pub message: String,
}

// Envelope plus the transport status it is sent with.
#[derive(Debug)]
pub struct ApiResponse {
    pub http_status: StatusCode,
    pub body: Envelope,
}

impl ApiResponse {
    pub fn success(data: Option<Value>, message: impl Into<String>) -> Self {
        build_envelope(EnvelopeStatus::Success, data, message, StatusCode::OK)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        build_envelope(EnvelopeStatus::Failure, None, message, StatusCode::OK)
    }

    pub fn with_status(mut self, http_status: StatusCode) -> Self {
        self.http_status = http_status;
        self
    }
}

pub fn build_envelope(
    status: EnvelopeStatus,
    data: Option<Value>,
    message: impl Into<String>,
    http_status: StatusCode,
) -> ApiResponse {
    ApiResponse {
        http_status,
        body: Envelope {
            status,
            data,
            message: message.into(),
        },
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.http_status, Json(self.body)).into_response()
    }
}
