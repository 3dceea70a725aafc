use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::domain::errors::PaymentsError;
use crate::domain::messages::{self, missing_param};
use crate::interface_adapters::envelope::ApiResponse;

pub mod cards;
pub mod payments;
pub mod users;
pub mod webhook;

// Endpoint operations. Each one owns its success message, failure message and
// success status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    CreatePaymentIntent,
    RefundPaymentIntent,
    CancelPaymentIntent,
    ListCards,
    AddCard,
    UpdateCard,
    RemoveCard,
    GetDefaultCard,
    SetDefaultCard,
    CreateAccount,
    GetAccount,
    UpdateAccount,
    DeleteAccount,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Self::CreatePaymentIntent => "create_payment_intent",
            Self::RefundPaymentIntent => "refund_payment_intent",
            Self::CancelPaymentIntent => "cancel_payment_intent",
            Self::ListCards => "list_cards",
            Self::AddCard => "add_card",
            Self::UpdateCard => "update_card",
            Self::RemoveCard => "remove_card",
            Self::GetDefaultCard => "get_default_card",
            Self::SetDefaultCard => "set_default_card",
            Self::CreateAccount => "create_account",
            Self::GetAccount => "get_account",
            Self::UpdateAccount => "update_account",
            Self::DeleteAccount => "delete_account",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Self::CreatePaymentIntent => messages::CREATE_PAYMENT_INTENT_SUCCESS,
            Self::RefundPaymentIntent => messages::CREATE_PAYMENT_REFUND_SUCCESS,
            Self::CancelPaymentIntent => messages::CANCEL_PAYMENT_INTENT_SUCCESS,
            Self::ListCards => messages::GET_ALL_CARD_SUCCESS,
            Self::AddCard => messages::CREATE_CARD_SUCCESS,
            Self::UpdateCard => messages::UPDATE_CARD_SUCCESS,
            Self::RemoveCard => messages::DELETE_CARD_SUCCESS,
            Self::GetDefaultCard => messages::DEFAULT_CARD_SUCCESS,
            Self::SetDefaultCard => messages::SET_DEFAULT_CARD_SUCCESS,
            Self::CreateAccount => messages::CREATE_USER_SUCCESS,
            Self::GetAccount => messages::GET_USER_SUCCESS,
            Self::UpdateAccount => messages::UPDATE_USER_SUCCESS,
            Self::DeleteAccount => messages::DELETE_USER_SUCCESS,
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Self::CreatePaymentIntent => messages::CREATE_PAYMENT_INTENT_FAIL,
            Self::RefundPaymentIntent => messages::CREATE_PAYMENT_REFUND_FAIL,
            Self::CancelPaymentIntent => messages::CANCEL_PAYMENT_INTENT_FAIL,
            Self::ListCards => messages::GET_ALL_CARD_FAIL,
            Self::AddCard => messages::CREATE_CARD_FAIL,
            Self::UpdateCard => messages::UPDATE_CARD_FAIL,
            Self::RemoveCard => messages::DELETE_CARD_FAIL,
            Self::GetDefaultCard => messages::DEFAULT_CARD_FAIL,
            Self::SetDefaultCard => messages::SET_DEFAULT_CARD_FAIL,
            Self::CreateAccount => messages::CREATE_USER_FAIL,
            Self::GetAccount => messages::GET_USER_FAIL,
            Self::UpdateAccount => messages::UPDATE_USER_FAIL,
            Self::DeleteAccount => messages::DELETE_USER_FAIL,
        }
    }

    pub fn success_status(self) -> StatusCode {
        match self {
            Self::CreatePaymentIntent | Self::CreateAccount | Self::UpdateAccount => {
                StatusCode::CREATED
            }
            _ => StatusCode::OK,
        }
    }

    pub fn succeeded(self, data: Option<Value>) -> ApiResponse {
        ApiResponse::success(data, self.success_message()).with_status(self.success_status())
    }

    // Serializes typed success data; a serialization error counts as a failure.
    pub fn succeeded_with<T: Serialize>(self, data: &T) -> ApiResponse {
        match serde_json::to_value(data) {
            Ok(value) => self.succeeded(Some(value)),
            Err(err) => self.unexpected(&err),
        }
    }

    // Maps a use-case error to the envelope the client sees.
    pub fn failed(self, err: PaymentsError) -> ApiResponse {
        match err {
            PaymentsError::MissingParameter(field) => {
                ApiResponse::failure(missing_param(field)).with_status(StatusCode::NOT_FOUND)
            }
            PaymentsError::MissingCustomer => ApiResponse::failure(messages::MISSING_CUSTOMER_ID)
                .with_status(StatusCode::NOT_FOUND),
            PaymentsError::AccountNotFound => ApiResponse::failure(messages::USER_DOES_NOT_EXIST)
                .with_status(StatusCode::NOT_FOUND),
            PaymentsError::AlreadyRefunded => ApiResponse::failure(messages::PAYMENT_ALREADY_REFUND),
            PaymentsError::CardAlreadyExists => ApiResponse::failure(messages::CARD_ALREADY_EXIST)
                .with_status(StatusCode::BAD_REQUEST),
            PaymentsError::InvalidUsername => ApiResponse::failure(messages::INVALID_USERNAME)
                .with_status(StatusCode::BAD_REQUEST),
            PaymentsError::UsernameTaken => ApiResponse::failure(messages::USERNAME_TAKEN)
                .with_status(StatusCode::BAD_REQUEST),
            PaymentsError::InvalidParameter(_)
            | PaymentsError::Provider(_)
            | PaymentsError::Storage(_)
            | PaymentsError::Credentials(_) => self.unexpected(&err),
        }
    }

    // Detail goes to the log only; the client gets the fixed failure message.
    fn unexpected(self, err: &dyn std::error::Error) -> ApiResponse {
        error!(operation = self.name(), error = %err, "operation failed");
        ApiResponse::failure(self.failure_message()).with_status(StatusCode::INTERNAL_SERVER_ERROR)
    }
}
