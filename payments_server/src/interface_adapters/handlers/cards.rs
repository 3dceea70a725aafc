use axum::extract::State;
use std::sync::Arc;

use crate::interface_adapters::envelope::ApiResponse;
use crate::interface_adapters::extract::{ActingAccount, JsonBody};
use crate::interface_adapters::handlers::Operation;
use crate::interface_adapters::protocol::{AddCardRequest, CardRequest, UpdateCardRequest};
use crate::interface_adapters::state::AppState;
use crate::use_cases::cards::{
    AddCardUseCase, ListCardsUseCase, RemoveCardUseCase, UpdateCardUseCase,
};
use crate::use_cases::default_card::{GetDefaultCardUseCase, SetDefaultCardUseCase};

#[tracing::instrument(name = "list_cards", skip_all, fields(account_id = acting.0))]
pub async fn list_cards(State(state): State<Arc<AppState>>, acting: ActingAccount) -> ApiResponse {
    let use_case = ListCardsUseCase {
        accounts: state.accounts.as_ref(),
        provider: state.provider.as_ref(),
    };

    match use_case.execute(acting.0).await {
        Ok(cards) => Operation::ListCards.succeeded(Some(cards)),
        Err(err) => Operation::ListCards.failed(err),
    }
}

#[tracing::instrument(name = "add_card", skip_all, fields(account_id = acting.0))]
pub async fn add_card(
    State(state): State<Arc<AppState>>,
    acting: ActingAccount,
    JsonBody(payload): JsonBody<AddCardRequest>,
) -> ApiResponse {
    let use_case = AddCardUseCase {
        accounts: state.accounts.as_ref(),
        provider: state.provider.as_ref(),
    };

    match use_case.execute(acting.0, payload).await {
        Ok(card) => {
            tracing::info!("card created.");
            Operation::AddCard.succeeded(Some(card))
        }
        Err(err) => Operation::AddCard.failed(err),
    }
}

#[tracing::instrument(name = "update_card", skip_all, fields(account_id = acting.0))]
pub async fn update_card(
    State(state): State<Arc<AppState>>,
    acting: ActingAccount,
    JsonBody(payload): JsonBody<UpdateCardRequest>,
) -> ApiResponse {
    let use_case = UpdateCardUseCase {
        accounts: state.accounts.as_ref(),
        provider: state.provider.as_ref(),
    };

    match use_case.execute(acting.0, payload).await {
        Ok(card) => Operation::UpdateCard.succeeded(Some(card)),
        Err(err) => Operation::UpdateCard.failed(err),
    }
}

#[tracing::instrument(name = "remove_card", skip_all, fields(account_id = acting.0))]
pub async fn remove_card(
    State(state): State<Arc<AppState>>,
    acting: ActingAccount,
    JsonBody(payload): JsonBody<CardRequest>,
) -> ApiResponse {
    let use_case = RemoveCardUseCase {
        accounts: state.accounts.as_ref(),
        provider: state.provider.as_ref(),
    };

    match use_case.execute(acting.0, payload).await {
        Ok(deleted) => Operation::RemoveCard.succeeded(Some(deleted)),
        Err(err) => Operation::RemoveCard.failed(err),
    }
}

#[tracing::instrument(name = "get_default_card", skip_all, fields(account_id = acting.0))]
pub async fn get_default_card(
    State(state): State<Arc<AppState>>,
    acting: ActingAccount,
) -> ApiResponse {
    let use_case = GetDefaultCardUseCase {
        accounts: state.accounts.as_ref(),
        provider: state.provider.as_ref(),
    };

    match use_case.execute(acting.0).await {
        Ok(default_source) => Operation::GetDefaultCard.succeeded(Some(default_source)),
        Err(err) => Operation::GetDefaultCard.failed(err),
    }
}

#[tracing::instrument(name = "set_default_card", skip_all, fields(account_id = acting.0))]
pub async fn set_default_card(
    State(state): State<Arc<AppState>>,
    acting: ActingAccount,
    JsonBody(payload): JsonBody<CardRequest>,
) -> ApiResponse {
    let use_case = SetDefaultCardUseCase {
        accounts: state.accounts.as_ref(),
        provider: state.provider.as_ref(),
    };

    match use_case.execute(acting.0, payload).await {
        Ok(customer) => Operation::SetDefaultCard.succeeded(Some(customer)),
        Err(err) => Operation::SetDefaultCard.failed(err),
    }
}
