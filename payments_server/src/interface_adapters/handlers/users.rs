use axum::extract::{Path, State};
use std::sync::Arc;

use crate::domain::entities::AccountView;
use crate::domain::errors::PaymentsError;
use crate::interface_adapters::envelope::ApiResponse;
use crate::interface_adapters::extract::{ActingAccount, JsonBody};
use crate::interface_adapters::handlers::Operation;
use crate::interface_adapters::protocol::{CreateAccountRequest, UpdateAccountRequest};
use crate::interface_adapters::state::AppState;
use crate::use_cases::accounts::{
    CreateAccountUseCase, DeleteAccountUseCase, GetAccountUseCase, UpdateAccountUseCase,
};

// A path id that is not an integer cannot name an account.
fn parse_account_id(raw: &str) -> Result<i64, PaymentsError> {
    raw.parse::<i64>().map_err(|_| PaymentsError::AccountNotFound)
}

// Registration is open: no acting account is required.
#[tracing::instrument(name = "create_account", skip_all)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<CreateAccountRequest>,
) -> ApiResponse {
    let use_case = CreateAccountUseCase {
        accounts: state.accounts.as_ref(),
        provider: state.provider.as_ref(),
        hasher: state.hasher.as_ref(),
    };

    match use_case.execute(payload).await {
        Ok(account) => {
            tracing::info!(account_id = account.id, "account created.");
            Operation::CreateAccount.succeeded_with(&AccountView::from(&account))
        }
        Err(err) => Operation::CreateAccount.failed(err),
    }
}

#[tracing::instrument(name = "get_account", skip_all, fields(account_id = acting.0, target = %id))]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    acting: ActingAccount,
    Path(id): Path<String>,
) -> ApiResponse {
    let use_case = GetAccountUseCase {
        accounts: state.accounts.as_ref(),
    };

    let result = match parse_account_id(&id) {
        Ok(id) => use_case.execute(id).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(account) => Operation::GetAccount.succeeded_with(&AccountView::from(&account)),
        Err(err) => Operation::GetAccount.failed(err),
    }
}

#[tracing::instrument(name = "update_account", skip_all, fields(account_id = acting.0, target = %id))]
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    acting: ActingAccount,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateAccountRequest>,
) -> ApiResponse {
    let use_case = UpdateAccountUseCase {
        accounts: state.accounts.as_ref(),
        provider: state.provider.as_ref(),
        hasher: state.hasher.as_ref(),
    };

    let result = match parse_account_id(&id) {
        Ok(id) => use_case.execute(id, payload).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(account) => Operation::UpdateAccount.succeeded_with(&AccountView::from(&account)),
        Err(err) => Operation::UpdateAccount.failed(err),
    }
}

#[tracing::instrument(name = "delete_account", skip_all, fields(account_id = acting.0, target = %id))]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    acting: ActingAccount,
    Path(id): Path<String>,
) -> ApiResponse {
    let use_case = DeleteAccountUseCase {
        accounts: state.accounts.as_ref(),
        provider: state.provider.as_ref(),
    };

    let result = match parse_account_id(&id) {
        Ok(id) => use_case.execute(id).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(()) => {
            tracing::info!("account deleted.");
            Operation::DeleteAccount.succeeded(None)
        }
        Err(err) => Operation::DeleteAccount.failed(err),
    }
}
