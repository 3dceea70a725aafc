use axum::extract::State;
use std::sync::Arc;

use crate::interface_adapters::envelope::ApiResponse;
use crate::interface_adapters::extract::{ActingAccount, JsonBody};
use crate::interface_adapters::handlers::Operation;
use crate::interface_adapters::protocol::{
    CreatePaymentIntentRequest, PaymentIntentCanceled, PaymentIntentCreated, PaymentIntentRequest,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::payment_intents::{CancelPaymentIntentUseCase, CreatePaymentIntentUseCase};
use crate::use_cases::refunds::RefundPaymentIntentUseCase;

#[tracing::instrument(name = "create_payment_intent", skip_all, fields(account_id = acting.0))]
pub async fn create_payment_intent(
    State(state): State<Arc<AppState>>,
    acting: ActingAccount,
    JsonBody(payload): JsonBody<CreatePaymentIntentRequest>,
) -> ApiResponse {
    let operation = Operation::CreatePaymentIntent;
    let use_case = CreatePaymentIntentUseCase {
        accounts: state.accounts.as_ref(),
        provider: state.provider.as_ref(),
        pricing: &state.pricing,
    };

    match use_case.execute(acting.0, payload).await {
        Ok(created) => {
            tracing::info!(payment_intent = %created.payment_intent, "payment intent created.");
            operation.succeeded_with(&PaymentIntentCreated {
                amount: created.amount,
                client_secret: created.client_secret,
                payment_intent: created.payment_intent,
                stripe_public_key: state.publishable_key.clone(),
            })
        }
        Err(err) => operation.failed(err),
    }
}

#[tracing::instrument(name = "refund_payment_intent", skip_all, fields(account_id = acting.0))]
pub async fn refund_payment_intent(
    State(state): State<Arc<AppState>>,
    acting: ActingAccount,
    JsonBody(payload): JsonBody<PaymentIntentRequest>,
) -> ApiResponse {
    let operation = Operation::RefundPaymentIntent;
    let use_case = RefundPaymentIntentUseCase {
        accounts: state.accounts.as_ref(),
        provider: state.provider.as_ref(),
    };

    match use_case.execute(acting.0, payload).await {
        Ok(refund) => operation.succeeded(Some(refund)),
        Err(err) => operation.failed(err),
    }
}

#[tracing::instrument(name = "cancel_payment_intent", skip_all, fields(account_id = acting.0))]
pub async fn cancel_payment_intent(
    State(state): State<Arc<AppState>>,
    acting: ActingAccount,
    JsonBody(payload): JsonBody<PaymentIntentRequest>,
) -> ApiResponse {
    let operation = Operation::CancelPaymentIntent;
    let use_case = CancelPaymentIntentUseCase {
        accounts: state.accounts.as_ref(),
        provider: state.provider.as_ref(),
    };

    match use_case.execute(acting.0, payload).await {
        Ok(intent) => operation.succeeded_with(&PaymentIntentCanceled {
            cancel_intent: intent,
        }),
        Err(err) => operation.failed(err),
    }
}
