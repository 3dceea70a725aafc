use crate::interface_adapters::handlers::cards::{
    add_card, get_default_card, list_cards, remove_card, set_default_card, update_card,
};
use crate::interface_adapters::handlers::payments::{
    cancel_payment_intent, create_payment_intent, refund_payment_intent,
};
use crate::interface_adapters::handlers::users::{
    create_account, delete_account, get_account, update_account,
};
use crate::interface_adapters::handlers::webhook::receive_event;
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/create-payment-intent/", post(create_payment_intent))
        .route("/refund-payment-intent/", post(refund_payment_intent))
        .route("/cancel-payment-intent/", post(cancel_payment_intent))
        .route(
            "/card-manage/",
            get(list_cards)
                .post(add_card)
                .put(update_card)
                .delete(remove_card),
        )
        .route("/default-card/", get(get_default_card).post(set_default_card))
        .route("/webhook/", post(receive_event))
        .route("/users/list/", post(create_account))
        .route(
            "/users/details/{id}/",
            get(get_account).put(update_account).delete(delete_account),
        )
        .with_state(state)
}
