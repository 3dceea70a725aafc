use serde_json::Value;

use crate::domain::entities::CardUpdate;
use crate::domain::errors::PaymentsError;
use crate::domain::messages::{PARAM_CARD_ID, PARAM_SOURCE_ID};
use crate::domain::ports::{AccountStore, PaymentProvider};
use crate::interface_adapters::protocol::{AddCardRequest, CardRequest, UpdateCardRequest};
use crate::use_cases::customer_link::{ensure_customer, linked_customer, load_account};
use crate::use_cases::params::{optional_text, require_id};

// Lists the cards stored for the acting account's customer.
pub struct ListCardsUseCase<'a, A: ?Sized, P: ?Sized> {
    pub accounts: &'a A,
    pub provider: &'a P,
}

impl<A, P> ListCardsUseCase<'_, A, P>
where
    A: AccountStore + ?Sized,
    P: PaymentProvider + ?Sized,
{
    pub async fn execute(&self, account_id: i64) -> Result<Value, PaymentsError> {
        let account = load_account(self.accounts, account_id).await?;
        let customer_id = linked_customer(&account)?;

        let cards = self.provider.list_cards(customer_id).await?;
        Ok(cards.raw)
    }
}

// Attaches a tokenized card unless a card with the same fingerprint exists.
pub struct AddCardUseCase<'a, A: ?Sized, P: ?Sized> {
    pub accounts: &'a A,
    pub provider: &'a P,
}

impl<A, P> AddCardUseCase<'_, A, P>
where
    A: AccountStore + ?Sized,
    P: PaymentProvider + ?Sized,
{
    pub async fn execute(
        &self,
        account_id: i64,
        payload: AddCardRequest,
    ) -> Result<Value, PaymentsError> {
        let source_id = require_id(payload.source_id, PARAM_SOURCE_ID)?;
        let account = load_account(self.accounts, account_id).await?;
        let customer_id = ensure_customer(self.accounts, self.provider, &account).await?;

        let fingerprint = self.provider.token_fingerprint(&source_id).await?;
        let existing = self.provider.list_cards(&customer_id).await?;
        if existing.contains_fingerprint(&fingerprint) {
            return Err(PaymentsError::CardAlreadyExists);
        }

        Ok(self.provider.create_card(&customer_id, &source_id).await?)
    }
}

// Changes holder name and expiry of a stored card.
pub struct UpdateCardUseCase<'a, A: ?Sized, P: ?Sized> {
    pub accounts: &'a A,
    pub provider: &'a P,
}

impl<A, P> UpdateCardUseCase<'_, A, P>
where
    A: AccountStore + ?Sized,
    P: PaymentProvider + ?Sized,
{
    pub async fn execute(
        &self,
        account_id: i64,
        payload: UpdateCardRequest,
    ) -> Result<Value, PaymentsError> {
        let card_id = require_id(payload.card_id, PARAM_CARD_ID)?;
        let account = load_account(self.accounts, account_id).await?;
        let customer_id = linked_customer(&account)?;

        let update = CardUpdate {
            name: payload.name,
            exp_month: optional_text(payload.exp_month),
            exp_year: optional_text(payload.exp_year),
        };
        Ok(self
            .provider
            .update_card(customer_id, &card_id, &update)
            .await?)
    }
}

// Detaches a stored card.
pub struct RemoveCardUseCase<'a, A: ?Sized, P: ?Sized> {
    pub accounts: &'a A,
    pub provider: &'a P,
}

impl<A, P> RemoveCardUseCase<'_, A, P>
where
    A: AccountStore + ?Sized,
    P: PaymentProvider + ?Sized,
{
    pub async fn execute(
        &self,
        account_id: i64,
        payload: CardRequest,
    ) -> Result<Value, PaymentsError> {
        let card_id = require_id(payload.card_id, PARAM_CARD_ID)?;
        let account = load_account(self.accounts, account_id).await?;
        let customer_id = linked_customer(&account)?;

        Ok(self.provider.delete_card(customer_id, &card_id).await?)
    }
}
