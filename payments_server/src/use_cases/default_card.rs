use serde_json::Value;

use crate::domain::errors::PaymentsError;
use crate::domain::messages::PARAM_CARD_ID;
use crate::domain::ports::{AccountStore, PaymentProvider};
use crate::interface_adapters::protocol::CardRequest;
use crate::use_cases::customer_link::{linked_customer, load_account};
use crate::use_cases::params::require_id;

pub struct GetDefaultCardUseCase<'a, A: ?Sized, P: ?Sized> {
    pub accounts: &'a A,
    pub provider: &'a P,
}

impl<A, P> GetDefaultCardUseCase<'_, A, P>
where
    A: AccountStore + ?Sized,
    P: PaymentProvider + ?Sized,
{
    // Returns the customer's `default_source`, which may be null.
    pub async fn execute(&self, account_id: i64) -> Result<Value, PaymentsError> {
        let account = load_account(self.accounts, account_id).await?;
        let customer_id = linked_customer(&account)?;

        let customer = self.provider.retrieve_customer(customer_id).await?;
        Ok(customer.get("default_source").cloned().unwrap_or(Value::Null))
    }
}

pub struct SetDefaultCardUseCase<'a, A: ?Sized, P: ?Sized> {
    pub accounts: &'a A,
    pub provider: &'a P,
}

impl<A, P> SetDefaultCardUseCase<'_, A, P>
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

        Ok(self
            .provider
            .set_default_card(customer_id, &card_id)
            .await?)
    }
}
