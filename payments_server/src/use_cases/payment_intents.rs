use rust_decimal::Decimal;
use serde_json::Value;

use crate::domain::entities::PaymentIntentDraft;
use crate::domain::errors::PaymentsError;
use crate::domain::messages::{PARAM_NO_COUNT, PARAM_PAYMENT_INTENT_ID};
use crate::domain::ports::{AccountStore, PaymentProvider};
use crate::domain::pricing::{DESCRIPTION, Pricing, default_shipping};
use crate::interface_adapters::protocol::{CreatePaymentIntentRequest, PaymentIntentRequest};
use crate::use_cases::customer_link::{ensure_customer, load_account};
use crate::use_cases::params::{require_count, require_id};

// Response returned by the create payment intent use case.
#[derive(Debug)]
pub struct CreatedPaymentIntent {
    pub amount: Decimal,
    pub client_secret: String,
    pub payment_intent: String,
}

// Opens a payment intent for N units on behalf of the acting account.
pub struct CreatePaymentIntentUseCase<'a, A: ?Sized, P: ?Sized> {
    pub accounts: &'a A,
    pub provider: &'a P,
    pub pricing: &'a Pricing,
}

impl<A, P> CreatePaymentIntentUseCase<'_, A, P>
where
    A: AccountStore + ?Sized,
    P: PaymentProvider + ?Sized,
{
    pub async fn execute(
        &self,
        account_id: i64,
        payload: CreatePaymentIntentRequest,
    ) -> Result<CreatedPaymentIntent, PaymentsError> {
        let count = require_count(payload.no_count.as_ref(), PARAM_NO_COUNT)?;
        let amount = self
            .pricing
            .total_amount(count)
            .ok_or(PaymentsError::InvalidParameter(PARAM_NO_COUNT))?;
        let amount_minor = self
            .pricing
            .to_minor_units(amount)
            .ok_or(PaymentsError::InvalidParameter(PARAM_NO_COUNT))?;

        let account = load_account(self.accounts, account_id).await?;
        let customer_id = ensure_customer(self.accounts, self.provider, &account).await?;

        let draft = PaymentIntentDraft {
            amount_minor,
            currency: self.pricing.currency,
            customer_id,
            receipt_email: account.customer_profile().email,
            shipping: default_shipping(),
            description: DESCRIPTION,
            account_id: account.id,
        };
        let intent = self.provider.create_payment_intent(&draft).await?;

        Ok(CreatedPaymentIntent {
            amount,
            client_secret: intent.client_secret,
            payment_intent: intent.id,
        })
    }
}

// Cancels an incomplete payment intent.
pub struct CancelPaymentIntentUseCase<'a, A: ?Sized, P: ?Sized> {
    pub accounts: &'a A,
    pub provider: &'a P,
}

impl<A, P> CancelPaymentIntentUseCase<'_, A, P>
where
    A: AccountStore + ?Sized,
    P: PaymentProvider + ?Sized,
{
    pub async fn execute(
        &self,
        account_id: i64,
        payload: PaymentIntentRequest,
    ) -> Result<Value, PaymentsError> {
        let payment_intent = require_id(payload.payment_intent, PARAM_PAYMENT_INTENT_ID)?;
        load_account(self.accounts, account_id).await?;

        Ok(self.provider.cancel_payment_intent(&payment_intent).await?)
    }
}
