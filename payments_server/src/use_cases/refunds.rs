use serde_json::Value;

use crate::domain::errors::PaymentsError;
use crate::domain::messages::PARAM_PAYMENT_INTENT_ID;
use crate::domain::ports::{AccountStore, PaymentProvider};
use crate::interface_adapters::protocol::PaymentIntentRequest;
use crate::use_cases::customer_link::load_account;
use crate::use_cases::params::require_id;

// Refunds a payment intent once; later calls report AlreadyRefunded.
pub struct RefundPaymentIntentUseCase<'a, A: ?Sized, P: ?Sized> {
    pub accounts: &'a A,
    pub provider: &'a P,
}

impl<A, P> RefundPaymentIntentUseCase<'_, A, P>
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

        let existing = self.provider.list_refunds(&payment_intent).await?;
        if !existing.is_empty() {
            return Err(PaymentsError::AlreadyRefunded);
        }

        Ok(self.provider.create_refund(&payment_intent).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{FakeProvider, RecordingAccounts, test_account};

    fn seeded_accounts() -> RecordingAccounts {
        let accounts = RecordingAccounts::new();
        accounts.seed(test_account(1, Some("cus_1")));
        accounts
    }

    fn request(payment_intent: &str) -> PaymentIntentRequest {
        PaymentIntentRequest {
            payment_intent: Some(payment_intent.into()),
        }
    }

    #[tokio::test]
    async fn when_refunding_twice_then_second_call_reports_already_refunded() {
        let provider = FakeProvider::new();
        let accounts = seeded_accounts();
        let use_case = RefundPaymentIntentUseCase {
            accounts: &accounts,
            provider: &provider,
        };

        let first = use_case
            .execute(1, request("pi_1"))
            .await
            .expect("expected first refund to succeed");
        let second = use_case.execute(1, request("pi_1")).await;

        assert_eq!(first["payment_intent"], "pi_1");
        assert!(matches!(second, Err(PaymentsError::AlreadyRefunded)));
        assert_eq!(provider.call_count("create_refund"), 1);
        assert_eq!(provider.call_count("list_refunds"), 2);
    }

    #[tokio::test]
    async fn when_intent_already_has_refund_then_no_refund_is_created() {
        let provider = FakeProvider::new().with_refund("pi_7");
        let accounts = seeded_accounts();
        let use_case = RefundPaymentIntentUseCase {
            accounts: &accounts,
            provider: &provider,
        };

        let result = use_case.execute(1, request("pi_7")).await;

        assert!(matches!(result, Err(PaymentsError::AlreadyRefunded)));
        assert_eq!(provider.call_count("create_refund"), 0);
    }

    #[tokio::test]
    async fn when_payment_intent_is_missing_then_provider_is_not_called() {
        let provider = FakeProvider::new();
        let accounts = seeded_accounts();
        let use_case = RefundPaymentIntentUseCase {
            accounts: &accounts,
            provider: &provider,
        };

        let result = use_case.execute(1, PaymentIntentRequest::default()).await;

        assert!(matches!(
            result,
            Err(PaymentsError::MissingParameter("payment_intent"))
        ));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn when_refund_listing_fails_then_provider_error_is_returned() {
        let provider = FakeProvider::new().failing("list_refunds");
        let accounts = seeded_accounts();
        let use_case = RefundPaymentIntentUseCase {
            accounts: &accounts,
            provider: &provider,
        };

        let result = use_case.execute(1, request("pi_1")).await;

        assert!(matches!(result, Err(PaymentsError::Provider(_))));
        assert_eq!(provider.call_count("create_refund"), 0);
    }

    #[tokio::test]
    async fn when_acting_account_is_unknown_then_provider_is_not_called() {
        let provider = FakeProvider::new();
        let accounts = RecordingAccounts::new();
        let use_case = RefundPaymentIntentUseCase {
            accounts: &accounts,
            provider: &provider,
        };

        let result = use_case.execute(7, request("pi_1")).await;

        assert!(matches!(result, Err(PaymentsError::AccountNotFound)));
        assert!(provider.calls().is_empty());
    }
}
