use tracing::warn;

use crate::domain::entities::Account;
use crate::domain::errors::PaymentsError;
use crate::domain::ports::{AccountStore, PaymentProvider};

// Load the acting account or fail with AccountNotFound.
pub async fn load_account<A>(accounts: &A, account_id: i64) -> Result<Account, PaymentsError>
where
    A: AccountStore + ?Sized,
{
    accounts
        .get(account_id)
        .await?
        .ok_or(PaymentsError::AccountNotFound)
}

// Linkage precondition for operations that must not create a customer.
pub fn linked_customer(account: &Account) -> Result<&str, PaymentsError> {
    account
        .customer_id
        .as_deref()
        .ok_or(PaymentsError::MissingCustomer)
}

// Get-or-create the provider customer for an account.
//
// The linkage is written with a single conditional update, so concurrent
// callers converge on one stored id. A caller whose customer lost the race
// deletes it again.
pub async fn ensure_customer<A, P>(
    accounts: &A,
    provider: &P,
    account: &Account,
) -> Result<String, PaymentsError>
where
    A: AccountStore + ?Sized,
    P: PaymentProvider + ?Sized,
{
    if let Some(customer_id) = &account.customer_id {
        return Ok(customer_id.clone());
    }

    let created = provider
        .create_customer(&account.customer_profile())
        .await?;

    let stored = match accounts.link_customer(account.id, &created).await {
        Ok(stored) => stored,
        Err(err) => {
            discard_customer(provider, &created).await;
            return Err(err.into());
        }
    };

    match stored {
        Some(stored) if stored == created => Ok(created),
        Some(stored) => {
            warn!(
                account_id = account.id,
                kept = %stored,
                discarded = %created,
                "customer linkage already set by a concurrent request"
            );
            discard_customer(provider, &created).await;
            Ok(stored)
        }
        None => {
            discard_customer(provider, &created).await;
            Err(PaymentsError::AccountNotFound)
        }
    }
}

// Best-effort removal of a provider customer nobody links to.
pub(crate) async fn discard_customer<P>(provider: &P, customer_id: &str)
where
    P: PaymentProvider + ?Sized,
{
    if let Err(err) = provider.delete_customer(customer_id).await {
        warn!(customer_id, error = %err, "failed to delete orphaned customer");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{
        FailureFlags, FakeProvider, RecordingAccounts, new_log, test_account,
    };

    #[tokio::test]
    async fn when_account_is_already_linked_then_no_customer_is_created() {
        let accounts = RecordingAccounts::new();
        let provider = FakeProvider::new();
        let account = test_account(1, Some("cus_existing"));
        accounts.seed(account.clone());

        let customer_id = ensure_customer(&accounts, &provider, &account)
            .await
            .expect("expected existing linkage");

        assert_eq!(customer_id, "cus_existing");
        assert_eq!(provider.call_count("create_customer"), 0);
    }

    #[tokio::test]
    async fn when_account_is_unlinked_then_customer_is_created_and_stored() {
        let accounts = RecordingAccounts::new();
        let provider = FakeProvider::new();
        let account = test_account(1, None);
        accounts.seed(account.clone());

        let customer_id = ensure_customer(&accounts, &provider, &account)
            .await
            .expect("expected new linkage");

        assert_eq!(customer_id, "cus_1");
        let stored = accounts.stored(1).expect("expected account");
        assert_eq!(stored.customer_id.as_deref(), Some("cus_1"));
        let profiles = provider.profiles();
        assert_eq!(profiles[0].1.name, "pilot1");
        assert_eq!(profiles[0].1.email.as_deref(), Some("pilot1@example.com"));
    }

    #[tokio::test]
    async fn when_concurrent_request_linked_first_then_its_customer_wins_and_ours_is_deleted() {
        let log = new_log();
        let accounts = RecordingAccounts::sharing(log.clone()).with_competing_link("cus_winner");
        let provider = FakeProvider::sharing(log);
        let account = test_account(1, None);
        accounts.seed(account.clone());

        let customer_id = ensure_customer(&accounts, &provider, &account)
            .await
            .expect("expected winning linkage");

        assert_eq!(customer_id, "cus_winner");
        assert_eq!(
            provider.calls(),
            vec![
                "provider.create_customer",
                "store.link_customer",
                "provider.delete_customer"
            ]
        );
    }

    #[tokio::test]
    async fn when_link_write_fails_then_created_customer_is_discarded() {
        let accounts = RecordingAccounts::new().with_failures(FailureFlags {
            link: true,
            ..Default::default()
        });
        let provider = FakeProvider::new();
        let account = test_account(1, None);
        accounts.seed(account.clone());

        let result = ensure_customer(&accounts, &provider, &account).await;

        assert!(matches!(result, Err(PaymentsError::Storage(_))));
        assert_eq!(provider.call_count("delete_customer"), 1);
    }

    #[tokio::test]
    async fn when_account_is_missing_then_load_reports_not_found() {
        let accounts = RecordingAccounts::new();

        let result = load_account(&accounts, 99).await;

        assert!(matches!(result, Err(PaymentsError::AccountNotFound)));
    }

    #[test]
    fn when_account_has_no_linkage_then_precondition_fails() {
        let account = test_account(1, None);

        assert!(matches!(
            linked_customer(&account),
            Err(PaymentsError::MissingCustomer)
        ));
    }
}
