use crate::domain::entities::{Account, AccountChanges, CustomerProfile, NewAccount};
use crate::domain::errors::PaymentsError;
use crate::domain::messages::{PARAM_PASSWORD, PARAM_USERNAME};
use crate::domain::ports::{AccountStore, PasswordHasher, PaymentProvider};
use crate::interface_adapters::protocol::{CreateAccountRequest, UpdateAccountRequest};
use crate::use_cases::customer_link::{discard_customer, load_account};
use crate::use_cases::params::require_text;

const MAX_USERNAME_LEN: usize = 150;

fn validate_username(username: &str) -> Result<(), PaymentsError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if username.is_empty()
        || username.chars().count() > MAX_USERNAME_LEN
        || !username.chars().all(allowed)
    {
        return Err(PaymentsError::InvalidUsername);
    }
    Ok(())
}

fn hash_password<H>(hasher: &H, password: &str) -> Result<String, PaymentsError>
where
    H: PasswordHasher + ?Sized,
{
    hasher.hash(password).map_err(PaymentsError::Credentials)
}

// Registers an account together with its provider customer.
pub struct CreateAccountUseCase<'a, A: ?Sized, P: ?Sized, H: ?Sized> {
    pub accounts: &'a A,
    pub provider: &'a P,
    pub hasher: &'a H,
}

impl<A, P, H> CreateAccountUseCase<'_, A, P, H>
where
    A: AccountStore + ?Sized,
    P: PaymentProvider + ?Sized,
    H: PasswordHasher + ?Sized,
{
    pub async fn execute(&self, payload: CreateAccountRequest) -> Result<Account, PaymentsError> {
        let username = require_text(payload.username, PARAM_USERNAME)?;
        let password = require_text(payload.password, PARAM_PASSWORD)?;
        validate_username(&username)?;
        if self.accounts.username_taken(&username, None).await? {
            return Err(PaymentsError::UsernameTaken);
        }
        let password_hash = hash_password(self.hasher, &password)?;

        let mut account = NewAccount {
            username,
            first_name: payload.first_name.unwrap_or_default(),
            last_name: payload.last_name.unwrap_or_default(),
            email: payload.email.unwrap_or_default(),
            phone_number: payload.phone_number,
            password_hash,
            customer_id: None,
        };

        let profile = CustomerProfile {
            name: account.username.clone(),
            email: Some(account.email.clone()).filter(|email| !email.is_empty()),
            phone: account.phone_number.clone(),
        };
        let customer_id = self.provider.create_customer(&profile).await?;
        account.customer_id = Some(customer_id.clone());

        match self.accounts.insert(account).await {
            Ok(stored) => Ok(stored),
            Err(err) => {
                discard_customer(self.provider, &customer_id).await;
                Err(err.into())
            }
        }
    }
}

pub struct GetAccountUseCase<'a, A: ?Sized> {
    pub accounts: &'a A,
}

impl<A> GetAccountUseCase<'_, A>
where
    A: AccountStore + ?Sized,
{
    pub async fn execute(&self, account_id: i64) -> Result<Account, PaymentsError> {
        load_account(self.accounts, account_id).await
    }
}

// Partial update. A linked customer is synced before the local write.
pub struct UpdateAccountUseCase<'a, A: ?Sized, P: ?Sized, H: ?Sized> {
    pub accounts: &'a A,
    pub provider: &'a P,
    pub hasher: &'a H,
}

impl<A, P, H> UpdateAccountUseCase<'_, A, P, H>
where
    A: AccountStore + ?Sized,
    P: PaymentProvider + ?Sized,
    H: PasswordHasher + ?Sized,
{
    pub async fn execute(
        &self,
        account_id: i64,
        payload: UpdateAccountRequest,
    ) -> Result<Account, PaymentsError> {
        let account = load_account(self.accounts, account_id).await?;

        // Everything the local write could reject is checked before the provider sees it.
        if let Some(username) = &payload.username {
            validate_username(username)?;
            if self.accounts.username_taken(username, Some(account.id)).await? {
                return Err(PaymentsError::UsernameTaken);
            }
        }
        let password_hash = match payload.password.as_deref() {
            Some(password) if !password.is_empty() => Some(hash_password(self.hasher, password)?),
            _ => None,
        };

        if let Some(customer_id) = &account.customer_id {
            let email = payload.email.as_ref().unwrap_or(&account.email);
            let profile = CustomerProfile {
                name: payload
                    .username
                    .clone()
                    .unwrap_or_else(|| account.username.clone()),
                email: Some(email.clone()).filter(|email| !email.is_empty()),
                phone: payload
                    .phone_number
                    .clone()
                    .or_else(|| account.phone_number.clone()),
            };
            self.provider.modify_customer(customer_id, &profile).await?;
        }

        let changes = AccountChanges {
            username: payload.username,
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            phone_number: payload.phone_number,
            password_hash,
        };
        self.accounts
            .update(account.id, changes)
            .await?
            .ok_or(PaymentsError::AccountNotFound)
    }
}

// Deletes the local record first, then the provider customer if one is linked.
pub struct DeleteAccountUseCase<'a, A: ?Sized, P: ?Sized> {
    pub accounts: &'a A,
    pub provider: &'a P,
}

impl<A, P> DeleteAccountUseCase<'_, A, P>
where
    A: AccountStore + ?Sized,
    P: PaymentProvider + ?Sized,
{
    pub async fn execute(&self, account_id: i64) -> Result<(), PaymentsError> {
        let account = load_account(self.accounts, account_id).await?;

        if !self.accounts.remove(account.id).await? {
            return Err(PaymentsError::AccountNotFound);
        }
        if let Some(customer_id) = &account.customer_id {
            self.provider
                .delete_customer(customer_id)
                .await
                .inspect_err(|e| {
                    tracing::warn!(
                        account_id = account.id,
                        customer_id = %customer_id,
                        error = %e,
                        "account removed but its customer was not deleted"
                    );
                })?;
        }
        Ok(())
    }
}
