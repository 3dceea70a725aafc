use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::{Account, AccountChanges, NewAccount};
use crate::domain::errors::StoreError;
use crate::domain::ports::AccountStore;

#[derive(Default)]
struct InMemoryAccounts {
    next_id: i64,
    by_id: HashMap<i64, Account>,
}

// In-memory account store for local development and tests.
#[derive(Clone, Default)]
pub struct InMemoryAccountStore {
    inner: Arc<Mutex<InMemoryAccounts>>,
}

fn apply_changes(account: &mut Account, changes: AccountChanges) {
    if let Some(username) = changes.username {
        account.username = username;
    }
    if let Some(first_name) = changes.first_name {
        account.first_name = first_name;
    }
    if let Some(last_name) = changes.last_name {
        account.last_name = last_name;
    }
    if let Some(email) = changes.email {
        account.email = email;
    }
    if let Some(phone_number) = changes.phone_number {
        account.phone_number = Some(phone_number);
    }
    if let Some(password_hash) = changes.password_hash {
        account.password_hash = password_hash;
    }
}

impl InMemoryAccounts {
    fn holds_username(&self, username: &str, except_id: Option<i64>) -> bool {
        self.by_id
            .values()
            .any(|stored| Some(stored.id) != except_id && stored.username == username)
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.holds_username(&account.username, None) {
            return Err(StoreError::UsernameTaken);
        }

        inner.next_id += 1;
        let now = Utc::now();
        let stored = Account {
            id: inner.next_id,
            username: account.username,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            phone_number: account.phone_number,
            password_hash: account.password_hash,
            customer_id: account.customer_id,
            created_on: now,
            modified_on: now,
        };
        inner.by_id.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.by_id.get(&id).cloned())
    }

    async fn update(
        &self,
        id: i64,
        changes: AccountChanges,
    ) -> Result<Option<Account>, StoreError> {
        let mut inner = self.inner.lock().await;
        if let Some(username) = &changes.username {
            if inner.holds_username(username, Some(id)) {
                return Err(StoreError::UsernameTaken);
            }
        }

        let Some(account) = inner.by_id.get_mut(&id) else {
            return Ok(None);
        };
        apply_changes(account, changes);
        account.modified_on = Utc::now();
        Ok(Some(account.clone()))
    }

    async fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().await;
        Ok(inner.by_id.remove(&id).is_some())
    }

    async fn username_taken(
        &self,
        username: &str,
        except_id: Option<i64>,
    ) -> Result<bool, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.holds_username(username, except_id))
    }

    async fn link_customer(
        &self,
        id: i64,
        customer_id: &str,
    ) -> Result<Option<String>, StoreError> {
        let mut inner = self.inner.lock().await;
        let Some(account) = inner.by_id.get_mut(&id) else {
            return Ok(None);
        };
        if account.customer_id.is_none() {
            account.customer_id = Some(customer_id.to_string());
            account.modified_on = Utc::now();
        }
        Ok(account.customer_id.clone())
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: Option<String>,
    password_hash: String,
    customer_id: Option<String>,
    created_on: DateTime<Utc>,
    modified_on: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone_number: row.phone_number,
            password_hash: row.password_hash,
            customer_id: row.customer_id,
            created_on: row.created_on,
            modified_on: row.modified_on,
        }
    }
}

const ACCOUNT_COLUMNS: &str = "id, username, first_name, last_name, email, phone_number, \
     password_hash, customer_id, created_on, modified_on";

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UsernameTaken,
        _ => StoreError::Backend(err.to_string()),
    }
}

// PostgreSQL-backed account store.
#[derive(Clone)]
pub struct PostgresAccountStore {
    pub db: PgPool,
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO accounts
                (username, first_name, last_name, email, phone_number, password_hash, customer_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(account.username)
            .bind(account.first_name)
            .bind(account.last_name)
            .bind(account.email)
            .bind(account.phone_number)
            .bind(account.password_hash)
            .bind(account.customer_id)
            .fetch_one(&self.db)
            .await
            .map(Account::from)
            .map_err(map_sqlx_error)
    }

    async fn get(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");
        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map(|row| row.map(Account::from))
            .map_err(map_sqlx_error)
    }

    async fn update(
        &self,
        id: i64,
        changes: AccountChanges,
    ) -> Result<Option<Account>, StoreError> {
        let sql = format!(
            r#"
            UPDATE accounts SET
                username = COALESCE($2, username),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                email = COALESCE($5, email),
                phone_number = COALESCE($6, phone_number),
                password_hash = COALESCE($7, password_hash),
                modified_on = now()
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .bind(changes.username)
            .bind(changes.first_name)
            .bind(changes.last_name)
            .bind(changes.email)
            .bind(changes.phone_number)
            .bind(changes.password_hash)
            .fetch_optional(&self.db)
            .await
            .map(|row| row.map(Account::from))
            .map_err(map_sqlx_error)
    }

    async fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn username_taken(
        &self,
        username: &str,
        except_id: Option<i64>,
    ) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE username = $1 AND id IS DISTINCT FROM $2)",
        )
        .bind(username)
        .bind(except_id)
        .fetch_one(&self.db)
        .await
        .map_err(map_sqlx_error)
    }

    // Single conditional write: the first stored linkage wins.
    async fn link_customer(
        &self,
        id: i64,
        customer_id: &str,
    ) -> Result<Option<String>, StoreError> {
        let stored: Option<(Option<String>,)> = sqlx::query_as(
            r#"
            UPDATE accounts SET
                customer_id = COALESCE(customer_id, $2),
                modified_on = CASE WHEN customer_id IS NULL THEN now() ELSE modified_on END
            WHERE id = $1
            RETURNING customer_id
            "#,
        )
        .bind(id)
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await
        .map_err(map_sqlx_error)?;

        Ok(stored.and_then(|(customer_id,)| customer_id))
    }
}
