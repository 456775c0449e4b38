//! Account creation — number allocation and status lifecycle over the store.

pub mod number;

pub use number::AccountNumberGenerator;

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{AccountError, DatabaseError};
use crate::model::{AccountStatus, AccountType, BankAccount};
use crate::store::Database;

/// Attempts at finding an unused account number before giving up.
const MAX_NUMBER_ATTEMPTS: u32 = 5;

/// Conditional status writes tried before reporting a conflict.
const MAX_TRANSITION_ATTEMPTS: u32 = 3;

/// Creates and manages bank accounts.
pub struct AccountService {
    db: Arc<dyn Database>,
    numbers: AccountNumberGenerator,
}

impl AccountService {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self {
            db,
            numbers: AccountNumberGenerator::new(),
        }
    }

    /// Open a pending, zero-balance account for a customer.
    pub async fn create_account(
        &self,
        customer_id: &str,
        account_type: AccountType,
    ) -> Result<BankAccount, AccountError> {
        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let number = self.numbers.generate();
            if self.db.account_number_exists(&number).await? {
                warn!(attempt, "Generated account number already taken, retrying");
                continue;
            }

            let account = BankAccount::open(number, account_type, customer_id);
            match self.db.insert_account(&account).await {
                Ok(()) => {
                    info!(
                        account_number = %account.account_number,
                        account_type = %account_type,
                        customer_id,
                        "Account created"
                    );
                    return Ok(account);
                }
                // Lost a race with a concurrent insert of the same number.
                Err(DatabaseError::Constraint(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(AccountError::NumberExhausted(MAX_NUMBER_ATTEMPTS))
    }

    /// Move a pending (or suspended) account to active.
    pub async fn activate_account(&self, account_number: &str) -> Result<BankAccount, AccountError> {
        self.update_status(account_number, AccountStatus::Active).await
    }

    /// Apply a status transition, rejecting ones the lifecycle forbids.
    ///
    /// The write is conditional on the status that was checked, so a
    /// concurrent change is seen on the next read instead of overwritten.
    pub async fn update_status(
        &self,
        account_number: &str,
        status: AccountStatus,
    ) -> Result<BankAccount, AccountError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut account = self
                .db
                .get_account(account_number)
                .await?
                .ok_or_else(|| AccountError::NotFound(account_number.to_string()))?;

            let from = account.status;
            if !from.can_transition_to(status) {
                return Err(AccountError::InvalidTransition {
                    number: account_number.to_string(),
                    from,
                    to: status,
                });
            }

            let now = Utc::now();
            if self
                .db
                .update_account_status(account_number, from, status, now)
                .await?
            {
                info!(account_number, from = %from, to = %status, "Account status changed");
                account.status = status;
                account.last_modified = now;
                return Ok(account);
            }

            warn!(account_number, attempt, "Account status changed concurrently, re-reading");
            if attempt >= MAX_TRANSITION_ATTEMPTS {
                let current = self
                    .db
                    .get_account(account_number)
                    .await?
                    .ok_or_else(|| AccountError::NotFound(account_number.to_string()))?;
                return Err(AccountError::InvalidTransition {
                    number: account_number.to_string(),
                    from: current.status,
                    to: status,
                });
            }
        }
    }

    pub async fn get_account(&self, account_number: &str) -> Result<Option<BankAccount>, AccountError> {
        Ok(self.db.get_account(account_number).await?)
    }

    pub async fn accounts_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<BankAccount>, AccountError> {
        Ok(self.db.list_accounts_by_customer(customer_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::store::LibSqlBackend;

    async fn service() -> AccountService {
        AccountService::new(Arc::new(LibSqlBackend::new_memory().await.unwrap()))
    }

    #[tokio::test]
    async fn create_then_activate() {
        let svc = service().await;
        let account = svc.create_account("cust-1", AccountType::Checking).await.unwrap();
        assert_eq!(account.status, AccountStatus::Pending);
        assert_eq!(account.balance, Decimal::ZERO);
        assert_eq!(account.account_number.len(), 10);

        let active = svc.activate_account(&account.account_number).await.unwrap();
        assert_eq!(active.status, AccountStatus::Active);
        assert!(active.last_modified >= account.last_modified);

        let stored = svc.get_account(&account.account_number).await.unwrap().unwrap();
        assert_eq!(stored.status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn activating_twice_is_rejected() {
        let svc = service().await;
        let account = svc.create_account("cust-1", AccountType::Savings).await.unwrap();
        svc.activate_account(&account.account_number).await.unwrap();

        let err = svc.activate_account(&account.account_number).await.unwrap_err();
        assert!(matches!(
            err,
            AccountError::InvalidTransition {
                from: AccountStatus::Active,
                to: AccountStatus::Active,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn closed_account_cannot_reopen() {
        let svc = service().await;
        let account = svc.create_account("cust-1", AccountType::Business).await.unwrap();
        svc.update_status(&account.account_number, AccountStatus::Closed)
            .await
            .unwrap();
        assert!(svc.activate_account(&account.account_number).await.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_close_and_activate_never_reopen() {
        let svc = Arc::new(service().await);
        for _ in 0..50 {
            let account = svc.create_account("cust-1", AccountType::Checking).await.unwrap();
            let number = account.account_number.clone();

            let (close, activate) = tokio::join!(
                {
                    let svc = Arc::clone(&svc);
                    let number = number.clone();
                    tokio::spawn(async move { svc.update_status(&number, AccountStatus::Closed).await })
                },
                {
                    let svc = Arc::clone(&svc);
                    let number = number.clone();
                    tokio::spawn(async move { svc.activate_account(&number).await })
                }
            );
            let (close, activate) = (close.unwrap(), activate.unwrap());

            let stored = svc.get_account(&number).await.unwrap().unwrap();
            if close.is_ok() {
                assert_eq!(stored.status, AccountStatus::Closed);
            } else {
                assert!(activate.is_ok());
                assert_eq!(stored.status, AccountStatus::Active);
            }
        }
    }

    #[tokio::test]
    async fn unknown_account_not_found() {
        let svc = service().await;
        let err = svc.activate_account("9999999999").await.unwrap_err();
        assert!(matches!(err, AccountError::NotFound(_)));
    }

    #[tokio::test]
    async fn accounts_listed_per_customer() {
        let svc = service().await;
        svc.create_account("alice", AccountType::Checking).await.unwrap();
        svc.create_account("alice", AccountType::Savings).await.unwrap();
        svc.create_account("bob", AccountType::Checking).await.unwrap();

        let alice = svc.accounts_for_customer("alice").await.unwrap();
        assert_eq!(alice.len(), 2);
    }
}
