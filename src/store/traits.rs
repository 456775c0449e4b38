//! `Database` trait — single async interface for all persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;
use crate::model::{AccountStatus, BankAccount, ProcessingStatus};

/// Summary of one onboarding run, kept for auditing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingRun {
    pub id: String,
    pub status: ProcessingStatus,
    pub message: String,
    pub customer_id: Option<String>,
    pub account_number: Option<String>,
    pub document_count: u32,
    pub verified_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Backend-agnostic database trait covering accounts and run history.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run all pending schema migrations.
    async fn run_migrations(&self) -> Result<(), DatabaseError>;

    // ── Accounts ────────────────────────────────────────────────────

    /// Insert a new account. Fails with `Constraint` if the number is taken.
    async fn insert_account(&self, account: &BankAccount) -> Result<(), DatabaseError>;

    /// Get an account by number.
    async fn get_account(&self, account_number: &str)
    -> Result<Option<BankAccount>, DatabaseError>;

    /// Whether an account number is already in use.
    async fn account_number_exists(&self, account_number: &str) -> Result<bool, DatabaseError>;

    /// Move an account from `from` to `to` and bump `last_modified`.
    ///
    /// The write only applies while the stored status is still `from`.
    /// Returns `false` if no account with that number holds `from`.
    async fn update_account_status(
        &self,
        account_number: &str,
        from: AccountStatus,
        to: AccountStatus,
        modified_at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError>;

    /// All accounts of a customer, oldest first.
    async fn list_accounts_by_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<BankAccount>, DatabaseError>;

    // ── Runs ────────────────────────────────────────────────────────

    /// Record a finished onboarding run.
    async fn insert_run(&self, run: &OnboardingRun) -> Result<(), DatabaseError>;

    /// Most recent runs, newest first.
    async fn recent_runs(&self, limit: usize) -> Result<Vec<OnboardingRun>, DatabaseError>;
}
