//! libSQL backend — async `Database` trait implementation.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::model::{AccountStatus, AccountType, BankAccount, ProcessingStatus};
use crate::store::migrations;
use crate::store::traits::{Database, OnboardingRun};

/// Column list for account queries. Order matters for `row_to_account`.
const ACCOUNT_COLUMNS: &str =
    "account_number, account_type, customer_id, balance, status, created_at, last_modified";

const RUN_COLUMNS: &str = "id, status, message, customer_id, account_number, document_count, verified_count, created_at";

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let backend = Self::from_database(db)?;
        backend.run_migrations().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let backend = Self::from_database(db)?;
        backend.run_migrations().await?;
        Ok(backend)
    }

    fn from_database(db: LibSqlDatabase) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

fn processing_status_to_str(status: ProcessingStatus) -> String {
    serde_json::to_value(status)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "error".to_string())
}

fn str_to_processing_status(s: &str) -> ProcessingStatus {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .unwrap_or(ProcessingStatus::Error)
}

/// Map a libsql Row to a BankAccount. Column order matches ACCOUNT_COLUMNS.
fn row_to_account(row: &libsql::Row) -> Result<BankAccount, DatabaseError> {
    let account_number: String = row.get(0)?;
    let account_type: String = row.get(1)?;
    let customer_id: String = row.get(2)?;
    let balance: String = row.get(3)?;
    let status: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    let last_modified: String = row.get(6)?;

    Ok(BankAccount {
        account_type: AccountType::from_str(&account_type)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?,
        customer_id,
        balance: Decimal::from_str(&balance)
            .map_err(|e| DatabaseError::Serialization(format!("balance of {account_number}: {e}")))?,
        status: AccountStatus::from_str(&status)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?,
        created_at: parse_datetime(&created_at),
        last_modified: parse_datetime(&last_modified),
        account_number,
    })
}

fn row_to_run(row: &libsql::Row) -> Result<OnboardingRun, DatabaseError> {
    let status: String = row.get(1)?;
    let created_at: String = row.get(7)?;
    Ok(OnboardingRun {
        id: row.get(0)?,
        status: str_to_processing_status(&status),
        message: row.get(2)?,
        customer_id: row.get(3)?,
        account_number: row.get(4)?,
        document_count: row.get::<i64>(5)?.max(0) as u32,
        verified_count: row.get::<i64>(6)?.max(0) as u32,
        created_at: parse_datetime(&created_at),
    })
}

#[async_trait]
impl Database for LibSqlBackend {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    // ── Accounts ────────────────────────────────────────────────────

    async fn insert_account(&self, account: &BankAccount) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                &format!("INSERT INTO bank_accounts ({ACCOUNT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
                params![
                    account.account_number.as_str(),
                    account.account_type.as_str(),
                    account.customer_id.as_str(),
                    account.balance.to_string(),
                    account.status.as_str(),
                    account.created_at.to_rfc3339(),
                    account.last_modified.to_rfc3339(),
                ],
            )
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("UNIQUE") {
                    DatabaseError::Constraint(format!(
                        "account number {} already exists",
                        account.account_number
                    ))
                } else {
                    DatabaseError::Query(format!("insert_account: {msg}"))
                }
            })?;
        debug!(account_number = %account.account_number, "Account inserted");
        Ok(())
    }

    async fn get_account(
        &self,
        account_number: &str,
    ) -> Result<Option<BankAccount>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM bank_accounts WHERE account_number = ?1"),
                params![account_number],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_account: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_account(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_account row: {e}"))),
        }
    }

    async fn account_number_exists(&self, account_number: &str) -> Result<bool, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT COUNT(*) FROM bank_accounts WHERE account_number = ?1",
                params![account_number],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("account_number_exists: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(row.get::<i64>(0)? > 0),
            Ok(None) => Ok(false),
            Err(e) => Err(DatabaseError::Query(format!("account_number_exists row: {e}"))),
        }
    }

    async fn update_account_status(
        &self,
        account_number: &str,
        from: AccountStatus,
        to: AccountStatus,
        modified_at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let count = self
            .conn()
            .execute(
                "UPDATE bank_accounts SET status = ?1, last_modified = ?2
                 WHERE account_number = ?3 AND status = ?4",
                params![
                    to.as_str(),
                    modified_at.to_rfc3339(),
                    account_number,
                    from.as_str()
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("update_account_status: {e}")))?;
        Ok(count > 0)
    }

    async fn list_accounts_by_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<BankAccount>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {ACCOUNT_COLUMNS} FROM bank_accounts WHERE customer_id = ?1 ORDER BY created_at ASC"
                ),
                params![customer_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_accounts_by_customer: {e}")))?;

        let mut accounts = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("list_accounts_by_customer row: {e}")))?
        {
            accounts.push(row_to_account(&row)?);
        }
        Ok(accounts)
    }

    // ── Runs ────────────────────────────────────────────────────────

    async fn insert_run(&self, run: &OnboardingRun) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                &format!("INSERT INTO onboarding_runs ({RUN_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                params![
                    run.id.as_str(),
                    processing_status_to_str(run.status),
                    run.message.as_str(),
                    run.customer_id.clone(),
                    run.account_number.clone(),
                    run.document_count as i64,
                    run.verified_count as i64,
                    run.created_at.to_rfc3339(),
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("insert_run: {e}")))?;
        Ok(())
    }

    async fn recent_runs(&self, limit: usize) -> Result<Vec<OnboardingRun>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {RUN_COLUMNS} FROM onboarding_runs ORDER BY created_at DESC LIMIT ?1"),
                params![limit as i64],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("recent_runs: {e}")))?;

        let mut runs = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("recent_runs row: {e}")))?
        {
            runs.push(row_to_run(&row)?);
        }
        Ok(runs)
    }
}
