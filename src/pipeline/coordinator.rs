//! Coordinator — sequences scanning, validation, and account creation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::accounts::AccountService;
use crate::error::PipelineError;
use crate::model::{AccountType, Document, ProcessingResult, ProcessingStatus, UploadedFile};
use crate::scanner::DocumentScanner;
use crate::store::{Database, OnboardingRun};
use crate::validation::Validator;

use super::compile::compile_customer_data;

/// Runs the full onboarding workflow for one batch of uploads.
pub struct Coordinator {
    scanner: Arc<DocumentScanner>,
    validator: Arc<Validator>,
    accounts: Arc<AccountService>,
    db: Arc<dyn Database>,
}

impl Coordinator {
    pub fn new(
        scanner: Arc<DocumentScanner>,
        validator: Arc<Validator>,
        accounts: Arc<AccountService>,
        db: Arc<dyn Database>,
    ) -> Self {
        Self {
            scanner,
            validator,
            accounts,
            db,
        }
    }

    pub fn scanner(&self) -> &Arc<DocumentScanner> {
        &self.scanner
    }

    pub fn validator(&self) -> &Arc<Validator> {
        &self.validator
    }

    pub fn accounts(&self) -> &Arc<AccountService> {
        &self.accounts
    }

    /// Onboard a new customer from their uploaded documents.
    ///
    /// Never fails: errors are reported through the returned result's
    /// `error` status. The run is recorded in the store either way.
    pub async fn process_new_customer(&self, files: Vec<UploadedFile>) -> ProcessingResult {
        info!(files = files.len(), "Starting customer onboarding");

        let result = match self.run(&files).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Onboarding failed");
                ProcessingResult::error(
                    "An error occurred during the onboarding process",
                    e.to_string(),
                )
            }
        };

        self.record(&result).await;
        info!(status = ?result.status, "Onboarding finished");
        result
    }

    async fn run(&self, files: &[UploadedFile]) -> Result<ProcessingResult, PipelineError> {
        info!(step = 1, "Scanning documents");
        let mut documents = self.scanner.scan_documents(files).await;
        if documents.is_empty() {
            return Ok(ProcessingResult::error(
                "No documents could be processed",
                "Document scanning failed",
            ));
        }

        info!(step = 2, "Validating documents");
        let doc_report = self.validator.validate_documents(&mut documents);

        info!(step = 3, "Compiling customer data");
        let customer = compile_customer_data(documents);

        info!(step = 4, "Validating customer data");
        let customer_report = self.validator.validate_customer_data(&customer);
        for warning in &customer_report.warnings {
            warn!(customer_id = %customer.id, warning = %warning, "Customer data warning");
        }

        let mut issues = doc_report.issues;
        if !customer_report.is_valid() {
            issues.extend(customer_report.issues);
            let documents = customer.documents.clone();
            return Ok(ProcessingResult {
                status: ProcessingStatus::ValidationFailed,
                message: "Customer data validation failed".to_string(),
                customer_data: Some(customer),
                bank_account: None,
                documents: Some(documents),
                validation_issues: issues,
                error: None,
            });
        }

        info!(step = 5, "Creating bank account");
        let mut account = self
            .accounts
            .create_account(&customer.id.to_string(), AccountType::Checking)
            .await?;

        let all_verified = customer.documents.iter().all(Document::is_verified);
        let (status, message) = if all_verified {
            info!(step = 6, account_number = %account.account_number, "Activating account");
            match self.accounts.activate_account(&account.account_number).await {
                Ok(active) => {
                    account = active;
                    (
                        ProcessingStatus::Completed,
                        "Account created and activated successfully",
                    )
                }
                Err(e) => {
                    warn!(
                        account_number = %account.account_number,
                        error = %e,
                        "Activation failed, account left pending"
                    );
                    (
                        ProcessingStatus::PendingVerification,
                        "Account created, pending document verification",
                    )
                }
            }
        } else {
            (
                ProcessingStatus::PendingVerification,
                "Account created, pending document verification",
            )
        };

        let documents = customer.documents.clone();
        Ok(ProcessingResult {
            status,
            message: message.to_string(),
            customer_data: Some(customer),
            bank_account: Some(account),
            documents: Some(documents),
            validation_issues: issues,
            error: None,
        })
    }

    /// Persist a run summary. Failures are logged, not surfaced.
    async fn record(&self, result: &ProcessingResult) {
        let documents = result.documents.as_deref().unwrap_or_default();
        let run = OnboardingRun {
            id: Uuid::new_v4().to_string(),
            status: result.status,
            message: result.message.clone(),
            customer_id: result.customer_data.as_ref().map(|c| c.id.to_string()),
            account_number: result.bank_account.as_ref().map(|a| a.account_number.clone()),
            document_count: documents.len() as u32,
            verified_count: documents.iter().filter(|d| d.is_verified()).count() as u32,
            created_at: Utc::now(),
        };
        if let Err(e) = self.db.insert_run(&run).await {
            warn!(error = %e, "Failed to record onboarding run");
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::DateTime;

    use super::*;
    use crate::error::DatabaseError;
    use crate::model::{AccountStatus, BankAccount, VerificationStatus};
    use crate::scanner::PlainTextExtractor;
    use crate::store::LibSqlBackend;

    /// Which store calls should fail.
    #[derive(Default, Clone, Copy)]
    struct Failures {
        lookups: bool,
        status_updates: bool,
        run_inserts: bool,
    }

    /// In-memory store that fails selected calls (no real outage needed).
    struct FlakyDb {
        inner: LibSqlBackend,
        fail: Failures,
    }

    fn outage(op: &str) -> DatabaseError {
        DatabaseError::Query(format!("{op}: database is locked"))
    }

    #[async_trait]
    impl Database for FlakyDb {
        async fn run_migrations(&self) -> Result<(), DatabaseError> {
            self.inner.run_migrations().await
        }
        async fn insert_account(&self, account: &BankAccount) -> Result<(), DatabaseError> {
            self.inner.insert_account(account).await
        }
        async fn get_account(&self, number: &str) -> Result<Option<BankAccount>, DatabaseError> {
            self.inner.get_account(number).await
        }
        async fn account_number_exists(&self, number: &str) -> Result<bool, DatabaseError> {
            if self.fail.lookups {
                return Err(outage("account_number_exists"));
            }
            self.inner.account_number_exists(number).await
        }
        async fn update_account_status(
            &self,
            number: &str,
            from: AccountStatus,
            to: AccountStatus,
            modified_at: DateTime<Utc>,
        ) -> Result<bool, DatabaseError> {
            if self.fail.status_updates {
                return Err(outage("update_account_status"));
            }
            self.inner
                .update_account_status(number, from, to, modified_at)
                .await
        }
        async fn list_accounts_by_customer(
            &self,
            customer_id: &str,
        ) -> Result<Vec<BankAccount>, DatabaseError> {
            self.inner.list_accounts_by_customer(customer_id).await
        }
        async fn insert_run(&self, run: &OnboardingRun) -> Result<(), DatabaseError> {
            if self.fail.run_inserts {
                return Err(outage("insert_run"));
            }
            self.inner.insert_run(run).await
        }
        async fn recent_runs(&self, limit: usize) -> Result<Vec<OnboardingRun>, DatabaseError> {
            self.inner.recent_runs(limit).await
        }
    }

    fn coordinator_over(db: Arc<dyn Database>) -> Coordinator {
        Coordinator::new(
            Arc::new(DocumentScanner::new(Arc::new(PlainTextExtractor::new()))),
            Arc::new(Validator::default()),
            Arc::new(AccountService::new(Arc::clone(&db))),
            db,
        )
    }

    async fn coordinator() -> (Coordinator, Arc<dyn Database>) {
        let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        (coordinator_over(Arc::clone(&db)), db)
    }

    async fn flaky_coordinator(fail: Failures) -> (Coordinator, Arc<dyn Database>) {
        let db: Arc<dyn Database> = Arc::new(FlakyDb {
            inner: LibSqlBackend::new_memory().await.unwrap(),
            fail,
        });
        (coordinator_over(Arc::clone(&db)), db)
    }

    fn full_document_set() -> Vec<UploadedFile> {
        vec![
            UploadedFile::new(
                "drivers_license.txt",
                "Name: Jane Doe\nDOB: 1990-01-01\nLicense Number: D1234567",
            ),
            UploadedFile::new("ssn_card.txt", "SSN: 123-45-6789\nName: Jane Doe"),
            UploadedFile::new(
                "utility_bill.txt",
                "Address: 1 Main St\nCity: Springfield\nState: IL\nZip: 62701",
            ),
            UploadedFile::new(
                "employment_letter.txt",
                "Employer: Acme Corp\nPosition: Engineer\nSalary: $85,000",
            ),
        ]
    }

    #[tokio::test]
    async fn complete_set_creates_active_account() {
        let (coordinator, db) = coordinator().await;
        let result = coordinator.process_new_customer(full_document_set()).await;

        assert_eq!(result.status, ProcessingStatus::Completed, "{:?}", result.validation_issues);
        let account = result.bank_account.expect("account");
        assert_eq!(account.status, AccountStatus::Active);
        assert_eq!(account.account_type, AccountType::Checking);

        let customer = result.customer_data.expect("customer");
        assert_eq!(account.customer_id, customer.id.to_string());
        assert_eq!(customer.first_name, "Jane");
        assert_eq!(customer.documents.len(), 4);

        let runs = db.recent_runs(5).await.unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].verified_count, 4);
        assert_eq!(runs[0].account_number.as_deref(), Some(account.account_number.as_str()));
    }

    #[tokio::test]
    async fn rejected_extra_document_leaves_account_pending() {
        let (coordinator, _db) = coordinator().await;
        let mut files = full_document_set();
        files.push(UploadedFile::new("passport.txt", "Nationality: USA"));

        let result = coordinator.process_new_customer(files).await;

        assert_eq!(result.status, ProcessingStatus::PendingVerification);
        assert_eq!(result.bank_account.unwrap().status, AccountStatus::Pending);
        let docs = result.documents.unwrap();
        assert_eq!(docs[4].verification_status, VerificationStatus::Rejected);
        assert!(!result.validation_issues.is_empty());
    }

    #[tokio::test]
    async fn incomplete_customer_gets_no_account() {
        let (coordinator, db) = coordinator().await;
        let files = vec![UploadedFile::new("ssn_card.txt", "SSN: 123-45-6789")];

        let result = coordinator.process_new_customer(files).await;

        assert_eq!(result.status, ProcessingStatus::ValidationFailed);
        assert!(result.bank_account.is_none());
        assert!(result.validation_issues.iter().any(|i| i == "missing first name"));
        let customer = result.customer_data.unwrap();
        assert!(db.list_accounts_by_customer(&customer.id.to_string()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn no_files_is_an_error_result() {
        let (coordinator, db) = coordinator().await;
        let result = coordinator.process_new_customer(vec![]).await;

        assert_eq!(result.status, ProcessingStatus::Error);
        assert_eq!(result.message, "No documents could be processed");
        assert_eq!(result.error.as_deref(), Some("Document scanning failed"));
        assert_eq!(db.recent_runs(5).await.unwrap()[0].status, ProcessingStatus::Error);
    }

    #[tokio::test]
    async fn store_failure_during_account_creation_is_an_error_result() {
        let (coordinator, db) = flaky_coordinator(Failures {
            lookups: true,
            ..Failures::default()
        })
        .await;

        let result = coordinator.process_new_customer(full_document_set()).await;

        assert_eq!(result.status, ProcessingStatus::Error);
        assert_eq!(result.message, "An error occurred during the onboarding process");
        assert!(result.error.unwrap().contains("database is locked"));
        assert!(result.bank_account.is_none());
        assert_eq!(db.recent_runs(5).await.unwrap()[0].status, ProcessingStatus::Error);
    }

    #[tokio::test]
    async fn activation_failure_leaves_account_pending() {
        let (coordinator, db) = flaky_coordinator(Failures {
            status_updates: true,
            ..Failures::default()
        })
        .await;

        let result = coordinator.process_new_customer(full_document_set()).await;

        assert_eq!(result.status, ProcessingStatus::PendingVerification);
        assert_eq!(result.message, "Account created, pending document verification");
        let account = result.bank_account.unwrap();
        assert_eq!(account.status, AccountStatus::Pending);
        let stored = db.get_account(&account.account_number).await.unwrap().unwrap();
        assert_eq!(stored.status, AccountStatus::Pending);
    }

    #[tokio::test]
    async fn failed_run_record_does_not_change_the_result() {
        let (coordinator, db) = flaky_coordinator(Failures {
            run_inserts: true,
            ..Failures::default()
        })
        .await;

        let result = coordinator.process_new_customer(full_document_set()).await;

        assert_eq!(result.status, ProcessingStatus::Completed);
        assert_eq!(result.bank_account.unwrap().status, AccountStatus::Active);
        assert!(db.recent_runs(5).await.unwrap().is_empty());
    }
}
