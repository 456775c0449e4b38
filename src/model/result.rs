//! Outcome of one onboarding run.

use serde::{Deserialize, Serialize};

use super::{BankAccount, CustomerData, Document};

/// Overall status of an onboarding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    /// Account created and activated.
    Completed,
    /// Account created but left pending; some documents were not verified.
    PendingVerification,
    /// Customer data failed validation; no account created.
    ValidationFailed,
    Error,
}

/// Result returned to the client for one onboarding run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub status: ProcessingStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_data: Option<CustomerData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<BankAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<Document>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessingResult {
    /// A failed run with no partial data.
    pub fn error(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: ProcessingStatus::Error,
            message: message.into(),
            customer_data: None,
            bank_account: None,
            documents: None,
            validation_issues: Vec::new(),
            error: Some(error.into()),
        }
    }
}
