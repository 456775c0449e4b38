//! Error types for the onboarding service.

use std::time::Duration;

use crate::model::AccountStatus;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<libsql::Error> for DatabaseError {
    fn from(e: libsql::Error) -> Self {
        DatabaseError::Query(e.to_string())
    }
}

/// Document extraction errors.
///
/// Variants follow the failure categories callers care about: the
/// backend answered with something unusable, the backend refused the
/// request, or the backend could not be reached at all.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("No processor configured for document type {doc_type}")]
    ProcessorNotConfigured { doc_type: String },

    #[error("Processing failed for {file_name}: {reason}")]
    Processing { file_name: String, reason: String },

    #[error("Extraction service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Network error talking to extraction service: {0}")]
    Network(String),

    #[error("Extraction service still failing after {attempts} attempts (last: {last})")]
    RetriesExhausted { attempts: u32, last: String },

    #[error("Extraction timed out after {0:?}")]
    Timeout(Duration),
}

impl ExtractionError {
    /// Whether a retry has any chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Service { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Input validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Bank account errors.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Account {0} not found")]
    NotFound(String),

    #[error("Account {number} is {from}, cannot transition to {to}")]
    InvalidTransition {
        number: String,
        from: AccountStatus,
        to: AccountStatus,
    },

    #[error("Could not allocate a unique account number after {0} attempts")]
    NumberExhausted(u32),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Pipeline-related errors.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Account error: {0}")]
    Account(#[from] AccountError),
}
