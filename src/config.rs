//! Configuration types, loaded from the environment.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::model::DocumentType;

/// Default Document AI REST endpoint template (location is substituted).
pub const DEFAULT_DOCUMENT_AI_HOST: &str = "https://{location}-documentai.googleapis.com";

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Interface to bind the HTTP server to.
    pub bind_addr: String,
    /// HTTP port.
    pub port: u16,
    /// Path of the libSQL database file.
    pub db_path: PathBuf,
    /// Maximum accepted request body, in bytes.
    pub max_upload_bytes: usize,
    /// Directory for rotated log files. Logs only go to stderr when unset.
    pub log_dir: Option<PathBuf>,
    /// Document AI settings. `None` selects the plain-text extractor.
    pub document_ai: Option<DocumentAiConfig>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8000,
            db_path: PathBuf::from("./data/bank-onboard.db"),
            max_upload_bytes: 20 * 1024 * 1024,
            log_dir: None,
            document_ai: None,
        }
    }
}

impl ServiceConfig {
    /// Build the configuration from environment variables.
    ///
    /// Unset variables take their defaults; set but unparseable ones are
    /// an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port: u16 = parse_value("PORT", env_opt("PORT"), defaults.port)?;
        let bind_addr = env_opt("BANK_ONBOARD_BIND").unwrap_or(defaults.bind_addr);
        let db_path = env_opt("BANK_ONBOARD_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);
        let max_upload_mb: usize = parse_value(
            "BANK_ONBOARD_MAX_UPLOAD_MB",
            env_opt("BANK_ONBOARD_MAX_UPLOAD_MB"),
            defaults.max_upload_bytes / (1024 * 1024),
        )?;
        let log_dir = env_opt("BANK_ONBOARD_LOG_DIR").map(PathBuf::from);

        Ok(Self {
            bind_addr,
            port,
            db_path,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            log_dir,
            document_ai: DocumentAiConfig::from_env()?,
        })
    }
}

/// A set, non-empty environment variable.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

/// Parse an optional raw value, falling back to `default` when absent.
fn parse_value<T>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
    }
}

/// Google Document AI connection settings.
#[derive(Debug, Clone)]
pub struct DocumentAiConfig {
    pub project_id: String,
    /// Processor location, e.g. `us` or `eu`.
    pub location: String,
    /// OAuth bearer token sent with every request.
    pub access_token: SecretString,
    /// Base URL override (tests, private endpoints).
    pub endpoint: Option<String>,
    /// Processor id per document type.
    pub processors: HashMap<DocumentType, String>,
    /// Used when no type-specific processor is configured.
    pub default_processor: Option<String>,
    /// Per-request timeout.
    pub request_timeout: Duration,
    pub retry: RetryConfig,
}

impl DocumentAiConfig {
    /// Load from the environment. Returns `None` when `GOOGLE_CLOUD_PROJECT_ID`
    /// is unset; once it is set, an access token is required.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(project_id) = env_opt("GOOGLE_CLOUD_PROJECT_ID") else {
            return Ok(None);
        };

        let location = env_opt("GOOGLE_CLOUD_LOCATION").unwrap_or_else(|| "us".to_string());
        let access_token = env_opt("GOOGLE_CLOUD_ACCESS_TOKEN")
            .ok_or_else(|| ConfigError::MissingEnvVar("GOOGLE_CLOUD_ACCESS_TOKEN".to_string()))?;

        let mut processors = HashMap::new();
        for (doc_type, var) in [
            (DocumentType::DriversLicense, "DRIVERS_LICENSE_PROCESSOR_ID"),
            (DocumentType::Passport, "PASSPORT_PROCESSOR_ID"),
            (DocumentType::SocialSecurityCard, "SSN_PROCESSOR_ID"),
            (DocumentType::ProofOfAddress, "ADDRESS_PROCESSOR_ID"),
            (DocumentType::EmploymentVerification, "EMPLOYMENT_PROCESSOR_ID"),
            (DocumentType::BankStatement, "BANK_STATEMENT_PROCESSOR_ID"),
        ] {
            if let Some(id) = env_opt(var) {
                processors.insert(doc_type, id);
            }
        }

        let timeout_secs: u64 = parse_value(
            "DOCUMENT_AI_TIMEOUT_SECS",
            env_opt("DOCUMENT_AI_TIMEOUT_SECS"),
            30,
        )?;

        Ok(Some(Self {
            project_id,
            location,
            access_token: SecretString::from(access_token),
            endpoint: env_opt("DOCUMENT_AI_ENDPOINT"),
            processors,
            default_processor: env_opt("DEFAULT_PROCESSOR_ID"),
            request_timeout: Duration::from_secs(timeout_secs),
            retry: RetryConfig::default(),
        }))
    }

    /// Base URL for REST calls.
    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => DEFAULT_DOCUMENT_AI_HOST.replace("{location}", &self.location),
        }
    }

    /// Processor id for a document type, falling back to the default.
    pub fn processor_for(&self, doc_type: DocumentType) -> Option<&str> {
        self.processors
            .get(&doc_type)
            .or(self.default_processor.as_ref())
            .map(String::as_str)
    }

    /// Fully-qualified processor resource name.
    pub fn processor_name(&self, processor_id: &str) -> String {
        format!(
            "projects/{}/locations/{}/processors/{}",
            self.project_id, self.location, processor_id
        )
    }
}

/// Exponential backoff settings for calls to external services.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (1-based), doubling each time.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}
