//! Validation — per-document rules and whole-customer checks.

pub mod rules;

pub use rules::{DocumentRule, FormatRule, RuleSet, is_valid_ssn};

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::{CustomerData, Document, VerificationStatus};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Outcome of a validation pass.
///
/// `issues` block account creation; `warnings` are informational.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validates documents and compiled customer records.
pub struct Validator {
    rules: RuleSet,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(RuleSet::default_rules())
    }
}

impl Validator {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Check a single document without changing it.
    pub fn validate_document(&self, document: &Document) -> ValidationReport {
        ValidationReport {
            issues: self.rules.check(document.doc_type, &document.extracted_data),
            warnings: Vec::new(),
        }
    }

    /// Mark each document `verified` or `rejected`.
    ///
    /// Returned issues are prefixed with the file name.
    pub fn validate_documents(&self, documents: &mut [Document]) -> ValidationReport {
        let mut report = ValidationReport::default();
        for doc in documents.iter_mut() {
            let issues = self.rules.check(doc.doc_type, &doc.extracted_data);
            doc.verification_status = if issues.is_empty() {
                VerificationStatus::Verified
            } else {
                VerificationStatus::Rejected
            };
            debug!(
                file = %doc.file_name,
                doc_type = %doc.doc_type,
                status = ?doc.verification_status,
                "Document validated"
            );
            report
                .issues
                .extend(issues.into_iter().map(|i| format!("{}: {i}", doc.file_name)));
        }
        info!(
            documents = documents.len(),
            verified = documents.iter().filter(|d| d.is_verified()).count(),
            "Document validation complete"
        );
        report
    }

    /// Check the compiled customer record.
    ///
    /// Presence checks block; email/phone format problems are warnings.
    pub fn validate_customer_data(&self, customer: &CustomerData) -> ValidationReport {
        let mut report = ValidationReport::default();
        let mut require = |value: &str, name: &str| {
            if value.trim().is_empty() {
                report.issues.push(format!("missing {name}"));
            }
        };

        require(&customer.first_name, "first name");
        require(&customer.last_name, "last name");
        require(&customer.date_of_birth, "date of birth");
        require(&customer.email, "email");
        require(&customer.phone_number, "phone number");

        require(&customer.address.street, "street");
        require(&customer.address.city, "city");
        require(&customer.address.state, "state");
        require(&customer.address.zip_code, "zip code");

        require(&customer.employment_info.employer, "employer");
        require(&customer.employment_info.position, "position");

        if customer.employment_info.annual_income <= Decimal::ZERO {
            report.issues.push("annual income must be positive".to_string());
        }
        if customer.documents.is_empty() {
            report.issues.push("no documents on file".to_string());
        }

        if !customer.email.is_empty() && !validate_email(&customer.email) {
            report.warnings.push(format!("email {} looks malformed", customer.email));
        }
        if !customer.phone_number.is_empty() && !validate_phone(&customer.phone_number) {
            report
                .warnings
                .push("phone number is not a 10-digit US number".to_string());
        }

        report
    }
}

/// Whether `email` looks like a deliverable address.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Whether `phone` has exactly 10 digits once formatting is stripped.
pub fn validate_phone(phone: &str) -> bool {
    phone.chars().filter(|c| c.is_ascii_digit()).count() == 10
}
