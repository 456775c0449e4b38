//! Per-document-type validation rules.
//!
//! Each document type has a set of required fields, and optionally a
//! format check on one field:
//! - driver's license / passport → number, names, date of birth
//! - SSN card → SSN in `XXX-XX-XXXX` or `XXXXXXXXX` form
//! - proof of address → street, city, state, zip
//! - employment verification → employer, position
//! - bank statement → any extracted data

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::model::{DocumentType, ExtractedData};

static SSN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}-\d{2}-\d{4}$|^\d{9}$").expect("valid SSN regex"));

/// A format constraint on a single field.
#[derive(Debug, Clone)]
pub struct FormatRule {
    pub field: String,
    pub regex: Regex,
    /// Human-readable description of the expected format.
    pub description: String,
}

/// Rules for one document type.
#[derive(Debug, Clone, Default)]
pub struct DocumentRule {
    pub required_fields: Vec<String>,
    pub formats: Vec<FormatRule>,
}

impl DocumentRule {
    fn required(fields: &[&str]) -> Self {
        Self {
            required_fields: fields.iter().map(|f| f.to_string()).collect(),
            formats: Vec::new(),
        }
    }
}

/// Rule set keyed by document type.
pub struct RuleSet {
    rules: HashMap<DocumentType, DocumentRule>,
}

impl RuleSet {
    /// The built-in rule set.
    pub fn default_rules() -> Self {
        let mut rules = HashMap::new();
        rules.insert(
            DocumentType::DriversLicense,
            DocumentRule::required(&["license_number", "first_name", "last_name", "date_of_birth"]),
        );
        rules.insert(
            DocumentType::Passport,
            DocumentRule::required(&["passport_number", "first_name", "last_name", "date_of_birth"]),
        );
        rules.insert(
            DocumentType::SocialSecurityCard,
            DocumentRule {
                required_fields: vec!["social_security_number".into()],
                formats: vec![FormatRule {
                    field: "social_security_number".into(),
                    regex: SSN_RE.clone(),
                    description: "XXX-XX-XXXX or XXXXXXXXX".into(),
                }],
            },
        );
        rules.insert(
            DocumentType::ProofOfAddress,
            DocumentRule::required(&["street", "city", "state", "zip_code"]),
        );
        rules.insert(
            DocumentType::EmploymentVerification,
            DocumentRule::required(&["employer", "position"]),
        );
        rules.insert(DocumentType::BankStatement, DocumentRule::default());
        Self { rules }
    }

    /// An empty rule set: only the "has some data" check applies.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Add a format rule to a document type.
    pub fn add_format_rule(
        &mut self,
        doc_type: DocumentType,
        field: &str,
        pattern: &str,
        description: &str,
    ) -> Result<(), regex::Error> {
        self.rules.entry(doc_type).or_default().formats.push(FormatRule {
            field: field.into(),
            regex: Regex::new(pattern)?,
            description: description.into(),
        });
        Ok(())
    }

    /// Check extracted data against the rule for `doc_type`.
    ///
    /// Returns the list of problems; empty means the document passes.
    pub fn check(&self, doc_type: DocumentType, data: &ExtractedData) -> Vec<String> {
        if data.is_empty() {
            return vec!["no data could be extracted".to_string()];
        }
        let Some(rule) = self.rules.get(&doc_type) else {
            return Vec::new();
        };

        let mut issues: Vec<String> = rule
            .required_fields
            .iter()
            .filter(|f| !data.has(f))
            .map(|f| format!("missing {f}"))
            .collect();

        for format in &rule.formats {
            if let Some(value) = data.get(&format.field)
                && !format.regex.is_match(value)
            {
                debug!(
                    doc_type = %doc_type,
                    field = %format.field,
                    "Field failed format rule"
                );
                issues.push(format!(
                    "{} has invalid format (expected {})",
                    format.field, format.description
                ));
            }
        }
        issues
    }
}

/// Whether `ssn` is in `XXX-XX-XXXX` or `XXXXXXXXX` form.
pub fn is_valid_ssn(ssn: &str) -> bool {
    SSN_RE.is_match(ssn)
}
