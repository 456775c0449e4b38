//! Document types — uploaded files, scanned documents, and extracted fields.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use super::customer::mask_ssn;
use crate::error::ValidationError;

/// Extracted fields that are masked whenever they leave the process.
const MASKED_FIELDS: &[&str] = &["social_security_number"];

/// Kind of identity or KYC document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    DriversLicense,
    Passport,
    SocialSecurityCard,
    ProofOfAddress,
    EmploymentVerification,
    BankStatement,
}

impl DocumentType {
    pub const ALL: [DocumentType; 6] = [
        Self::DriversLicense,
        Self::Passport,
        Self::SocialSecurityCard,
        Self::ProofOfAddress,
        Self::EmploymentVerification,
        Self::BankStatement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DriversLicense => "drivers_license",
            Self::Passport => "passport",
            Self::SocialSecurityCard => "social_security_card",
            Self::ProofOfAddress => "proof_of_address",
            Self::EmploymentVerification => "employment_verification",
            Self::BankStatement => "bank_statement",
        }
    }

    /// Whether this document proves identity (name and date of birth).
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::DriversLicense | Self::Passport)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "document type",
                value: s.to_string(),
            })
    }
}

/// Review state of a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
    RequiresManualReview,
}

/// Field name → value pairs pulled out of a document.
///
/// Empty values are never stored, so `get` returning `Some` always means
/// the field carries data. Values stay raw in memory; the SSN is masked
/// when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ExtractedData(BTreeMap<String, String>);

impl ExtractedData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field; blank values are dropped.
    pub fn insert(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
        let value = value.as_ref().trim();
        if !value.is_empty() {
            self.0.insert(key.into(), value.to_string());
        }
    }

    /// Insert a field if a value is present.
    pub fn insert_opt(&mut self, key: &str, value: Option<&String>) {
        if let Some(v) = value {
            self.insert(key, v);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl Serialize for ExtractedData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            if MASKED_FIELDS.contains(&key.as_str()) {
                map.serialize_entry(key, &mask_ssn(value))?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<K: Into<String>, V: AsRef<str>> FromIterator<(K, V)> for ExtractedData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (k, v) in iter {
            data.insert(k, v);
        }
        data
    }
}

/// A scanned document with its extracted fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub file_name: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub extracted_data: ExtractedData,
    pub verification_status: VerificationStatus,
    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    /// Create a pending document.
    pub fn new(
        doc_type: DocumentType,
        file_name: impl Into<String>,
        extracted_data: ExtractedData,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            doc_type,
            file_name: file_name.into(),
            file_path: String::new(),
            extracted_data,
            verification_status: VerificationStatus::Pending,
            uploaded_at: Utc::now(),
        }
    }

    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Verified
    }
}

/// A file received from a client, before scanning.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            content: content.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}
