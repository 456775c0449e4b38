//! Plain-text extractor for local runs without a cloud backend.
//!
//! Reads `Key: Value` lines and emits them as raw entities using the same
//! entity names Document AI reports, so the per-type mapping applies
//! unchanged.

use async_trait::async_trait;
use tracing::debug;

use crate::error::ExtractionError;
use crate::model::{DocumentType, UploadedFile};

use super::extractor::{Extractor, RawEntities};

/// Extractor over UTF-8 `Key: Value` text.
#[derive(Debug, Default, Clone)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for PlainTextExtractor {
    fn name(&self) -> &str {
        "plain-text"
    }

    async fn extract(
        &self,
        file: &UploadedFile,
        doc_type: DocumentType,
    ) -> Result<RawEntities, ExtractionError> {
        let text = std::str::from_utf8(&file.content).map_err(|e| ExtractionError::Processing {
            file_name: file.file_name.clone(),
            reason: format!("content is not UTF-8 text: {e}"),
        })?;
        let entities = parse_text(text, doc_type);
        debug!(file = %file.file_name, entities = entities.len(), "Parsed plain-text document");
        Ok(entities)
    }
}

/// Parse `Key: Value` lines into raw entities.
pub fn parse_text(text: &str, doc_type: DocumentType) -> RawEntities {
    let mut entities = RawEntities::new();
    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        for (entity, v) in canonical_entities(&normalize_key(key), value, doc_type) {
            entities.insert(entity, v);
        }
    }
    entities
}

fn normalize_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Map a normalized key to the raw entity name(s) a backend would report.
fn canonical_entities(key: &str, value: &str, doc_type: DocumentType) -> Vec<(String, String)> {
    let passport = doc_type == DocumentType::Passport;
    let one = |name: &str| vec![(name.to_string(), value.to_string())];

    match key {
        "name" | "full_name" => {
            let (first, last) = split_name(value);
            let (first_key, last_key) = if passport {
                ("given_names", "surname")
            } else {
                ("first_name", "last_name")
            };
            let mut out = vec![(first_key.to_string(), first)];
            if let Some(last) = last {
                out.push((last_key.to_string(), last));
            }
            out
        }
        "first_name" | "given_name" | "given_names" if passport => one("given_names"),
        "last_name" | "surname" if passport => one("surname"),
        "given_name" | "given_names" => one("first_name"),
        "surname" => one("last_name"),
        "dob" | "birth_date" | "date_of_birth" => one("date_of_birth"),
        "ssn" | "social_security_number" | "social_security" => one("ssn"),
        "dl" | "dl_number" | "license" | "license_no" | "license_number" => one("license_number"),
        "passport_no" | "passport_number" => one("passport_number"),
        "address" | "street" | "street_address" if doc_type == DocumentType::ProofOfAddress => {
            one("street_address")
        }
        "street" | "street_address" => one("address"),
        "zip" | "zipcode" | "postal_code" | "zip_code" => one("zip_code"),
        "company" | "employer" => one("employer"),
        "title" | "job_title" | "position" => one("position"),
        "income" | "annual_income" | "salary" => one("salary"),
        "expires" | "expiry" | "expiration" | "expiration_date" => one("expiration_date"),
        other => one(other),
    }
}

/// Split a full name into first (everything but the last word) and last.
fn split_name(full: &str) -> (String, Option<String>) {
    let mut parts: Vec<&str> = full.split_whitespace().collect();
    if parts.len() < 2 {
        return (full.trim().to_string(), None);
    }
    let last = parts.pop().map(str::to_string);
    (parts.join(" "), last)
}
