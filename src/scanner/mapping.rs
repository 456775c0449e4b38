//! Per-type mapping from raw extractor entities to document fields.

use crate::model::{DocumentType, ExtractedData};

use super::extractor::RawEntities;

/// `(document field, raw entity type)` pairs for each document type.
fn field_map(doc_type: DocumentType) -> &'static [(&'static str, &'static str)] {
    match doc_type {
        DocumentType::DriversLicense => &[
            ("license_number", "license_number"),
            ("first_name", "first_name"),
            ("last_name", "last_name"),
            ("date_of_birth", "date_of_birth"),
            ("address", "address"),
            ("expiration_date", "expiration_date"),
            ("state", "state"),
        ],
        DocumentType::Passport => &[
            ("passport_number", "passport_number"),
            ("first_name", "given_names"),
            ("last_name", "surname"),
            ("date_of_birth", "date_of_birth"),
            ("nationality", "nationality"),
            ("expiration_date", "expiration_date"),
        ],
        DocumentType::SocialSecurityCard => &[
            ("social_security_number", "ssn"),
            ("first_name", "first_name"),
            ("last_name", "last_name"),
        ],
        DocumentType::ProofOfAddress => &[
            ("street", "street_address"),
            ("city", "city"),
            ("state", "state"),
            ("zip_code", "zip_code"),
            ("country", "country"),
        ],
        DocumentType::EmploymentVerification => &[
            ("employer", "employer"),
            ("position", "position"),
            ("salary", "salary"),
            ("start_date", "start_date"),
        ],
        DocumentType::BankStatement => &[
            ("bank_name", "bank_name"),
            ("account_number", "account_number"),
            ("balance", "balance"),
            ("statement_date", "statement_date"),
        ],
    }
}

/// Project raw entities onto the field set of `doc_type`.
///
/// Entities outside the type's field set are dropped. No entities at all
/// yields empty data.
pub fn map_entities(doc_type: DocumentType, raw: &RawEntities) -> ExtractedData {
    let mut data = ExtractedData::new();
    if raw.is_empty() {
        return data;
    }
    for (field, entity) in field_map(doc_type) {
        data.insert_opt(field, raw.get(*entity));
    }
    data
}
