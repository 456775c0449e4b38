//! Merge fields from scanned documents into one customer record.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use crate::model::{CustomerData, Document, DocumentType};

/// Used when no document supplies an email address.
pub const PLACEHOLDER_EMAIL: &str = "customer@example.com";
/// Used when no document supplies a phone number.
pub const PLACEHOLDER_PHONE: &str = "555-0123";

/// Build a customer record from documents, in order.
///
/// Later documents overwrite earlier ones field by field; absent fields
/// never clear a value. The documents are moved into the record.
pub fn compile_customer_data(documents: Vec<Document>) -> CustomerData {
    let mut customer = CustomerData::empty();

    for doc in &documents {
        let data = &doc.extracted_data;
        let set = |target: &mut String, key: &str| {
            if let Some(v) = data.get(key) {
                *target = v.to_string();
            }
        };

        match doc.doc_type {
            DocumentType::DriversLicense | DocumentType::Passport => {
                set(&mut customer.first_name, "first_name");
                set(&mut customer.last_name, "last_name");
                set(&mut customer.date_of_birth, "date_of_birth");
                set(&mut customer.address.street, "address");
            }
            DocumentType::SocialSecurityCard => {
                set(&mut customer.social_security_number, "social_security_number");
            }
            DocumentType::ProofOfAddress => {
                set(&mut customer.address.street, "street");
                set(&mut customer.address.city, "city");
                set(&mut customer.address.state, "state");
                set(&mut customer.address.zip_code, "zip_code");
            }
            DocumentType::EmploymentVerification => {
                let employment = &mut customer.employment_info;
                set(&mut employment.employer, "employer");
                set(&mut employment.position, "position");
                set(&mut employment.employment_start_date, "start_date");
                if let Some(income) = data.get("salary").and_then(parse_amount) {
                    employment.annual_income = income;
                }
            }
            DocumentType::BankStatement => {}
        }
    }

    if customer.email.is_empty() {
        customer.email = PLACEHOLDER_EMAIL.to_string();
    }
    if customer.phone_number.is_empty() {
        customer.phone_number = PLACEHOLDER_PHONE.to_string();
    }

    debug!(
        customer_id = %customer.id,
        documents = documents.len(),
        "Customer data compiled"
    );
    customer.documents = documents;
    customer
}

/// Parse a money amount such as `$85,000.00`. Unparsable input gives `None`.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::model::ExtractedData;

    fn doc(doc_type: DocumentType, pairs: &[(&str, &str)]) -> Document {
        Document::new(doc_type, "f", pairs.iter().copied().collect::<ExtractedData>())
    }

    #[test]
    fn merges_fields_across_documents() {
        let customer = compile_customer_data(vec![
            doc(
                DocumentType::DriversLicense,
                &[("first_name", "Jane"), ("last_name", "Doe"), ("address", "9 Old Rd")],
            ),
            doc(DocumentType::SocialSecurityCard, &[("social_security_number", "123-45-6789")]),
            doc(
                DocumentType::ProofOfAddress,
                &[("street", "1 Main St"), ("city", "Springfield"), ("state", "IL"), ("zip_code", "62701")],
            ),
            doc(
                DocumentType::EmploymentVerification,
                &[("employer", "Acme"), ("position", "Engineer"), ("salary", "$85,000"), ("start_date", "2020-01-01")],
            ),
        ]);

        assert_eq!(customer.first_name, "Jane");
        assert_eq!(customer.social_security_number, "123-45-6789");
        // Proof of address came later and wins over the license address.
        assert_eq!(customer.address.street, "1 Main St");
        assert_eq!(customer.address.zip_code, "62701");
        assert_eq!(customer.employment_info.annual_income, dec!(85000));
        assert_eq!(customer.employment_info.employment_start_date, "2020-01-01");
        assert_eq!(customer.documents.len(), 4);
    }

    #[test]
    fn missing_fields_do_not_clear_earlier_values() {
        let customer = compile_customer_data(vec![
            doc(DocumentType::Passport, &[("first_name", "Jane"), ("last_name", "Doe")]),
            doc(DocumentType::DriversLicense, &[("license_number", "D1")]),
        ]);
        assert_eq!(customer.first_name, "Jane");
        assert_eq!(customer.last_name, "Doe");
    }

    #[test]
    fn compiled_customer_serializes_without_raw_ssn() {
        let customer = compile_customer_data(vec![doc(
            DocumentType::SocialSecurityCard,
            &[("social_security_number", "123-45-6789")],
        )]);
        assert_eq!(customer.social_security_number, "123-45-6789");

        let json = serde_json::to_string(&customer).unwrap();
        assert!(!json.contains("123-45-6789"));
        assert!(json.contains("***-**-6789"));
    }

    #[test]
    fn placeholders_fill_contact_fields() {
        let customer = compile_customer_data(vec![]);
        assert_eq!(customer.email, PLACEHOLDER_EMAIL);
        assert_eq!(customer.phone_number, PLACEHOLDER_PHONE);
        assert_eq!(customer.address.country, "USA");
    }

    #[test]
    fn unparsable_salary_is_ignored() {
        let customer = compile_customer_data(vec![doc(
            DocumentType::EmploymentVerification,
            &[("salary", "competitive")],
        )]);
        assert_eq!(customer.employment_info.annual_income, Decimal::ZERO);
    }

    #[test]
    fn parse_amounts() {
        assert_eq!(parse_amount("$1,234.50"), Some(dec!(1234.50)));
        assert_eq!(parse_amount("72000"), Some(dec!(72000)));
        assert_eq!(parse_amount("n/a"), None);
    }
}
