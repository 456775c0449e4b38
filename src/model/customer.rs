//! Customer record compiled from scanned documents.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use super::document::Document;

/// Postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "USA".to_string()
}

impl Default for Address {
    fn default() -> Self {
        Self {
            street: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: default_country(),
        }
    }
}

/// Employment details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentInfo {
    #[serde(default)]
    pub employer: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub annual_income: Decimal,
    #[serde(default)]
    pub employment_start_date: String,
}

/// Everything known about an applicant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerData {
    pub id: Uuid,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: String,
    /// Masked to the last four digits when serialized.
    #[serde(default, serialize_with = "serialize_masked_ssn")]
    pub social_security_number: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub employment_info: EmploymentInfo,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl CustomerData {
    /// An empty record with a fresh id.
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: String::new(),
            last_name: String::new(),
            date_of_birth: String::new(),
            social_security_number: String::new(),
            address: Address::default(),
            phone_number: String::new(),
            email: String::new(),
            employment_info: EmploymentInfo::default(),
            documents: Vec::new(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Mask an SSN down to `***-**-NNNN`. Short or empty values stay empty.
pub fn mask_ssn(ssn: &str) -> String {
    let digits: String = ssn.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return String::new();
    }
    format!("***-**-{}", &digits[digits.len() - 4..])
}

fn serialize_masked_ssn<S: Serializer>(ssn: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&mask_ssn(ssn))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_dashed_and_plain_ssn() {
        assert_eq!(mask_ssn("123-45-6789"), "***-**-6789");
        assert_eq!(mask_ssn("123456789"), "***-**-6789");
        assert_eq!(mask_ssn(""), "");
        assert_eq!(mask_ssn("12"), "");
    }

    #[test]
    fn serialized_customer_never_contains_full_ssn() {
        use crate::model::{DocumentType, ExtractedData};

        let mut customer = CustomerData::empty();
        customer.social_security_number = "123-45-6789".into();
        let card: ExtractedData = [("social_security_number", "123-45-6789")]
            .into_iter()
            .collect();
        customer
            .documents
            .push(Document::new(DocumentType::SocialSecurityCard, "ssn.pdf", card));

        let json = serde_json::to_string(&customer).unwrap();
        assert!(!json.contains("123-45-6789"));
        assert!(json.contains("***-**-6789"));
    }

    #[test]
    fn address_defaults_to_usa() {
        let addr: Address = serde_json::from_str(r#"{"street": "1 Main St"}"#).unwrap();
        assert_eq!(addr.country, "USA");
        assert_eq!(addr.street, "1 Main St");
    }

    #[test]
    fn full_name_trims_missing_parts() {
        let mut customer = CustomerData::empty();
        customer.first_name = "Jane".into();
        assert_eq!(customer.full_name(), "Jane");
    }
}
