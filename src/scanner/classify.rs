//! Filename-based document classification.

use crate::model::{DocumentType, UploadedFile};

/// Sent when neither the extension nor the client names a usable type.
const DEFAULT_MIME_TYPE: &str = "application/pdf";

/// Keyword table, checked in order; the first hit wins.
const KEYWORDS: &[(DocumentType, &[&str])] = &[
    (DocumentType::DriversLicense, &["license", "dl", "driver"]),
    (DocumentType::Passport, &["passport"]),
    (DocumentType::SocialSecurityCard, &["ssn", "social", "security"]),
    (DocumentType::ProofOfAddress, &["address", "utility", "bill"]),
    (DocumentType::EmploymentVerification, &["employment", "pay", "salary"]),
    (DocumentType::BankStatement, &["bank", "statement"]),
];

/// Identify a document's type from its filename.
///
/// Matching is a case-insensitive substring search. Files that match
/// nothing are treated as driver's licenses.
pub fn identify_document_type(file_name: &str) -> DocumentType {
    let lower = file_name.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(doc_type, _)| *doc_type)
        .unwrap_or(DocumentType::DriversLicense)
}

/// MIME type from the file extension. Unknown extensions are sent as PDF.
pub fn mime_type_for(file_name: &str) -> &'static str {
    known_mime_type(file_name).unwrap_or(DEFAULT_MIME_TYPE)
}

/// MIME type for an upload: a known extension wins, then the type the
/// client declared, then PDF.
pub fn resolve_mime_type(file: &UploadedFile) -> &str {
    if let Some(mime) = known_mime_type(&file.file_name) {
        return mime;
    }
    file.content_type
        .as_deref()
        .map(str::trim)
        .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream")
        .unwrap_or(DEFAULT_MIME_TYPE)
}

fn known_mime_type(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    match ext.to_lowercase().as_str() {
        "pdf" => Some("application/pdf"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "tiff" | "tif" => Some("image/tiff"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_keyword() {
        assert_eq!(identify_document_type("Drivers_License.jpg"), DocumentType::DriversLicense);
        assert_eq!(identify_document_type("my-passport.pdf"), DocumentType::Passport);
        assert_eq!(identify_document_type("ssn_card.png"), DocumentType::SocialSecurityCard);
        assert_eq!(identify_document_type("utility-june.pdf"), DocumentType::ProofOfAddress);
        assert_eq!(identify_document_type("salary_letter.pdf"), DocumentType::EmploymentVerification);
        assert_eq!(identify_document_type("statement_2024.pdf"), DocumentType::BankStatement);
    }

    #[test]
    fn earlier_rules_win() {
        // "bank" would match bank_statement, but "bill" is checked first.
        assert_eq!(identify_document_type("bank_bill.pdf"), DocumentType::ProofOfAddress);
        // "dl" is a substring of "handle" and wins over everything else.
        assert_eq!(identify_document_type("handle_passport.pdf"), DocumentType::DriversLicense);
    }

    #[test]
    fn unknown_names_default_to_drivers_license() {
        assert_eq!(identify_document_type("scan0001.tif"), DocumentType::DriversLicense);
    }

    #[test]
    fn mime_types() {
        assert_eq!(mime_type_for("a.PDF"), "application/pdf");
        assert_eq!(mime_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(mime_type_for("a.tif"), "image/tiff");
        assert_eq!(mime_type_for("a.txt"), "text/plain");
        assert_eq!(mime_type_for("noext"), "application/pdf");
        assert_eq!(mime_type_for("a.docx"), "application/pdf");
    }

    fn upload(name: &str, content_type: Option<&str>) -> UploadedFile {
        let file = UploadedFile::new(name, b"x".to_vec());
        match content_type {
            Some(ct) => file.with_content_type(ct),
            None => file,
        }
    }

    #[test]
    fn declared_content_type_fills_unknown_extensions() {
        assert_eq!(resolve_mime_type(&upload("scan", Some("image/png"))), "image/png");
        assert_eq!(resolve_mime_type(&upload("a.jpg", Some("application/pdf"))), "image/jpeg");
        assert_eq!(
            resolve_mime_type(&upload("blob", Some("application/octet-stream"))),
            "application/pdf"
        );
        assert_eq!(resolve_mime_type(&upload("blob", Some("  "))), "application/pdf");
        assert_eq!(resolve_mime_type(&upload("blob", None)), "application/pdf");
    }
}
