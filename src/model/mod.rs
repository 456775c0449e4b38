//! Onboarding data model — documents, customers, accounts, and pipeline results.

pub mod account;
pub mod customer;
pub mod document;
pub mod result;

pub use account::{AccountStatus, AccountType, BankAccount};
pub use customer::{Address, CustomerData, EmploymentInfo};
pub use document::{Document, DocumentType, ExtractedData, UploadedFile, VerificationStatus};
pub use result::{ProcessingResult, ProcessingStatus};
