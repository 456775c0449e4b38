//! Onboarding pipeline.
//!
//! Every upload batch flows through:
//! 1. `DocumentScanner::scan_documents()` — classify and extract
//! 2. `Validator::validate_documents()` — per-document rules
//! 3. `compile_customer_data()` — merge fields into one record
//! 4. `Validator::validate_customer_data()` — whole-record checks
//! 5. `AccountService::create_account()` — pending checking account
//! 6. `AccountService::activate_account()` — only if every document verified

pub mod compile;
pub mod coordinator;

pub use compile::{compile_customer_data, parse_amount};
pub use coordinator::Coordinator;
