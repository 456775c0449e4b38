//! Bank Onboard — document-driven customer onboarding service.

pub mod accounts;
pub mod agents;
pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod scanner;
pub mod store;
pub mod tools;
pub mod validation;
