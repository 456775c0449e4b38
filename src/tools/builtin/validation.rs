//! `validate_document` and `validate_customer_data`.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::model::{CustomerData, Document};
use crate::tools::tool::{Tool, ToolDomain, ToolError, ToolOutput, require_object};
use crate::validation::{ValidationReport, Validator};

fn report_json(report: &ValidationReport) -> serde_json::Value {
    serde_json::json!({
        "valid": report.is_valid(),
        "issues": report.issues,
        "warnings": report.warnings,
    })
}

/// Checks one document against its type's rules.
pub struct ValidateDocumentTool {
    validator: Arc<Validator>,
}

impl ValidateDocumentTool {
    pub fn new(validator: Arc<Validator>) -> Self {
        Self { validator }
    }
}

#[async_trait]
impl Tool for ValidateDocumentTool {
    fn name(&self) -> &str {
        "validate_document"
    }

    fn description(&self) -> &str {
        "Validate a single document for completeness and accuracy"
    }

    fn domain(&self) -> ToolDomain {
        ToolDomain::Validation
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "document": {
                    "type": "object",
                    "description": "A scanned document as returned by process_document"
                }
            },
            "required": ["document"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();
        let document: Document = require_object(&params, "document")?;
        let report = self.validator.validate_document(&document);
        Ok(ToolOutput::success(report_json(&report), start.elapsed()))
    }
}

/// Checks a compiled customer record.
pub struct ValidateCustomerTool {
    validator: Arc<Validator>,
}

impl ValidateCustomerTool {
    pub fn new(validator: Arc<Validator>) -> Self {
        Self { validator }
    }
}

#[async_trait]
impl Tool for ValidateCustomerTool {
    fn name(&self) -> &str {
        "validate_customer_data"
    }

    fn description(&self) -> &str {
        "Validate complete customer data for account creation"
    }

    fn domain(&self) -> ToolDomain {
        ToolDomain::Validation
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "customer": {
                    "type": "object",
                    "description": "Customer record: names, date_of_birth, email, phone_number, address, employment_info, documents"
                }
            },
            "required": ["customer"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();
        let customer: CustomerData = require_object(&params, "customer")?;
        let report = self.validator.validate_customer_data(&customer);
        Ok(ToolOutput::success(report_json(&report), start.elapsed()))
    }
}
