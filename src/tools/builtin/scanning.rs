//! `process_document` — scan a single file.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::model::UploadedFile;
use crate::scanner::DocumentScanner;
use crate::tools::tool::{Tool, ToolDomain, ToolError, ToolOutput, require_str};

/// Scans one document and returns its extracted fields.
pub struct ProcessDocumentTool {
    scanner: Arc<DocumentScanner>,
}

impl ProcessDocumentTool {
    pub fn new(scanner: Arc<DocumentScanner>) -> Self {
        Self { scanner }
    }
}

#[async_trait]
impl Tool for ProcessDocumentTool {
    fn name(&self) -> &str {
        "process_document"
    }

    fn description(&self) -> &str {
        "Process and extract data from an uploaded document. The document type is \
         inferred from the filename."
    }

    fn domain(&self) -> ToolDomain {
        ToolDomain::Scanning
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "filename": {
                    "type": "string",
                    "description": "Original file name, used to classify the document"
                },
                "content": {
                    "type": "string",
                    "description": "Plain-text file content"
                },
                "content_base64": {
                    "type": "string",
                    "description": "Base64-encoded file content (takes precedence over content)"
                }
            },
            "required": ["filename"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();
        let filename = require_str(&params, "filename")?;

        let content = if let Some(b64) = params.get("content_base64").and_then(|v| v.as_str()) {
            BASE64
                .decode(b64)
                .map_err(|e| ToolError::InvalidParameters(format!("content_base64: {e}")))?
        } else if let Some(text) = params.get("content").and_then(|v| v.as_str()) {
            text.as_bytes().to_vec()
        } else {
            return Err(ToolError::InvalidParameters(
                "one of 'content' or 'content_base64' is required".into(),
            ));
        };

        let file = UploadedFile::new(filename, content);
        let document = self
            .scanner
            .extract_fields(&file)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        let result = serde_json::to_value(&document)
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
        Ok(ToolOutput::success(result, start.elapsed()))
    }
}
