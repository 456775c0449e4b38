//! Document scanning — classify uploads, extract fields, build `Document`s.
//!
//! Each upload flows through:
//! 1. `identify_document_type()` — filename keywords
//! 2. `Extractor::extract()` — Document AI or the plain-text fallback
//! 3. `map_entities()` — per-type field projection

pub mod classify;
pub mod docai;
pub mod extractor;
pub mod mapping;
pub mod text;

pub use classify::{identify_document_type, mime_type_for, resolve_mime_type};
pub use docai::DocumentAiExtractor;
pub use extractor::{Extractor, RawEntities};
pub use mapping::map_entities;
pub use text::PlainTextExtractor;

use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use crate::config::DocumentAiConfig;
use crate::error::ExtractionError;
use crate::model::{Document, ExtractedData, UploadedFile};

/// Scans uploaded files into documents.
pub struct DocumentScanner {
    extractor: Arc<dyn Extractor>,
}

impl DocumentScanner {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self { extractor }
    }

    /// Pick the extractor from configuration: Document AI when configured,
    /// plain text otherwise.
    pub fn from_config(config: Option<&DocumentAiConfig>) -> Result<Self, ExtractionError> {
        let extractor: Arc<dyn Extractor> = match config {
            Some(cfg) => Arc::new(DocumentAiExtractor::new(cfg.clone())?),
            None => Arc::new(PlainTextExtractor::new()),
        };
        info!(backend = extractor.name(), "Document scanner ready");
        Ok(Self::new(extractor))
    }

    pub fn backend_name(&self) -> &str {
        self.extractor.name()
    }

    /// Extract fields from a single file.
    pub async fn extract_fields(&self, file: &UploadedFile) -> Result<Document, ExtractionError> {
        let doc_type = identify_document_type(&file.file_name);
        let raw = self.extractor.extract(file, doc_type).await?;
        Ok(Document::new(doc_type, &file.file_name, map_entities(doc_type, &raw)))
    }

    /// Scan every file, concurrently, preserving input order.
    ///
    /// A file whose extraction fails still yields a document, with empty
    /// extracted data, so it surfaces as rejected instead of vanishing.
    pub async fn scan_documents(&self, files: &[UploadedFile]) -> Vec<Document> {
        let results = join_all(files.iter().map(|f| self.extract_fields(f))).await;

        files
            .iter()
            .zip(results)
            .map(|(file, result)| match result {
                Ok(doc) => {
                    info!(
                        file = %file.file_name,
                        doc_type = %doc.doc_type,
                        fields = doc.extracted_data.len(),
                        "Document scanned"
                    );
                    doc
                }
                Err(e) => {
                    warn!(file = %file.file_name, error = %e, "Document extraction failed");
                    Document::new(
                        identify_document_type(&file.file_name),
                        &file.file_name,
                        ExtractedData::new(),
                    )
                }
            })
            .collect()
    }
}
