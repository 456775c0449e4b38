//! Extraction backend abstraction.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::ExtractionError;
use crate::model::{DocumentType, UploadedFile};

/// Entity type → mention text, as reported by an extraction backend.
pub type RawEntities = HashMap<String, String>;

/// A backend that turns document bytes into raw entities.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Extract raw entities from a file already classified as `doc_type`.
    async fn extract(
        &self,
        file: &UploadedFile,
        doc_type: DocumentType,
    ) -> Result<RawEntities, ExtractionError>;
}
