//! Google Document AI extractor over the v1 REST API.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::DocumentAiConfig;
use crate::error::ExtractionError;
use crate::model::{DocumentType, UploadedFile};

use super::classify::resolve_mime_type;
use super::extractor::{Extractor, RawEntities};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessRequest<'a> {
    raw_document: RawDocument<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument<'a> {
    content: String,
    mime_type: &'a str,
}

#[derive(Deserialize)]
struct ProcessResponse {
    #[serde(default)]
    document: Option<ResponseDocument>,
}

#[derive(Deserialize)]
struct ResponseDocument {
    #[serde(default)]
    entities: Vec<Entity>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entity {
    #[serde(default, rename = "type")]
    entity_type: Option<String>,
    #[serde(default)]
    mention_text: Option<String>,
}

/// Document AI backed extractor.
pub struct DocumentAiExtractor {
    client: reqwest::Client,
    config: DocumentAiConfig,
}

impl DocumentAiExtractor {
    pub fn new(config: DocumentAiConfig) -> Result<Self, ExtractionError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ExtractionError::Network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn process_url(&self, processor_id: &str) -> String {
        format!(
            "{}/v1/{}:process",
            self.config.base_url(),
            self.config.processor_name(processor_id)
        )
    }

    /// One request, no retries.
    async fn process_once(
        &self,
        url: &str,
        body: &ProcessRequest<'_>,
        file_name: &str,
    ) -> Result<RawEntities, ExtractionError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(self.config.access_token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractionError::Timeout(self.config.request_timeout)
                } else {
                    ExtractionError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Service {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let parsed: ProcessResponse =
            response
                .json()
                .await
                .map_err(|e| ExtractionError::Processing {
                    file_name: file_name.to_string(),
                    reason: format!("unreadable response: {e}"),
                })?;

        Ok(collect_entities(parsed))
    }
}

/// Keep entities that carry both a type and mention text. Later duplicates win.
fn collect_entities(response: ProcessResponse) -> RawEntities {
    response
        .document
        .map(|doc| doc.entities)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|e| match (e.entity_type, e.mention_text) {
            (Some(t), Some(m)) if !t.is_empty() && !m.is_empty() => Some((t, m)),
            _ => None,
        })
        .collect()
}

#[async_trait]
impl Extractor for DocumentAiExtractor {
    fn name(&self) -> &str {
        "document-ai"
    }

    async fn extract(
        &self,
        file: &UploadedFile,
        doc_type: DocumentType,
    ) -> Result<RawEntities, ExtractionError> {
        let processor_id =
            self.config
                .processor_for(doc_type)
                .ok_or_else(|| ExtractionError::ProcessorNotConfigured {
                    doc_type: doc_type.to_string(),
                })?;
        let url = self.process_url(processor_id);
        let body = ProcessRequest {
            raw_document: RawDocument {
                content: BASE64.encode(&file.content),
                mime_type: resolve_mime_type(file),
            },
        };

        let retry = &self.config.retry;
        let mut attempt = 1;
        loop {
            match self.process_once(&url, &body, &file.file_name).await {
                Ok(entities) => {
                    debug!(
                        file = %file.file_name,
                        doc_type = %doc_type,
                        entities = entities.len(),
                        "Document AI extraction complete"
                    );
                    return Ok(entities);
                }
                Err(e) if e.is_retryable() && attempt < retry.max_attempts => {
                    let delay = retry.delay_for(attempt);
                    warn!(
                        file = %file.file_name,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Document AI request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) if e.is_retryable() => {
                    return Err(ExtractionError::RetriesExhausted {
                        attempts: attempt,
                        last: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}
