//! Tool trait — a named, JSON-in/JSON-out capability of an agent.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

/// Errors a tool can return.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Successful tool output.
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutput {
    pub result: serde_json::Value,
    pub duration_ms: u64,
}

impl ToolOutput {
    pub fn success(result: serde_json::Value, duration: Duration) -> Self {
        Self {
            result,
            duration_ms: duration.as_millis() as u64,
        }
    }
}

/// Which agent owns a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolDomain {
    Scanning,
    Validation,
    Accounts,
}

/// Tool definition as advertised to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub domain: ToolDomain,
    pub parameters: serde_json::Value,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn domain(&self) -> ToolDomain;

    /// JSON schema of the accepted parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError>;
}

/// Fetch a required string parameter.
pub fn require_str<'a>(params: &'a serde_json::Value, key: &str) -> Result<&'a str, ToolError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::InvalidParameters(format!("missing string parameter '{key}'")))
}

/// Deserialize a required object parameter.
pub fn require_object<T: serde::de::DeserializeOwned>(
    params: &serde_json::Value,
    key: &str,
) -> Result<T, ToolError> {
    let value = params
        .get(key)
        .ok_or_else(|| ToolError::InvalidParameters(format!("missing parameter '{key}'")))?;
    serde_json::from_value(value.clone())
        .map_err(|e| ToolError::InvalidParameters(format!("'{key}' is malformed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_str_rejects_missing_and_empty() {
        let params = serde_json::json!({"a": "x", "b": "", "c": 3});
        assert_eq!(require_str(&params, "a").unwrap(), "x");
        assert!(require_str(&params, "b").is_err());
        assert!(require_str(&params, "c").is_err());
        assert!(require_str(&params, "d").is_err());
    }
}
