//! REST handlers.

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::AppState;
use super::error::ApiError;
use super::extract::{ApiJson, ApiQuery};
use super::upload::read_documents;
use crate::agents;
use crate::model::AccountStatus;

type ApiResult = Result<Json<Value>, ApiError>;

/// Default and maximum page size for the run history.
const DEFAULT_RUN_LIMIT: usize = 20;
const MAX_RUN_LIMIT: usize = 100;

/// POST /api/process-documents
///
/// Runs the full onboarding workflow over the uploaded documents.
pub async fn process_documents(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult {
    let files = read_documents(multipart).await?;
    info!(files = files.len(), "Processing onboarding upload");

    let result = state.coordinator.process_new_customer(files).await;
    Ok(Json(serde_json::json!({"success": true, "data": result})))
}

/// POST /api/test/document-scanner
///
/// Scans documents without validating them or opening an account.
pub async fn test_document_scanner(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult {
    let files = read_documents(multipart).await?;
    let documents = state.coordinator.scanner().scan_documents(&files).await;
    Ok(Json(serde_json::json!({
        "success": true,
        "scanned_documents": documents,
    })))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "service": state.service_name,
        "scanner_backend": state.coordinator.scanner().backend_name(),
    }))
}

/// GET /api/agents/status
pub async fn agents_status() -> Json<Value> {
    let mut body = agents::agent_statuses();
    body.insert("timestamp".to_string(), serde_json::json!(Utc::now()));
    Json(Value::Object(body))
}

/// GET /api/agents
pub async fn list_agents(State(state): State<AppState>) -> Json<Value> {
    let agents = agents::describe_agents(&state.tools).await;
    Json(serde_json::json!({"agents": agents}))
}

/// GET /api/tools
pub async fn list_tools(State(state): State<AppState>) -> Json<Value> {
    let tools = state.tools.tool_definitions().await;
    Json(serde_json::json!({"tools": tools}))
}

/// POST /api/tools/{name}
///
/// Body is the tool's parameter object.
pub async fn invoke_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    ApiJson(params): ApiJson<Value>,
) -> ApiResult {
    let tool = state
        .tools
        .get(&name)
        .await
        .ok_or_else(|| ApiError::not_found(format!("Unknown tool: {name}")))?;

    let output = tool.execute(params).await?;
    info!(tool = %name, duration_ms = output.duration_ms, "Tool executed");
    Ok(Json(serde_json::json!({
        "success": true,
        "tool": name,
        "result": output.result,
        "duration_ms": output.duration_ms,
    })))
}

/// GET /api/accounts/{number}
pub async fn get_account(State(state): State<AppState>, Path(number): Path<String>) -> ApiResult {
    let account = state
        .coordinator
        .accounts()
        .get_account(&number)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Account {number} not found")))?;
    Ok(Json(serde_json::json!({"success": true, "account": account})))
}

/// POST /api/accounts/{number}/activate
pub async fn activate_account(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> ApiResult {
    let account = state.coordinator.accounts().activate_account(&number).await?;
    Ok(Json(serde_json::json!({"success": true, "account": account})))
}

#[derive(Deserialize)]
pub struct StatusRequest {
    status: String,
}

/// POST /api/accounts/{number}/status
pub async fn update_account_status(
    State(state): State<AppState>,
    Path(number): Path<String>,
    ApiJson(body): ApiJson<StatusRequest>,
) -> ApiResult {
    let status: AccountStatus = body.status.parse()?;
    let account = state
        .coordinator
        .accounts()
        .update_status(&number, status)
        .await?;
    Ok(Json(serde_json::json!({"success": true, "account": account})))
}

/// GET /api/customers/{id}/accounts
pub async fn customer_accounts(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> ApiResult {
    let accounts = state
        .coordinator
        .accounts()
        .accounts_for_customer(&customer_id)
        .await?;
    Ok(Json(serde_json::json!({"success": true, "accounts": accounts})))
}

#[derive(Deserialize)]
pub struct RunsQuery {
    limit: Option<usize>,
}

/// GET /api/runs?limit=N
///
/// Most recent onboarding runs, newest first.
pub async fn recent_runs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RunsQuery>,
) -> ApiResult {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RUN_LIMIT)
        .clamp(1, MAX_RUN_LIMIT);
    let runs = state.db.recent_runs(limit).await?;
    Ok(Json(serde_json::json!({"success": true, "runs": runs})))
}
