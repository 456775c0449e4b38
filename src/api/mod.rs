//! HTTP surface: router, shared state, and handlers.

pub mod error;
pub mod extract;
pub mod routes;
pub mod upload;

pub use error::ApiError;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::pipeline::Coordinator;
use crate::store::Database;
use crate::tools::ToolRegistry;

/// Name reported by the health endpoint.
pub const SERVICE_NAME: &str = "bank-onboard";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    pub tools: Arc<ToolRegistry>,
    pub db: Arc<dyn Database>,
    pub service_name: &'static str,
}

impl AppState {
    pub fn new(
        coordinator: Arc<Coordinator>,
        tools: Arc<ToolRegistry>,
        db: Arc<dyn Database>,
    ) -> Self {
        Self {
            coordinator,
            tools,
            db,
            service_name: SERVICE_NAME,
        }
    }
}

/// Build the Axum router with every REST route.
pub fn api_routes(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/process-documents", post(routes::process_documents))
        .route(
            "/api/test/document-scanner",
            post(routes::test_document_scanner),
        )
        .route("/api/agents", get(routes::list_agents))
        .route("/api/agents/status", get(routes::agents_status))
        .route("/api/tools", get(routes::list_tools))
        .route("/api/tools/{name}", post(routes::invoke_tool))
        .route("/api/accounts/{number}", get(routes::get_account))
        .route(
            "/api/accounts/{number}/activate",
            post(routes::activate_account),
        )
        .route(
            "/api/accounts/{number}/status",
            post(routes::update_account_status),
        )
        .route(
            "/api/customers/{id}/accounts",
            get(routes::customer_accounts),
        )
        .route("/api/runs", get(routes::recent_runs))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
