use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use bank_onboard::accounts::AccountService;
use bank_onboard::api::{AppState, api_routes};
use bank_onboard::config::ServiceConfig;
use bank_onboard::pipeline::Coordinator;
use bank_onboard::scanner::DocumentScanner;
use bank_onboard::store::{Database, LibSqlBackend};
use bank_onboard::tools::ToolRegistry;
use bank_onboard::tools::builtin::register_pipeline_tools;
use bank_onboard::validation::Validator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env().context("invalid configuration")?;

    // Initialize tracing; the guard must live until shutdown to flush file logs.
    let _log_guard = init_tracing(&config);

    eprintln!("🏦 Bank Onboard v{}", env!("CARGO_PKG_VERSION"));

    // ── Database ─────────────────────────────────────────────────────────
    let db: Arc<dyn Database> = Arc::new(
        LibSqlBackend::new_local(&config.db_path)
            .await
            .with_context(|| format!("failed to open database at {}", config.db_path.display()))?,
    );
    eprintln!("   Database: {}", config.db_path.display());

    // ── Agents ───────────────────────────────────────────────────────────
    let scanner = Arc::new(
        DocumentScanner::from_config(config.document_ai.as_ref())
            .context("failed to build document scanner")?,
    );
    eprintln!("   Scanner: {}", scanner.backend_name());

    let validator = Arc::new(Validator::default());
    let accounts = Arc::new(AccountService::new(Arc::clone(&db)));
    let coordinator = Arc::new(Coordinator::new(
        scanner,
        validator,
        accounts,
        Arc::clone(&db),
    ));

    // ── Tools ────────────────────────────────────────────────────────────
    let tools = Arc::new(ToolRegistry::new());
    register_pipeline_tools(&tools, &coordinator);
    eprintln!("   Tools: {} registered", tools.count());

    // ── HTTP ─────────────────────────────────────────────────────────────
    let app = api_routes(
        AppState::new(coordinator, tools, db),
        config.max_upload_bytes,
    );

    let addr = format!("{}:{}", config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    eprintln!("   API: http://{}/api/health\n", addr);
    tracing::info!(addr = %addr, "Bank onboarding service started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

/// Stderr logging always; daily-rotated file logging when a log dir is set.
fn init_tracing(config: &ServiceConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "bank-onboard.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(filter).with(stderr).init();
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
