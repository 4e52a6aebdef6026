use document_viewer::config::get_configuration;
use document_viewer::format::parse_locale;
use document_viewer::services::{metrics::init_metrics, HttpCaseStore, HttpDocumentStore};
use document_viewer::startup::Application;
use document_viewer::AppState;
use service_core::observability::init_tracing;
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let telemetry = &configuration.common.telemetry;
    init_tracing(
        "document-viewer",
        &telemetry.log_level,
        telemetry.otlp_endpoint.as_deref(),
    );

    init_metrics();

    let documents = Arc::new(HttpDocumentStore::new(&configuration.document_service)?);
    let cases = Arc::new(HttpCaseStore::new(&configuration.case_service)?);

    let state = AppState::new(
        documents,
        cases,
        configuration.view_settings(),
        parse_locale(&configuration.viewer.locale),
    );

    let app = Application::build(&configuration.common.host, configuration.common.port, state)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    tracing::info!(port = app.port(), "Starting document-viewer");
    app.run_until(shutdown_signal()).await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
