use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chartflow_pipeline::{Generator, SchemaValidator, SqlExecutor};
use chartflow_providers::{fetch_schema_document, EngineClient, OpenAiGenerator};
use chartflow_store::{ResultStore, StoreJanitor};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chartflow_api::config::ServerConfig;
use chartflow_api::engine::{ChartAdjustmentFlow, ChartAdjustmentService, ChartFlow, ChartService};
use chartflow_api::router::build_app_router;
use chartflow_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    // `LOG_FORMAT=json` switches to one JSON object per line.
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chartflow_api=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Collaborators ---
    let http = reqwest::Client::new();

    let document = fetch_schema_document(&http, &config.chart.schema_url)
        .await
        .context("Failed to fetch chart schema document")?;
    let validator = Arc::new(
        SchemaValidator::new(&document).context("Failed to compile chart schema document")?,
    );
    tracing::info!(url = %config.chart.schema_url, "Chart schema compiled");

    let executor: Arc<dyn SqlExecutor> =
        Arc::new(EngineClient::with_client(http.clone(), &config.chart.engine_url));
    let generator: Arc<dyn Generator> = Arc::new(OpenAiGenerator::with_client(
        http.clone(),
        config.chart.llm.clone(),
    ));
    tracing::info!(
        engine_url = %config.chart.engine_url,
        model = %config.chart.llm.model,
        "Stage collaborators configured",
    );

    // --- Job services ---
    let chart_store = Arc::new(ResultStore::new(config.chart.store()));
    let adjustment_store = Arc::new(ResultStore::new(config.chart.store()));

    let charts = Arc::new(ChartService::new(
        Arc::clone(&chart_store),
        ChartFlow::new(
            Arc::clone(&executor),
            Arc::clone(&generator),
            Arc::clone(&validator),
        )
        .with_row_limit(config.chart.row_limit),
    ));
    let adjustments = Arc::new(ChartAdjustmentService::new(
        Arc::clone(&adjustment_store),
        ChartAdjustmentFlow::new(executor, generator, validator)
            .with_row_limit(config.chart.row_limit),
    ));

    // --- Store janitor ---
    let janitor_cancel = CancellationToken::new();
    let janitor = StoreJanitor::new(config.chart.purge_interval())
        .watch("charts", chart_store)
        .watch("chart_adjustments", adjustment_store);
    let janitor_handle = tokio::spawn(janitor.run(janitor_cancel.clone()));

    // --- Router ---
    let state = AppState {
        config: Arc::new(config.clone()),
        charts,
        adjustments,
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().context("Invalid HOST address")?,
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    janitor_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), janitor_handle).await;
    tracing::info!("Store janitor stopped");

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix). In-flight chart jobs
/// are not awaited; their records live only in memory.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
