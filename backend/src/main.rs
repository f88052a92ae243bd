//! Wellness Step Tracker Backend
//!
//! Step tracking and aggregation service behind the wellness dashboard.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! - Routes: HTTP request handling and routing
//! - Services: the health metrics service and its summary/export helpers
//! - Sources: simulated or device-backed step data
//! - Scheduler: the repeating tick driving simulated steps

use anyhow::Result;
use chrono::Local;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wellness_backend::{
    config,
    routes,
    scheduler::TokioScheduler,
    services::{HealthMetricsService, TrackerSeed},
    sources,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        source = ?config.source.kind,
        "Starting Wellness Step Tracker Backend"
    );

    // Build the tracker with its collaborators
    let source = sources::from_config(&config.source, &config.tracker)?;
    let scheduler = Arc::new(TokioScheduler::from_current()?);
    let seed = TrackerSeed::from_source(Local::now().date_naive(), source.as_ref()).await;
    let tracker = Arc::new(HealthMetricsService::create(
        config.tracker.clone(),
        seed,
        source,
        scheduler,
    )?);

    // Pick up today's count; failures keep the seeded window
    let outcome = tracker.sync_from_source().await;
    info!(
        current_from_source = outcome.current_from_source,
        history_from_source = outcome.history_from_source,
        "Initial step sync complete"
    );

    // Metrics are optional - the API works without a recorder
    let mut state = AppState::new(tracker.clone());
    if let Some(handle) = install_metrics() {
        state = state.with_metrics(handle);
    }

    // Build application
    let app = routes::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracker.dispose();
    info!("Server shutdown complete");
    Ok(())
}

/// Install the Prometheus recorder with graceful fallback
fn install_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Failed to install metrics recorder: {}. /metrics will be unavailable.", e);
            None
        }
    }
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "wellness_backend=info,tower_http=info".into()
        } else {
            "wellness_backend=debug,tower_http=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
