//! Step data API routes
//!
//! Read side of the tracker, polled by the dashboard.

use crate::error::ApiError;
use crate::services::ExportService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use wellness_shared::activity::{goal_progress_percent, weekly_average, DAILY_STEP_GOAL};
use wellness_shared::insight::{generate_insight, ActivityTier};
use wellness_shared::types::{
    HealthDataResponse, HistoryResponse, InsightResponse, SummaryResponse, SyncResponse,
};

/// Create step data routes
pub fn health_data_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_health_data))
        .route("/history", get(get_history))
        .route("/insight", get(get_insight))
        .route("/summary", get(get_summary))
        .route("/export.json", get(export_json))
        .route("/export.csv", get(export_csv))
        .route("/sync", post(sync_from_source))
}

/// GET /api/v1/health-data - Today's snapshot
async fn get_health_data(State(state): State<AppState>) -> Json<HealthDataResponse> {
    let tracker = state.tracker();
    let snapshot = tracker.snapshot();

    Json(HealthDataResponse {
        snapshot,
        goal: DAILY_STEP_GOAL,
        goal_progress_percent: goal_progress_percent(snapshot.steps),
        tracking: tracker.is_tracking(),
    })
}

/// GET /api/v1/health-data/history - The 7-day window, oldest first
async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let days = state.tracker().history();
    let weekly_average = weekly_average(&days);
    Json(HistoryResponse {
        days,
        weekly_average,
    })
}

/// GET /api/v1/health-data/insight - Tier and sentence for today
async fn get_insight(State(state): State<AppState>) -> Json<InsightResponse> {
    let (snapshot, history) = state.tracker().view();

    Json(InsightResponse {
        tier: ActivityTier::classify(snapshot.steps, DAILY_STEP_GOAL),
        message: generate_insight(&snapshot, &history),
        steps: snapshot.steps,
        goal: DAILY_STEP_GOAL,
        weekly_average: weekly_average(&history),
    })
}

/// GET /api/v1/health-data/summary - Pre-filled message for the chat hand-off
async fn get_summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        message: state.tracker().format_summary(),
    })
}

/// GET /api/v1/health-data/export.json - Export the window as JSON
async fn export_json(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let export = ExportService::export_json(state.tracker());

    let json = serde_json::to_string_pretty(&export)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("JSON serialization error: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"step-history.json\""),
    );

    Ok((headers, json))
}

/// GET /api/v1/health-data/export.csv - Export the window as CSV
async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let csv = ExportService::export_csv(state.tracker())?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"step-history.csv\""),
    );

    Ok((headers, csv))
}

/// POST /api/v1/health-data/sync - Pull readings from the step source
///
/// Source failures are not errors here: the response reports which parts
/// fell back to the current values.
async fn sync_from_source(State(state): State<AppState>) -> Json<SyncResponse> {
    let outcome = state.tracker().sync_from_source().await;

    Json(SyncResponse {
        current_from_source: outcome.current_from_source,
        history_from_source: outcome.history_from_source,
        snapshot: state.tracker().snapshot(),
    })
}
