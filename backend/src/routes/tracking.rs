//! Tracking control API routes
//!
//! Start/stop actions and the permission request. Permission gating lives
//! here rather than in the tracker: a start is refused only after an
//! explicit denial.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::info;
use wellness_shared::activity::DAILY_STEP_GOAL;
use wellness_shared::errors::TrackerError;
use wellness_shared::types::{PermissionResponse, TrackingStatusResponse};

/// Create tracking routes
pub fn tracking_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_status))
        .route("/permission", post(request_permission))
        .route("/start", post(start_tracking))
        .route("/stop", post(stop_tracking))
}

fn status(state: &AppState) -> TrackingStatusResponse {
    let tracker = state.tracker();
    TrackingStatusResponse {
        tracking: tracker.is_tracking(),
        permission_granted: tracker.permission_status(),
        source: tracker.source_name().to_string(),
        tick_period_ms: tracker.config().tick_period_ms,
        poll_interval_secs: tracker.config().poll_interval_secs,
        goal: DAILY_STEP_GOAL,
    }
}

/// GET /api/v1/tracking - Current state machine status
async fn get_status(State(state): State<AppState>) -> Json<TrackingStatusResponse> {
    Json(status(&state))
}

/// POST /api/v1/tracking/permission - Ask the step source for access
async fn request_permission(State(state): State<AppState>) -> Json<PermissionResponse> {
    let granted = state.tracker().request_permission().await;
    Json(PermissionResponse { granted })
}

/// POST /api/v1/tracking/start - Begin tracking (idempotent)
async fn start_tracking(State(state): State<AppState>) -> ApiResult<Json<TrackingStatusResponse>> {
    if state.tracker().permission_status() == Some(false) {
        info!("Start refused, step permission was denied");
        return Err(TrackerError::PermissionDenied(
            "Step tracking permission was denied".to_string(),
        )
        .into());
    }
    state.tracker().start();
    Ok(Json(status(&state)))
}

/// POST /api/v1/tracking/stop - Stop tracking (idempotent)
async fn stop_tracking(State(state): State<AppState>) -> Json<TrackingStatusResponse> {
    state.tracker().stop();
    Json(status(&state))
}
