//! API request and response types

use crate::activity::{DailyRecord, HealthSnapshot};
use crate::insight::ActivityTier;
use serde::{Deserialize, Serialize};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Current day snapshot, polled by the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDataResponse {
    #[serde(flatten)]
    pub snapshot: HealthSnapshot,
    pub goal: u32,
    pub goal_progress_percent: f64,
    pub tracking: bool,
}

/// Rolling 7-day window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub days: Vec<DailyRecord>,
    pub weekly_average: u32,
}

/// Insight for today's activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightResponse {
    pub tier: ActivityTier,
    pub message: String,
    pub steps: u32,
    pub goal: u32,
    pub weekly_average: u32,
}

/// Pre-filled message for the chat hand-off
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub message: String,
}

/// Tracking state machine status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingStatusResponse {
    pub tracking: bool,
    /// `None` until a permission request has been made
    pub permission_granted: Option<bool>,
    pub source: String,
    pub tick_period_ms: u64,
    pub poll_interval_secs: u64,
    pub goal: u32,
}

/// Outcome of a permission request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionResponse {
    pub granted: bool,
}

/// Outcome of a pull from the step data source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Whether today's count came from the source rather than the fallback
    pub current_from_source: bool,
    /// Whether past days came from the source rather than the fallback
    pub history_from_source: bool,
    pub snapshot: HealthSnapshot,
}
