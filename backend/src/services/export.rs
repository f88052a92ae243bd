//! History export service
//!
//! Supports multiple formats:
//! - JSON: the window plus weekly average
//! - CSV: `date,steps,calories` rows for spreadsheets

use crate::error::ApiError;
use crate::services::HealthMetricsService;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wellness_shared::activity::{weekly_average, DailyRecord};

/// Complete history export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryExport {
    pub export_version: String,
    pub exported_at: DateTime<Utc>,
    pub source: String,
    pub weekly_average: u32,
    pub days: Vec<DailyRecord>,
}

/// Export service
pub struct ExportService;

impl ExportService {
    /// Export the current window as a structured document
    pub fn export_json(tracker: &HealthMetricsService) -> HistoryExport {
        let days = tracker.history();
        HistoryExport {
            export_version: "1.0".to_string(),
            exported_at: Utc::now(),
            source: tracker.source_name().to_string(),
            weekly_average: weekly_average(&days),
            days,
        }
    }

    /// Export the current window as CSV with a header row
    pub fn export_csv(tracker: &HealthMetricsService) -> Result<String, ApiError> {
        Self::to_csv(&tracker.history())
    }

    fn to_csv(days: &[DailyRecord]) -> Result<String, ApiError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in days {
            wtr.serialize(record).map_err(|e| {
                ApiError::Internal(anyhow::anyhow!("CSV serialization error: {}", e))
            })?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV flush error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV encoding error: {}", e)))
    }
}
