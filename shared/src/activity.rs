//! Step activity calculations module
//!
//! Provides the daily record and snapshot types along with the fixed
//! formulas used to derive calories, distance and active minutes from a
//! step count.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **Single Goal Constant**: The daily step goal lives here only
//! 3. **Type Safety**: Counts are unsigned, distances are kilometres

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Daily step goal shared by the insight generator and progress indicators
pub const DAILY_STEP_GOAL: u32 = 10_000;

/// Number of days kept in the rolling window (today included)
pub const HISTORY_DAYS: usize = 7;

/// Kilocalories burned per step
pub const CALORIES_PER_STEP: f64 = 0.04;

/// Kilometres covered per step
pub const KM_PER_STEP: f64 = 0.0008;

/// Steps that count as one active minute
pub const STEPS_PER_ACTIVE_MINUTE: u32 = 100;

// ============================================================================
// Formulas
// ============================================================================

/// Calories burned for a step count
///
/// Formula: calories = floor(steps × 0.04)
pub fn calories_for_steps(steps: u32) -> u32 {
    (steps as f64 * CALORIES_PER_STEP).floor() as u32
}

/// Distance walked in kilometres, rounded to 2 decimal places
///
/// Formula: distance = round(steps × 0.0008, 2)
pub fn distance_km(steps: u32) -> f64 {
    round_to_hundredths(steps as f64 * KM_PER_STEP)
}

/// Active minutes for a step count
///
/// Formula: active_minutes = floor(steps / 100)
pub fn active_minutes(steps: u32) -> u32 {
    steps / STEPS_PER_ACTIVE_MINUTE
}

/// Progress toward the daily goal as a percentage (not capped at 100)
pub fn goal_progress_percent(steps: u32) -> f64 {
    round_to_hundredths(steps as f64 / DAILY_STEP_GOAL as f64 * 100.0)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// Records
// ============================================================================

/// One calendar day of step activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Calendar day, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    pub steps: u32,
    /// Always `calories_for_steps(steps)`
    pub calories: u32,
}

impl DailyRecord {
    /// Create a record with derived calories
    pub fn new(date: NaiveDate, steps: u32) -> Self {
        Self {
            date,
            steps,
            calories: calories_for_steps(steps),
        }
    }

    /// Replace the step count, keeping calories consistent
    pub fn set_steps(&mut self, steps: u32) {
        self.steps = steps;
        self.calories = calories_for_steps(steps);
    }
}

/// Point-in-time view of today's derived metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub steps: u32,
    pub calories: u32,
    pub distance_km: f64,
    pub active_minutes: u32,
}

impl HealthSnapshot {
    /// Derive a snapshot from today's step count
    pub fn from_steps(steps: u32) -> Self {
        Self {
            steps,
            calories: calories_for_steps(steps),
            distance_km: distance_km(steps),
            active_minutes: active_minutes(steps),
        }
    }
}

// ============================================================================
// Aggregation
// ============================================================================

/// Average daily steps over the window: floor(sum(steps) / 7)
///
/// Returns 0 for an empty slice. Windows of any other length are averaged
/// over their own length.
pub fn weekly_average(history: &[DailyRecord]) -> u32 {
    if history.is_empty() {
        return 0;
    }
    let total: u64 = history.iter().map(|r| r.steps as u64).sum();
    (total / history.len() as u64) as u32
}

/// Check the rolling window invariants: exactly 7 records, strictly
/// ascending dates
pub fn is_valid_window(history: &[DailyRecord]) -> bool {
    history.len() == HISTORY_DAYS && history.windows(2).all(|w| w[0].date < w[1].date)
}

/// Dates of the window ending at `today`, oldest first
pub fn window_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (0..HISTORY_DAYS as i64)
        .rev()
        .filter_map(|offset| today.checked_sub_signed(chrono::Duration::days(offset)))
        .collect()
}
