//! Activity insight classification
//!
//! Classifies today's steps against the daily goal into one of three tiers
//! and renders a one-sentence message for each.

use crate::activity::{DailyRecord, HealthSnapshot, DAILY_STEP_GOAL};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Activity tier relative to the daily step goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityTier {
    /// Below half of the goal
    LowActivity,
    /// At least half of the goal, not yet reached
    OnTrack,
    /// Goal reached or exceeded
    GoalAchieved,
}

impl ActivityTier {
    /// Classify a step count against a goal
    pub fn classify(steps: u32, goal: u32) -> Self {
        let steps = steps as f64;
        let goal = goal as f64;
        if steps < goal * 0.5 {
            ActivityTier::LowActivity
        } else if steps < goal {
            ActivityTier::OnTrack
        } else {
            ActivityTier::GoalAchieved
        }
    }

    /// One-sentence message for this tier
    pub fn message(&self) -> &'static str {
        match self {
            ActivityTier::LowActivity => {
                "You're below half of your daily step goal, so a short walk could give your activity a boost."
            }
            ActivityTier::OnTrack => {
                "You're on track toward your daily step goal, keep up the steady movement."
            }
            ActivityTier::GoalAchieved => {
                "Great job, you've reached your daily step goal today!"
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityTier::LowActivity => "low_activity",
            ActivityTier::OnTrack => "on_track",
            ActivityTier::GoalAchieved => "goal_achieved",
        }
    }
}

impl fmt::Display for ActivityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate the insight sentence for today's snapshot
///
/// The tier is decided by today's steps alone; the history window is
/// accepted so callers can hand over the full view, but the weekly average
/// does not take part in the classification.
pub fn generate_insight(snapshot: &HealthSnapshot, _history: &[DailyRecord]) -> String {
    ActivityTier::classify(snapshot.steps, DAILY_STEP_GOAL)
        .message()
        .to_string()
}
