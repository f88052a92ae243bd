//! Chat hand-off summary
//!
//! Renders today's snapshot, the 7-day window, the weekly average and the
//! insight sentence as plain text. The chat feature receives the string
//! as-is.

use std::fmt::Write;
use wellness_shared::activity::{weekly_average, DailyRecord, HealthSnapshot, DAILY_STEP_GOAL};
use wellness_shared::format::group_thousands;
use wellness_shared::insight::generate_insight;

/// Render the multi-section health summary
pub fn render_summary(snapshot: &HealthSnapshot, history: &[DailyRecord]) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Health Data Summary");
    let _ = writeln!(out);
    let _ = writeln!(out, "Today's Activity:");
    let _ = writeln!(
        out,
        "- Steps: {} (goal {})",
        group_thousands(snapshot.steps as u64),
        group_thousands(DAILY_STEP_GOAL as u64)
    );
    let _ = writeln!(
        out,
        "- Calories Burned: {} kcal",
        group_thousands(snapshot.calories as u64)
    );
    let _ = writeln!(out, "- Distance: {:.2} km", snapshot.distance_km);
    let _ = writeln!(
        out,
        "- Active Minutes: {} min",
        group_thousands(snapshot.active_minutes as u64)
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Last {} Days:", history.len());
    for record in history {
        let _ = writeln!(
            out,
            "- {}: {} steps, {} kcal",
            record.date,
            group_thousands(record.steps as u64),
            group_thousands(record.calories as u64)
        );
    }
    let _ = writeln!(
        out,
        "Weekly Average: {} steps/day",
        group_thousands(weekly_average(history) as u64)
    );
    let _ = writeln!(out);

    let _ = write!(out, "Insight: {}", generate_insight(snapshot, history));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wellness_shared::insight::ActivityTier;

    fn history(today_steps: u32) -> Vec<DailyRecord> {
        let mut days: Vec<DailyRecord> = (10..=15)
            .map(|d| DailyRecord::new(NaiveDate::from_ymd_opt(2024, 6, d).unwrap(), 7_000))
            .collect();
        days.push(DailyRecord::new(NaiveDate::from_ymd_opt(2024, 6, 16).unwrap(), today_steps));
        days
    }

    #[test]
    fn test_summary_sections() {
        let snapshot = HealthSnapshot::from_steps(12_000);
        let summary = render_summary(&snapshot, &history(12_000));

        assert!(summary.starts_with("Health Data Summary"));
        assert!(summary.contains("- Steps: 12,000 (goal 10,000)"));
        assert!(summary.contains("- Calories Burned: 480 kcal"));
        assert!(summary.contains("- Distance: 9.60 km"));
        assert!(summary.contains("- Active Minutes: 120 min"));
        assert!(summary.contains("Last 7 Days:"));
        assert!(summary.contains("- 2024-06-10: 7,000 steps, 280 kcal"));
        assert!(summary.contains("- 2024-06-16: 12,000 steps, 480 kcal"));
        // (6 * 7000 + 12000) / 7 = 7714
        assert!(summary.contains("Weekly Average: 7,714 steps/day"));
        assert!(summary.ends_with(ActivityTier::GoalAchieved.message()));
    }

    #[test]
    fn test_summary_low_activity() {
        let snapshot = HealthSnapshot::from_steps(120);
        let summary = render_summary(&snapshot, &history(120));
        assert!(summary.contains(ActivityTier::LowActivity.message()));
        assert!(summary.contains("- Distance: 0.10 km"));
    }
}
