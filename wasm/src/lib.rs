//! Wellness WASM Module
//!
//! This crate provides WebAssembly bindings for the step formulas so the
//! browser progress indicator uses the same goal and derivations as the
//! backend insight generator.

use wasm_bindgen::prelude::*;
use wellness_shared::activity;
use wellness_shared::insight::ActivityTier;

/// Daily step goal
#[wasm_bindgen]
pub fn daily_step_goal() -> u32 {
    activity::DAILY_STEP_GOAL
}

/// Calories burned for a step count
#[wasm_bindgen]
pub fn calories_for_steps(steps: u32) -> u32 {
    activity::calories_for_steps(steps)
}

/// Distance in kilometres, rounded to 2 decimal places
#[wasm_bindgen]
pub fn distance_km(steps: u32) -> f64 {
    activity::distance_km(steps)
}

/// Active minutes for a step count
#[wasm_bindgen]
pub fn active_minutes(steps: u32) -> u32 {
    activity::active_minutes(steps)
}

/// Progress toward the daily goal, capped at 100 for progress bars
#[wasm_bindgen]
pub fn goal_progress_percent(steps: u32) -> f64 {
    activity::goal_progress_percent(steps).min(100.0)
}

/// Tier name for today's steps (`low_activity`, `on_track`, `goal_achieved`)
#[wasm_bindgen]
pub fn activity_tier(steps: u32) -> String {
    ActivityTier::classify(steps, activity::DAILY_STEP_GOAL).to_string()
}

/// Full snapshot as a JSON string
#[wasm_bindgen]
pub fn snapshot_json(steps: u32) -> String {
    serde_json::to_string(&activity::HealthSnapshot::from_steps(steps)).unwrap_or_default()
}
