//! Simulated step source
//!
//! Always grants permission and produces random past days in the seeded
//! range. Each date draws from its own seeded generator, so reading the same
//! day twice returns the same count. Today's count starts at zero; the
//! tracker's own ticks advance it.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wellness_shared::activity::{window_dates, DailyRecord};
use wellness_shared::errors::TrackerError;

use super::StepSource;

pub struct SimulatedSource {
    min_steps: u32,
    max_steps: u32,
    seed: u64,
}

impl SimulatedSource {
    /// Past days are drawn from `min_steps..max_steps`
    ///
    /// An empty range is widened to the single value `min_steps`.
    pub fn new(min_steps: u32, max_steps: u32, seed: Option<u64>) -> Self {
        let min_steps = min_steps.min(u32::MAX - 1);
        Self {
            min_steps,
            max_steps: max_steps.max(min_steps + 1),
            seed: seed.unwrap_or_else(rand::random),
        }
    }

    fn steps_for(&self, date: NaiveDate) -> u32 {
        let day_key = date.num_days_from_ce() as u64;
        let mixed = self.seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ day_key;
        let mut rng = StdRng::seed_from_u64(mixed);
        rng.gen_range(self.min_steps..self.max_steps)
    }
}

#[async_trait]
impl StepSource for SimulatedSource {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn request_permission(&self) -> Result<bool, TrackerError> {
        Ok(true)
    }

    async fn read_current_steps(&self) -> Result<u32, TrackerError> {
        Ok(0)
    }

    async fn read_history(
        &self,
        today: NaiveDate,
        days: usize,
    ) -> Result<Vec<DailyRecord>, TrackerError> {
        let dates = window_dates(today);
        let skip = dates.len().saturating_sub(days);
        let records = dates
            .into_iter()
            .skip(skip)
            .map(|date| {
                let steps = if date == today { 0 } else { self.steps_for(date) };
                DailyRecord::new(date, steps)
            })
            .collect();
        Ok(records)
    }
}
