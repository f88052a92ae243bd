//! Step data sources
//!
//! The tracker reads permission, today's count and past days through the
//! [`StepSource`] trait and never checks which variant it holds.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use wellness_shared::activity::DailyRecord;
use wellness_shared::errors::TrackerError;

use crate::config::{SourceConfig, SourceKind, TrackerConfig};

pub mod device;
pub mod simulated;

pub use device::DeviceSensorSource;
pub use simulated::SimulatedSource;

/// Capability set of a step data provider
#[async_trait]
pub trait StepSource: Send + Sync {
    /// Short name for logs and status responses
    fn name(&self) -> &'static str;

    /// Ask for access to step data
    async fn request_permission(&self) -> Result<bool, TrackerError>;

    /// Steps recorded so far today
    async fn read_current_steps(&self) -> Result<u32, TrackerError>;

    /// The `days`-long window ending at `today`, oldest first
    async fn read_history(
        &self,
        today: NaiveDate,
        days: usize,
    ) -> Result<Vec<DailyRecord>, TrackerError>;
}

/// Build the configured source
pub fn from_config(
    source: &SourceConfig,
    tracker: &TrackerConfig,
) -> anyhow::Result<Arc<dyn StepSource>> {
    let built: Arc<dyn StepSource> = match source.kind {
        SourceKind::Simulated => Arc::new(SimulatedSource::new(
            tracker.seed_min_steps,
            tracker.seed_max_steps,
            tracker.rng_seed,
        )),
        SourceKind::Device => Arc::new(DeviceSensorSource::new(
            &source.device_url,
            std::time::Duration::from_secs(source.request_timeout_secs),
        )?),
    };
    Ok(built)
}
