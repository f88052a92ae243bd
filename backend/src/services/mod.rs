//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the step data sources, the scheduler and the HTTP layer.

pub mod export;
pub mod summary;
pub mod tracker;

pub use export::ExportService;
pub use tracker::{HealthMetricsService, SyncOutcome, TrackerSeed};
