//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **One tracker per process**: created in `main`, handed in here
//! 2. **Cheap cloning**: the tracker is shared behind an `Arc`
//! 3. **No hidden globals**: handlers reach the tracker only through state

use crate::services::HealthMetricsService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The step tracker
    pub tracker: Arc<HealthMetricsService>,
    /// Prometheus renderer, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    pub fn new(tracker: Arc<HealthMetricsService>) -> Self {
        Self {
            tracker,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the tracker
    #[inline]
    pub fn tracker(&self) -> &HealthMetricsService {
        &self.tracker
    }
}
