//! Common test utilities for integration tests
//!
//! This module provides shared setup for integration tests. Time is virtual:
//! tests move it forward with `TestApp::advance`.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wellness_backend::{
    config::AppConfig,
    routes,
    scheduler::ManualScheduler,
    services::{HealthMetricsService, TrackerSeed},
    sources::{SimulatedSource, StepSource},
    state::AppState,
};

pub const TICK: Duration = Duration::from_secs(3);

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub tracker: Arc<HealthMetricsService>,
    pub scheduler: ManualScheduler,
}

impl TestApp {
    /// Fresh app: random past days, today at zero, simulated source
    pub async fn new() -> Self {
        Self::with_seed(TrackerSeed::for_today(today())).await
    }

    /// App with an explicit seed and the simulated source
    pub async fn with_seed(seed: TrackerSeed) -> Self {
        let config = test_config();
        let source = Arc::new(SimulatedSource::new(
            config.tracker.seed_min_steps,
            config.tracker.seed_max_steps,
            config.tracker.rng_seed,
        ));
        Self::with_source(seed, source).await
    }

    /// App with an explicit seed and source
    pub async fn with_source(seed: TrackerSeed, source: Arc<dyn StepSource>) -> Self {
        let config = test_config();
        let scheduler = ManualScheduler::new();
        let tracker = Arc::new(
            HealthMetricsService::create(
                config.tracker.clone(),
                seed,
                source,
                Arc::new(scheduler.clone()),
            )
            .expect("Failed to create tracker"),
        );

        let state = AppState::new(tracker.clone());
        let app = routes::create_router(state);

        Self {
            app,
            tracker,
            scheduler,
        }
    }

    /// Move virtual time forward
    pub fn advance(&self, by: Duration) {
        self.scheduler.advance(by);
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Make a POST request without a body
    pub async fn post(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// GET and parse the body as JSON
    pub async fn get_json(&self, path: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.get(path).await;
        (status, serde_json::from_str(&body).expect("Response is not JSON"))
    }

    /// POST and parse the body as JSON
    pub async fn post_json(&self, path: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.post(path).await;
        (status, serde_json::from_str(&body).expect("Response is not JSON"))
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 16).unwrap()
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.tracker.rng_seed = Some(2024);
    config
}
