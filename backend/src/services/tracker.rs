//! Health metrics service
//!
//! Owns today's step count and the rolling 7-day window, runs the simulated
//! increment while tracking, and derives snapshots, averages, insights and
//! the chat summary.
//!
//! # State machine
//!
//! - `Idle` (initial): no repeating task
//! - `Tracking`: one repeating task adds a random increment every period
//!
//! `start` and `stop` are idempotent. All reads and writes of the step
//! state go through one mutex; a tick only applies if its session is still
//! the active one, so nothing is added once `stop` has returned.

use chrono::NaiveDate;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use wellness_shared::activity::{
    weekly_average, window_dates, DailyRecord, HealthSnapshot, DAILY_STEP_GOAL, HISTORY_DAYS,
};
use wellness_shared::errors::TrackerError;
use wellness_shared::insight::{generate_insight, ActivityTier};

use crate::config::TrackerConfig;
use crate::scheduler::{CancelHandle, Scheduler, TickFn};
use crate::services::summary::render_summary;
use crate::sources::StepSource;

/// Initial contents of the window
#[derive(Debug, Clone)]
pub struct TrackerSeed {
    /// Last day of the window
    pub today: NaiveDate,
    /// Steps for the 6 days before today, oldest first; random when `None`
    pub past_steps: Option<Vec<u32>>,
    /// Today's starting count
    pub today_steps: u32,
}

impl TrackerSeed {
    /// Random past days, today at zero
    pub fn for_today(today: NaiveDate) -> Self {
        Self {
            today,
            past_steps: None,
            today_steps: 0,
        }
    }

    /// Past days read from `source`
    ///
    /// Falls back to random past days when the source fails or does not
    /// cover every day before today.
    pub async fn from_source(today: NaiveDate, source: &dyn StepSource) -> Self {
        let seed = Self::for_today(today);
        let records = match source.read_history(today, HISTORY_DAYS).await {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    source = source.name(),
                    kind = err.kind(),
                    error = %err,
                    "Seeding past days randomly"
                );
                return seed;
            }
        };

        let dates = window_dates(today);
        let past: Option<Vec<u32>> = dates[..dates.len().saturating_sub(1)]
            .iter()
            .map(|date| records.iter().find(|r| r.date == *date).map(|r| r.steps))
            .collect();
        match past {
            Some(steps) if steps.len() == HISTORY_DAYS - 1 => seed.with_past_steps(steps),
            _ => {
                debug!(
                    source = source.name(),
                    "Source history incomplete, seeding past days randomly"
                );
                seed
            }
        }
    }

    pub fn with_past_steps(mut self, steps: Vec<u32>) -> Self {
        self.past_steps = Some(steps);
        self
    }

    pub fn with_today_steps(mut self, steps: u32) -> Self {
        self.today_steps = steps;
        self
    }
}

/// Which parts of a source pull were applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    pub current_from_source: bool,
    pub history_from_source: bool,
}

struct TrackingSession {
    id: u64,
    handle: CancelHandle,
}

struct TrackerState {
    current_steps: u32,
    history: Vec<DailyRecord>,
    session: Option<TrackingSession>,
    next_session_id: u64,
    permission: Option<bool>,
    rng: StdRng,
}

impl TrackerState {
    /// Set today's count in both places it lives
    fn write_today(&mut self, steps: u32) {
        self.current_steps = steps;
        if let Some(today) = self.history.last_mut() {
            today.set_steps(steps);
        }
    }

    /// Apply one tick for `session_id`; `None` when that session has ended
    fn apply_tick(&mut self, session_id: u64, min: u32, max: u32) -> Option<(u32, u32)> {
        match &self.session {
            Some(session) if session.id == session_id => {}
            _ => return None,
        }
        let increment = self.rng.gen_range(min..=max);
        let steps = self.current_steps.saturating_add(increment);
        self.write_today(steps);
        Some((increment, steps))
    }

    /// Overwrite past days with source readings matched by date
    fn merge_past_days(&mut self, records: &[DailyRecord]) -> usize {
        let last = self.history.len().saturating_sub(1);
        let mut merged = 0;
        for slot in &mut self.history[..last] {
            if let Some(reading) = records.iter().find(|r| r.date == slot.date) {
                slot.set_steps(reading.steps);
                merged += 1;
            }
        }
        merged
    }
}

/// Health metrics service
pub struct HealthMetricsService {
    state: Arc<Mutex<TrackerState>>,
    source: Arc<dyn StepSource>,
    scheduler: Arc<dyn Scheduler>,
    config: TrackerConfig,
    today: NaiveDate,
}

impl HealthMetricsService {
    /// Create a service in the `Idle` state
    ///
    /// Fails when the increment or seed ranges are empty, or when explicit
    /// past steps do not cover exactly 6 days.
    pub fn create(
        config: TrackerConfig,
        seed: TrackerSeed,
        source: Arc<dyn StepSource>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<Self, TrackerError> {
        config
            .check_ranges()
            .map_err(|e| TrackerError::InvalidConfig(e.to_string()))?;

        let mut rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let past_steps = match seed.past_steps {
            Some(steps) if steps.len() == HISTORY_DAYS - 1 => steps,
            Some(steps) => {
                return Err(TrackerError::InvalidSeed(format!(
                    "expected {} past days, got {}",
                    HISTORY_DAYS - 1,
                    steps.len()
                )))
            }
            None => {
                (0..HISTORY_DAYS - 1)
                    .map(|_| rng.gen_range(config.seed_min_steps..config.seed_max_steps))
                    .collect()
            }
        };

        let history: Vec<DailyRecord> = window_dates(seed.today)
            .into_iter()
            .zip(past_steps.into_iter().chain(std::iter::once(seed.today_steps)))
            .map(|(date, steps)| DailyRecord::new(date, steps))
            .collect();

        info!(
            today = %seed.today,
            today_steps = seed.today_steps,
            source = source.name(),
            "Health metrics service created"
        );

        Ok(Self {
            state: Arc::new(Mutex::new(TrackerState {
                current_steps: seed.today_steps,
                history,
                session: None,
                next_session_id: 0,
                permission: None,
                rng,
            })),
            source,
            scheduler,
            config,
            today: seed.today,
        })
    }

    /// Enter `Tracking`; a no-op returning `true` if already tracking
    pub fn start(&self) -> bool {
        let mut state = self.state.lock();
        if state.session.is_some() {
            debug!("Start ignored, already tracking");
            return true;
        }

        let id = state.next_session_id;
        state.next_session_id += 1;

        let weak = Arc::downgrade(&self.state);
        let (min, max) = (self.config.min_increment, self.config.max_increment);
        let callback: TickFn = Box::new(move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let applied = state.lock().apply_tick(id, min, max);
            if let Some((increment, steps)) = applied {
                metrics::counter!("tracker_ticks_total").increment(1);
                metrics::gauge!("tracker_steps_today").set(steps as f64);
                debug!(session = id, increment, steps, "Step tick applied");
            }
        });

        let handle = self
            .scheduler
            .schedule_repeating(self.config.tick_period(), callback);
        state.session = Some(TrackingSession { id, handle });

        info!(
            session = id,
            period_ms = self.config.tick_period_ms,
            steps = state.current_steps,
            "Step tracking started"
        );
        true
    }

    /// Return to `Idle`; a no-op when not tracking
    pub fn stop(&self) {
        let session = self.state.lock().session.take();
        match session {
            Some(session) => {
                session.handle.cancel();
                let steps = self.state.lock().current_steps;
                info!(session = session.id, steps, "Step tracking stopped");
            }
            None => debug!("Stop ignored, not tracking"),
        }
    }

    /// Cancel any running timer; call once on shutdown
    pub fn dispose(&self) {
        self.stop();
        info!("Health metrics service disposed");
    }

    pub fn is_tracking(&self) -> bool {
        self.state.lock().session.is_some()
    }

    /// Ask the source for step access
    ///
    /// A refusal or a failing source both yield `false`; nothing is
    /// propagated and nothing is retried.
    pub async fn request_permission(&self) -> bool {
        let granted = match self.source.request_permission().await {
            Ok(true) => true,
            Ok(false) => {
                let err = TrackerError::PermissionDenied(format!(
                    "{} source refused",
                    self.source.name()
                ));
                warn!(source = self.source.name(), kind = err.kind(), "{}", err);
                false
            }
            Err(err) => {
                metrics::counter!("tracker_collaborator_failures_total").increment(1);
                error!(
                    source = self.source.name(),
                    kind = err.kind(),
                    error = %err,
                    "Permission request failed"
                );
                false
            }
        };
        self.state.lock().permission = Some(granted);
        granted
    }

    /// Outcome of the last permission request, `None` if never asked
    pub fn permission_status(&self) -> Option<bool> {
        self.state.lock().permission
    }

    /// Today's derived metrics
    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot::from_steps(self.state.lock().current_steps)
    }

    /// Copy of the 7-day window, oldest first
    pub fn history(&self) -> Vec<DailyRecord> {
        self.state.lock().history.clone()
    }

    /// Snapshot and window read under one lock
    pub fn view(&self) -> (HealthSnapshot, Vec<DailyRecord>) {
        let state = self.state.lock();
        (HealthSnapshot::from_steps(state.current_steps), state.history.clone())
    }

    pub fn weekly_average(&self) -> u32 {
        weekly_average(&self.state.lock().history)
    }

    /// Tier and sentence for today's steps
    pub fn insight(&self) -> (ActivityTier, String) {
        let (snapshot, history) = self.view();
        let tier = ActivityTier::classify(snapshot.steps, DAILY_STEP_GOAL);
        (tier, generate_insight(&snapshot, &history))
    }

    /// Text report handed to the chat feature
    pub fn format_summary(&self) -> String {
        let (snapshot, history) = self.view();
        render_summary(&snapshot, &history)
    }

    /// Pull readings from the source, keeping current values on failure
    ///
    /// Today's count only moves forward; past days are replaced by date.
    pub async fn sync_from_source(&self) -> SyncOutcome {
        let current = match self.source.read_current_steps().await {
            Ok(steps) => Some(steps),
            Err(err) => {
                metrics::counter!("tracker_collaborator_failures_total").increment(1);
                warn!(
                    source = self.source.name(),
                    kind = err.kind(),
                    error = %err,
                    "Falling back to simulated step count"
                );
                None
            }
        };

        let past = match self.source.read_history(self.today, HISTORY_DAYS).await {
            Ok(records) => Some(records),
            Err(err) => {
                metrics::counter!("tracker_collaborator_failures_total").increment(1);
                warn!(
                    source = self.source.name(),
                    kind = err.kind(),
                    error = %err,
                    "Falling back to seeded history"
                );
                None
            }
        };

        let mut state = self.state.lock();
        if let Some(steps) = current {
            if steps > state.current_steps {
                state.write_today(steps);
            }
        }
        if let Some(records) = &past {
            let merged = state.merge_past_days(records);
            debug!(merged, "Merged past days from source");
        }

        SyncOutcome {
            current_from_source: current.is_some(),
            history_from_source: past.is_some(),
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }
}

impl Drop for HealthMetricsService {
    fn drop(&mut self) {
        if let Some(session) = self.state.lock().session.take() {
            session.handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use crate::sources::SimulatedSource;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::time::Duration;
    use wellness_shared::activity::is_valid_window;

    const TICK: Duration = Duration::from_secs(3);

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 16).unwrap()
    }

    fn tracker_config() -> TrackerConfig {
        TrackerConfig {
            rng_seed: Some(11),
            ..TrackerConfig::default()
        }
    }

    fn service_with(
        seed: TrackerSeed,
        source: Arc<dyn StepSource>,
    ) -> (HealthMetricsService, ManualScheduler) {
        let scheduler = ManualScheduler::new();
        let service = HealthMetricsService::create(
            tracker_config(),
            seed,
            source,
            Arc::new(scheduler.clone()),
        )
        .unwrap();
        (service, scheduler)
    }

    fn service() -> (HealthMetricsService, ManualScheduler) {
        service_with(
            TrackerSeed::for_today(today()),
            Arc::new(SimulatedSource::new(3000, 12000, Some(5))),
        )
    }

    /// Source whose every call fails
    struct BrokenSource;

    #[async_trait]
    impl StepSource for BrokenSource {
        fn name(&self) -> &'static str {
            "broken"
        }
        async fn request_permission(&self) -> Result<bool, TrackerError> {
            Err(TrackerError::CollaboratorFailure("bridge offline".to_string()))
        }
        async fn read_current_steps(&self) -> Result<u32, TrackerError> {
            Err(TrackerError::CollaboratorFailure("bridge offline".to_string()))
        }
        async fn read_history(
            &self,
            _: NaiveDate,
            _: usize,
        ) -> Result<Vec<DailyRecord>, TrackerError> {
            Err(TrackerError::CollaboratorFailure("bridge offline".to_string()))
        }
    }

    /// Source that refuses permission and reports fixed readings
    struct FixedSource {
        granted: bool,
        current: u32,
        past: Vec<DailyRecord>,
    }

    #[async_trait]
    impl StepSource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }
        async fn request_permission(&self) -> Result<bool, TrackerError> {
            Ok(self.granted)
        }
        async fn read_current_steps(&self) -> Result<u32, TrackerError> {
            Ok(self.current)
        }
        async fn read_history(
            &self,
            _: NaiveDate,
            _: usize,
        ) -> Result<Vec<DailyRecord>, TrackerError> {
            Ok(self.past.clone())
        }
    }

    // =========================================================================
    // Construction
    // =========================================================================

    #[test]
    fn test_fresh_service_is_idle_at_zero() {
        let (service, scheduler) = service();
        assert!(!service.is_tracking());
        assert_eq!(service.snapshot().steps, 0);
        assert_eq!(scheduler.active_timers(), 0);

        let history = service.history();
        assert!(is_valid_window(&history));
        assert_eq!(history.last().unwrap().date, today());
        assert_eq!(history.last().unwrap().steps, 0);
        for day in &history[..HISTORY_DAYS - 1] {
            assert!((3000..12000).contains(&day.steps));
        }
    }

    #[test]
    fn test_explicit_seed() {
        let (service, _) = service_with(
            TrackerSeed::for_today(today())
                .with_past_steps(vec![1, 2, 3, 4, 5, 6])
                .with_today_steps(12_000),
            Arc::new(SimulatedSource::new(3000, 12000, Some(5))),
        );
        let steps: Vec<u32> = service.history().iter().map(|r| r.steps).collect();
        assert_eq!(steps, vec![1, 2, 3, 4, 5, 6, 12_000]);
        assert_eq!(service.snapshot().calories, 480);
    }

    #[test]
    fn test_wrong_seed_length_rejected() {
        let result = HealthMetricsService::create(
            tracker_config(),
            TrackerSeed::for_today(today()).with_past_steps(vec![1, 2, 3]),
            Arc::new(BrokenSource),
            Arc::new(ManualScheduler::new()),
        );
        assert!(matches!(result, Err(TrackerError::InvalidSeed(_))));
    }

    #[tokio::test]
    async fn test_seed_from_source_survives_sync() {
        let source = Arc::new(SimulatedSource::new(3000, 12000, Some(21)));
        let expected = source.read_history(today(), HISTORY_DAYS).await.unwrap();

        let seed = TrackerSeed::from_source(today(), source.as_ref()).await;
        let (service, _) = service_with(seed, source);
        assert_eq!(service.history(), expected);

        service.sync_from_source().await;
        assert_eq!(service.history(), expected);
    }

    #[tokio::test]
    async fn test_seed_from_partial_source_is_random() {
        let source = FixedSource {
            granted: true,
            current: 0,
            past: vec![DailyRecord::new(today().pred_opt().unwrap(), 9_000)],
        };
        let seed = TrackerSeed::from_source(today(), &source).await;
        assert!(seed.past_steps.is_none());

        let seed = TrackerSeed::from_source(today(), &BrokenSource).await;
        assert!(seed.past_steps.is_none());
    }

    #[test]
    fn test_inverted_increment_range_rejected() {
        let config = TrackerConfig {
            min_increment: 30,
            max_increment: 20,
            ..tracker_config()
        };
        let result = HealthMetricsService::create(
            config,
            TrackerSeed::for_today(today()),
            Arc::new(BrokenSource),
            Arc::new(ManualScheduler::new()),
        );
        assert!(matches!(result, Err(TrackerError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_seed_range_rejected() {
        let config = TrackerConfig {
            seed_min_steps: u32::MAX,
            seed_max_steps: u32::MAX,
            ..tracker_config()
        };
        let result = HealthMetricsService::create(
            config,
            TrackerSeed::for_today(today()),
            Arc::new(BrokenSource),
            Arc::new(ManualScheduler::new()),
        );
        assert!(matches!(result, Err(TrackerError::InvalidConfig(_))));
    }

    #[test]
    fn test_fixed_increment_is_accepted() {
        let config = TrackerConfig {
            min_increment: 7,
            max_increment: 7,
            ..tracker_config()
        };
        let scheduler = ManualScheduler::new();
        let service = HealthMetricsService::create(
            config,
            TrackerSeed::for_today(today()),
            Arc::new(BrokenSource),
            Arc::new(scheduler.clone()),
        )
        .unwrap();
        service.start();
        scheduler.advance(TICK * 2);
        assert_eq!(service.snapshot().steps, 14);
    }

    // =========================================================================
    // State machine and ticks
    // =========================================================================

    #[test]
    fn test_single_tick_increment_in_range() {
        let (service, scheduler) = service();
        assert!(service.start());
        assert!(service.is_tracking());

        scheduler.advance(TICK);

        let steps = service.snapshot().steps;
        assert!((5..=20).contains(&steps), "increment {} out of range", steps);
        assert_eq!(service.history().last().unwrap().steps, steps);
        assert_eq!(service.history().last().unwrap().calories, steps / 25);
    }

    #[test]
    fn test_no_tick_before_period() {
        let (service, scheduler) = service();
        service.start();
        scheduler.advance(TICK - Duration::from_millis(1));
        assert_eq!(service.snapshot().steps, 0);
    }

    #[test]
    fn test_stop_cancels_timer() {
        let (service, scheduler) = service();
        service.start();
        scheduler.advance(TICK);
        service.stop();
        let after_stop = service.snapshot().steps;

        scheduler.advance(TICK);

        assert!(!service.is_tracking());
        assert_eq!(service.snapshot().steps, after_stop);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let (service, scheduler) = service();
        service.stop();
        service.stop();
        assert!(!service.is_tracking());
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn test_double_start_keeps_one_timer() {
        let (service, scheduler) = service();
        assert!(service.start());
        assert!(service.start());
        assert_eq!(scheduler.active_timers(), 1);

        // One increment per period, at most 20 per tick
        scheduler.advance(TICK);
        assert!(service.snapshot().steps <= 20);
        scheduler.advance(TICK * 9);
        let steps = service.snapshot().steps;
        assert!((50..=200).contains(&steps), "10 ticks gave {}", steps);
    }

    #[test]
    fn test_restart_after_stop() {
        let (service, scheduler) = service();
        service.start();
        scheduler.advance(TICK);
        service.stop();
        let before = service.snapshot().steps;

        service.start();
        scheduler.advance(TICK);
        assert!(service.snapshot().steps > before);
        assert_eq!(scheduler.active_timers(), 1);
    }

    #[test]
    fn test_stale_session_tick_is_ignored() {
        let (service, _) = service();
        service.start();
        let mut state = service.state.lock();
        assert!(state.apply_tick(99, 5, 20).is_none());
        assert_eq!(state.current_steps, 0);
    }

    #[test]
    fn test_dispose_stops_tracking() {
        let (service, scheduler) = service();
        service.start();
        service.dispose();
        scheduler.advance(TICK * 5);
        assert!(!service.is_tracking());
        assert_eq!(service.snapshot().steps, 0);
    }

    #[test]
    fn test_drop_cancels_timer() {
        let (service, scheduler) = service();
        service.start();
        drop(service);
        assert_eq!(scheduler.active_timers(), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Property: steps never decrease while tracking, each tick adds 5..=20
        #[test]
        fn prop_ticks_monotonic_and_bounded(ticks in 1usize..60, rng_seed in any::<u64>()) {
            let scheduler = ManualScheduler::new();
            let service = HealthMetricsService::create(
                TrackerConfig { rng_seed: Some(rng_seed), ..TrackerConfig::default() },
                TrackerSeed::for_today(today()),
                Arc::new(SimulatedSource::new(3000, 12000, Some(rng_seed))),
                Arc::new(scheduler.clone()),
            ).unwrap();
            service.start();

            let mut previous = service.snapshot().steps;
            for _ in 0..ticks {
                scheduler.advance(TICK);
                let current = service.snapshot().steps;
                prop_assert!(current >= previous);
                let increment = current - previous;
                prop_assert!((5..=20).contains(&increment), "increment {}", increment);
                previous = current;

                let history = service.history();
                prop_assert!(is_valid_window(&history));
                prop_assert_eq!(history.last().unwrap().steps, current);
            }
        }
    }

    // =========================================================================
    // Collaborators
    // =========================================================================

    #[tokio::test]
    async fn test_permission_granted_by_simulated_source() {
        let (service, _) = service();
        assert_eq!(service.permission_status(), None);
        assert!(service.request_permission().await);
        assert_eq!(service.permission_status(), Some(true));
    }

    #[tokio::test]
    async fn test_permission_failure_degrades_to_false() {
        let (service, _) = service_with(TrackerSeed::for_today(today()), Arc::new(BrokenSource));
        assert!(!service.request_permission().await);
        assert_eq!(service.permission_status(), Some(false));
    }

    #[tokio::test]
    async fn test_permission_refusal_is_false() {
        let source = FixedSource {
            granted: false,
            current: 0,
            past: vec![],
        };
        let (service, _) = service_with(TrackerSeed::for_today(today()), Arc::new(source));
        assert!(!service.request_permission().await);
        // Gating start on permission is the caller's job
        assert!(service.start());
    }

    #[tokio::test]
    async fn test_sync_failure_keeps_seeded_state() {
        let (service, _) = service_with(
            TrackerSeed::for_today(today())
                .with_past_steps(vec![100; 6])
                .with_today_steps(40),
            Arc::new(BrokenSource),
        );
        let before = service.history();

        let outcome = service.sync_from_source().await;

        assert!(!outcome.current_from_source);
        assert!(!outcome.history_from_source);
        assert_eq!(service.history(), before);
        assert_eq!(service.snapshot().steps, 40);
    }

    #[tokio::test]
    async fn test_sync_applies_device_readings() {
        let yesterday = today().pred_opt().unwrap();
        let source = FixedSource {
            granted: true,
            current: 2_500,
            past: vec![DailyRecord::new(yesterday, 9_000), DailyRecord::new(today(), 1)],
        };
        let (service, _) = service_with(
            TrackerSeed::for_today(today()).with_past_steps(vec![100; 6]),
            Arc::new(source),
        );

        let outcome = service.sync_from_source().await;

        assert!(outcome.current_from_source && outcome.history_from_source);
        let history = service.history();
        assert_eq!(history[5].steps, 9_000);
        assert_eq!(history[4].steps, 100);
        assert_eq!(history[6].steps, 2_500);
        assert_eq!(service.snapshot().steps, 2_500);
    }

    #[tokio::test]
    async fn test_sync_never_lowers_today() {
        let source = FixedSource {
            granted: true,
            current: 10,
            past: vec![],
        };
        let (service, _) = service_with(
            TrackerSeed::for_today(today()).with_today_steps(500),
            Arc::new(source),
        );
        service.sync_from_source().await;
        assert_eq!(service.snapshot().steps, 500);
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    #[test]
    fn test_weekly_average_and_insight() {
        let (service, _) = service_with(
            TrackerSeed::for_today(today())
                .with_past_steps(vec![7_000; 6])
                .with_today_steps(4_999),
            Arc::new(BrokenSource),
        );
        // (42_000 + 4_999) / 7 = 6714
        assert_eq!(service.weekly_average(), 6_714);
        let (tier, message) = service.insight();
        assert_eq!(tier, ActivityTier::LowActivity);
        assert_eq!(message, ActivityTier::LowActivity.message());
    }

    #[test]
    fn test_summary_for_goal_achieved() {
        let (service, _) = service_with(
            TrackerSeed::for_today(today()).with_today_steps(12_000),
            Arc::new(BrokenSource),
        );
        let summary = service.format_summary();
        assert!(summary.contains("12,000"));
        assert!(summary.contains(ActivityTier::GoalAchieved.message()));
    }

    #[test]
    fn test_history_is_a_copy() {
        let (service, _) = service();
        let mut copy = service.history();
        copy[0].set_steps(1);
        copy.clear();
        assert_eq!(service.history().len(), HISTORY_DAYS);
    }
}
