//! Repeating task scheduling
//!
//! The tracker never touches timers directly; it asks a [`Scheduler`] for a
//! repeating callback and keeps the returned [`CancelHandle`].
//!
//! - [`TokioScheduler`]: wall-clock timers on the tokio runtime
//! - [`ManualScheduler`]: virtual time advanced explicitly, for tests

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Callback invoked on every tick
pub type TickFn = Box<dyn FnMut() + Send + 'static>;

/// Something that can run a callback on a fixed period
pub trait Scheduler: Send + Sync {
    /// Run `callback` every `period`, first run one period from now
    fn schedule_repeating(&self, period: Duration, callback: TickFn) -> CancelHandle;
}

/// Handle to a repeating task
///
/// Cancelling is idempotent. Dropping the handle cancels the task.
#[derive(Debug)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
    task: Option<AbortHandle>,
}

impl CancelHandle {
    fn new(cancelled: Arc<AtomicBool>, task: Option<AbortHandle>) -> Self {
        Self { cancelled, task }
    }

    /// Stop the task; no callback starts after this returns
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ============================================================================
// Tokio
// ============================================================================

/// Scheduler backed by `tokio::time::interval` on a spawned task
#[derive(Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Use the runtime the caller is running on
    pub fn from_current() -> anyhow::Result<Self> {
        Ok(Self::new(Handle::try_current()?))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&self, period: Duration, mut callback: TickFn) -> CancelHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();

        let task = self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if flag.load(Ordering::SeqCst) {
                    debug!("Repeating task cancelled");
                    break;
                }
                callback();
            }
        });

        CancelHandle::new(cancelled, Some(task.abort_handle()))
    }
}

// ============================================================================
// Virtual time
// ============================================================================

struct ManualTimer {
    id: u64,
    period: Duration,
    next_due: Duration,
    cancelled: Arc<AtomicBool>,
    callback: Option<TickFn>,
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    next_id: u64,
    timers: Vec<ManualTimer>,
}

/// Scheduler driven by explicit [`ManualScheduler::advance`] calls
///
/// Callbacks run on the thread calling `advance`, in due-time order.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Arc<Mutex<ManualClock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation
    pub fn now(&self) -> Duration {
        self.clock.lock().now
    }

    /// Number of repeating tasks that have not been cancelled
    pub fn active_timers(&self) -> usize {
        self.clock
            .lock()
            .timers
            .iter()
            .filter(|t| !t.cancelled.load(Ordering::SeqCst))
            .count()
    }

    /// Move virtual time forward, firing every callback that falls due
    pub fn advance(&self, by: Duration) {
        let target = self.clock.lock().now + by;

        loop {
            let (id, cancelled, callback) = {
                let mut guard = self.clock.lock();
                let clock = &mut *guard;
                clock.timers.retain(|t| !t.cancelled.load(Ordering::SeqCst));

                let next = clock
                    .timers
                    .iter_mut()
                    .filter(|t| t.next_due <= target)
                    .min_by_key(|t| (t.next_due, t.id));

                match next {
                    Some(timer) => {
                        let due = timer.next_due;
                        timer.next_due += timer.period;
                        let fired = (timer.id, timer.cancelled.clone(), timer.callback.take());
                        clock.now = due;
                        fired
                    }
                    None => {
                        clock.now = target;
                        return;
                    }
                }
            };

            // Run outside the clock lock so callbacks may use the scheduler
            if let Some(mut callback) = callback {
                if !cancelled.load(Ordering::SeqCst) {
                    callback();
                }
                let mut clock = self.clock.lock();
                if let Some(timer) = clock.timers.iter_mut().find(|t| t.id == id) {
                    timer.callback = Some(callback);
                }
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&self, period: Duration, callback: TickFn) -> CancelHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut clock = self.clock.lock();
        let id = clock.next_id;
        clock.next_id += 1;
        let period = period.max(Duration::from_millis(1));
        let next_due = clock.now + period;
        clock.timers.push(ManualTimer {
            id,
            period,
            next_due,
            cancelled: cancelled.clone(),
            callback: Some(callback),
        });
        CancelHandle::new(cancelled, None)
    }
}
