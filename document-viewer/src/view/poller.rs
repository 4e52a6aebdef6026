//! Repeating status refresh behind an owned, cancellable handle.
//!
//! At most one loop is alive per poller: `start` swaps the new handle in for the previous
//! one under a single lock, and dropping a handle cancels its token.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    Continue,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub interval: Duration,
    /// Upper bound on how long one loop may run. `None` polls until a `Stop` step.
    pub max_duration: Option<Duration>,
}

struct PollHandle {
    generation: u64,
    token: CancellationToken,
    _task: JoinHandle<()>,
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Called with the new activity whenever the slot goes from empty to occupied or back.
type Observer = Box<dyn Fn(bool) + Send + Sync>;

#[derive(Default)]
struct Slot {
    handle: Mutex<Option<PollHandle>>,
    observer: Option<Observer>,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, Option<PollHandle>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap the slot contents under `guard`, notifying the observer before the lock is
    /// released so that no other start or stop can interleave with the notification.
    fn replace(
        &self,
        guard: &mut MutexGuard<'_, Option<PollHandle>>,
        next: Option<PollHandle>,
    ) -> Option<PollHandle> {
        let was_active = guard.is_some();
        let previous = std::mem::replace(&mut **guard, next);
        let active = guard.is_some();

        if was_active != active {
            if let Some(observer) = &self.observer {
                observer(active);
            }
        }
        previous
    }
}

#[derive(Default)]
pub struct StatusPoller {
    slot: Arc<Slot>,
    generations: AtomicU64,
}

impl StatusPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// A poller that reports every change between idle and active to `observer`.
    ///
    /// The observer runs while the poller's lock is held, so it must not call back into
    /// the poller.
    pub fn with_observer<O>(observer: O) -> Self
    where
        O: Fn(bool) + Send + Sync + 'static,
    {
        Self {
            slot: Arc::new(Slot {
                handle: Mutex::new(None),
                observer: Some(Box::new(observer)),
            }),
            generations: AtomicU64::new(0),
        }
    }

    pub fn is_active(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Replace any running loop with a new one.
    ///
    /// `tick` runs once per interval and receives the loop's token so it can drop stale
    /// results. The loop clears its own handle when it ends by itself (a `Stop` step or
    /// the duration ceiling), unless it was replaced in the meantime.
    pub fn start<T, Fut>(&self, schedule: PollSchedule, tick: T)
    where
        T: FnMut(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = PollStep> + Send + 'static,
    {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        let token = CancellationToken::new();

        let mut guard = self.slot.lock();

        let weak_slot = Arc::downgrade(&self.slot);
        let task_token = token.clone();
        let task = tokio::spawn(async move {
            run(schedule, task_token, tick).await;
            release(&weak_slot, generation);
        });

        let previous = self.slot.replace(
            &mut guard,
            Some(PollHandle {
                generation,
                token,
                _task: task,
            }),
        );
        drop(guard);
        drop(previous);
    }

    /// Cancel the running loop. Returns whether one was running; calling it again is a no-op.
    pub fn stop(&self) -> bool {
        let mut guard = self.slot.lock();
        let previous = self.slot.replace(&mut guard, None);
        drop(guard);
        previous.is_some()
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Clear the slot if it still holds the loop of `generation`.
fn release(slot: &Weak<Slot>, generation: u64) {
    let Some(slot) = slot.upgrade() else {
        return;
    };
    let mut guard = slot.lock();
    if guard.as_ref().is_some_and(|h| h.generation == generation) {
        let finished = slot.replace(&mut guard, None);
        drop(guard);
        drop(finished);
    }
}

async fn run<T, Fut>(schedule: PollSchedule, token: CancellationToken, mut tick: T)
where
    T: FnMut(CancellationToken) -> Fut,
    Fut: Future<Output = PollStep>,
{
    let period = schedule.interval.max(Duration::from_millis(1));
    let started = Instant::now();
    let mut ticker = time::interval_at(started + period, period);
    // One request per tick; a slow response pushes the next tick back instead of bursting.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => return,
            _ = ticker.tick() => {}
        }

        if let Some(limit) = schedule.max_duration {
            if started.elapsed() >= limit {
                tracing::warn!(
                    limit_secs = limit.as_secs(),
                    "Status polling reached its time limit, giving up"
                );
                return;
            }
        }

        let step = tokio::select! {
            _ = token.cancelled() => return,
            step = tick(token.clone()) => step,
        };

        if step == PollStep::Stop {
            return;
        }
    }
}
