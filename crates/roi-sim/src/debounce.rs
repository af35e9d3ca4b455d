//! Cancellable timers and the debouncer built on them

use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::AbortHandle;

/// Handle to a scheduled action
///
/// Cancelling aborts the timer and, once it has fired, the action itself
/// at its next suspension point. Cancelling is idempotent and harmless
/// after the action has finished.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    id: u64,
    abort: AbortHandle,
}

impl TimerHandle {
    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// Fired and completed, or cancelled
    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

static NEXT_TIMER_ID: AtomicU64 = AtomicU64::new(1);

/// Run `action` after `delay` on the current tokio runtime
///
/// # Panics
/// Panics when called outside a tokio runtime.
pub fn schedule<F>(delay: Duration, action: F) -> TimerHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let id = NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed);
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        action.await;
    });
    TimerHandle {
        id,
        abort: task.abort_handle(),
    }
}

/// Keeps at most one scheduled action alive
///
/// Scheduling always cancels the previous action first, so only the most
/// recent one can ever run to completion.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    current: Mutex<Option<TimerHandle>>,
}

impl Debouncer {
    #[inline]
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            current: Mutex::new(None),
        }
    }

    /// Supersede whatever is pending with `action`
    pub fn schedule<F>(&self, action: F) -> TimerHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut current = self.current.lock();
        if let Some(previous) = current.take() {
            tracing::trace!("debounce: superseding timer {}", previous.id());
            previous.cancel();
        }
        let handle = schedule(self.delay, action);
        *current = Some(handle.clone());
        handle
    }

    /// Cancel the pending action; returns whether one was still running
    pub fn cancel(&self) -> bool {
        match self.current.lock().take() {
            Some(handle) => {
                let live = !handle.is_finished();
                handle.cancel();
                live
            }
            None => false,
        }
    }

    /// Whether an action is scheduled or running
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.current.get_mut().take() {
            handle.cancel();
        }
    }
}
