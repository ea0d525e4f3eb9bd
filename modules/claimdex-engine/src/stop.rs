//! Cooperative stop signal with cancellable waits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

/// Shared stop flag checked at every suspension point of a run.
///
/// Raising it also wakes any sleeper immediately, so cancellation latency
/// is bounded by the poll interval, never by the length of a wait.
#[derive(Clone, Default)]
pub struct StopSignal {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    raised: AtomicBool,
    notify: Notify,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.inner.raised.store(true, Ordering::Relaxed);
        self.inner.notify.notify_waiters();
    }

    pub fn is_raised(&self) -> bool {
        self.inner.raised.load(Ordering::Relaxed)
    }

    /// Lower the flag before a new run.
    pub fn reset(&self) {
        self.inner.raised.store(false, Ordering::Relaxed);
    }

    /// Sleep for `duration` unless the signal is raised first.
    /// Returns `false` when the wait was cut short by a stop.
    pub async fn sleep(&self, duration: Duration) -> bool {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // Register interest before the flag check so a raise between the
        // check and the select still wakes us.
        notified.as_mut().enable();
        if self.is_raised() {
            return false;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = &mut notified => false,
        }
    }
}
