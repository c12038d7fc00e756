//! One-shot broadcast completion signal.
//!
//! `DoneSignal` is the primitive underneath every done-channel in this crate:
//! an atomic flag paired with a [`tokio::sync::Notify`] broadcast. It offers a
//! non-blocking state query, a suspension-based wait, and an idempotent
//! one-time transition to "set" that is safe under concurrent and repeated
//! invocation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// A one-shot, broadcastable "done" notification.
///
/// Clones share the same underlying signal; setting any clone fires all of
/// them. The transition is monotonic: once set, the signal never unsets.
#[derive(Clone, Debug, Default)]
pub struct DoneSignal {
    inner: Arc<SignalInner>,
}

#[derive(Debug, Default)]
struct SignalInner {
    set: AtomicBool,
    notify: Notify,
}

impl DoneSignal {
    /// Creates a new, unfired signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the signal has fired. Never blocks.
    pub fn is_set(&self) -> bool {
        self.inner.set.load(Ordering::Acquire)
    }

    /// Fires the signal, waking every current and future waiter.
    ///
    /// Idempotent: only the first call transitions the signal; later calls
    /// (including concurrent ones) are no-ops.
    pub fn set(&self) {
        if !self.inner.set.swap(true, Ordering::AcqRel) {
            self.inner.notify.notify_waiters();
        }
    }

    /// Suspends until the signal fires. Returns immediately if it already has.
    ///
    /// The waiter is registered before the flag is re-checked, so a `set` that
    /// races with this call cannot be missed. Cancel-safe: dropping the future
    /// before it resolves deregisters the waiter.
    pub async fn wait(&self) {
        if self.is_set() {
            return;
        }
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_set() {
            return;
        }
        notified.await;
    }
}
