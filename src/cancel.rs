//! Derived-cancel context for the child-absent merge path.

use crate::context::{Context, ContextRef, ContextValue};
use crate::error::ContextError;
use crate::merged::CancelHandle;
use crate::signal::DoneSignal;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// A context done when its parent is done or its cancel handle is invoked.
///
/// Deadline and value lookup delegate to the parent unmodified; the only
/// behavior added over the parent is the manual-cancel path.
pub struct CancelContext {
    parent: ContextRef,
    done: DoneSignal,
    cancel: DoneSignal,
    err: Mutex<Option<ContextError>>,
}

impl CancelContext {
    /// Wraps `parent` in a cancellable derived context.
    ///
    /// Spawns one watcher task over the two events (parent done, manual
    /// cancel); the first to fire marks the derived context done.
    pub(crate) fn derive(parent: ContextRef) -> (ContextRef, CancelHandle) {
        let done = DoneSignal::new();
        let cancel = DoneSignal::new();

        let parent_done = parent.done();
        {
            let cancel = cancel.clone();
            let done = done.clone();
            debug!("spawning cancel-context watcher");
            tokio::spawn(async move {
                tokio::select! {
                    () = parent_done.wait() => {}
                    () = cancel.wait() => {}
                }
                debug!("cancel-context watcher fired");
                done.set();
            });
        }

        let ctx = Arc::new(Self {
            parent,
            done,
            cancel: cancel.clone(),
            err: Mutex::new(None),
        });
        (ctx, CancelHandle::new(cancel))
    }
}

impl Context for CancelContext {
    fn done(&self) -> DoneSignal {
        self.done.clone()
    }

    /// Parent's propagated cause, or [`ContextError::Cancelled`] when the
    /// cancel handle fired with no parent cause. Memoized like the merged
    /// context: the first non-none answer is permanent.
    fn err(&self) -> Option<ContextError> {
        let mut cached = self.err.lock();
        if cached.is_none() {
            *cached = self.parent.err().or_else(|| {
                if self.cancel.is_set() {
                    Some(ContextError::Cancelled)
                } else {
                    None
                }
            });
        }
        cached.clone()
    }

    fn deadline(&self) -> Option<Instant> {
        self.parent.deadline()
    }

    fn value(&self, key: &str) -> Option<ContextValue> {
        self.parent.value(key)
    }
}
