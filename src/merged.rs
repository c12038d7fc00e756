//! Merged context: fan-in of two cancellation contexts.
//!
//! [`merge`] derives a single context from a parent and a child. The merged
//! context is done as soon as either source is done or the returned
//! [`CancelHandle`] is invoked; its deadline is the nearer of the two sources'
//! deadlines and its values resolve child-first. A background watcher task
//! performs the done-signal fan-in; every other operation is a synchronous
//! query against the two sources plus cached state.

use crate::cancel::CancelContext;
use crate::context::{Context, ContextRef, ContextValue};
use crate::error::ContextError;
use crate::signal::DoneSignal;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

/// Idempotent control for manually cancelling a derived context.
///
/// Safe to call zero, one, or many times from any thread; only the first call
/// has effect. Clones share the same underlying signal.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    signal: DoneSignal,
}

impl CancelHandle {
    pub(crate) fn new(signal: DoneSignal) -> Self {
        Self { signal }
    }

    /// Requests cancellation of the derived context.
    pub fn cancel(&self) {
        trace!("cancel handle invoked");
        self.signal.set();
    }
}

/// A context derived from two sources, done when either is.
///
/// Constructed by [`merge`]; holds non-owning references to both sources and
/// never controls their lifecycle. Instances are not reused after becoming
/// done; callers construct a new merge for a new scope.
pub struct MergedContext {
    parent: ContextRef,
    child: ContextRef,
    done: DoneSignal,
    err: Mutex<Option<ContextError>>,
}

/// Merges `parent` and `child` into a single derived context.
///
/// Returns the merged context and an idempotent cancel handle. The merged
/// context is done as soon as the child is done, the parent is done, or the
/// handle is invoked, whichever happens first.
///
/// If `child` is absent there is nothing to merge: the result is a plain
/// derived-cancel context of `parent` (see [`CancelContext`]).
///
/// Spawns one watcher task on the ambient tokio runtime, so this must be
/// called from within a runtime.
///
/// # Panics
///
/// Panics if `parent` is absent. A merge without a base context is a contract
/// violation, not a recoverable condition.
pub fn merge(parent: Option<ContextRef>, child: Option<ContextRef>) -> (ContextRef, CancelHandle) {
    let Some(parent) = parent else {
        panic!("merge: parent context must not be absent");
    };
    let Some(child) = child else {
        return CancelContext::derive(parent);
    };

    let done = DoneSignal::new();
    let cancel = DoneSignal::new();
    spawn_watcher(child.done(), parent.done(), cancel.clone(), done.clone());

    let merged = Arc::new(MergedContext {
        parent,
        child,
        done,
        err: Mutex::new(None),
    });
    (merged, CancelHandle::new(cancel))
}

/// Watches the three one-shot events and propagates the first into `done`.
///
/// Whichever wait resolves first wins; there is no ordering guarantee among
/// them. The task fires `done` exactly once and exits.
fn spawn_watcher(
    child_done: DoneSignal,
    parent_done: DoneSignal,
    cancel: DoneSignal,
    done: DoneSignal,
) {
    debug!("spawning merge watcher");
    tokio::spawn(async move {
        tokio::select! {
            () = child_done.wait() => {}
            () = parent_done.wait() => {}
            () = cancel.wait() => {}
        }
        debug!("merge watcher fired");
        done.set();
    });
}

impl Context for MergedContext {
    fn done(&self) -> DoneSignal {
        self.done.clone()
    }

    /// Child's cause, or the parent's if the child reports none. The first
    /// non-none answer is cached under the lock and returned to every
    /// subsequent caller, even if the sources later change.
    fn err(&self) -> Option<ContextError> {
        let mut cached = self.err.lock();
        if cached.is_none() {
            *cached = self.child.err().or_else(|| self.parent.err());
        }
        cached.clone()
    }

    /// The nearer of the two sources' deadlines, recomputed on every call.
    fn deadline(&self) -> Option<Instant> {
        match (self.child.deadline(), self.parent.deadline()) {
            (Some(child), Some(parent)) => Some(child.min(parent)),
            (Some(child), None) => Some(child),
            (None, parent) => parent,
        }
    }

    /// Child's value for the key, or the parent's if the child has none.
    fn value(&self, key: &str) -> Option<ContextValue> {
        self.child.value(key).or_else(|| self.parent.value(key))
    }
}
