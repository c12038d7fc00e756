//! The cancellation-context capability contract.
//!
//! A context exposes four operations: a done-signal handle, an error once done,
//! an optional deadline, and scoped key/value lookup. The merge combinator both
//! consumes this contract from its two sources and exposes it to callers, so
//! merged contexts nest freely.

use crate::error::ContextError;
use crate::signal::DoneSignal;
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

/// Opaque scoped value carried by a context. Callers downcast to the concrete
/// type they stored.
pub type ContextValue = Arc<dyn Any + Send + Sync>;

/// Shared, non-owning reference to a context collaborator.
pub type ContextRef = Arc<dyn Context>;

/// The four-operation cancellation-context capability set.
pub trait Context: Send + Sync {
    /// Returns a handle to the one-shot completion signal.
    ///
    /// Querying the handle never blocks; callers poll it with
    /// [`DoneSignal::is_set`] or suspend on [`DoneSignal::wait`].
    fn done(&self) -> DoneSignal;

    /// Returns the completion cause, or `None` while the context is live.
    fn err(&self) -> Option<ContextError>;

    /// Returns the absolute deadline, if one applies to this context.
    fn deadline(&self) -> Option<Instant>;

    /// Looks up a scoped value by key.
    fn value(&self, key: &str) -> Option<ContextValue>;
}
