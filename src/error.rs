//! Error types for cancellation contexts.

use thiserror::Error;

/// Completion cause reported by a context once it is done.
///
/// `None` (no error) means "not yet done"; a context never reports an error
/// while it is still live. Causes are plain values so they can be cached,
/// cloned to every caller, and compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The context was cancelled explicitly.
    #[error("context cancelled")]
    Cancelled,

    /// The context's deadline passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// A collaborator-supplied cause.
    #[error("{0}")]
    Other(String),
}
