//! Mergectx: Cancellation-Context Merging
//!
//! Combines two independent cancellation contexts (a parent and a child) into a
//! single derived context that is done as soon as either source is done, reports
//! the nearer of the two deadlines, resolves values child-first, and exposes an
//! idempotent manual-cancel control.

pub mod cancel;
pub mod context;
pub mod error;
pub mod merged;
pub mod signal;

pub use cancel::CancelContext;
pub use context::{Context, ContextRef, ContextValue};
pub use error::ContextError;
pub use merged::{merge, CancelHandle, MergedContext};
pub use signal::DoneSignal;
