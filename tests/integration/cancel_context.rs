//! Integration tests for the child-absent merge path
//!
//! Merging without a child yields a plain derived-cancel context of the
//! parent: done when the parent is done or the handle is invoked, with
//! deadline and value lookup delegating to the parent.

use crate::common::{background, init_tracing, TestContext};
use mergectx::{merge, Context, ContextError, ContextRef};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::{sleep, timeout};

async fn assert_done_within(ctx: &ContextRef, millis: u64) {
    timeout(Duration::from_millis(millis), ctx.done().wait())
        .await
        .expect("context should be done within the bound");
}

#[tokio::test]
async fn manual_cancel_reports_cancelled() {
    init_tracing();
    let (derived, cancel) = merge(Some(background()), None);

    sleep(Duration::from_millis(1)).await;
    assert!(!derived.done().is_set());
    assert_eq!(derived.err(), None);

    cancel.cancel();

    assert_done_within(&derived, 100).await;
    assert_eq!(derived.err(), Some(ContextError::Cancelled));
}

#[tokio::test]
async fn manual_cancel_is_idempotent() {
    let (derived, cancel) = merge(Some(background()), None);

    cancel.cancel();
    cancel.cancel();

    assert_done_within(&derived, 100).await;
    assert_eq!(derived.err(), Some(ContextError::Cancelled));
}

#[tokio::test]
async fn parent_cancellation_propagates_its_cause() {
    let parent = Arc::new(TestContext::new());
    let parent_ref: ContextRef = parent.clone();
    let (derived, _cancel) = merge(Some(parent_ref), None);

    parent.cancel_with(ContextError::DeadlineExceeded);

    assert_done_within(&derived, 100).await;
    assert_eq!(derived.err(), Some(ContextError::DeadlineExceeded));
}

#[tokio::test]
async fn deadline_and_values_delegate_to_parent() {
    let deadline = Instant::now() + Duration::from_secs(60);
    let parent: ContextRef = Arc::new(
        TestContext::new()
            .with_deadline(deadline)
            .with_value("user", "parent".to_string()),
    );
    let (derived, _cancel) = merge(Some(parent), None);

    assert_eq!(derived.deadline(), Some(deadline));
    let value = derived.value("user").expect("value should be present");
    assert_eq!(value.downcast_ref::<String>(), Some(&"parent".to_string()));
    assert!(derived.value("missing").is_none());
}

#[tokio::test]
async fn cause_is_memoized_once_resolved() {
    let parent = Arc::new(TestContext::new());
    let parent_ref: ContextRef = parent.clone();
    let (derived, cancel) = merge(Some(parent_ref), None);

    cancel.cancel();
    assert_done_within(&derived, 100).await;
    assert_eq!(derived.err(), Some(ContextError::Cancelled));

    // A parent cause arriving after resolution must not change the answer.
    parent.cancel_with(ContextError::Other("late".to_string()));
    assert_eq!(derived.err(), Some(ContextError::Cancelled));
}
