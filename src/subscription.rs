//! Subscription handles.
//!
//! Two handles flow through a pipeline in opposite directions:
//!
//! - [`FlowSubscription`] is what a source hands its subscriber. It carries
//!   demand (`request`) and cancellation upstream and is shared between the
//!   thread delivering signals and any thread that cancels, so every method
//!   takes `&self`.
//! - [`Subscription`] is what a consumer gets back from `subscribe`. It is a
//!   one-shot control handle: `unsubscribe` consumes it.

use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

// ============================================================================
// Upstream: FlowSubscription
// ============================================================================

/// The upstream side of a subscription: demand and cancellation.
pub trait FlowSubscription: Send + Sync {
  /// Ask the source for up to `n` more items. Demand accumulates and
  /// saturates at `usize::MAX`, which means unbounded.
  fn request(&self, n: usize);

  /// Ask the source to stop emitting and release its resources. Idempotent.
  fn cancel(&self);
}

/// Shared upstream handle, as passed to `Subscriber::on_subscribe`.
pub type ArcFlowSubscription = Arc<dyn FlowSubscription>;

/// A handle for sources that terminate without waiting for demand.
#[derive(Debug, Default)]
pub struct EmptySubscription;

impl FlowSubscription for EmptySubscription {
  fn request(&self, _n: usize) {}

  fn cancel(&self) {}
}

/// A handle that only remembers whether it was cancelled.
#[derive(Debug, Default)]
pub struct BooleanSubscription {
  cancelled: AtomicBool,
}

impl BooleanSubscription {
  pub fn new() -> Self { Self::default() }

  pub fn is_cancelled(&self) -> bool { self.cancelled.load(Ordering::Acquire) }
}

impl FlowSubscription for BooleanSubscription {
  fn request(&self, _n: usize) {}

  fn cancel(&self) { self.cancelled.store(true, Ordering::Release); }
}

// ============================================================================
// Downstream: Subscription
// ============================================================================

/// Subscription returned from `subscribe` to allow cancelling before the
/// result arrives.
pub trait Subscription {
  /// Cancel the subscription. No terminal signal is delivered afterwards.
  fn unsubscribe(self);

  /// Whether the subscription has finished, either by delivering its result
  /// or by being cancelled.
  fn is_closed(&self) -> bool;
}

impl Subscription for () {
  fn unsubscribe(self) {}

  fn is_closed(&self) -> bool { true }
}
