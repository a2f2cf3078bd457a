//! Recording doubles for exercising single-result operators.
//!
//! - [`TestObserver`] records the outcome delivered to it and offers
//!   assertions over it. It implements both result contracts and is cheap to
//!   clone: subscribe one clone, assert on another.
//! - [`TestSubscription`] records the demand and cancellation an operator
//!   sends upstream.
//! - [`TestSubscriber`] sits at the end of a flowable, requests a fixed
//!   amount on subscribe and records what arrives.

use std::{
  fmt::Debug,
  sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
  },
};

use crate::{
  observer::{MaybeObserver, SingleObserver},
  subscriber::Subscriber,
  subscription::{ArcFlowSubscription, FlowSubscription},
};

// ============================================================================
// TestObserver
// ============================================================================

struct Record<Item, Err> {
  values: Vec<Item>,
  errors: Vec<Err>,
  completions: usize,
}

/// Records the outcome of a `Maybe` or `Single`.
pub struct TestObserver<Item, Err>(Arc<Mutex<Record<Item, Err>>>);

impl<Item, Err> Clone for TestObserver<Item, Err> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<Item, Err> Default for TestObserver<Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> TestObserver<Item, Err> {
  pub fn new() -> Self {
    Self(Arc::new(Mutex::new(Record { values: vec![], errors: vec![], completions: 0 })))
  }

  fn record(&self) -> MutexGuard<'_, Record<Item, Err>> {
    self.0.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn values(&self) -> Vec<Item>
  where
    Item: Clone,
  {
    self.record().values.clone()
  }

  pub fn errors(&self) -> Vec<Err>
  where
    Err: Clone,
  {
    self.record().errors.clone()
  }

  /// Number of empty completions received.
  pub fn completions(&self) -> usize { self.record().completions }

  /// Number of terminal signals received, of any kind.
  pub fn terminal_count(&self) -> usize {
    let record = self.record();
    record.values.len() + record.errors.len() + record.completions
  }

  pub fn is_terminated(&self) -> bool { self.terminal_count() > 0 }

  /// Exactly one outcome, a success carrying `expected`.
  #[track_caller]
  pub fn assert_value(&self, expected: Item)
  where
    Item: PartialEq + Debug,
    Err: Debug,
  {
    let record = self.record();
    assert_eq!(record.values, vec![expected], "errors: {:?}", record.errors);
    assert!(record.errors.is_empty(), "unexpected errors: {:?}", record.errors);
    assert_eq!(record.completions, 0, "unexpected empty completion");
  }

  /// Exactly one outcome, an empty completion.
  #[track_caller]
  pub fn assert_empty(&self)
  where
    Item: Debug,
    Err: Debug,
  {
    let record = self.record();
    assert!(record.values.is_empty(), "unexpected values: {:?}", record.values);
    assert!(record.errors.is_empty(), "unexpected errors: {:?}", record.errors);
    assert_eq!(record.completions, 1);
  }

  /// Exactly one outcome, an error equal to `expected`.
  #[track_caller]
  pub fn assert_error(&self, expected: Err)
  where
    Item: Debug,
    Err: PartialEq + Debug,
  {
    let record = self.record();
    assert!(record.values.is_empty(), "unexpected values: {:?}", record.values);
    assert_eq!(record.errors, vec![expected]);
    assert_eq!(record.completions, 0, "unexpected empty completion");
  }

  /// Nothing delivered yet.
  #[track_caller]
  pub fn assert_no_terminal(&self) {
    assert_eq!(self.terminal_count(), 0, "expected no terminal signal");
  }
}

impl<Item, Err> MaybeObserver<Item, Err> for TestObserver<Item, Err> {
  fn success(self, value: Item) { self.record().values.push(value); }

  fn complete(self) { self.record().completions += 1; }

  fn error(self, err: Err) { self.record().errors.push(err); }
}

impl<Item, Err> SingleObserver<Item, Err> for TestObserver<Item, Err> {
  fn success(self, value: Item) { self.record().values.push(value); }

  fn error(self, err: Err) { self.record().errors.push(err); }
}

// ============================================================================
// TestSubscription
// ============================================================================

/// An upstream handle that records what was asked of it.
#[derive(Clone, Default, Debug)]
pub struct TestSubscription {
  requested: Arc<AtomicUsize>,
  cancelled: Arc<AtomicBool>,
}

impl TestSubscription {
  pub fn new() -> Self { Self::default() }

  /// Total demand requested so far, saturating at `usize::MAX`.
  pub fn requested(&self) -> usize { self.requested.load(Ordering::Acquire) }

  pub fn is_cancelled(&self) -> bool { self.cancelled.load(Ordering::Acquire) }
}

impl FlowSubscription for TestSubscription {
  fn request(&self, n: usize) {
    let _ = self
      .requested
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |r| Some(r.saturating_add(n)));
  }

  fn cancel(&self) { self.cancelled.store(true, Ordering::Release); }
}

// ============================================================================
// TestSubscriber
// ============================================================================

struct Received<Item, Err> {
  values: Vec<Item>,
  errors: Vec<Err>,
  completions: usize,
  upstream: Option<ArcFlowSubscription>,
}

/// Records the signals a flowable sends. Clones share the record, and the
/// upstream handle it was given.
pub struct TestSubscriber<Item, Err> {
  received: Arc<Mutex<Received<Item, Err>>>,
  initial_request: usize,
}

impl<Item, Err> Clone for TestSubscriber<Item, Err> {
  fn clone(&self) -> Self {
    Self { received: self.received.clone(), initial_request: self.initial_request }
  }
}

impl<Item, Err> Default for TestSubscriber<Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> TestSubscriber<Item, Err> {
  /// Requests an unbounded amount on subscribe.
  pub fn new() -> Self { Self::with_request(usize::MAX) }

  /// Requests `n` on subscribe; `0` requests nothing.
  pub fn with_request(n: usize) -> Self {
    let received = Received { values: vec![], errors: vec![], completions: 0, upstream: None };
    Self { received: Arc::new(Mutex::new(received)), initial_request: n }
  }

  fn received(&self) -> MutexGuard<'_, Received<Item, Err>> {
    self.received.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn upstream(&self) -> Option<ArcFlowSubscription> { self.received().upstream.clone() }

  /// Request `n` more items from the upstream, if subscribed.
  pub fn request(&self, n: usize) {
    if let Some(upstream) = self.upstream() {
      upstream.request(n);
    }
  }

  /// Cancel the upstream, if subscribed.
  pub fn cancel(&self) {
    if let Some(upstream) = self.upstream() {
      upstream.cancel();
    }
  }

  pub fn is_subscribed(&self) -> bool { self.received().upstream.is_some() }

  pub fn values(&self) -> Vec<Item>
  where
    Item: Clone,
  {
    self.received().values.clone()
  }

  pub fn errors(&self) -> Vec<Err>
  where
    Err: Clone,
  {
    self.received().errors.clone()
  }

  /// Number of terminal signals received, of any kind.
  pub fn terminal_count(&self) -> usize {
    let received = self.received();
    received.errors.len() + received.completions
  }

  /// Exactly `expected` followed by a single `complete`.
  #[track_caller]
  pub fn assert_result(&self, expected: &[Item])
  where
    Item: PartialEq + Debug,
    Err: Debug,
  {
    let received = self.received();
    assert_eq!(received.values, expected);
    assert!(received.errors.is_empty(), "unexpected errors: {:?}", received.errors);
    assert_eq!(received.completions, 1);
  }

  /// No items, and a single error equal to `expected`.
  #[track_caller]
  pub fn assert_error(&self, expected: Err)
  where
    Item: Debug,
    Err: PartialEq + Debug,
  {
    let received = self.received();
    assert!(received.values.is_empty(), "unexpected values: {:?}", received.values);
    assert_eq!(received.errors, vec![expected]);
    assert_eq!(received.completions, 0, "unexpected completion");
  }
}

impl<Item, Err> Subscriber<Item, Err> for TestSubscriber<Item, Err> {
  fn on_subscribe(&mut self, subscription: ArcFlowSubscription) {
    self.received().upstream = Some(subscription.clone());
    if self.initial_request > 0 {
      subscription.request(self.initial_request);
    }
  }

  fn next(&mut self, value: Item) { self.received().values.push(value); }

  fn error(&mut self, err: Err) { self.received().errors.push(err); }

  fn complete(&mut self) { self.received().completions += 1; }
}
