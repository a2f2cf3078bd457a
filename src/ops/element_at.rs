//! ElementAt operator implementation
//!
//! Picks the item at a fixed 0-based index out of a
//! [`Flowable`] and delivers it as a single result. Three result shapes are
//! available, all sharing one subscriber:
//!
//! | Constructor             | Result   | Source completes early |
//! |-------------------------|----------|------------------------|
//! | `element_at(i)`         | `Maybe`  | empty completion       |
//! | `element_at_or(i, d)`   | `Single` | `d`                    |
//! | `element_at_or_error(i)`| `Single` | [`NoSuchElement`]      |
//!
//! An upstream error always wins over the fallback. The operator requests
//! exactly `index + 1` items and cancels the source as soon as the target
//! arrives.
//!
//! ## Termination
//!
//! A single atomic status guards every exit path (capture, upstream
//! terminal, downstream cancel), so exactly one of them wins even when
//! cancellation races with delivery from another thread. Signals that lose
//! are dropped; those that indicate a misbehaving source are reported
//! through [`hooks`](crate::hooks).

use std::sync::{
  atomic::{AtomicU8, Ordering},
  Arc, Mutex, MutexGuard, PoisonError,
};

use crate::{
  error::{NoSuchElement, ProtocolViolation},
  flowable::Flowable,
  hooks,
  observable::{Maybe, Single},
  observer::{MaybeObserver, SingleObserver},
  subscriber::Subscriber,
  subscription::{ArcFlowSubscription, Subscription},
};

// ============================================================================
// Operators
// ============================================================================

/// `element_at(index)`: the item at `index`, or an empty completion.
///
/// Created by [`Flowable::element_at`].
#[derive(Clone)]
pub struct ElementAt<S> {
  source: S,
  index: usize,
}

/// `element_at_or(index, default)`: the item at `index`, or `default`.
///
/// Created by [`Flowable::element_at_or`].
#[derive(Clone)]
pub struct ElementAtOr<S, Item> {
  source: S,
  index: usize,
  default: Item,
}

/// `element_at_or_error(index)`: the item at `index`, or a
/// [`NoSuchElement`] error.
///
/// Created by [`Flowable::element_at_or_error`].
#[derive(Clone)]
pub struct ElementAtOrError<S> {
  source: S,
  index: usize,
}

impl<S> ElementAt<S> {
  pub(crate) fn new(source: S, index: usize) -> Self { Self { source, index } }

  pub fn index(&self) -> usize { self.index }
}

impl<S, Item> ElementAtOr<S, Item> {
  pub(crate) fn new(source: S, index: usize, default: Item) -> Self {
    Self { source, index, default }
  }

  pub fn index(&self) -> usize { self.index }
}

impl<S> ElementAtOrError<S> {
  pub(crate) fn new(source: S, index: usize) -> Self { Self { source, index } }

  pub fn index(&self) -> usize { self.index }
}

/// Subscribe `source` with an `ElementAtSubscriber` delivering into
/// `observer`, returning the downstream handle.
fn subscribe_element_at<S, O>(
  source: S, index: usize, observer: O, operator: &'static str,
) -> ElementAtSubscription
where
  S: Flowable,
  S::Err: Send + 'static,
  O: MaybeObserver<S::Item, S::Err> + Send + 'static,
{
  let state = Arc::new(ElementAtState::new(operator));
  source.subscribe(ElementAtSubscriber {
    observer: Some(observer),
    index,
    count: 0,
    subscribed: false,
    state: state.clone(),
  });
  ElementAtSubscription(state)
}

impl<S> Maybe for ElementAt<S>
where
  S: Flowable,
  S::Err: Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = ElementAtSubscription;

  fn subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: MaybeObserver<S::Item, S::Err> + Send + 'static,
  {
    subscribe_element_at(self.source, self.index, observer, "element_at")
  }
}

impl<S> Single for ElementAtOr<S, S::Item>
where
  S: Flowable,
  S::Item: Send + 'static,
  S::Err: Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = ElementAtSubscription;

  fn subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: SingleObserver<S::Item, S::Err> + Send + 'static,
  {
    let ElementAtOr { source, index, default } = self;
    let observer = FallbackObserver { observer, fallback: Fallback::Default(default) };
    subscribe_element_at(source, index, observer, "element_at_or")
  }
}

impl<S> Single for ElementAtOrError<S>
where
  S: Flowable,
  S::Item: Send + 'static,
  S::Err: From<NoSuchElement> + Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = ElementAtSubscription;

  fn subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: SingleObserver<S::Item, S::Err> + Send + 'static,
  {
    let ElementAtOrError { source, index } = self;
    let fallback: Fallback<S::Item, S::Err> =
      Fallback::NotFound { index, into_err: <S::Err as From<NoSuchElement>>::from };
    let observer = FallbackObserver { observer, fallback };
    subscribe_element_at(source, index, observer, "element_at_or_error")
  }
}

// ============================================================================
// Fallback
// ============================================================================

/// What a `Single` shaped `element_at` delivers when the source completes
/// before reaching the index. The `Maybe` shape has no fallback: it simply
/// completes empty.
enum Fallback<Item, Err> {
  Default(Item),
  NotFound { index: usize, into_err: fn(NoSuchElement) -> Err },
}

/// Presents a [`SingleObserver`] as a [`MaybeObserver`], resolving an empty
/// completion through its [`Fallback`].
struct FallbackObserver<O, Item, Err> {
  observer: O,
  fallback: Fallback<Item, Err>,
}

impl<O, Item, Err> MaybeObserver<Item, Err> for FallbackObserver<O, Item, Err>
where
  O: SingleObserver<Item, Err>,
{
  fn success(self, value: Item) { self.observer.success(value); }

  fn complete(self) {
    match self.fallback {
      Fallback::Default(value) => self.observer.success(value),
      Fallback::NotFound { index, into_err } => {
        self.observer.error(into_err(NoSuchElement { index }))
      }
    }
  }

  fn error(self, err: Err) { self.observer.error(err); }
}

// ============================================================================
// Shared state
// ============================================================================

const ACTIVE: u8 = 0;
const TERMINATED: u8 = 1;
const CANCELLED: u8 = 2;

/// State shared between the subscriber (driven by upstream signals) and the
/// downstream [`ElementAtSubscription`] (driven by whoever cancels).
struct ElementAtState {
  status: AtomicU8,
  upstream: Mutex<Option<ArcFlowSubscription>>,
  operator: &'static str,
}

impl ElementAtState {
  fn new(operator: &'static str) -> Self {
    Self { status: AtomicU8::new(ACTIVE), upstream: Mutex::new(None), operator }
  }

  fn status(&self) -> u8 { self.status.load(Ordering::Acquire) }

  fn transition(&self, to: u8) -> bool {
    self
      .status
      .compare_exchange(ACTIVE, to, Ordering::AcqRel, Ordering::Acquire)
      .is_ok()
  }

  fn lock_upstream(&self) -> MutexGuard<'_, Option<ArcFlowSubscription>> {
    self
      .upstream
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
  }

  /// Take the upstream handle out of the slot; the lock is released before
  /// the caller touches it, so a synchronous source may re-enter freely.
  fn take_upstream(&self) -> Option<ArcFlowSubscription> { self.lock_upstream().take() }

  fn cancel(&self) {
    if self.transition(CANCELLED) {
      log::trace!("{}: cancelled by downstream", self.operator);
      if let Some(upstream) = self.take_upstream() {
        upstream.cancel();
      }
    }
  }
}

// ============================================================================
// Subscriber
// ============================================================================

/// Counts upstream items and captures the one at `index`.
struct ElementAtSubscriber<O> {
  observer: Option<O>,
  index: usize,
  count: usize,
  subscribed: bool,
  state: Arc<ElementAtState>,
}

impl<O> ElementAtSubscriber<O> {
  fn operator(&self) -> &'static str { self.state.operator }

  fn report(&self, violation: ProtocolViolation) { hooks::report(violation) }
}

impl<O, Item, Err> Subscriber<Item, Err> for ElementAtSubscriber<O>
where
  O: MaybeObserver<Item, Err>,
  Err: Send + 'static,
{
  fn on_subscribe(&mut self, subscription: ArcFlowSubscription) {
    if self.subscribed {
      subscription.cancel();
      self.report(ProtocolViolation::DuplicateSubscription { operator: self.operator() });
      return;
    }
    self.subscribed = true;

    {
      let mut slot = self.state.lock_upstream();
      if self.state.status() == ACTIVE {
        *slot = Some(subscription.clone());
      } else {
        drop(slot);
        subscription.cancel();
        return;
      }
    }
    subscription.request(self.index.saturating_add(1));
  }

  fn next(&mut self, value: Item) {
    match self.state.status() {
      ACTIVE => {}
      TERMINATED => {
        self.report(ProtocolViolation::NextAfterTerminal { operator: self.operator() });
        return;
      }
      _ => return,
    }

    if self.count != self.index {
      self.count += 1;
      return;
    }
    if self.state.transition(TERMINATED) {
      log::trace!("{}: captured item at index {}", self.operator(), self.index);
      if let Some(upstream) = self.state.take_upstream() {
        upstream.cancel();
      }
      if let Some(observer) = self.observer.take() {
        observer.success(value);
      }
    }
  }

  fn error(&mut self, err: Err) {
    if self.state.transition(TERMINATED) {
      self.state.take_upstream();
      if let Some(observer) = self.observer.take() {
        observer.error(err);
      }
    } else {
      self.report(ProtocolViolation::UndeliverableError {
        operator: self.operator(),
        error: Box::new(err),
      });
    }
  }

  fn complete(&mut self) {
    if self.state.transition(TERMINATED) {
      self.state.take_upstream();
      if let Some(observer) = self.observer.take() {
        observer.complete();
      }
    } else if self.state.status() == TERMINATED {
      self.report(ProtocolViolation::CompleteAfterTerminal { operator: self.operator() });
    }
  }
}

// ============================================================================
// Subscription
// ============================================================================

/// Downstream handle of an `element_at` subscription.
///
/// Cloneable so the result can be cancelled from a different thread than the
/// one that subscribed.
#[derive(Clone)]
pub struct ElementAtSubscription(Arc<ElementAtState>);

impl Subscription for ElementAtSubscription {
  fn unsubscribe(self) { self.0.cancel(); }

  fn is_closed(&self) -> bool { self.0.status() != ACTIVE }
}
