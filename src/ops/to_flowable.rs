//! ToFlowable: a single result as a one-item `Flowable`
//!
//! The result is held until the subscriber requests at least one item, then
//! emitted followed by `complete`. An empty completion and an error are
//! forwarded without waiting for demand. Cancelling the flowable unsubscribes
//! from the wrapped `Maybe` or `Single`.

use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc, Mutex, MutexGuard, PoisonError,
};

use crate::{
  flowable::Flowable,
  observable::{Maybe, Single},
  observer::{MaybeObserver, SingleObserver},
  subscriber::{BoxedSubscriber, Subscriber},
  subscription::{FlowSubscription, Subscription},
};

/// Flowable returned by [`Maybe::to_flowable`].
pub struct MaybeToFlowable<M>(M);

/// Flowable returned by [`Single::to_flowable`].
pub struct SingleToFlowable<S>(S);

impl<M> MaybeToFlowable<M> {
  pub(crate) fn new(source: M) -> Self { Self(source) }
}

impl<S> SingleToFlowable<S> {
  pub(crate) fn new(source: S) -> Self { Self(source) }
}

impl<M> Flowable for MaybeToFlowable<M>
where
  M: Maybe,
  M::Item: Send + 'static,
  M::Err: Send + 'static,
  M::Unsub: Send + 'static,
{
  type Item = M::Item;
  type Err = M::Err;

  fn subscribe<S>(self, subscriber: S)
  where
    S: Subscriber<M::Item, M::Err> + Send + 'static,
  {
    let scalar = ScalarSubscription::attach(subscriber);
    if scalar.is_cancelled() {
      return;
    }
    let unsub = self.0.subscribe(ScalarObserver(scalar.clone()));
    scalar.hold(unsub);
  }
}

impl<S> Flowable for SingleToFlowable<S>
where
  S: Single,
  S::Item: Send + 'static,
  S::Err: Send + 'static,
  S::Unsub: Send + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn subscribe<Sub>(self, subscriber: Sub)
  where
    Sub: Subscriber<S::Item, S::Err> + Send + 'static,
  {
    let scalar = ScalarSubscription::attach(subscriber);
    if scalar.is_cancelled() {
      return;
    }
    let unsub = self.0.subscribe(ScalarObserver(scalar.clone()));
    scalar.hold(unsub);
  }
}

// ============================================================================
// ScalarSubscription
// ============================================================================

struct ScalarState<Item, Err> {
  subscriber: Option<BoxedSubscriber<Item, Err>>,
  value: Option<Item>,
  requested: bool,
}

/// Meets the result and the subscriber's demand, whichever comes second
/// emits.
struct ScalarSubscription<Item, Err, U> {
  state: Mutex<ScalarState<Item, Err>>,
  cancelled: AtomicBool,
  upstream: Mutex<Option<U>>,
}

impl<Item, Err, U> ScalarSubscription<Item, Err, U>
where
  Item: Send + 'static,
  Err: Send + 'static,
  U: Subscription + Send + 'static,
{
  fn attach<S>(mut subscriber: S) -> Arc<Self>
  where
    S: Subscriber<Item, Err> + Send + 'static,
  {
    let scalar = Arc::new(Self {
      state: Mutex::new(ScalarState { subscriber: None, value: None, requested: false }),
      cancelled: AtomicBool::new(false),
      upstream: Mutex::new(None),
    });
    subscriber.on_subscribe(scalar.clone());
    if !scalar.is_cancelled() {
      scalar.lock_state().subscriber = Some(Box::new(subscriber));
    }
    scalar
  }
}

impl<Item, Err, U: Subscription> ScalarSubscription<Item, Err, U> {
  fn lock_state(&self) -> MutexGuard<'_, ScalarState<Item, Err>> {
    self
      .state
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
  }

  fn lock_upstream(&self) -> MutexGuard<'_, Option<U>> {
    self
      .upstream
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
  }

  fn is_cancelled(&self) -> bool { self.cancelled.load(Ordering::Acquire) }

  /// Keep the source's subscription so a later cancel can reach it.
  fn hold(&self, unsub: U) {
    let mut slot = self.lock_upstream();
    if self.is_cancelled() {
      drop(slot);
      unsub.unsubscribe();
    } else {
      *slot = Some(unsub);
    }
  }

  fn emit(&self, mut subscriber: BoxedSubscriber<Item, Err>, value: Item) {
    subscriber.next(value);
    if !self.is_cancelled() {
      subscriber.complete();
    }
  }

  fn deliver(&self, result: Result<Option<Item>, Err>) {
    let mut state = self.lock_state();
    if self.is_cancelled() {
      return;
    }
    match result {
      Ok(Some(value)) if !state.requested => state.value = Some(value),
      result => {
        let Some(mut subscriber) = state.subscriber.take() else { return };
        drop(state);
        match result {
          Ok(Some(value)) => self.emit(subscriber, value),
          Ok(None) => subscriber.complete(),
          Err(err) => subscriber.error(err),
        }
      }
    }
  }
}

impl<Item, Err, U> FlowSubscription for ScalarSubscription<Item, Err, U>
where
  Item: Send,
  Err: Send,
  U: Subscription + Send,
{
  fn request(&self, n: usize) {
    if n == 0 {
      return;
    }
    let mut state = self.lock_state();
    state.requested = true;
    let Some(value) = state.value.take() else { return };
    let subscriber = state.subscriber.take();
    drop(state);
    if let Some(subscriber) = subscriber {
      self.emit(subscriber, value);
    }
  }

  fn cancel(&self) {
    if self.cancelled.swap(true, Ordering::AcqRel) {
      return;
    }
    let (subscriber, value) = {
      let mut state = self.lock_state();
      (state.subscriber.take(), state.value.take())
    };
    drop((subscriber, value));
    let upstream = self.lock_upstream().take();
    if let Some(upstream) = upstream {
      upstream.unsubscribe();
    }
  }
}

/// Feeds the outcome of the wrapped result into its [`ScalarSubscription`].
struct ScalarObserver<Item, Err, U>(Arc<ScalarSubscription<Item, Err, U>>);

impl<Item, Err, U: Subscription> MaybeObserver<Item, Err> for ScalarObserver<Item, Err, U> {
  fn success(self, value: Item) { self.0.deliver(Ok(Some(value))); }

  fn complete(self) { self.0.deliver(Ok(None)); }

  fn error(self, err: Err) { self.0.deliver(Err(err)); }
}

impl<Item, Err, U: Subscription> SingleObserver<Item, Err> for ScalarObserver<Item, Err, U> {
  fn success(self, value: Item) { self.0.deliver(Ok(Some(value))); }

  fn error(self, err: Err) { self.0.deliver(Err(err)); }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::{
    prelude::*,
    testing::{TestSubscriber, TestSubscription},
  };

  #[test]
  fn value_waits_for_demand() {
    let subscriber = TestSubscriber::with_request(0);
    from_iter::<_, ()>([1, 2])
      .element_at(1)
      .unwrap()
      .to_flowable()
      .subscribe(subscriber.clone());
    assert_eq!(subscriber.terminal_count(), 0);

    subscriber.request(1);
    subscriber.assert_result(&[2]);
  }

  #[test]
  fn empty_completes_without_demand() {
    let subscriber = TestSubscriber::with_request(0);
    empty::<i32, ()>()
      .element_at(0)
      .unwrap()
      .to_flowable()
      .subscribe(subscriber.clone());
    subscriber.assert_result(&[]);
  }

  #[test]
  fn error_passes_through_without_demand() {
    let subscriber = TestSubscriber::with_request(0);
    throw_err::<i32, _>("boom")
      .element_at_or(0, 5)
      .unwrap()
      .to_flowable()
      .subscribe(subscriber.clone());
    subscriber.assert_error("boom");
  }

  #[test]
  fn single_default_is_emitted() {
    let subscriber = TestSubscriber::new();
    empty::<i32, ()>()
      .element_at_or(3, 9)
      .unwrap()
      .to_flowable()
      .subscribe(subscriber.clone());
    subscriber.assert_result(&[9]);
  }

  #[test]
  fn cancel_unsubscribes_the_result() {
    let upstream = TestSubscription::new();
    let c_upstream = upstream.clone();
    let subscriber = TestSubscriber::new();
    create(move |mut s: BoxedSubscriber<i32, ()>| {
      s.on_subscribe(Arc::new(c_upstream));
    })
    .element_at(0)
    .unwrap()
    .to_flowable()
    .subscribe(subscriber.clone());

    assert_eq!(upstream.requested(), 1);
    subscriber.cancel();
    assert!(upstream.is_cancelled());
    assert_eq!(subscriber.terminal_count(), 0);
  }

  #[test]
  fn cancel_drops_a_held_value() {
    let subscriber = TestSubscriber::with_request(0);
    just::<_, ()>(1)
      .element_at(0)
      .unwrap()
      .to_flowable()
      .subscribe(subscriber.clone());
    subscriber.cancel();
    subscriber.request(1);
    assert_eq!(subscriber.terminal_count(), 0);
    assert!(subscriber.values().is_empty());
  }

  #[test]
  fn cancel_during_on_subscribe_never_subscribes_the_result() {
    struct CancelAtOnce(Arc<Mutex<bool>>);

    impl Subscriber<i32, ()> for CancelAtOnce {
      fn on_subscribe(&mut self, subscription: ArcFlowSubscription) { subscription.cancel(); }

      fn next(&mut self, _: i32) { *self.0.lock().unwrap() = true; }

      fn error(&mut self, _: ()) { *self.0.lock().unwrap() = true; }

      fn complete(&mut self) { *self.0.lock().unwrap() = true; }
    }

    let upstream = TestSubscription::new();
    let c_upstream = upstream.clone();
    let signalled = Arc::new(Mutex::new(false));
    create(move |mut s: BoxedSubscriber<i32, ()>| {
      s.on_subscribe(Arc::new(c_upstream));
      s.next(1);
    })
    .element_at(0)
    .unwrap()
    .to_flowable()
    .subscribe(CancelAtOnce(signalled.clone()));

    assert_eq!(upstream.requested(), 0);
    assert!(!*signalled.lock().unwrap());
  }
}
