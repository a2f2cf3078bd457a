//! IntoFuture for single-result sources
//!
//! Converts a [`Maybe`](crate::observable::Maybe) or
//! [`Single`](crate::observable::Single) into a `Future` of its outcome.
//!
//! ## Behavior
//!
//! - **Maybe**: resolves with `Ok(Some(value))`, `Ok(None)` on an empty
//!   completion, or `Err(error)`.
//! - **Single**: resolves with `Ok(value)` or `Err(error)`.
//!
//! The outcome may be delivered from any thread; the future parks its waker
//! in an `AtomicWaker` and is woken when the observer stores the result.
//!
//! Dropping the future before it resolves unsubscribes from the source.

use std::{
  future::Future,
  pin::Pin,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError,
  },
  task::{Context as TaskContext, Poll},
};

use futures::task::AtomicWaker;

use crate::{
  observer::{MaybeObserver, SingleObserver},
  subscription::Subscription,
};

/// Shared state between the future and its observer
struct SharedState<T, Err> {
  result: Mutex<Option<Result<T, Err>>>,
  settled: AtomicBool,
  waker: AtomicWaker,
}

impl<T, Err> SharedState<T, Err> {
  fn take(&self) -> Option<Result<T, Err>> {
    self
      .result
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .take()
  }

  fn resolve(&self, result: Result<T, Err>) {
    *self
      .result
      .lock()
      .unwrap_or_else(PoisonError::into_inner) = Some(result);
    self.settled.store(true, Ordering::Release);
    self.waker.wake();
  }

  fn is_settled(&self) -> bool { self.settled.load(Ordering::Acquire) }
}

/// A future that resolves with the outcome of a single-result source.
///
/// `U` is the subscription feeding it. If the future is dropped before the
/// outcome arrives, that subscription is unsubscribed.
pub struct ResultFuture<T, Err, U: Subscription = ()> {
  shared: Arc<SharedState<T, Err>>,
  unsub: Option<U>,
}

/// Future returned by [`Maybe::into_future`](crate::observable::Maybe::into_future).
pub type MaybeFuture<Item, Err, U = ()> = ResultFuture<Option<Item>, Err, U>;

/// Future returned by
/// [`Single::into_future`](crate::observable::Single::into_future).
pub type SingleFuture<Item, Err, U = ()> = ResultFuture<Item, Err, U>;

impl<T, Err, U: Subscription> ResultFuture<T, Err, U> {
  /// Create a pending future and the observer that resolves it.
  pub fn pending() -> (Self, FutureObserver<T, Err>) {
    let shared = Arc::new(SharedState {
      result: Mutex::new(None),
      settled: AtomicBool::new(false),
      waker: AtomicWaker::new(),
    });
    (Self { shared: shared.clone(), unsub: None }, FutureObserver { shared })
  }

  /// Tie `unsub` to the lifetime of this future.
  pub fn with_subscription(mut self, unsub: U) -> Self {
    self.unsub = Some(unsub);
    self
  }
}

impl<T, Err, U: Subscription> Drop for ResultFuture<T, Err, U> {
  fn drop(&mut self) {
    if let Some(unsub) = self.unsub.take() {
      if !self.shared.is_settled() {
        unsub.unsubscribe();
      }
    }
  }
}

impl<T, Err, U: Subscription> Future for ResultFuture<T, Err, U> {
  type Output = Result<T, Err>;

  fn poll(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
    if let Some(result) = self.shared.take() {
      return Poll::Ready(result);
    }
    self.shared.waker.register(cx.waker());
    // The result may have landed between the first check and registration.
    match self.shared.take() {
      Some(result) => Poll::Ready(result),
      None => Poll::Pending,
    }
  }
}

/// Observer half of a [`ResultFuture`].
pub struct FutureObserver<T, Err> {
  shared: Arc<SharedState<T, Err>>,
}

impl<Item, Err> MaybeObserver<Item, Err> for FutureObserver<Option<Item>, Err> {
  fn success(self, value: Item) { self.shared.resolve(Ok(Some(value))); }

  fn complete(self) { self.shared.resolve(Ok(None)); }

  fn error(self, err: Err) { self.shared.resolve(Err(err)); }
}

impl<Item, Err> SingleObserver<Item, Err> for FutureObserver<Item, Err> {
  fn success(self, value: Item) { self.shared.resolve(Ok(value)); }

  fn error(self, err: Err) { self.shared.resolve(Err(err)); }
}

#[cfg(test)]
mod tests {
  use std::{sync::Arc, thread, time::Duration};

  use futures::executor::block_on;

  use crate::{prelude::*, subscription::BooleanSubscription, testing::TestSubscription};

  #[derive(Debug, PartialEq)]
  enum TestError {
    NotFound(NoSuchElement),
    Boom,
  }

  impl From<NoSuchElement> for TestError {
    fn from(e: NoSuchElement) -> Self { TestError::NotFound(e) }
  }

  #[test]
  fn maybe_future_resolves_value() {
    let fut = from_iter::<_, ()>([1, 2]).element_at(1).unwrap().into_future();
    assert_eq!(block_on(fut), Ok(Some(2)));
  }

  #[test]
  fn maybe_future_resolves_empty() {
    let fut = from_iter::<_, ()>([1, 2]).element_at(2).unwrap().into_future();
    assert_eq!(block_on(fut), Ok(None));
  }

  #[test]
  fn single_future_resolves_default() {
    let fut = from_iter::<_, ()>([1, 2]).element_at_or(2, 0).unwrap().into_future();
    assert_eq!(block_on(fut), Ok(0));
  }

  #[test]
  fn single_future_resolves_not_found() {
    let fut = empty::<i32, TestError>()
      .element_at_or_error(0)
      .unwrap()
      .into_future();
    assert_eq!(block_on(fut), Err(TestError::NotFound(NoSuchElement { index: 0 })));
  }

  #[test]
  fn single_future_resolves_upstream_error() {
    let fut = throw_err::<i32, _>(TestError::Boom)
      .element_at_or_error(0)
      .unwrap()
      .into_future();
    assert_eq!(block_on(fut), Err(TestError::Boom));
  }

  #[test]
  fn future_wakes_on_result_from_another_thread() {
    let fut = create(|mut subscriber: BoxedSubscriber<i32, ()>| {
      thread::spawn(move || {
        let upstream = Arc::new(BooleanSubscription::new());
        subscriber.on_subscribe(upstream.clone());
        thread::sleep(Duration::from_millis(10));
        for v in [10, 20, 30] {
          if upstream.is_cancelled() {
            return;
          }
          subscriber.next(v);
        }
        subscriber.complete();
      });
    })
    .element_at(1)
    .unwrap()
    .into_future();

    assert_eq!(block_on(fut), Ok(Some(20)));
  }

  #[test]
  fn dropping_unresolved_future_cancels_source() {
    let upstream = TestSubscription::new();
    let c_upstream = upstream.clone();
    let fut = create(move |mut s: BoxedSubscriber<i32, ()>| {
      s.on_subscribe(Arc::new(c_upstream));
    })
    .element_at(0)
    .unwrap()
    .into_future();

    assert!(!upstream.is_cancelled());
    drop(fut);
    assert!(upstream.is_cancelled());
  }

  #[test]
  fn manually_resolved_future() {
    let (fut, observer) = SingleFuture::<i32, ()>::pending();
    SingleObserver::success(observer, 3);
    assert_eq!(block_on(fut), Ok(3));
  }
}
