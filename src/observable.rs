//! Single-result sources.
//!
//! [`Maybe`] and [`Single`] are what an operator like `element_at` turns a
//! [`Flowable`](crate::flowable::Flowable) into: something that resolves to
//! one outcome instead of a stream. Subscribing returns a
//! [`Subscription`] that can cancel the pending result.

use crate::{
  observer::{MaybeObserver, SingleObserver},
  ops::{
    into_future::{MaybeFuture, SingleFuture},
    to_flowable::{MaybeToFlowable, SingleToFlowable},
  },
  subscription::Subscription,
};

/// Resolves to a value, an empty completion, or an error.
pub trait Maybe: Sized {
  type Item;
  type Err;
  type Unsub: Subscription;

  fn subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: MaybeObserver<Self::Item, Self::Err> + Send + 'static;

  /// Convert into a future resolving to `Ok(Some(value))`, `Ok(None)` for an
  /// empty completion, or `Err(err)`. Dropping the future early unsubscribes.
  ///
  /// ```rust
  /// use rxflowable::prelude::*;
  ///
  /// let fut = from_iter::<_, ()>([1, 2]).element_at(5).unwrap().into_future();
  /// assert_eq!(futures::executor::block_on(fut), Ok(None));
  /// ```
  fn into_future(self) -> MaybeFuture<Self::Item, Self::Err, Self::Unsub>
  where
    Self::Item: Send + 'static,
    Self::Err: Send + 'static,
  {
    let (future, observer) = MaybeFuture::<Self::Item, Self::Err, Self::Unsub>::pending();
    future.with_subscription(self.subscribe(observer))
  }

  /// Convert back into a [`Flowable`](crate::flowable::Flowable) emitting the
  /// value, if any, once requested and then completing.
  ///
  /// ```rust
  /// use rxflowable::{prelude::*, testing::TestSubscriber};
  ///
  /// let subscriber = TestSubscriber::new();
  /// from_iter::<_, ()>([1, 2])
  ///   .element_at(1)
  ///   .unwrap()
  ///   .to_flowable()
  ///   .subscribe(subscriber.clone());
  /// subscriber.assert_result(&[2]);
  /// ```
  fn to_flowable(self) -> MaybeToFlowable<Self> { MaybeToFlowable::new(self) }
}

/// Resolves to a value or an error.
pub trait Single: Sized {
  type Item;
  type Err;
  type Unsub: Subscription;

  fn subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: SingleObserver<Self::Item, Self::Err> + Send + 'static;

  /// Convert into a future resolving to `Ok(value)` or `Err(err)`.
  fn into_future(self) -> SingleFuture<Self::Item, Self::Err, Self::Unsub>
  where
    Self::Item: Send + 'static,
    Self::Err: Send + 'static,
  {
    let (future, observer) = SingleFuture::<Self::Item, Self::Err, Self::Unsub>::pending();
    future.with_subscription(self.subscribe(observer))
  }

  /// Convert back into a [`Flowable`](crate::flowable::Flowable) emitting the
  /// value once requested and then completing.
  fn to_flowable(self) -> SingleToFlowable<Self> { SingleToFlowable::new(self) }
}
