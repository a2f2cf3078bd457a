//! Backpressured sources and the `Flowable` trait.
//!
//! A [`Flowable`] pushes items to a [`Subscriber`] only as fast as the
//! subscriber requests them through its [`FlowSubscription`]. Operators that
//! reduce a flowable to a single result are provided methods on the trait.
//!
//! [`FlowSubscription`]: crate::subscription::FlowSubscription

use std::fmt::Display;

use crate::{
  error::{check_index, IndexOutOfBounds, NoSuchElement},
  ops::element_at::{ElementAt, ElementAtOr, ElementAtOrError},
  subscriber::Subscriber,
};

mod create;
mod from_iter;
mod trivial;

pub use create::*;
pub use from_iter::*;
pub use trivial::*;

/// A source of items under demand-based flow control.
pub trait Flowable: Sized {
  type Item;
  type Err;

  /// Attach `subscriber`. The source calls `on_subscribe` first and then
  /// emits no more items than the subscriber has requested.
  fn subscribe<S>(self, subscriber: S)
  where
    S: Subscriber<Self::Item, Self::Err> + Send + 'static;

  /// Emit the item at `index` (0-based), or complete empty if the source
  /// completes first.
  ///
  /// Fails immediately, before anything is subscribed, when `index` is
  /// negative.
  ///
  /// ```rust
  /// use rxflowable::prelude::*;
  ///
  /// let third = from_iter::<_, ()>(['a', 'b', 'c']).element_at(2).unwrap();
  /// third.subscribe(FnObserver(|v: Result<Option<char>, ()>| assert_eq!(v, Ok(Some('c')))));
  ///
  /// assert!(from_iter::<_, ()>(['a']).element_at(-1).is_err());
  /// ```
  fn element_at<I>(self, index: I) -> Result<ElementAt<Self>, IndexOutOfBounds>
  where
    I: TryInto<usize> + Display + Copy,
  {
    Ok(ElementAt::new(self, check_index(index)?))
  }

  /// Emit the item at `index`, or `default` if the source completes first.
  fn element_at_or<I>(
    self, index: I, default: Self::Item,
  ) -> Result<ElementAtOr<Self, Self::Item>, IndexOutOfBounds>
  where
    I: TryInto<usize> + Display + Copy,
  {
    Ok(ElementAtOr::new(self, check_index(index)?, default))
  }

  /// Emit the item at `index`, or fail with [`NoSuchElement`] if the source
  /// completes first.
  fn element_at_or_error<I>(self, index: I) -> Result<ElementAtOrError<Self>, IndexOutOfBounds>
  where
    I: TryInto<usize> + Display + Copy,
    Self::Err: From<NoSuchElement>,
  {
    Ok(ElementAtOrError::new(self, check_index(index)?))
  }
}
