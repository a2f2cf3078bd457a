//! Subscriber trait: the consumer side of a backpressured source.
//!
//! A source calls `on_subscribe` once, then `next` at most as many times as
//! has been requested through the handle, then one of `error` or `complete`.
//!
//! Unlike [`MaybeObserver`](crate::observer::MaybeObserver), every method
//! takes `&mut self`. The subscriber sits on the untrusted side of the
//! protocol: a faulty source may call `error` after `complete`, or keep
//! emitting after cancellation, and the subscriber must be able to receive
//! those calls in order to drop and report them. It also keeps the trait
//! object-safe, so sources can work with `Box<dyn Subscriber>` without
//! knowing the concrete operator chain below them.

use crate::subscription::ArcFlowSubscription;

pub trait Subscriber<Item, Err> {
  /// Receive the upstream handle. Called before any other signal.
  fn on_subscribe(&mut self, subscription: ArcFlowSubscription);

  /// Receive the next item.
  fn next(&mut self, value: Item);

  /// Receive the terminal error.
  fn error(&mut self, err: Err);

  /// Receive the terminal completion.
  fn complete(&mut self);
}

/// Type-erased subscriber, as handed to `create` closures.
pub type BoxedSubscriber<Item, Err> = Box<dyn Subscriber<Item, Err> + Send>;

impl<Item, Err, S> Subscriber<Item, Err> for Box<S>
where
  S: Subscriber<Item, Err> + ?Sized,
{
  #[inline]
  fn on_subscribe(&mut self, subscription: ArcFlowSubscription) {
    (**self).on_subscribe(subscription)
  }

  #[inline]
  fn next(&mut self, value: Item) { (**self).next(value) }

  #[inline]
  fn error(&mut self, err: Err) { (**self).error(err) }

  #[inline]
  fn complete(&mut self) { (**self).complete() }
}
