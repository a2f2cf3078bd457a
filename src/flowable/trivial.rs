use std::{iter, marker::PhantomData, sync::Arc};

use crate::{
  flowable::{from_iter, Flowable, FromIter},
  subscriber::Subscriber,
  subscription::BooleanSubscription,
};

/// Creates a flowable that completes without emitting anything.
pub fn empty<Item, Err>() -> FromIter<iter::Empty<Item>, Err> { from_iter(iter::empty()) }

/// Creates a flowable that emits `value` once requested, then completes.
pub fn just<Item, Err>(value: Item) -> FromIter<iter::Once<Item>, Err> {
  from_iter(iter::once(value))
}

/// Creates a flowable that fails with `err` as soon as it is subscribed.
pub fn throw_err<Item, Err>(err: Err) -> ThrowErr<Item, Err> {
  ThrowErr { err, _marker: PhantomData }
}

/// Flowable returned by [`throw_err`].
pub struct ThrowErr<Item, Err> {
  err: Err,
  _marker: PhantomData<fn() -> Item>,
}

impl<Item, Err> Flowable for ThrowErr<Item, Err> {
  type Item = Item;
  type Err = Err;

  fn subscribe<S>(self, mut subscriber: S)
  where
    S: Subscriber<Item, Err> + Send + 'static,
  {
    let subscription = Arc::new(BooleanSubscription::new());
    subscriber.on_subscribe(subscription.clone());
    if !subscription.is_cancelled() {
      subscriber.error(self.err);
    }
  }
}
