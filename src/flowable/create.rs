use std::marker::PhantomData;

use crate::{
  flowable::Flowable,
  subscriber::{BoxedSubscriber, Subscriber},
};

/// Creates a flowable from a function that drives the subscriber by hand.
///
/// The function is responsible for the whole protocol: calling
/// `on_subscribe`, honouring demand and cancellation, and terminating. It is
/// the way to bridge callback based producers, and to build deliberately
/// faulty sources in tests.
///
/// ```rust
/// use std::sync::Arc;
///
/// use rxflowable::prelude::*;
///
/// let source = create(|mut subscriber: BoxedSubscriber<i32, ()>| {
///   subscriber.on_subscribe(Arc::new(EmptySubscription));
///   subscriber.next(1);
///   subscriber.complete();
/// });
/// source
///   .element_at(0)
///   .unwrap()
///   .subscribe(FnObserver(|v: Result<Option<i32>, ()>| assert_eq!(v, Ok(Some(1)))));
/// ```
pub fn create<F, Item, Err>(f: F) -> Create<F, Item, Err>
where
  F: FnOnce(BoxedSubscriber<Item, Err>),
{
  Create { f, _marker: PhantomData }
}

/// Flowable returned by [`create`].
pub struct Create<F, Item, Err> {
  f: F,
  _marker: PhantomData<fn() -> (Item, Err)>,
}

impl<F, Item, Err> Flowable for Create<F, Item, Err>
where
  F: FnOnce(BoxedSubscriber<Item, Err>),
{
  type Item = Item;
  type Err = Err;

  fn subscribe<S>(self, subscriber: S)
  where
    S: Subscriber<Item, Err> + Send + 'static,
  {
    (self.f)(Box::new(subscriber))
  }
}
