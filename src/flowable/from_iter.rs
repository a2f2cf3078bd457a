use std::{
  iter::Peekable,
  marker::PhantomData,
  sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
  },
};

use crate::{
  flowable::Flowable,
  subscriber::{BoxedSubscriber, Subscriber},
  subscription::FlowSubscription,
};

/// Creates a flowable that emits the items of `iter` on demand, then
/// completes.
///
/// Completion does not wait for demand: once the iterator is exhausted the
/// subscriber is completed even if it has requested nothing.
pub fn from_iter<I, Err>(iter: I) -> FromIter<I::IntoIter, Err>
where
  I: IntoIterator,
{
  FromIter { iter: iter.into_iter(), _marker: PhantomData }
}

/// Flowable returned by [`from_iter`].
pub struct FromIter<It, Err> {
  iter: It,
  _marker: PhantomData<fn() -> Err>,
}

impl<It, Err> Flowable for FromIter<It, Err>
where
  It: Iterator + Send + 'static,
  It::Item: Send + 'static,
  Err: Send + 'static,
{
  type Item = It::Item;
  type Err = Err;

  fn subscribe<S>(self, subscriber: S)
  where
    S: Subscriber<It::Item, Err> + Send + 'static,
  {
    let subscription = Arc::new(IterSubscription {
      demand: AtomicUsize::new(0),
      cancelled: AtomicBool::new(false),
      // Held at one while `on_subscribe` runs, so requests made from inside
      // it only record demand.
      wip: AtomicUsize::new(1),
      emitter: Mutex::new(None),
    });

    let mut subscriber: BoxedSubscriber<It::Item, Err> = Box::new(subscriber);
    subscriber.on_subscribe(subscription.clone());
    *subscription.lock_emitter() = Some(IterEmitter { iter: self.iter.peekable(), subscriber });
    subscription.drain_loop();
  }
}

struct IterEmitter<It: Iterator, Err> {
  iter: Peekable<It>,
  subscriber: BoxedSubscriber<It::Item, Err>,
}

/// Demand bookkeeping shared between the emitting loop and the subscriber.
///
/// `wip` elects a single drainer: whoever moves it off zero emits, everyone
/// else only bumps it so the drainer takes another pass. Requests and
/// cancellation made from inside `next` therefore never re-enter the emitter.
struct IterSubscription<It: Iterator, Err> {
  demand: AtomicUsize,
  cancelled: AtomicBool,
  wip: AtomicUsize,
  emitter: Mutex<Option<IterEmitter<It, Err>>>,
}

impl<It: Iterator, Err> IterSubscription<It, Err> {
  fn lock_emitter(&self) -> MutexGuard<'_, Option<IterEmitter<It, Err>>> {
    self
      .emitter
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
  }

  fn drain(&self) {
    if self.wip.fetch_add(1, Ordering::AcqRel) == 0 {
      self.drain_loop();
    }
  }

  fn drain_loop(&self) {
    let mut missed = 1;
    loop {
      self.emit();
      missed = self.wip.fetch_sub(missed, Ordering::AcqRel) - missed;
      if missed == 0 {
        break;
      }
    }
  }

  fn emit(&self) {
    let mut slot = self.lock_emitter();
    loop {
      if self.cancelled.load(Ordering::Acquire) {
        slot.take();
        return;
      }
      let Some(emitter) = slot.as_mut() else { return };
      if emitter.iter.peek().is_none() {
        if let Some(mut emitter) = slot.take() {
          emitter.subscriber.complete();
        }
        return;
      }
      if !self.consume_one() {
        return;
      }
      if let Some(value) = emitter.iter.next() {
        emitter.subscriber.next(value);
      }
    }
  }

  fn consume_one(&self) -> bool {
    self
      .demand
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |demand| match demand {
        0 => None,
        usize::MAX => Some(usize::MAX),
        n => Some(n - 1),
      })
      .is_ok()
  }
}

impl<It, Err> FlowSubscription for IterSubscription<It, Err>
where
  It: Iterator + Send,
  It::Item: Send,
{
  fn request(&self, n: usize) {
    if n == 0 {
      return;
    }
    let _ = self
      .demand
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |demand| Some(demand.saturating_add(n)));
    self.drain();
  }

  fn cancel(&self) {
    if !self.cancelled.swap(true, Ordering::AcqRel) {
      self.drain();
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use super::*;
  use crate::subscription::ArcFlowSubscription;

  #[derive(Default)]
  struct Log {
    values: Vec<i32>,
    completed: bool,
    upstream: Option<ArcFlowSubscription>,
  }

  /// Requests `initial` on subscribe and one more after every item, stopping
  /// (by cancelling) once `cancel_after` items arrived.
  struct Probe {
    log: Arc<Mutex<Log>>,
    initial: usize,
    refill: bool,
    cancel_after: Option<usize>,
  }

  impl Subscriber<i32, ()> for Probe {
    fn on_subscribe(&mut self, subscription: ArcFlowSubscription) {
      if self.initial > 0 {
        subscription.request(self.initial);
      }
      self.log.lock().unwrap().upstream = Some(subscription);
    }

    fn next(&mut self, value: i32) {
      let upstream = {
        let mut log = self.log.lock().unwrap();
        log.values.push(value);
        if Some(log.values.len()) == self.cancel_after {
          log.upstream.clone().map(|s| (s, true))
        } else if self.refill {
          log.upstream.clone().map(|s| (s, false))
        } else {
          None
        }
      };
      match upstream {
        Some((s, true)) => s.cancel(),
        Some((s, false)) => s.request(1),
        None => {}
      }
    }

    fn error(&mut self, _: ()) {}

    fn complete(&mut self) { self.log.lock().unwrap().completed = true; }
  }

  fn probe(initial: usize, refill: bool, cancel_after: Option<usize>) -> (Probe, Arc<Mutex<Log>>) {
    let log = Arc::new(Mutex::new(Log::default()));
    (Probe { log: log.clone(), initial, refill, cancel_after }, log)
  }

  #[test]
  fn unbounded_request_drains_everything() {
    let (p, log) = probe(usize::MAX, false, None);
    from_iter(1..=5).subscribe(p);

    let log = log.lock().unwrap();
    assert_eq!(log.values, vec![1, 2, 3, 4, 5]);
    assert!(log.completed);
  }

  #[test]
  fn emits_only_what_was_requested() {
    let (p, log) = probe(2, false, None);
    from_iter(1..=5).subscribe(p);

    assert_eq!(log.lock().unwrap().values, vec![1, 2]);
    assert!(!log.lock().unwrap().completed);

    let upstream = log.lock().unwrap().upstream.clone().unwrap();
    upstream.request(10);
    let log = log.lock().unwrap();
    assert_eq!(log.values, vec![1, 2, 3, 4, 5]);
    assert!(log.completed);
  }

  #[test]
  fn request_from_inside_next_keeps_flowing() {
    let (p, log) = probe(1, true, None);
    from_iter(0..100).subscribe(p);

    let log = log.lock().unwrap();
    assert_eq!(log.values.len(), 100);
    assert!(log.completed);
  }

  #[test]
  fn cancel_from_inside_next_stops_emission() {
    let (p, log) = probe(usize::MAX, false, Some(3));
    from_iter(1..).subscribe(p);

    let log = log.lock().unwrap();
    assert_eq!(log.values, vec![1, 2, 3]);
    assert!(!log.completed);
  }

  #[test]
  fn empty_source_completes_without_demand() {
    let (p, log) = probe(0, false, None);
    from_iter(std::iter::empty::<i32>()).subscribe(p);

    let log = log.lock().unwrap();
    assert!(log.values.is_empty());
    assert!(log.completed);
  }

  #[test]
  fn exhausted_source_completes_without_extra_demand() {
    let (p, log) = probe(2, false, None);
    from_iter([7, 8]).subscribe(p);

    let log = log.lock().unwrap();
    assert_eq!(log.values, vec![7, 8]);
    assert!(log.completed);
  }
}
