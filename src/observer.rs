//! Result contracts for single-result operators.
//!
//! A single-result operator delivers exactly one terminal outcome. The
//! observers here model that outcome directly: every method consumes the
//! observer, so once a result is delivered there is nothing left to call.
//!
//! - [`MaybeObserver`]: a value, an empty completion, or an error.
//! - [`SingleObserver`]: a value or an error.

// ============================================================================
// Observer Traits
// ============================================================================

/// Receives the outcome of a [`Maybe`](crate::observable::Maybe).
pub trait MaybeObserver<Item, Err> {
  /// The source produced a value.
  fn success(self, value: Item);

  /// The source finished without a value.
  fn complete(self);

  /// The source failed.
  fn error(self, err: Err);
}

/// Receives the outcome of a [`Single`](crate::observable::Single).
pub trait SingleObserver<Item, Err> {
  /// The source produced a value.
  fn success(self, value: Item);

  /// The source failed.
  fn error(self, err: Err);
}

// ============================================================================
// Closure adapters
// ============================================================================

/// Adapts a closure over `Result<Option<Item>, Err>` into a
/// [`MaybeObserver`].
///
/// ```rust
/// use rxflowable::prelude::*;
///
/// from_iter::<_, ()>([1, 2])
///   .element_at(1)
///   .unwrap()
///   .subscribe(FnObserver(|result: Result<Option<i32>, ()>| {
///     assert_eq!(result, Ok(Some(2)))
///   }));
/// ```
#[derive(Clone)]
pub struct FnObserver<F>(pub F);

impl<F, Item, Err> MaybeObserver<Item, Err> for FnObserver<F>
where
  F: FnOnce(Result<Option<Item>, Err>),
{
  #[inline]
  fn success(self, value: Item) { (self.0)(Ok(Some(value))) }

  #[inline]
  fn complete(self) { (self.0)(Ok(None)) }

  #[inline]
  fn error(self, err: Err) { (self.0)(Err(err)) }
}

/// Adapts a closure over `Result<Item, Err>` into a [`SingleObserver`].
#[derive(Clone)]
pub struct FnSingleObserver<F>(pub F);

impl<F, Item, Err> SingleObserver<Item, Err> for FnSingleObserver<F>
where
  F: FnOnce(Result<Item, Err>),
{
  #[inline]
  fn success(self, value: Item) { (self.0)(Ok(value)) }

  #[inline]
  fn error(self, err: Err) { (self.0)(Err(err)) }
}

// ============================================================================
// Option observer
// ============================================================================

/// `None` ignores the outcome, `Some` delegates to the inner observer.
impl<O, Item, Err> MaybeObserver<Item, Err> for Option<O>
where
  O: MaybeObserver<Item, Err>,
{
  fn success(self, value: Item) {
    if let Some(inner) = self {
      inner.success(value);
    }
  }

  fn complete(self) {
    if let Some(inner) = self {
      inner.complete();
    }
  }

  fn error(self, err: Err) {
    if let Some(inner) = self {
      inner.error(err);
    }
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use super::*;

  #[test]
  fn fn_observer_maps_outcomes() {
    let seen = Cell::new(None);
    let record = |r: Result<Option<i32>, ()>| seen.set(Some(r));
    MaybeObserver::<i32, ()>::success(FnObserver(record), 3);
    assert_eq!(seen.take(), Some(Ok(Some(3))));

    MaybeObserver::<i32, ()>::complete(FnObserver(record));
    assert_eq!(seen.take(), Some(Ok(None)));

    let check = FnObserver(|r: Result<Option<i32>, &str>| assert_eq!(r, Err("bad")));
    MaybeObserver::<i32, &str>::error(check, "bad");
  }

  #[test]
  fn fn_single_observer_maps_outcomes() {
    let seen = Cell::new(None);
    SingleObserver::<i32, ()>::success(FnSingleObserver(|r: Result<i32, ()>| seen.set(Some(r))), 5);
    assert_eq!(seen.take(), Some(Ok(5)));

    SingleObserver::<i32, ()>::error(FnSingleObserver(|r: Result<i32, ()>| seen.set(Some(r))), ());
    assert_eq!(seen.take(), Some(Err(())));
  }

  #[test]
  fn none_observer_ignores_outcome() {
    let none: Option<FnObserver<fn(Result<Option<i32>, ()>)>> = None;
    MaybeObserver::<i32, ()>::success(none, 1);
  }
}
