//! Error types raised by the single-result operators.
//!
//! Stream errors stay generic (`Err` on every trait); the types here cover
//! what the operators themselves produce: construction failures, the
//! "no such element" outcome and protocol violations routed to
//! [`hooks`](crate::hooks).

use std::{
  any::Any,
  fmt::{self, Debug, Display},
};

// ============================================================================
// IndexOutOfBounds
// ============================================================================

/// Returned synchronously when an operator is built with an index that cannot
/// address an element (a negative value, or one that does not fit `usize`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOutOfBounds {
  /// The rejected index, as the caller wrote it.
  pub index: String,
}

impl Display for IndexOutOfBounds {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "index out of bounds: {} is not a valid element index", self.index)
  }
}

impl std::error::Error for IndexOutOfBounds {}

/// Convert a caller supplied index into a `usize`, rejecting negatives.
pub(crate) fn check_index<I>(index: I) -> Result<usize, IndexOutOfBounds>
where
  I: TryInto<usize> + Display + Copy,
{
  index
    .try_into()
    .map_err(|_| IndexOutOfBounds { index: index.to_string() })
}

// ============================================================================
// NoSuchElement
// ============================================================================

/// The source completed normally before the requested index was reached.
///
/// Only `element_at_or_error` produces it; the stream's own error type must
/// implement `From<NoSuchElement>` so it can travel down the error channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoSuchElement {
  pub index: usize,
}

impl Display for NoSuchElement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "no such element: the source completed before index {}", self.index)
  }
}

impl std::error::Error for NoSuchElement {}

// ============================================================================
// ProtocolViolation
// ============================================================================

/// A signal that arrived when the receiving operator could no longer accept
/// it. These never reach the downstream observer; they are handed to the
/// process wide hook instead.
pub enum ProtocolViolation {
  /// `on_subscribe` was called a second time. The new handle was cancelled.
  DuplicateSubscription { operator: &'static str },
  /// `next` arrived after a terminal signal had already been delivered.
  NextAfterTerminal { operator: &'static str },
  /// `complete` arrived after a terminal signal had already been delivered.
  CompleteAfterTerminal { operator: &'static str },
  /// An error that had nowhere to go: the operator was already terminated or
  /// cancelled.
  UndeliverableError { operator: &'static str, error: Box<dyn Any + Send> },
}

impl ProtocolViolation {
  /// Name of the operator that detected the violation.
  pub fn operator(&self) -> &'static str {
    match self {
      Self::DuplicateSubscription { operator }
      | Self::NextAfterTerminal { operator }
      | Self::CompleteAfterTerminal { operator }
      | Self::UndeliverableError { operator, .. } => operator,
    }
  }

  /// The undeliverable error, if this violation carries one of type `E`.
  pub fn error_ref<E: 'static>(&self) -> Option<&E> {
    match self {
      Self::UndeliverableError { error, .. } => error.downcast_ref::<E>(),
      _ => None,
    }
  }

  pub fn is_undeliverable_error(&self) -> bool { matches!(self, Self::UndeliverableError { .. }) }
}

impl Display for ProtocolViolation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::DuplicateSubscription { operator } => {
        write!(f, "{operator}: on_subscribe called more than once")
      }
      Self::NextAfterTerminal { operator } => {
        write!(f, "{operator}: next received after the terminal signal")
      }
      Self::CompleteAfterTerminal { operator } => {
        write!(f, "{operator}: complete received after the terminal signal")
      }
      Self::UndeliverableError { operator, .. } => {
        write!(f, "{operator}: error received after the terminal signal or cancellation")
      }
    }
  }
}

impl Debug for ProtocolViolation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ProtocolViolation")
      .field("operator", &self.operator())
      .field("message", &self.to_string())
      .finish()
  }
}

impl std::error::Error for ProtocolViolation {}
