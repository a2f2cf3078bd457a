//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Errors
pub use crate::error::{IndexOutOfBounds, NoSuchElement, ProtocolViolation};
// Sources
pub use crate::flowable::{create, empty, from_iter, just, throw_err, Flowable};
// Diagnostic hook
pub use crate::hooks;
// Single-result traits
pub use crate::observable::{Maybe, Single};
// Observers
pub use crate::observer::{FnObserver, FnSingleObserver, MaybeObserver, SingleObserver};
// Operators
pub use crate::ops::{element_at::*, into_future::*, to_flowable::*};
// Subscriber
pub use crate::subscriber::{BoxedSubscriber, Subscriber};
// Subscription
pub use crate::subscription::*;
