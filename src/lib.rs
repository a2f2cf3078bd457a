//! # rxflowable: backpressured single-result operators
//!
//! Reduce a demand-driven stream to a single result, the Reactive Extensions
//! way.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxflowable::prelude::*;
//!
//! from_iter::<_, ()>([10, 20, 30])
//!   .element_at(1)
//!   .unwrap()
//!   .subscribe(FnObserver(|v: Result<Option<i32>, ()>| assert_eq!(v, Ok(Some(20)))));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Flowable`] | A source that emits only as much as its subscriber requests |
//! | [`Subscriber`] | Receives `on_subscribe`, `next`, `error` and `complete` from a flowable |
//! | [`Maybe`] / [`Single`] | A source resolving to exactly one outcome |
//! | [`Subscription`] | Handle to cancel a pending result |
//! | [`hooks`] | Process wide sink for signals a misbehaving source sent too late |
//!
//! ## Result shapes
//!
//! `element_at` comes in three shapes that differ only in what happens when
//! the source completes before the requested index:
//!
//! - [`Flowable::element_at`]: completes empty.
//! - [`Flowable::element_at_or`]: delivers the default.
//! - [`Flowable::element_at_or_error`]: fails with [`NoSuchElement`].
//!
//! A negative index is rejected when the operator is built, before anything
//! is subscribed.
//!
//! A result is consumed through an observer, awaited with `into_future`, or
//! turned back into a one-item flowable with `to_flowable`.
//!
//! [`Flowable`]: flowable::Flowable
//! [`Flowable::element_at`]: flowable::Flowable::element_at
//! [`Flowable::element_at_or`]: flowable::Flowable::element_at_or
//! [`Flowable::element_at_or_error`]: flowable::Flowable::element_at_or_error
//! [`Subscriber`]: subscriber::Subscriber
//! [`Maybe`]: observable::Maybe
//! [`Single`]: observable::Single
//! [`Subscription`]: subscription::Subscription
//! [`NoSuchElement`]: error::NoSuchElement

pub mod error;
pub mod flowable;
pub mod hooks;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod subscriber;
pub mod subscription;
pub mod testing;

// Re-export the prelude module
pub use prelude::*;
