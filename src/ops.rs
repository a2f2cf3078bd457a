//! Operators reducing a `Flowable` to a single result, and the adapters
//! turning that result back into a future or a `Flowable`.

pub mod element_at;
pub mod into_future;
pub mod to_flowable;

pub use element_at::{ElementAt, ElementAtOr, ElementAtOrError, ElementAtSubscription};
pub use to_flowable::{MaybeToFlowable, SingleToFlowable};
