//! Process wide sink for protocol violations.
//!
//! Operators never push a second terminal signal downstream. When a source
//! misbehaves (an `error` after `complete`, values after cancellation, a
//! second `on_subscribe`) the offending signal is dropped and reported here
//! instead. Hosts install a handler to observe these reports; tests install
//! one to assert on them and call [`reset`] when done.
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use rxflowable::hooks;
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let c_seen = seen.clone();
//! hooks::install(move |violation| c_seen.lock().unwrap().push(violation.to_string()));
//! // ... run the pipeline ...
//! hooks::reset();
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::error::ProtocolViolation;

type Handler = Arc<dyn Fn(ProtocolViolation) + Send + Sync>;

static HANDLER: Lazy<RwLock<Option<Handler>>> = Lazy::new(|| RwLock::new(None));

/// Install `handler` as the sink for every subsequent violation, replacing
/// whatever was installed before.
pub fn install<F>(handler: F)
where
  F: Fn(ProtocolViolation) + Send + Sync + 'static,
{
  *HANDLER.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(handler));
}

/// Remove the installed handler. Violations fall back to the `log` facade.
pub fn reset() { *HANDLER.write().unwrap_or_else(PoisonError::into_inner) = None; }

/// Whether a handler is currently installed.
pub fn is_installed() -> bool {
  HANDLER
    .read()
    .unwrap_or_else(PoisonError::into_inner)
    .is_some()
}

/// Route a violation to the installed handler, or log it when none is set.
///
/// The handler runs outside the registry lock, so it may itself call
/// [`install`] or [`reset`].
pub fn report(violation: ProtocolViolation) {
  let handler = HANDLER
    .read()
    .unwrap_or_else(PoisonError::into_inner)
    .clone();
  match handler {
    Some(handler) => handler(violation),
    None => log::warn!("protocol violation: {violation}"),
  }
}
