//! Debounced hook infrastructure for markpane.
//!
//! The UI thread never sleeps and never polls timers. Anything that wants
//! "do this once things quiet down" semantics (preview re-render, autosave)
//! implements [`AsyncHook`] and runs as a background task that owns a single
//! resettable deadline.

mod debounce;

pub use debounce::{
  AsyncHook,
  send_blocking,
  try_send,
};
