//! Background hooks feeding the UI event queue.
//!
//! Each hook is an [`AsyncHook`](markpane_event::AsyncHook) owning one
//! resettable deadline. Expiry posts exactly one [`AppEvent`] and requests
//! a repaint; the application drains the queue at the top of every frame
//! and does the actual work on the UI thread.

mod autosave;
mod render;

use std::path::PathBuf;

pub use autosave::AutosaveHook;
pub use render::RenderHook;

use crate::export::{
  ExportError,
  ExportFormat,
};

/// Messages handed back to the UI thread.
#[derive(Debug)]
pub enum AppEvent {
  /// The render quiet period elapsed.
  RenderDue,
  /// The autosave quiet period elapsed.
  AutosaveDue,
  /// A background export finished.
  ExportFinished {
    format: ExportFormat,
    output: PathBuf,
    result: Result<(), ExportError>,
  },
}

/// What the UI sends to a debounce hook.
#[derive(Debug, Clone, Copy)]
pub enum DebounceSignal {
  /// (Re)start the countdown; any previous deadline is discarded.
  Arm,
  /// Stop a pending countdown without firing.
  Cancel,
}
