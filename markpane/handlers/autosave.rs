//! Debounced autosave trigger.
//!
//! Armed on every source edit regardless of focus; the quiet period is
//! deliberately longer than the render debounce so typing bursts settle
//! before anything touches the disk. The write itself happens on the UI
//! thread when `AutosaveDue` is drained.

use std::time::Duration;

use markpane_event::AsyncHook;
use tokio::{
  sync::mpsc::UnboundedSender,
  time::Instant,
};

use crate::handlers::{
  AppEvent,
  DebounceSignal,
};

pub struct AutosaveHook {
  quiet: Duration,
  out:   UnboundedSender<AppEvent>,
  ctx:   egui::Context,
}

impl AutosaveHook {
  pub fn new(quiet: Duration, out: UnboundedSender<AppEvent>, ctx: egui::Context) -> Self {
    Self { quiet, out, ctx }
  }
}

impl AsyncHook for AutosaveHook {
  type Event = DebounceSignal;

  fn handle_event(&mut self, event: DebounceSignal, _deadline: Option<Instant>) -> Option<Instant> {
    match event {
      DebounceSignal::Arm => Some(Instant::now() + self.quiet),
      DebounceSignal::Cancel => None,
    }
  }

  fn finish_debounce(&mut self) {
    if self.out.send(AppEvent::AutosaveDue).is_ok() {
      self.ctx.request_repaint();
    } else {
      log::debug!("autosave tick dropped: UI event queue is gone");
    }
  }
}
