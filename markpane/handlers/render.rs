//! Debounced preview refresh.
//!
//! Re-rendering on every keystroke is wasteful and flickers; this hook
//! coalesces a typing burst into one `RenderDue` per quiet period. The
//! focus-based suppression lives in the session, not here: the hook is
//! cancelled when the preview pane takes focus, and a tick that slips
//! through anyway is dropped by the handler.

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

pub struct RenderHook {
  quiet: Duration,
  out:   UnboundedSender<AppEvent>,
  ctx:   egui::Context,
}

impl RenderHook {
  pub fn new(quiet: Duration, out: UnboundedSender<AppEvent>, ctx: egui::Context) -> Self {
    Self { quiet, out, ctx }
  }
}

impl AsyncHook for RenderHook {
  type Event = DebounceSignal;

  fn handle_event(&mut self, event: DebounceSignal, _deadline: Option<Instant>) -> Option<Instant> {
    match event {
      DebounceSignal::Arm => Some(Instant::now() + self.quiet),
      DebounceSignal::Cancel => None,
    }
  }

  fn finish_debounce(&mut self) {
    if self.out.send(AppEvent::RenderDue).is_ok() {
      self.ctx.request_repaint();
    }
  }
}
