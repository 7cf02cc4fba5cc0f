//! Transient status-line notices.
//!
//! Every recoverable failure in the app ends up here as a non-blocking
//! message; nothing in steady-state editing raises a dialog or aborts.

use std::time::{
  Duration,
  Instant,
};

const MESSAGE_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Info,
  Warning,
  Error,
}

impl Severity {
  fn color(self) -> egui::Color32 {
    match self {
      Severity::Info => egui::Color32::GRAY,
      Severity::Warning => egui::Color32::YELLOW,
      Severity::Error => egui::Color32::LIGHT_RED,
    }
  }
}

#[derive(Debug, Default)]
pub struct StatusLine {
  message: Option<(Severity, String, Instant)>,
}

impl StatusLine {
  pub fn info(&mut self, text: impl Into<String>) {
    self.set(Severity::Info, text.into());
  }

  pub fn warning(&mut self, text: impl Into<String>) {
    self.set(Severity::Warning, text.into());
  }

  pub fn error(&mut self, text: impl Into<String>) {
    self.set(Severity::Error, text.into());
  }

  fn set(&mut self, severity: Severity, text: String) {
    match severity {
      Severity::Info => log::info!("{text}"),
      Severity::Warning => log::warn!("{text}"),
      Severity::Error => log::error!("{text}"),
    }
    self.message = Some((severity, text, Instant::now()));
  }

  /// Draw the panel. `right_text` is permanent state (document name, dirty
  /// marker), the message area expires on its own.
  pub fn show(&mut self, ctx: &egui::Context, right_text: &str) {
    if let Some((_, _, since)) = &self.message {
      let elapsed = since.elapsed();
      if elapsed > MESSAGE_TTL {
        self.message = None;
      } else {
        // Make sure a frame happens when the message is due to expire.
        ctx.request_repaint_after(MESSAGE_TTL - elapsed);
      }
    }
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
      ui.horizontal(|ui| {
        if let Some((severity, text, _)) = &self.message {
          ui.colored_label(severity.color(), text);
        } else {
          ui.label("");
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
          ui.label(right_text);
        });
      });
    });
  }
}
