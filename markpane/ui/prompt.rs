//! Single-line path prompt, shown above the status line.
//!
//! Open, save-as, and export all funnel through here: the menu sets a
//! purpose, the user types a path, Enter submits and Escape cancels.

use std::path::PathBuf;

use crate::export::ExportFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPurpose {
  Open,
  SaveAs,
  Export(ExportFormat),
}

impl PromptPurpose {
  fn label(self) -> String {
    match self {
      PromptPurpose::Open => "open".to_string(),
      PromptPurpose::SaveAs => "save as".to_string(),
      PromptPurpose::Export(format) => format!("export {}", format.label()),
    }
  }
}

#[derive(Debug)]
pub enum PromptAction {
  Pending,
  Cancelled,
  Submitted(PathBuf),
}

#[derive(Debug)]
pub struct Prompt {
  pub purpose: PromptPurpose,
  input:       String,
  needs_focus: bool,
}

impl Prompt {
  pub fn new(purpose: PromptPurpose, initial: String) -> Self {
    Self {
      purpose,
      input: initial,
      needs_focus: true,
    }
  }

  pub fn show(&mut self, ctx: &egui::Context) -> PromptAction {
    let mut action = PromptAction::Pending;
    egui::TopBottomPanel::bottom("prompt").show(ctx, |ui| {
      ui.horizontal(|ui| {
        ui.label(format!("{}:", self.purpose.label()));
        let response = ui.add(
          egui::TextEdit::singleline(&mut self.input)
            .desired_width(f32::INFINITY)
            .hint_text("path"),
        );
        if self.needs_focus {
          response.request_focus();
          self.needs_focus = false;
        }
        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
          action = PromptAction::Cancelled;
        } else if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
          let trimmed = self.input.trim();
          if trimmed.is_empty() {
            action = PromptAction::Cancelled;
          } else {
            action = PromptAction::Submitted(PathBuf::from(trimmed));
          }
        }
      });
    });
    action
  }
}
