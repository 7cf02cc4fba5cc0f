//! The eframe application: menu, split panes, prompt, status line, and the
//! queue that brings debounce expiries back onto the UI thread.
//!
//! Every frame starts by draining [`AppEvent`]s; all document and preview
//! mutation happens here, on the one thread that owns them. The hooks only
//! ever decide *when*, never *what*.

use std::path::{
  Path,
  PathBuf,
};

use markpane_event::{
  AsyncHook,
  send_blocking,
  try_send,
};
use tokio::sync::mpsc::{
  self,
  Sender,
  UnboundedReceiver,
  UnboundedSender,
};

use crate::{
  core::{
    config::Config,
    session::{
      AutosaveOutcome,
      Session,
    },
  },
  export::{
    self,
    ExportError,
    ExportFormat,
    ExportJob,
  },
  handlers::{
    AppEvent,
    AutosaveHook,
    DebounceSignal,
    RenderHook,
  },
  ui::{
    prompt::{
      Prompt,
      PromptAction,
      PromptPurpose,
    },
    status::StatusLine,
  },
};

pub struct Application {
  session: Session,
  config:  Config,

  event_tx: UnboundedSender<AppEvent>,
  events:   UnboundedReceiver<AppEvent>,

  render_hook:   Sender<DebounceSignal>,
  autosave_hook: Sender<DebounceSignal>,
  runtime:       tokio::runtime::Handle,

  status:           StatusLine,
  prompt:           Option<Prompt>,
  export_in_flight: bool,
  last_title:       String,
}

impl Application {
  pub fn new(
    cc: &eframe::CreationContext<'_>,
    session: Session,
    config: Config,
    runtime: tokio::runtime::Handle,
  ) -> Self {
    let (event_tx, events) = mpsc::unbounded_channel();

    // Hook tasks land on the runtime regardless of which thread eframe
    // runs the creator on.
    let guard = runtime.enter();
    let render_hook = RenderHook::new(
      config.render_debounce(),
      event_tx.clone(),
      cc.egui_ctx.clone(),
    )
    .spawn();
    let autosave_hook = AutosaveHook::new(
      config.autosave_idle(),
      event_tx.clone(),
      cc.egui_ctx.clone(),
    )
    .spawn();
    drop(guard);

    Self {
      session,
      config,
      event_tx,
      events,
      render_hook,
      autosave_hook,
      runtime,
      status: StatusLine::default(),
      prompt: None,
      export_in_flight: false,
      last_title: String::new(),
    }
  }

  fn drain_events(&mut self) {
    while let Ok(event) = self.events.try_recv() {
      match event {
        AppEvent::RenderDue => {
          if let Err(err) = self.session.render_due() {
            self.status.warning(format!("preview: {err}"));
          }
        },
        AppEvent::AutosaveDue => match self.session.autosave_due() {
          Ok(AutosaveOutcome::Written(path)) => {
            self.status.info(format!("autosaved {}", file_name(&path)));
          },
          Ok(AutosaveOutcome::Unchanged | AutosaveOutcome::Disabled) => {},
          Err(err) => self.status.warning(format!("autosave failed: {err}")),
        },
        AppEvent::ExportFinished {
          format,
          output,
          result,
        } => {
          self.export_in_flight = false;
          match result {
            Ok(()) => {
              self
                .status
                .info(format!("exported {} to {}", format.label(), output.display()));
            },
            Err(err) => {
              self
                .status
                .error(format!("{} export failed: {err}", format.label()));
            },
          }
        },
      }
    }
  }

  fn handle_shortcuts(&mut self, ctx: &egui::Context) {
    const SAVE: egui::KeyboardShortcut =
      egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
    const OPEN: egui::KeyboardShortcut =
      egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);

    if ctx.input_mut(|i| i.consume_shortcut(&SAVE)) {
      self.save();
    }
    if ctx.input_mut(|i| i.consume_shortcut(&OPEN)) {
      self.open_prompt(PromptPurpose::Open);
    }
  }

  fn show_menu(&mut self, ctx: &egui::Context) {
    egui::TopBottomPanel::top("menu").show(ctx, |ui| {
      egui::menu::bar(ui, |ui| {
        ui.menu_button("File", |ui| {
          if ui.button("Open…").clicked() {
            ui.close_menu();
            self.open_prompt(PromptPurpose::Open);
          }
          if ui.button("Save").clicked() {
            ui.close_menu();
            self.save();
          }
          if ui.button("Save As…").clicked() {
            ui.close_menu();
            self.open_prompt(PromptPurpose::SaveAs);
          }
          ui.separator();
          let mut autosave = self.session.autosave_enabled();
          if ui.checkbox(&mut autosave, "Autosave").changed() {
            self.toggle_autosave(autosave);
          }
          ui.separator();
          if ui.button("Quit").clicked() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
          }
        });
        ui.menu_button("Export", |ui| {
          for format in ExportFormat::ALL {
            let button = egui::Button::new(format!("Export {}…", format.label()));
            if ui.add_enabled(!self.export_in_flight, button).clicked() {
              ui.close_menu();
              self.open_prompt(PromptPurpose::Export(format));
            }
          }
        });
      });
    });
  }

  fn show_prompt(&mut self, ctx: &egui::Context) {
    if let Some(prompt) = self.prompt.as_mut() {
      let purpose = prompt.purpose;
      match prompt.show(ctx) {
        PromptAction::Pending => {},
        PromptAction::Cancelled => self.prompt = None,
        PromptAction::Submitted(path) => {
          self.prompt = None;
          self.submit_prompt(ctx, purpose, path);
        },
      }
    }
  }

  fn show_panes(&mut self, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
      let (source, preview) = ui.columns(2, |cols| {
        let source = egui::ScrollArea::vertical()
          .id_salt("source")
          .auto_shrink([false, false])
          .show(&mut cols[0], |ui| {
            ui.add(
              egui::TextEdit::multiline(self.session.document.text_mut())
                .font(egui::TextStyle::Monospace)
                .desired_width(f32::INFINITY)
                .desired_rows(40),
            )
          })
          .inner;
        let preview = egui::ScrollArea::vertical()
          .id_salt("preview")
          .auto_shrink([false, false])
          .show(&mut cols[1], |ui| {
            ui.add(
              egui::TextEdit::multiline(self.session.preview_mut().text_mut())
                .desired_width(f32::INFINITY)
                .desired_rows(40),
            )
          })
          .inner;
        (source, preview)
      });

      if source.changed() {
        self.on_source_edit();
      }
      if source.gained_focus() {
        self.on_source_focus();
      }
      if preview.gained_focus() {
        self.on_preview_focus();
      }
    });
  }

  fn on_source_edit(&mut self) {
    if self.session.source_edited() {
      send_blocking(&self.render_hook, DebounceSignal::Arm);
    }
    if self.session.autosave_enabled() {
      send_blocking(&self.autosave_hook, DebounceSignal::Arm);
    }
  }

  fn on_source_focus(&mut self) {
    match self.session.focus_source() {
      Ok(_) => {},
      Err(err) => self.status.warning(format!("preview: {err}")),
    }
  }

  fn on_preview_focus(&mut self) {
    self.session.focus_preview();
    // A dropped cancel is harmless: a due tick is suppressed while the
    // preview holds focus.
    try_send(&self.render_hook, DebounceSignal::Cancel);
  }

  fn toggle_autosave(&mut self, enabled: bool) {
    let rearm = self.session.set_autosave_enabled(enabled);
    if enabled {
      self.status.info("autosave enabled");
      if rearm {
        send_blocking(&self.autosave_hook, DebounceSignal::Arm);
      }
    } else {
      // A dropped cancel is harmless: a due tick sees the toggle off.
      try_send(&self.autosave_hook, DebounceSignal::Cancel);
      self.status.info("autosave disabled");
    }
  }

  fn open_prompt(&mut self, purpose: PromptPurpose) {
    let initial = match purpose {
      PromptPurpose::Open => String::new(),
      PromptPurpose::SaveAs => self
        .session
        .document
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_default(),
      PromptPurpose::Export(format) => self
        .session
        .document
        .path()
        .map(|p| export::with_extension(p.to_path_buf(), format).display().to_string())
        .unwrap_or_default(),
    };
    self.prompt = Some(Prompt::new(purpose, initial));
  }

  fn submit_prompt(&mut self, ctx: &egui::Context, purpose: PromptPurpose, path: PathBuf) {
    match purpose {
      PromptPurpose::Open => self.open_file(&path),
      PromptPurpose::SaveAs => match self.session.save_as(path) {
        Ok(saved) => self.status.info(format!("saved {}", saved.display())),
        Err(err) => self.status.error(format!("save failed: {err}")),
      },
      PromptPurpose::Export(format) => self.start_export(ctx, format, path),
    }
  }

  fn open_file(&mut self, path: &Path) {
    match self.session.open(path) {
      Ok(()) => {
        // Pending timers belong to the previous document.
        try_send(&self.render_hook, DebounceSignal::Cancel);
        try_send(&self.autosave_hook, DebounceSignal::Cancel);
        if let Err(err) = self.session.render_now() {
          self.status.warning(format!("preview: {err}"));
        }
        self
          .status
          .info(format!("opened {}", self.session.document.display_name()));
      },
      Err(err) => {
        self
          .status
          .error(format!("could not open {}: {err}", path.display()));
      },
    }
  }

  fn save(&mut self) {
    if self.session.document.path().is_none() {
      self.open_prompt(PromptPurpose::SaveAs);
      return;
    }
    match self.session.save() {
      Ok(path) => self.status.info(format!("saved {}", file_name(&path))),
      Err(err) => self.status.error(format!("save failed: {err}")),
    }
  }

  fn start_export(&mut self, ctx: &egui::Context, format: ExportFormat, path: PathBuf) {
    let output = export::with_extension(path, format);
    let job = ExportJob {
      format,
      source: self.session.document.text().to_string(),
      preview: self.session.preview().text().to_string(),
      output: output.clone(),
      pandoc: self.config.export.pandoc.clone(),
      title: self.session.document.display_name().into_owned(),
    };

    self.export_in_flight = true;
    self.status.info(format!("exporting {}…", format.label()));

    let tx = self.event_tx.clone();
    let ctx = ctx.clone();
    self.runtime.spawn(async move {
      let result = match tokio::task::spawn_blocking(move || export::run(&job)).await {
        Ok(result) => result,
        Err(err) => Err(ExportError::Task(err.to_string())),
      };
      let _ = tx.send(AppEvent::ExportFinished {
        format,
        output,
        result,
      });
      ctx.request_repaint();
    });
  }

  fn sync_title(&mut self, ctx: &egui::Context) {
    let title = format!(
      "markpane - {}{}",
      self.session.document.display_name(),
      if self.session.document.dirty() { " *" } else { "" }
    );
    if title != self.last_title {
      ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
      self.last_title = title;
    }
  }
}

impl eframe::App for Application {
  fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
    self.drain_events();
    self.handle_shortcuts(ctx);
    self.show_menu(ctx);

    let right = format!(
      "{}{}  |  autosave {}",
      self.session.document.display_name(),
      if self.session.document.dirty() { " *" } else { "" },
      if self.session.autosave_enabled() { "on" } else { "off" }
    );
    self.status.show(ctx, &right);
    self.show_prompt(ctx);

    // The central panel must come after every edge panel.
    self.show_panes(ctx);
    self.sync_title(ctx);
  }

  fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
    self.session.final_flush();
  }
}

fn file_name(path: &Path) -> String {
  path
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_else(|| path.display().to_string())
}
