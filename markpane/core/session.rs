//! The editing session: sync between source and preview, plus autosave.
//!
//! Everything here runs on the UI thread. The session never arms timers
//! itself; it answers "should a render be armed?" on each edit and applies
//! the due work when the application drains a hook's message. That keeps
//! the whole focus/suppression state machine synchronous and testable.

use std::{
  hash::BuildHasher,
  io,
  path::{
    Path,
    PathBuf,
  },
};

use foldhash::fast::FixedState;
use markpane_render::{
  RenderError,
  Renderer,
};

use crate::core::document::Document;

/// Which pane owns input focus. The preview refreshes from the source only
/// while the source pane holds focus; a focused preview is a free-standing
/// editable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Source,
  Preview,
}

/// Rendered HTML held as editable text. Deliberately never reconciled back
/// into the source: edits made here live until the next refresh.
#[derive(Debug, Default)]
pub struct PreviewBuffer {
  html: String,
}

impl PreviewBuffer {
  pub fn text(&self) -> &str {
    &self.html
  }

  pub fn text_mut(&mut self) -> &mut String {
    &mut self.html
  }

  fn set(&mut self, html: String) {
    self.html = html;
  }
}

#[derive(Debug, Clone)]
pub struct AutosaveSettings {
  pub enabled:           bool,
  /// Autosave onto the document's own path when it has one.
  pub use_document_path: bool,
  /// Target when no document path applies.
  pub fallback:          PathBuf,
}

#[derive(Debug, PartialEq, Eq)]
pub enum AutosaveOutcome {
  Written(PathBuf),
  /// Content identical to the last successful write; nothing to do.
  Unchanged,
  Disabled,
}

pub struct Session {
  pub document: Document,
  preview:      PreviewBuffer,
  focus:        Focus,
  renderer:     Box<dyn Renderer>,
  autosave:     AutosaveSettings,
  target:       PathBuf,
  last_written: Option<u64>,
}

impl Session {
  pub fn new(renderer: Box<dyn Renderer>, document: Document, autosave: AutosaveSettings) -> Self {
    let mut session = Self {
      document,
      preview: PreviewBuffer::default(),
      focus: Focus::Source,
      renderer,
      autosave,
      target: PathBuf::new(),
      last_written: None,
    };
    session.retarget_autosave();
    session
  }

  pub fn preview(&self) -> &PreviewBuffer {
    &self.preview
  }

  pub fn preview_mut(&mut self) -> &mut PreviewBuffer {
    &mut self.preview
  }

  /// Record a source edit. Returns whether the render debounce should be
  /// armed: only while the source pane holds focus. Autosave arming is the
  /// caller's concern and is independent of focus.
  pub fn source_edited(&mut self) -> bool {
    self.document.note_edit();
    self.focus == Focus::Source
  }

  /// Focus moved to the preview pane. No flush; the preview freezes as-is.
  pub fn focus_preview(&mut self) {
    self.focus = Focus::Preview;
  }

  /// Focus returned to the source pane. Exactly one immediate re-render,
  /// discarding whatever was typed into the preview meanwhile. Returns
  /// `Ok(false)` when the source pane already had focus.
  pub fn focus_source(&mut self) -> Result<bool, RenderError> {
    if self.focus == Focus::Source {
      return Ok(false);
    }
    self.focus = Focus::Source;
    self.render_now()?;
    Ok(true)
  }

  /// A render debounce expired. Suppressed (returns `Ok(false)`) while the
  /// preview pane holds focus, so a late tick can never clobber an
  /// in-progress preview edit.
  pub fn render_due(&mut self) -> Result<bool, RenderError> {
    if self.focus == Focus::Preview {
      return Ok(false);
    }
    self.render_now()?;
    Ok(true)
  }

  /// Unconditionally refresh the preview from the source. On failure the
  /// preview keeps its last good content.
  pub fn render_now(&mut self) -> Result<(), RenderError> {
    let html = self.renderer.render(self.document.text())?;
    self.preview.set(html);
    Ok(())
  }

  pub fn autosave_enabled(&self) -> bool {
    self.autosave.enabled
  }

  /// Toggle autosave. Returns whether the caller should immediately re-arm
  /// the autosave debounce (enabled with unsaved changes pending).
  pub fn set_autosave_enabled(&mut self, enabled: bool) -> bool {
    self.autosave.enabled = enabled;
    enabled && self.document.dirty()
  }

  pub fn autosave_target(&self) -> &Path {
    &self.target
  }

  /// An autosave debounce expired: persist the source buffer to the
  /// resolved target. Identical content is skipped, and the dirty flag is
  /// only cleared when no edit arrived after the write began.
  pub fn autosave_due(&mut self) -> io::Result<AutosaveOutcome> {
    if !self.autosave.enabled {
      return Ok(AutosaveOutcome::Disabled);
    }
    let hash = content_hash(self.document.text());
    if self.last_written == Some(hash) {
      return Ok(AutosaveOutcome::Unchanged);
    }
    let revision = self.document.revision();
    std::fs::write(&self.target, self.document.text())?;
    self.last_written = Some(hash);
    self.document.mark_saved(revision);
    Ok(AutosaveOutcome::Written(self.target.clone()))
  }

  /// Best-effort flush on teardown. Runs whenever the buffer is dirty,
  /// even with the autosave toggle off; there is no user surface left to
  /// report to, so failure is only logged.
  pub fn final_flush(&mut self) {
    if !self.document.dirty() {
      return;
    }
    match std::fs::write(&self.target, self.document.text()) {
      Ok(()) => log::debug!("final flush to {}", self.target.display()),
      Err(err) => log::warn!("final flush failed: {err}"),
    }
  }

  /// Replace the session's document with one loaded from `path`.
  pub fn open(&mut self, path: &Path) -> io::Result<()> {
    self.document = Document::open(path)?;
    self.last_written = None;
    self.retarget_autosave();
    Ok(())
  }

  /// Save to the document's current path. Callers must ensure one is set
  /// (prompting for save-as otherwise). The dedup hash is primed only
  /// when the save landed on the autosave target itself; a separate
  /// fallback target still wants the next tick's write.
  pub fn save(&mut self) -> io::Result<PathBuf> {
    let path = self.document.save()?;
    if path == self.target {
      self.last_written = Some(content_hash(self.document.text()));
    }
    Ok(path)
  }

  /// Save under a new path; subsequent autosaves follow it.
  pub fn save_as(&mut self, path: PathBuf) -> io::Result<PathBuf> {
    self.document.set_path(path);
    self.retarget_autosave();
    self.save()
  }

  /// Resolve the autosave target. Runs once per open/save-as, never per
  /// autosave tick.
  fn retarget_autosave(&mut self) {
    self.target = match self.document.path() {
      Some(path) if self.autosave.use_document_path => path.to_path_buf(),
      _ => self.autosave.fallback.clone(),
    };
  }
}

fn content_hash(text: &str) -> u64 {
  FixedState::default().hash_one(text)
}
