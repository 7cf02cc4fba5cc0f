//! The in-memory Markdown document.

use std::{
  borrow::Cow,
  fs,
  io,
  path::{
    Path,
    PathBuf,
  },
};

const WELCOME: &str = "# markpane\n\nEditor on the left, preview on the right.\n\n\
                       - **Bold**, *italic*, `code`\n- Lists\n- [links](https://example.org)\n\n\
                       The right pane is editable too (cut/copy/paste freely), but nothing you\n\
                       change there flows back into the Markdown source.\n";

/// The source buffer plus everything needed to save it: path, dirty flag,
/// and an edit revision counter. The revision lets an autosave that started
/// at revision N refuse to clear the dirty flag if edits landed meanwhile.
#[derive(Debug)]
pub struct Document {
  text:     String,
  path:     Option<PathBuf>,
  dirty:    bool,
  revision: u64,
}

impl Document {
  pub fn new(text: impl Into<String>) -> Self {
    Self {
      text:     text.into(),
      path:     None,
      dirty:    false,
      revision: 0,
    }
  }

  /// Starter content for a session opened without a file.
  pub fn welcome() -> Self {
    Self::new(WELCOME)
  }

  /// Read a document from disk. Invalid UTF-8 is replaced rather than
  /// rejected; a missing file yields an empty document that will be created
  /// on first save.
  pub fn open(path: &Path) -> io::Result<Self> {
    let text = match fs::read(path) {
      Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
      Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
      Err(err) => return Err(err),
    };
    let mut doc = Self::new(text);
    doc.path = Some(path.to_path_buf());
    Ok(doc)
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn text_mut(&mut self) -> &mut String {
    &mut self.text
  }

  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  /// Point the document at a new location. Anything but a Markdown
  /// extension is replaced with `.md`.
  pub fn set_path(&mut self, path: PathBuf) {
    self.path = Some(with_markdown_ext(path));
  }

  pub fn display_name(&self) -> Cow<'_, str> {
    match self.path.as_deref().and_then(Path::file_name) {
      Some(name) => name.to_string_lossy(),
      None => Cow::Borrowed("untitled"),
    }
  }

  pub fn dirty(&self) -> bool {
    self.dirty
  }

  pub fn revision(&self) -> u64 {
    self.revision
  }

  /// Record that the source buffer changed.
  pub fn note_edit(&mut self) {
    self.dirty = true;
    self.revision += 1;
  }

  /// Clear the dirty flag, but only if no edit happened since `revision`
  /// was observed.
  pub fn mark_saved(&mut self, revision: u64) {
    if self.revision == revision {
      self.dirty = false;
    }
  }

  /// Write the buffer to the document's own path.
  pub fn save(&mut self) -> io::Result<PathBuf> {
    let path = self
      .path
      .clone()
      .ok_or_else(|| io::Error::other("document has no path"))?;
    let revision = self.revision;
    fs::write(&path, &self.text)?;
    self.mark_saved(revision);
    Ok(path)
  }
}

fn with_markdown_ext(path: PathBuf) -> PathBuf {
  let is_markdown = path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| {
      let ext = ext.to_ascii_lowercase();
      ext == "md" || ext == "markdown"
    });
  if is_markdown {
    path
  } else {
    path.with_extension("md")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn edits_bump_revision_and_dirty() {
    let mut doc = Document::new("a");
    assert!(!doc.dirty());
    doc.note_edit();
    doc.note_edit();
    assert!(doc.dirty());
    assert_eq!(doc.revision(), 2);
  }

  #[test]
  fn mark_saved_refuses_stale_revision() {
    let mut doc = Document::new("a");
    doc.note_edit();
    let observed = doc.revision();
    doc.note_edit();
    doc.mark_saved(observed);
    assert!(doc.dirty());
    doc.mark_saved(doc.revision());
    assert!(!doc.dirty());
  }

  #[test]
  fn open_missing_file_yields_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.md");
    let doc = Document::open(&path).unwrap();
    assert_eq!(doc.text(), "");
    assert_eq!(doc.path(), Some(path.as_path()));
  }

  #[test]
  fn open_replaces_invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.md");
    std::fs::write(&path, b"ok \xff\xfe end").unwrap();
    let doc = Document::open(&path).unwrap();
    assert!(doc.text().starts_with("ok "));
    assert!(doc.text().ends_with(" end"));
  }

  #[test]
  fn save_roundtrips_and_clears_dirty() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = Document::new("# Title\n\nHello");
    doc.set_path(dir.path().join("doc.md"));
    doc.note_edit();
    let path = doc.save().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Title\n\nHello");
    assert!(!doc.dirty());
  }

  #[test]
  fn set_path_normalizes_extension() {
    let mut doc = Document::new("");
    doc.set_path(PathBuf::from("/tmp/notes"));
    assert_eq!(doc.path(), Some(Path::new("/tmp/notes.md")));
    doc.set_path(PathBuf::from("/tmp/notes.markdown"));
    assert_eq!(doc.path(), Some(Path::new("/tmp/notes.markdown")));
    doc.set_path(PathBuf::from("/tmp/notes.txt"));
    assert_eq!(doc.path(), Some(Path::new("/tmp/notes.md")));
  }

  #[test]
  fn save_without_path_is_an_error() {
    let mut doc = Document::new("x");
    assert!(doc.save().is_err());
  }
}
