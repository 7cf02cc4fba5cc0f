//! Document export: one handler function per target format.
//!
//! HTML and PDF are self-contained (the renderer adapter and the built-in
//! print facility); everything else shells out to pandoc. Exports never
//! mutate the session: a job carries owned copies of the source and
//! preview text and runs on a blocking task off the UI thread.

mod pandoc;

use std::path::{
  Path,
  PathBuf,
};

use markpane_render::{
  CmarkRenderer,
  RenderError,
  Renderer,
  html_page,
  pdf,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
  #[error("`{0}` was not found on PATH")]
  ToolMissing(String),
  #[error("conversion failed: {0}")]
  Conversion(String),
  #[error(transparent)]
  Print(#[from] pdf::PrintError),
  #[error(transparent)]
  Render(#[from] RenderError),
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error("export task failed: {0}")]
  Task(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
  Html,
  Pdf,
  Docx,
  Tex,
  Odt,
  Epub,
}

type Handler = fn(&ExportJob) -> Result<(), ExportError>;

impl ExportFormat {
  pub const ALL: [ExportFormat; 6] = [
    ExportFormat::Html,
    ExportFormat::Pdf,
    ExportFormat::Docx,
    ExportFormat::Tex,
    ExportFormat::Odt,
    ExportFormat::Epub,
  ];

  pub fn label(self) -> &'static str {
    match self {
      ExportFormat::Html => "HTML",
      ExportFormat::Pdf => "PDF",
      ExportFormat::Docx => "DOCX",
      ExportFormat::Tex => "TeX",
      ExportFormat::Odt => "ODT",
      ExportFormat::Epub => "EPUB",
    }
  }

  pub fn extension(self) -> &'static str {
    match self {
      ExportFormat::Html => "html",
      ExportFormat::Pdf => "pdf",
      ExportFormat::Docx => "docx",
      ExportFormat::Tex => "tex",
      ExportFormat::Odt => "odt",
      ExportFormat::Epub => "epub",
    }
  }

  fn handler(self) -> Handler {
    match self {
      ExportFormat::Html => export_html,
      ExportFormat::Pdf => export_pdf,
      ExportFormat::Docx => |job| pandoc::export(job, "docx"),
      ExportFormat::Tex => |job| pandoc::export(job, "latex"),
      ExportFormat::Odt => |job| pandoc::export(job, "odt"),
      ExportFormat::Epub => |job| pandoc::export(job, "epub"),
    }
  }
}

/// An owned snapshot of everything an export needs.
#[derive(Debug, Clone)]
pub struct ExportJob {
  pub format:  ExportFormat,
  /// The Markdown source; input for every format except PDF.
  pub source:  String,
  /// The preview surface as currently shown; input for PDF only.
  pub preview: String,
  pub output:  PathBuf,
  /// Program name or path for the external converter.
  pub pandoc:  String,
  pub title:   String,
}

pub fn run(job: &ExportJob) -> Result<(), ExportError> {
  (job.format.handler())(job)
}

/// Force the output extension to match the format, as the original file
/// dialog filters would have.
pub fn with_extension(path: PathBuf, format: ExportFormat) -> PathBuf {
  let matches = path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| ext.eq_ignore_ascii_case(format.extension()));
  if matches {
    path
  } else {
    path.with_extension(format.extension())
  }
}

fn export_html(job: &ExportJob) -> Result<(), ExportError> {
  let body = CmarkRenderer::default().render(&job.source)?;
  std::fs::write(&job.output, html_page(&job.title, &body))?;
  Ok(())
}

fn export_pdf(job: &ExportJob) -> Result<(), ExportError> {
  pdf::print_to_file(&job.preview, &job.output)?;
  Ok(())
}

/// Remove a converter's half-written output, but never a file that already
/// existed before the export started.
fn cleanup_partial(path: &Path, existed_before: bool) {
  if !existed_before && path.exists() {
    log::debug!("removing partial export output {}", path.display());
    std::fs::remove_file(path).ok();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn job(format: ExportFormat, output: PathBuf) -> ExportJob {
    ExportJob {
      format,
      source: "# Title\n\nHello".to_string(),
      preview: "<h1>Title</h1>".to_string(),
      output,
      pandoc: "pandoc".to_string(),
      title: "doc.md".to_string(),
    }
  }

  #[test]
  fn html_export_writes_a_standalone_page() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("doc.html");
    run(&job(ExportFormat::Html, out.clone())).unwrap();
    let page = std::fs::read_to_string(&out).unwrap();
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<h1>Title</h1>"));
  }

  #[test]
  fn pdf_export_prints_the_preview() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("doc.pdf");
    run(&job(ExportFormat::Pdf, out.clone())).unwrap();
    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
  }

  #[test]
  fn missing_converter_reports_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("doc.docx");
    let mut job = job(ExportFormat::Docx, out.clone());
    job.pandoc = "markpane-no-such-converter".to_string();
    let err = run(&job).unwrap_err();
    assert!(matches!(err, ExportError::ToolMissing(name) if name == job.pandoc));
    assert!(!out.exists());
  }

  #[test]
  fn failing_converter_reports_conversion_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("doc.docx");
    let mut job = job(ExportFormat::Docx, out.clone());
    // `false` exists everywhere, ignores its arguments, and exits non-zero.
    job.pandoc = "false".to_string();
    let err = run(&job).unwrap_err();
    assert!(matches!(err, ExportError::Conversion(_)));
    assert!(!out.exists());
  }

  #[test]
  fn cleanup_never_touches_preexisting_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("doc.docx");
    std::fs::write(&out, "precious").unwrap();
    cleanup_partial(&out, true);
    assert!(out.exists());
    cleanup_partial(&out, false);
    assert!(!out.exists());
  }

  #[test]
  fn extension_is_forced_to_the_format() {
    let forced = with_extension(PathBuf::from("/tmp/report"), ExportFormat::Pdf);
    assert_eq!(forced, PathBuf::from("/tmp/report.pdf"));
    let kept = with_extension(PathBuf::from("/tmp/report.PDF"), ExportFormat::Pdf);
    assert_eq!(kept, PathBuf::from("/tmp/report.PDF"));
    let replaced = with_extension(PathBuf::from("/tmp/report.html"), ExportFormat::Epub);
    assert_eq!(replaced, PathBuf::from("/tmp/report.epub"));
  }
}
