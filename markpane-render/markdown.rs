//! Markdown renderer adapter.

use pulldown_cmark::{
  Options,
  Parser,
  html,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
  #[error("markdown conversion failed: {0}")]
  Failed(String),
}

/// Converts Markdown source into an HTML fragment.
///
/// The trait exists so callers can treat conversion as fallible: the
/// bundled [`CmarkRenderer`] accepts any input, but the preview pipeline
/// must keep its last good state when a renderer does fail, and tests
/// exercise that path with a failing implementation.
pub trait Renderer {
  fn render(&self, source: &str) -> Result<String, RenderError>;
}

/// The default renderer, backed by pulldown-cmark with the common GitHub
/// extensions enabled.
pub struct CmarkRenderer {
  options: Options,
}

impl Default for CmarkRenderer {
  fn default() -> Self {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);
    Self { options }
  }
}

impl Renderer for CmarkRenderer {
  fn render(&self, source: &str) -> Result<String, RenderError> {
    let parser = Parser::new_ext(source, self.options);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    Ok(out)
  }
}

/// Wrap an HTML fragment into a standalone page, suitable for export.
pub fn html_page(title: &str, body: &str) -> String {
  format!(
    "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n\
     body {{ font-family: sans-serif; max-width: 48em; margin: 2em auto; padding: 0 1em; }}\n\
     pre, code {{ font-family: monospace; background: #f4f4f4; }}\n\
     pre {{ padding: 0.5em; overflow-x: auto; }}\n\
     </style>\n</head>\n<body>\n{}</body>\n</html>\n",
    escape_title(title),
    body
  )
}

fn escape_title(title: &str) -> String {
  title
    .replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_basic_markdown() {
    let renderer = CmarkRenderer::default();
    let out = renderer.render("# Title\n\nHello **world**").unwrap();
    assert!(out.contains("<h1>Title</h1>"));
    assert!(out.contains("<strong>world</strong>"));
  }

  #[test]
  fn renders_gfm_extensions() {
    let renderer = CmarkRenderer::default();
    let out = renderer
      .render("- [x] done\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~")
      .unwrap();
    assert!(out.contains("checkbox"));
    assert!(out.contains("<table>"));
    assert!(out.contains("<del>gone</del>"));
  }

  #[test]
  fn empty_source_renders_empty_fragment() {
    let renderer = CmarkRenderer::default();
    assert_eq!(renderer.render("").unwrap(), "");
  }

  #[test]
  fn page_escapes_the_title() {
    let page = html_page("a < b & c", "<p>x</p>");
    assert!(page.contains("<title>a &lt; b &amp; c</title>"));
    assert!(page.contains("<p>x</p>"));
  }
}
