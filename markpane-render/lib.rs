//! Markdown-to-HTML conversion and the built-in print-to-PDF facility.
//!
//! Both halves are leaf collaborators: pure input to output, no knowledge
//! of documents, focus, or timers.

mod markdown;
pub mod pdf;

pub use markdown::{
  CmarkRenderer,
  RenderError,
  Renderer,
  html_page,
};
