//! Print-to-file facility: paginated monospaced text as a minimal PDF.
//!
//! The emitter writes uncompressed PDF 1.4 by hand: one Courier text block
//! per page and a manual cross-reference table. That is all the preview
//! surface needs, and it keeps PDF export free of external tools.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrintError {
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

// US Letter, 1pt units.
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 54.0;
const FONT_SIZE: f32 = 10.0;
const LEADING: f32 = 12.0;

// Courier advances 0.6em per glyph.
const MAX_COLS: usize = ((PAGE_WIDTH - 2.0 * MARGIN) / (FONT_SIZE * 0.6)) as usize;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2.0 * MARGIN) / LEADING) as usize;

/// Lay `text` out as Courier pages and write the result to `path`.
pub fn print_to_file(text: &str, path: &Path) -> Result<(), PrintError> {
  std::fs::write(path, print_to_bytes(text))?;
  Ok(())
}

fn print_to_bytes(text: &str) -> Vec<u8> {
  let pages = paginate(text);
  let page_count = pages.len();

  // Objects: 1 catalog, 2 page tree, 3 font, then (page, content) pairs.
  let object_count = 3 + 2 * page_count;
  let mut out: Vec<u8> = Vec::new();
  let mut offsets = vec![0usize; object_count + 1];

  out.extend_from_slice(b"%PDF-1.4\n");

  let kids: Vec<String> = (0..page_count)
    .map(|i| format!("{} 0 R", 4 + 2 * i))
    .collect();

  push_object(&mut out, &mut offsets, 1, "<< /Type /Catalog /Pages 2 0 R >>");
  push_object(
    &mut out,
    &mut offsets,
    2,
    &format!(
      "<< /Type /Pages /Kids [ {} ] /Count {} >>",
      kids.join(" "),
      page_count
    ),
  );
  push_object(
    &mut out,
    &mut offsets,
    3,
    "<< /Type /Font /Subtype /Type1 /BaseFont /Courier >>",
  );

  for (i, lines) in pages.iter().enumerate() {
    let page_id = 4 + 2 * i;
    let content_id = page_id + 1;
    push_object(
      &mut out,
      &mut offsets,
      page_id,
      &format!(
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
         /Resources << /Font << /F1 3 0 R >> >> /Contents {content_id} 0 R >>"
      ),
    );

    let stream = content_stream(lines);
    offsets[content_id] = out.len();
    out.extend_from_slice(
      format!("{content_id} 0 obj\n<< /Length {} >>\nstream\n", stream.len()).as_bytes(),
    );
    out.extend_from_slice(stream.as_bytes());
    out.extend_from_slice(b"endstream\nendobj\n");
  }

  let xref_offset = out.len();
  out.extend_from_slice(format!("xref\n0 {}\n", object_count + 1).as_bytes());
  out.extend_from_slice(b"0000000000 65535 f \n");
  for offset in &offsets[1..] {
    out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
  }
  out.extend_from_slice(
    format!(
      "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
      object_count + 1
    )
    .as_bytes(),
  );

  out
}

fn push_object(out: &mut Vec<u8>, offsets: &mut [usize], id: usize, body: &str) {
  offsets[id] = out.len();
  out.extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
}

fn content_stream(lines: &[String]) -> String {
  let top = PAGE_HEIGHT - MARGIN - FONT_SIZE;
  let mut stream = format!("BT\n/F1 {FONT_SIZE} Tf\n{LEADING} TL\n{MARGIN} {top} Td\n");
  for (i, line) in lines.iter().enumerate() {
    if i > 0 {
      stream.push_str("T*\n");
    }
    stream.push('(');
    stream.push_str(&escape_text(line));
    stream.push_str(") Tj\n");
  }
  stream.push_str("ET\n");
  stream
}

/// Split the text into pages of wrapped lines.
fn paginate(text: &str) -> Vec<Vec<String>> {
  let mut pages = Vec::new();
  let mut current: Vec<String> = Vec::new();
  for raw in text.replace("\r\n", "\n").replace('\r', "\n").lines() {
    let expanded = raw.replace('\t', "    ");
    for wrapped in wrap_line(&expanded) {
      if current.len() == LINES_PER_PAGE {
        pages.push(std::mem::take(&mut current));
      }
      current.push(wrapped);
    }
  }
  if !current.is_empty() || pages.is_empty() {
    pages.push(current);
  }
  pages
}

fn wrap_line(line: &str) -> Vec<String> {
  if line.is_empty() {
    return vec![String::new()];
  }
  let chars: Vec<char> = line.chars().collect();
  chars
    .chunks(MAX_COLS)
    .map(|chunk| chunk.iter().collect())
    .collect()
}

/// Escape a line for a PDF literal string. Characters outside the Latin-1
/// range have no glyph in the builtin Courier and degrade to `?`.
fn escape_text(line: &str) -> String {
  let mut out = String::with_capacity(line.len());
  for c in line.chars() {
    match c {
      '\\' => out.push_str("\\\\"),
      '(' => out.push_str("\\("),
      ')' => out.push_str("\\)"),
      ' '..='~' => out.push(c),
      c if (c as u32) >= 0xA0 && (c as u32) <= 0xFF => {
        out.push_str(&format!("\\{:03o}", c as u32));
      },
      _ => out.push('?'),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn output_is_a_pdf() {
    let bytes = print_to_bytes("Hello, world");
    assert!(bytes.starts_with(b"%PDF-1.4"));
    assert!(bytes.ends_with(b"%%EOF\n"));
    let body = String::from_utf8_lossy(&bytes);
    assert!(body.contains("(Hello, world) Tj"));
  }

  #[test]
  fn empty_input_still_produces_one_page() {
    let body = String::from_utf8_lossy(&print_to_bytes("")).into_owned();
    assert!(body.contains("/Count 1"));
  }

  #[test]
  fn long_input_spans_multiple_pages() {
    let text = "line\n".repeat(LINES_PER_PAGE * 2 + 1);
    let body = String::from_utf8_lossy(&print_to_bytes(&text)).into_owned();
    assert!(body.contains("/Count 3"));
  }

  #[test]
  fn escapes_string_delimiters() {
    assert_eq!(escape_text(r"a(b)c\d"), r"a\(b\)c\\d");
  }

  #[test]
  fn wraps_wide_lines() {
    let wide = "x".repeat(MAX_COLS + 1);
    let wrapped = wrap_line(&wide);
    assert_eq!(wrapped.len(), 2);
    assert_eq!(wrapped[0].len(), MAX_COLS);
    assert_eq!(wrapped[1], "x");
  }

  #[test]
  fn writes_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pdf");
    print_to_file("# printed", &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
  }
}
