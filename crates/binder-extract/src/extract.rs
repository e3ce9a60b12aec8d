//! Text extraction from stored uploads.
//!
//! Parsers run on tokio's blocking pool. A parser that fails, or panics, is
//! reported as [`Extraction::Failed`] instead of failing the upload; the
//! stored text then carries the [`FAILURE_PREFIX`] sentinel.

use std::{
  fs,
  io::{Cursor, Read},
  path::{Path, PathBuf},
};

use quick_xml::events::Event;

use crate::FileKind;

/// Stored extracted text starting with this prefix records a failure.
pub const FAILURE_PREFIX: &str = "Error extracting";

/// Outcome of pulling text out of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
  Text(String),
  /// The file kind carries no extractable text (images, audio).
  Unsupported,
  Failed { kind: FileKind, message: String },
}

impl Extraction {
  /// Extracted text, when there is any. Failures and blank results count as
  /// no text.
  pub fn text(&self) -> Option<&str> {
    match self {
      Self::Text(t) if !t.trim().is_empty() => Some(t),
      _ => None,
    }
  }

  /// The value persisted in a document's `extracted_text` column.
  pub fn into_stored(self) -> Option<String> {
    match self {
      Self::Text(t) => Some(t),
      Self::Unsupported => None,
      Self::Failed { kind, message } => {
        Some(format!("{FAILURE_PREFIX} {} text: {message}", kind.label()))
      }
    }
  }
}

/// Whether stored extracted text is usable, i.e. present, non-blank and not
/// a failure sentinel.
pub fn usable_text(stored: Option<&str>) -> Option<&str> {
  stored.filter(|t| !t.trim().is_empty() && !t.starts_with(FAILURE_PREFIX))
}

/// Extract text from the file at `path`, treating it as `kind`.
pub async fn extract(path: PathBuf, kind: FileKind) -> Extraction {
  if !kind.is_textual() {
    return Extraction::Unsupported;
  }

  let outcome = tokio::task::spawn_blocking(move || extract_blocking(&path, kind)).await;
  let extraction = match outcome {
    Ok(Ok(text)) => Extraction::Text(text),
    Ok(Err(message)) => Extraction::Failed { kind, message },
    Err(join) => Extraction::Failed {
      kind,
      message: if join.is_panic() {
        "parser panicked".to_owned()
      } else {
        join.to_string()
      },
    },
  };

  if let Extraction::Failed { message, .. } = &extraction {
    tracing::warn!(%kind, %message, "text extraction failed");
  }
  extraction
}

fn extract_blocking(path: &Path, kind: FileKind) -> Result<String, String> {
  let bytes = fs::read(path).map_err(|e| e.to_string())?;
  match kind {
    FileKind::Txt => String::from_utf8(bytes).map_err(|e| e.to_string()),
    FileKind::Pdf => pdf_text(&bytes),
    FileKind::Doc | FileKind::Docx => word_text(&bytes),
    _ => Ok(String::new()),
  }
}

fn pdf_text(bytes: &[u8]) -> Result<String, String> {
  let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| e.to_string())?;
  Ok(text.trim().to_owned())
}

/// Paragraph text of a WordprocessingML package, one paragraph per line.
fn word_text(bytes: &[u8]) -> Result<String, String> {
  let mut archive =
    zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
  let mut xml = String::new();
  archive
    .by_name("word/document.xml")
    .map_err(|e| e.to_string())?
    .read_to_string(&mut xml)
    .map_err(|e| e.to_string())?;
  paragraphs(&xml)
}

fn paragraphs(xml: &str) -> Result<String, String> {
  let mut reader = quick_xml::Reader::from_str(xml);
  let mut out: Vec<String> = Vec::new();
  let mut current = String::new();
  let mut in_text = false;

  loop {
    match reader.read_event().map_err(|e| e.to_string())? {
      Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
      Event::End(e) => match e.name().as_ref() {
        b"w:t" => in_text = false,
        b"w:p" => out.push(std::mem::take(&mut current)),
        _ => {}
      },
      Event::Empty(e) => match e.name().as_ref() {
        b"w:tab" => current.push('\t'),
        b"w:br" | b"w:cr" => current.push('\n'),
        b"w:p" => out.push(String::new()),
        _ => {}
      },
      Event::Text(t) if in_text => {
        current.push_str(&t.unescape().map_err(|e| e.to_string())?);
      }
      Event::Eof => break,
      _ => {}
    }
  }

  Ok(out.join("\n"))
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Custody Order</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Father &amp; Mother </w:t></w:r><w:r><w:t>share time.</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>Pickup</w:t><w:tab/><w:t>6pm</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

  fn docx_bytes(document_xml: &str) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
      let mut zip = zip::ZipWriter::new(&mut buf);
      let options = zip::write::SimpleFileOptions::default();
      zip.start_file("word/document.xml", options).unwrap();
      zip.write_all(document_xml.as_bytes()).unwrap();
      zip.finish().unwrap();
    }
    buf.into_inner()
  }

  #[tokio::test]
  async fn plain_text_is_returned_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("note.txt");
    fs::write(&path, "Hello").unwrap();

    let extraction = extract(path, FileKind::Txt).await;
    assert_eq!(extraction, Extraction::Text("Hello".into()));
    assert_eq!(extraction.into_stored().as_deref(), Some("Hello"));
  }

  #[tokio::test]
  async fn word_paragraphs_are_joined_by_newlines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("order.docx");
    fs::write(&path, docx_bytes(DOCUMENT_XML)).unwrap();

    let extraction = extract(path, FileKind::Docx).await;
    assert_eq!(
      extraction.text(),
      Some("Custody Order\nFather & Mother share time.\n\nPickup\t6pm")
    );
  }

  #[tokio::test]
  async fn corrupt_pdf_yields_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.pdf");
    fs::write(&path, b"not really a pdf").unwrap();

    let extraction = extract(path, FileKind::Pdf).await;
    assert!(matches!(extraction, Extraction::Failed { kind: FileKind::Pdf, .. }));
    assert_eq!(extraction.text(), None);

    let stored = extraction.into_stored().unwrap();
    assert!(stored.starts_with("Error extracting PDF text: "));
    assert_eq!(usable_text(Some(&stored)), None);
  }

  #[tokio::test]
  async fn legacy_doc_that_is_not_a_zip_fails_softly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.doc");
    fs::write(&path, [0xD0, 0xCF, 0x11, 0xE0]).unwrap();

    let stored = extract(path, FileKind::Doc).await.into_stored().unwrap();
    assert!(stored.starts_with("Error extracting DOC text: "));
  }

  #[tokio::test]
  async fn media_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("call.mp3");
    fs::write(&path, b"ID3").unwrap();

    let extraction = extract(path, FileKind::Mp3).await;
    assert_eq!(extraction, Extraction::Unsupported);
    assert_eq!(extraction.into_stored(), None);
  }

  #[test]
  fn usable_text_skips_blank_and_sentinel() {
    assert_eq!(usable_text(None), None);
    assert_eq!(usable_text(Some("  \n")), None);
    assert_eq!(usable_text(Some("Error extracting DOCX text: bad zip")), None);
    assert_eq!(usable_text(Some("Hello")), Some("Hello"));
  }
}
