//! The upload allow-list.

use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Every file type the binder accepts, keyed by lower-case extension.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FileKind {
  Txt,
  Pdf,
  Doc,
  Docx,
  Png,
  Jpg,
  Jpeg,
  Gif,
  Mp3,
  Wav,
  Ogg,
}

impl FileKind {
  /// Classify `filename` by its final extension. `None` when there is no
  /// extension or it is not on the allow-list.
  pub fn from_filename(filename: &str) -> Option<Self> {
    let (_, ext) = filename.rsplit_once('.')?;
    ext.parse().ok()
  }

  /// Whether text can be pulled out of files of this kind.
  pub fn is_textual(self) -> bool {
    matches!(self, Self::Txt | Self::Pdf | Self::Doc | Self::Docx)
  }

  /// The label used in extraction failure messages, e.g. `PDF`.
  pub fn label(self) -> String { self.as_ref().to_ascii_uppercase() }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn allow_list_is_case_insensitive() {
    assert_eq!(FileKind::from_filename("Order.PDF"), Some(FileKind::Pdf));
    assert_eq!(FileKind::from_filename("notes.final.txt"), Some(FileKind::Txt));
    assert_eq!(FileKind::from_filename("photo.JPeg"), Some(FileKind::Jpeg));
  }

  #[test]
  fn unknown_or_missing_extensions_are_rejected() {
    assert_eq!(FileKind::from_filename("payload.exe"), None);
    assert_eq!(FileKind::from_filename("archive.tar.gz"), None);
    assert_eq!(FileKind::from_filename("README"), None);
    assert_eq!(FileKind::from_filename("trailing."), None);
  }

  #[test]
  fn allow_list_has_eleven_entries() {
    let exts: Vec<String> =
      FileKind::iter().map(|k| k.as_ref().to_owned()).collect();
    assert_eq!(exts, [
      "txt", "pdf", "doc", "docx", "png", "jpg", "jpeg", "gif", "mp3", "wav",
      "ogg"
    ]);
  }
}
