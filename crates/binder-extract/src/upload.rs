//! Writing uploaded bytes into the upload directory under a unique name.

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
};

use sha2::{Digest, Sha256};
use tokio::{
  fs,
  io::{AsyncWrite, AsyncWriteExt},
};
use uuid::Uuid;

use crate::{Error, FileKind, Result};

/// Attempts at finding a free name before giving up.
const NAME_ATTEMPTS: usize = 8;

/// A file that has been written to disk.
#[derive(Debug, Clone)]
pub struct StoredFile {
  /// Generated name inside the upload directory.
  pub filename:          String,
  /// Sanitised name as supplied by the client.
  pub original_filename: String,
  pub file_type:         FileKind,
  pub size:              u64,
  /// SHA-256 of the content, lower-case hex.
  pub content_hash:      String,
  pub path:              PathBuf,
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// Directory parts are dropped, whitespace becomes `_`, and anything other
/// than ASCII letters, digits, `.`, `-` and `_` is removed. Leading dots and
/// underscores are stripped so the result is never hidden or empty-stemmed.
pub fn sanitize_filename(name: &str) -> String {
  let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
  let cleaned: String = base
    .chars()
    .filter_map(|c| match c {
      c if c.is_whitespace() => Some('_'),
      c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
      _ => None,
    })
    .collect();
  cleaned.trim_matches(|c| c == '.' || c == '_').to_owned()
}

/// Write `bytes` through `writer`, removing the file at `path` if the write
/// does not complete.
async fn persist<W: AsyncWrite + Unpin>(path: &Path, mut writer: W, bytes: &[u8]) -> Result<()> {
  let written = async {
    writer.write_all(bytes).await?;
    writer.flush().await
  }
  .await;
  if let Err(e) = written {
    drop(writer);
    if let Err(rm) = fs::remove_file(path).await {
      tracing::warn!(path = %path.display(), error = %rm, "could not remove partial upload");
    }
    return Err(e.into());
  }
  Ok(())
}

fn unique_name(stem: &str, kind: FileKind) -> String {
  let suffix = Uuid::new_v4().simple().to_string();
  format!("{stem}_{}.{}", &suffix[..8], kind.as_ref())
}

/// Validate `original_name` against the allow-list and write `bytes` into
/// `dir` under a fresh unique name.
///
/// The type is taken from the client's own extension; only the stem is
/// sanitised, and a stem with nothing safe left in it becomes `upload`.
/// Nothing is written when the extension is not allowed. The directory is
/// created if it does not exist. Existing files are never overwritten, and a
/// failed write leaves no partial file behind.
pub async fn save_upload(
  dir: &Path,
  original_name: &str,
  bytes: &[u8],
) -> Result<StoredFile> {
  let base = original_name
    .rsplit(['/', '\\'])
    .next()
    .unwrap_or(original_name)
    .trim();
  if base.is_empty() {
    return Err(Error::MissingFilename);
  }
  let kind =
    FileKind::from_filename(base).ok_or_else(|| Error::Disallowed(base.to_owned()))?;
  let (stem, ext) = base.rsplit_once('.').unwrap_or((base, kind.as_ref()));

  let stem = match sanitize_filename(stem) {
    s if s.is_empty() => "upload".to_owned(),
    s => s,
  };
  let original_filename = format!("{stem}.{ext}");

  fs::create_dir_all(dir).await?;

  let mut attempt = 0;
  let (filename, path, file) = loop {
    let filename = unique_name(&stem, kind);
    let path = dir.join(&filename);
    match fs::OpenOptions::new()
      .write(true)
      .create_new(true)
      .open(&path)
      .await
    {
      Ok(file) => break (filename, path, file),
      Err(e) if e.kind() == ErrorKind::AlreadyExists && attempt < NAME_ATTEMPTS => {
        attempt += 1;
      }
      Err(e) => return Err(e.into()),
    }
  };

  persist(&path, file, bytes).await?;

  let content_hash = hex::encode(Sha256::digest(bytes));
  tracing::debug!(%filename, size = bytes.len(), "stored upload");

  Ok(StoredFile {
    filename,
    original_filename,
    file_type: kind,
    size: bytes.len() as u64,
    content_hash,
    path,
  })
}
