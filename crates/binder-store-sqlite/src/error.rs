//! Error type for `binder-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] binder_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("stored file size out of range: {0}")]
  StoredFileSize(i64),

  #[error("file size too large to store: {0}")]
  FileTooLarge(u64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
