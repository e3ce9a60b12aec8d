//! Error types for `binder-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown document category: {0:?}")]
  UnknownCategory(String),

  #[error("unknown severity: {0:?}")]
  UnknownSeverity(String),

  #[error("unknown priority: {0:?}")]
  UnknownPriority(String),

  #[error("{0} is required")]
  MissingField(&'static str),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
