use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("file type not allowed: {0:?}")]
  Disallowed(String),

  #[error("upload has no filename")]
  MissingFilename,

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
