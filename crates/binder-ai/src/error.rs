use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no API key configured for the model endpoint")]
  MissingApiKey,

  #[error("HTTP error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("model endpoint returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("model returned no content")]
  EmptyResponse,

  #[error("malformed model reply: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
