//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::html;

#[derive(Debug, Error)]
pub enum Error {
  #[error("not found")]
  NotFound,
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("invalid form: {0}")]
  Form(#[from] binder_core::Error),
  #[error("upload error: {0}")]
  Upload(#[from] binder_extract::Error),
  #[error("multipart error: {0}")]
  Multipart(#[from] axum::extract::multipart::MultipartError),
  #[error("serialisation error: {0}")]
  Serialization(#[from] serde_json::Error),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::NotFound => {
        (StatusCode::NOT_FOUND, "The requested record does not exist.".to_owned())
      }
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
      Error::Form(e) => (StatusCode::BAD_REQUEST, e.to_string()),
      Error::Upload(binder_extract::Error::Io(_)) => {
        tracing::error!(error = %self, "upload failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "The file could not be saved.".to_owned())
      }
      Error::Upload(e) => (StatusCode::BAD_REQUEST, e.to_string()),
      Error::Multipart(e) => (e.status(), e.body_text()),
      Error::Serialization(_) | Error::Store(_) => {
        tracing::error!(error = %self, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "Something went wrong. Please try again.".to_owned(),
        )
      }
    };

    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!(
      "<p class=\"error\">{}</p><p><a href=\"/\">Back to the dashboard</a></p>",
      html::esc(&message),
    );
    (status, html::page(title, &body)).into_response()
  }
}
