//! Server-rendered HTML application for the case binder.
//!
//! Exposes an axum [`Router`] with the HTML pages for every record type,
//! the document upload pipeline, and the JSON API nested under `/api`,
//! backed by any [`CaseStore`].

pub mod error;
pub mod forms;
pub mod handlers;
pub mod html;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use binder_ai::{AiConfig, Assistant, ChatBackend, OpenAiBackend};
use binder_core::{record::Case, store::CaseStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{
  case, children, dashboard, deadlines, documents, incidents, notes, parents,
  timeline,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `BINDER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  /// Directory uploaded files are written to; created on demand.
  pub upload_dir:       PathBuf,
  /// Largest accepted upload request, in bytes.
  pub max_upload_bytes: usize,
  pub ai:               AiConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "127.0.0.1".to_owned(),
      port:             5000,
      store_path:       PathBuf::from("binder.db"),
      upload_dir:       PathBuf::from("uploads"),
      max_upload_bytes: 16 * 1024 * 1024,
      ai:               AiConfig::default(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, B = OpenAiBackend> {
  pub store:     Arc<S>,
  pub assistant: Arc<Assistant<B>>,
  pub config:    Arc<ServerConfig>,
}

impl<S, B> Clone for AppState<S, B> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      assistant: Arc::clone(&self.assistant),
      config:    Arc::clone(&self.config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application [`Router`]: HTML pages plus the JSON API at `/api`.
pub fn router<S, B>(state: AppState<S, B>) -> Router
where
  S: CaseStore + 'static,
  B: ChatBackend + 'static,
{
  let api = binder_api::api_router(state.store.clone(), state.assistant.clone());
  let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

  Router::new()
    .route("/",                        get(dashboard::show::<S, B>))
    .route("/case/edit",               get(case::edit_form::<S, B>).post(case::update::<S, B>))
    // People
    .route("/children",                get(children::list::<S, B>))
    .route("/children/new",            get(children::new_form).post(children::create::<S, B>))
    .route("/children/{id}/edit",      get(children::edit_form::<S, B>).post(children::update::<S, B>))
    .route("/parents",                 get(parents::list::<S, B>))
    .route("/parents/new",             get(parents::new_form).post(parents::create::<S, B>))
    .route("/parents/{id}/edit",       get(parents::edit_form::<S, B>).post(parents::update::<S, B>))
    // Documents
    .route("/documents",               get(documents::list::<S, B>))
    .route(
      "/documents/upload",
      get(documents::upload_form).post(documents::upload::<S, B>).layer(upload_limit),
    )
    .route("/documents/{id}",          get(documents::show::<S, B>))
    .route("/documents/{id}/edit",     get(documents::edit_form::<S, B>).post(documents::update::<S, B>))
    // Incidents
    .route("/incidents",               get(incidents::list::<S, B>))
    .route("/incidents/new",           get(incidents::new_form).post(incidents::create::<S, B>))
    .route("/incidents/{id}/edit",     get(incidents::edit_form::<S, B>).post(incidents::update::<S, B>))
    // Deadlines
    .route("/deadlines",               get(deadlines::list::<S, B>))
    .route("/deadlines/new",           get(deadlines::new_form).post(deadlines::create::<S, B>))
    .route("/deadlines/{id}/edit",     get(deadlines::edit_form::<S, B>).post(deadlines::update::<S, B>))
    .route("/deadlines/{id}/complete", post(deadlines::complete::<S, B>))
    .route("/deadlines/{id}/reopen",   post(deadlines::reopen::<S, B>))
    // Notes
    .route("/notes",                   get(notes::list::<S, B>))
    .route("/notes/new",               get(notes::new_form).post(notes::create::<S, B>))
    .route("/notes/{id}/edit",         get(notes::edit_form::<S, B>).post(notes::update::<S, B>))
    .route("/timeline",                get(timeline::show::<S, B>))
    .fallback(handlers::not_found)
    .with_state(state)
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

/// The case every page operates on; created on first use.
pub(crate) async fn current_case<S: CaseStore>(store: &S) -> Result<Case> {
  store.current_case().await.map_err(Error::store)
}

#[cfg(test)]
mod tests;
