//! JSON REST API for the case binder.
//!
//! Exposes an axum [`Router`] backed by any [`binder_core::store::CaseStore`].
//! Every endpoint works on the current case, which is created on first use.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", binder_api::api_router(store.clone(), assistant.clone()))
//! ```

pub mod assistant;
pub mod case;
pub mod deadlines;
pub mod documents;
pub mod error;
pub mod incidents;
pub mod notes;
pub mod timeline;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use binder_ai::{Assistant, ChatBackend};
use binder_core::{record::Case, store::CaseStore};

pub use error::ApiError;

/// State shared by the API handlers.
pub struct ApiState<S, B> {
  pub store:     Arc<S>,
  pub assistant: Arc<Assistant<B>>,
}

impl<S, B> Clone for ApiState<S, B> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), assistant: Arc::clone(&self.assistant) }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, B>(store: Arc<S>, assistant: Arc<Assistant<B>>) -> Router<()>
where
  S: CaseStore + 'static,
  B: ChatBackend + 'static,
{
  Router::new()
    // Case and people
    .route("/case", get(case::current::<S, B>))
    .route("/children", get(case::children::<S, B>))
    .route("/parents", get(case::parents::<S, B>))
    // Records
    .route("/documents", get(documents::list::<S, B>))
    .route("/documents/{id}", get(documents::get_one::<S, B>))
    .route("/incidents", get(incidents::list::<S, B>))
    .route("/deadlines", get(deadlines::list::<S, B>))
    .route("/deadlines/{id}/complete", post(deadlines::complete::<S, B>))
    .route("/notes", get(notes::list::<S, B>))
    .route("/timeline", get(timeline::handler::<S, B>))
    // Model-assisted review
    .route("/assistant/case-summary", post(assistant::case_summary::<S, B>))
    .route("/assistant/checklist", post(assistant::checklist::<S, B>))
    .route(
      "/assistant/documents/{id}/analysis",
      post(assistant::analyze_document::<S, B>),
    )
    .with_state(ApiState { store, assistant })
}

/// The case every request operates on.
pub(crate) async fn current_case<S: CaseStore>(store: &S) -> Result<Case, ApiError> {
  store.current_case().await.map_err(ApiError::store)
}

#[cfg(test)]
mod tests;
