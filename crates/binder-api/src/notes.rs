//! Handlers for `/notes` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/notes` | Optional `?tag=<tag>` (exact match); newest first |

use axum::{
  Json,
  extract::{Query, State},
};
use binder_ai::ChatBackend;
use binder_core::{parse, record::CaseNote, store::CaseStore};
use serde::Deserialize;

use crate::{ApiState, current_case, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub tag: Option<String>,
}

/// `GET /notes[?tag=<tag>]`
pub async fn list<S: CaseStore, B: ChatBackend>(
  State(state): State<ApiState<S, B>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<CaseNote>>, ApiError> {
  let case = current_case(state.store.as_ref()).await?;
  let notes = state
    .store
    .list_notes(case.case_id, parse::text(params.tag))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(notes))
}
