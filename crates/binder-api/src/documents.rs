//! Handlers for `/documents` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/documents` | Optional `?category=<category>`; newest first |
//! | `GET`  | `/documents/:id` | 404 if not found |

use std::str::FromStr;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use binder_ai::ChatBackend;
use binder_core::{
  record::{Document, DocumentCategory},
  store::CaseStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, current_case, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub category: Option<String>,
}

/// `GET /documents[?category=<category>]`
pub async fn list<S: CaseStore, B: ChatBackend>(
  State(state): State<ApiState<S, B>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Document>>, ApiError> {
  let category = match params.category.as_deref().map(str::trim) {
    None | Some("") => None,
    Some(raw) => Some(
      DocumentCategory::from_str(raw)
        .map_err(|_| ApiError::BadRequest(format!("unknown category {raw:?}")))?,
    ),
  };

  let case = current_case(state.store.as_ref()).await?;
  let documents = state
    .store
    .list_documents(case.case_id, category)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(documents))
}

/// `GET /documents/:id`
pub async fn get_one<S: CaseStore, B: ChatBackend>(
  State(state): State<ApiState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
  Ok(Json(find(&state, id).await?))
}

/// A document of the current case, or 404.
pub(crate) async fn find<S: CaseStore, B: ChatBackend>(
  state: &ApiState<S, B>,
  id: Uuid,
) -> Result<Document, ApiError> {
  let case = current_case(state.store.as_ref()).await?;
  state
    .store
    .get_document(id)
    .await
    .map_err(ApiError::store)?
    .filter(|d| d.case_id == case.case_id)
    .ok_or_else(|| ApiError::NotFound(format!("document {id} not found")))
}
