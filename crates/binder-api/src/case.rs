//! Handlers for the case and the people in it.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/case` | Creates the default case on first call |
//! | `GET`  | `/children` | Oldest first |
//! | `GET`  | `/parents` | Oldest first |

use axum::{Json, extract::State};
use binder_ai::ChatBackend;
use binder_core::{
  record::{Case, Child, Parent},
  store::CaseStore,
};

use crate::{ApiState, current_case, error::ApiError};

/// `GET /case`
pub async fn current<S: CaseStore, B: ChatBackend>(
  State(state): State<ApiState<S, B>>,
) -> Result<Json<Case>, ApiError> {
  Ok(Json(current_case(state.store.as_ref()).await?))
}

/// `GET /children`
pub async fn children<S: CaseStore, B: ChatBackend>(
  State(state): State<ApiState<S, B>>,
) -> Result<Json<Vec<Child>>, ApiError> {
  let case = current_case(state.store.as_ref()).await?;
  let children = state
    .store
    .list_children(case.case_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(children))
}

/// `GET /parents`
pub async fn parents<S: CaseStore, B: ChatBackend>(
  State(state): State<ApiState<S, B>>,
) -> Result<Json<Vec<Parent>>, ApiError> {
  let case = current_case(state.store.as_ref()).await?;
  let parents = state
    .store
    .list_parents(case.case_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(parents))
}
