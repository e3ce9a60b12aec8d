//! Handlers for `/incidents` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/incidents` | Optional `?incident_type=<type>`; most recent first |

use axum::{
  Json,
  extract::{Query, State},
};
use binder_ai::ChatBackend;
use binder_core::{parse, record::Incident, store::CaseStore};
use serde::Deserialize;

use crate::{ApiState, current_case, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub incident_type: Option<String>,
}

/// `GET /incidents[?incident_type=<type>]`
pub async fn list<S: CaseStore, B: ChatBackend>(
  State(state): State<ApiState<S, B>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Incident>>, ApiError> {
  let case = current_case(state.store.as_ref()).await?;
  let incidents = state
    .store
    .list_incidents(case.case_id, parse::text(params.incident_type))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(incidents))
}
