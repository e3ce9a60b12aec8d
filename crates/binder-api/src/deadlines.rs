//! Handlers for `/deadlines` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/deadlines` | `?status=all\|upcoming\|overdue\|completed`, default `all` |
//! | `POST` | `/deadlines/:id/complete` | 404 if not found |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use binder_ai::ChatBackend;
use binder_core::{deadline::DeadlineBuckets, record::Deadline, store::CaseStore};
use chrono::Local;
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, current_case, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<String>,
}

/// `GET /deadlines[?status=<status>]`
///
/// `upcoming` and `overdue` are judged against today's local date and
/// exclude completed deadlines.
pub async fn list<S: CaseStore, B: ChatBackend>(
  State(state): State<ApiState<S, B>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Deadline>>, ApiError> {
  let status = params.status.as_deref().map(str::trim).unwrap_or("all");
  if !matches!(status, "" | "all" | "upcoming" | "overdue" | "completed") {
    return Err(ApiError::BadRequest(format!("unknown status {status:?}")));
  }

  let case = current_case(state.store.as_ref()).await?;
  let deadlines = state
    .store
    .list_deadlines(case.case_id)
    .await
    .map_err(ApiError::store)?;

  let today = Local::now().date_naive();
  let selected = match status {
    "upcoming" => DeadlineBuckets::partition(deadlines, today).upcoming,
    "overdue" => DeadlineBuckets::partition(deadlines, today).overdue,
    "completed" => DeadlineBuckets::partition(deadlines, today).completed,
    _ => deadlines,
  };
  Ok(Json(selected))
}

/// `POST /deadlines/:id/complete`
pub async fn complete<S: CaseStore, B: ChatBackend>(
  State(state): State<ApiState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Deadline>, ApiError> {
  let not_found = || ApiError::NotFound(format!("deadline {id} not found"));

  let case = current_case(state.store.as_ref()).await?;
  let existing = state
    .store
    .get_deadline(id)
    .await
    .map_err(ApiError::store)?
    .filter(|d| d.case_id == case.case_id)
    .ok_or_else(not_found)?;

  let updated = state
    .store
    .set_deadline_completed(existing.deadline_id, true)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  tracing::info!(deadline_id = %id, "deadline completed");
  Ok(Json(updated))
}
