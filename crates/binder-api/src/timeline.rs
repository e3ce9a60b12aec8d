//! `GET /timeline`: incidents, deadlines and dated documents, newest first.

use axum::{Json, extract::State};
use binder_ai::ChatBackend;
use binder_core::{
  store::CaseStore,
  timeline::{TimelineEvent, build_timeline},
};

use crate::{ApiState, current_case, error::ApiError};

pub async fn handler<S: CaseStore, B: ChatBackend>(
  State(state): State<ApiState<S, B>>,
) -> Result<Json<Vec<TimelineEvent>>, ApiError> {
  let case = current_case(state.store.as_ref()).await?;
  let store = state.store.as_ref();

  let incidents = store
    .list_incidents(case.case_id, None)
    .await
    .map_err(ApiError::store)?;
  let deadlines = store
    .list_deadlines(case.case_id)
    .await
    .map_err(ApiError::store)?;
  let documents = store
    .list_documents(case.case_id, None)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(build_timeline(&incidents, &deadlines, &documents)))
}
