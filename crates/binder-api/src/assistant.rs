//! Handlers for model-assisted review.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/assistant/case-summary` | Summary over every record of the case |
//! | `POST` | `/assistant/checklist` | Body: `{"case_type":..,"hearing_type":..}`, both optional |
//! | `POST` | `/assistant/documents/:id/analysis` | Re-analyses stored text and saves the result |
//!
//! Model failures are not errors: the response is the fallback payload with
//! an `error` field.

use axum::{
  Json,
  extract::{Path, State},
};
use binder_ai::{
  Assessment, ChatBackend,
  payload::{CaseSummary, Checklist},
};
use binder_core::{
  parse,
  record::{DEFAULT_CASE_TYPE, Document},
  snapshot::CaseSnapshot,
  store::CaseStore,
};
use binder_extract::usable_text;
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, current_case, documents, error::ApiError};

/// `POST /assistant/case-summary`
pub async fn case_summary<S: CaseStore, B: ChatBackend>(
  State(state): State<ApiState<S, B>>,
) -> Result<Json<Assessment<CaseSummary>>, ApiError> {
  let case = current_case(state.store.as_ref()).await?;
  let snapshot = CaseSnapshot::load(state.store.as_ref(), case)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(state.assistant.case_summary(&snapshot).await))
}

#[derive(Debug, Default, Deserialize)]
pub struct ChecklistBody {
  pub case_type:    Option<String>,
  pub hearing_type: Option<String>,
}

/// `POST /assistant/checklist`
///
/// Without a `case_type`, the current case's type is used.
pub async fn checklist<S: CaseStore, B: ChatBackend>(
  State(state): State<ApiState<S, B>>,
  Json(body): Json<ChecklistBody>,
) -> Result<Json<Assessment<Checklist>>, ApiError> {
  let case_type = match parse::text(body.case_type) {
    Some(t) => t,
    None => current_case(state.store.as_ref())
      .await?
      .case_type
      .unwrap_or_else(|| DEFAULT_CASE_TYPE.to_owned()),
  };
  let hearing_type = parse::text(body.hearing_type);

  Ok(Json(
    state
      .assistant
      .preparation_checklist(&case_type, hearing_type.as_deref())
      .await,
  ))
}

/// `POST /assistant/documents/:id/analysis`
pub async fn analyze_document<S: CaseStore, B: ChatBackend>(
  State(state): State<ApiState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
  let document = documents::find(&state, id).await?;
  let text = usable_text(document.extracted_text.as_deref()).ok_or_else(|| {
    ApiError::BadRequest(format!("document {id} has no extracted text"))
  })?;

  let analysis = state
    .assistant
    .analyze_document(text, Some(document.category.as_ref()))
    .await;
  let summary = (!analysis.is_fallback()).then(|| analysis.payload().summary.clone());

  let updated = state
    .store
    .record_document_analysis(id, summary, analysis.to_json()?)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("document {id} not found")))?;
  Ok(Json(updated))
}
