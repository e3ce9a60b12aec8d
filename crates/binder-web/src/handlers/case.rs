//! `GET/POST /case/edit`

use axum::{
  Form,
  extract::State,
  response::{Html, Redirect},
};
use binder_ai::ChatBackend;
use binder_core::{record::Case, store::CaseStore};

use crate::{AppState, Error, Result, current_case, forms::CaseForm, html};

fn case_form(case: &Case) -> String {
  html::FormBuilder::new("/case/edit")
    .text("title", "Title", Some(case.title.as_str()))
    .text("case_number", "Case number", case.case_number.as_deref())
    .text("case_type", "Case type", case.case_type.as_deref())
    .text("court", "Court", case.court.as_deref())
    .text("judge", "Judge", case.judge.as_deref())
    .text("status", "Status", Some(case.status.as_str()))
    .date("filing_date", "Filing date", case.filing_date)
    .finish("Save case")
}

pub async fn edit_form<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
) -> Result<Html<String>> {
  let case = current_case(state.store.as_ref()).await?;
  Ok(html::page("Edit case", &case_form(&case)))
}

pub async fn update<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Form(form): Form<CaseForm>,
) -> Result<Redirect> {
  let case = current_case(state.store.as_ref()).await?;
  state
    .store
    .update_case(case.case_id, form.into_input())
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  tracing::info!(case_id = %case.case_id, "case updated");
  Ok(Redirect::to("/"))
}
