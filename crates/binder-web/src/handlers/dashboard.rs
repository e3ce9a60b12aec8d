//! `GET /`: case header, record counts, and what needs attention next.

use axum::{extract::State, response::Html};
use binder_ai::ChatBackend;
use binder_core::{deadline::DeadlineBuckets, store::CaseStore};
use chrono::Local;

use crate::{AppState, Error, Result, current_case, html};

/// Entries shown in each dashboard list.
const PREVIEW_LEN: usize = 5;

pub async fn show<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
) -> Result<Html<String>> {
  let store = state.store.as_ref();
  let case = current_case(store).await?;
  let id = case.case_id;

  let children = store.list_children(id).await.map_err(Error::store)?;
  let documents = store.list_documents(id, None).await.map_err(Error::store)?;
  let incidents = store.list_incidents(id, None).await.map_err(Error::store)?;
  let deadlines = store.list_deadlines(id).await.map_err(Error::store)?;
  let buckets = DeadlineBuckets::partition(deadlines, Local::now().date_naive());

  let mut body = String::new();
  body.push_str("<dl>");
  body.push_str(&html::detail("Case number", case.case_number.as_deref()));
  body.push_str(&html::detail("Type", case.case_type.as_deref()));
  body.push_str(&html::detail("Court", case.court.as_deref()));
  body.push_str(&html::detail("Judge", case.judge.as_deref()));
  body.push_str(&html::detail("Status", Some(case.status.as_str())));
  body.push_str(&html::detail("Filed", Some(html::fmt_date(case.filing_date).as_str())));
  body.push_str("</dl><p><a href=\"/case/edit\">Edit case details</a></p>");

  body.push_str(&format!(
    "<p class=\"stats\"><span>Children: {}</span><span>Documents: {}</span>\
     <span>Incidents: {}</span><span>Pending deadlines: {}</span>\
     <span>Overdue: {}</span></p>",
    children.len(),
    documents.len(),
    incidents.len(),
    buckets.pending(),
    buckets.overdue.len(),
  ));

  body.push_str("<h2>Upcoming deadlines</h2>");
  if buckets.upcoming.is_empty() {
    body.push_str("<p class=\"muted\">Nothing due.</p>");
  } else {
    let items: Vec<String> = buckets
      .upcoming
      .iter()
      .take(PREVIEW_LEN)
      .map(|d| format!("{} · {}", html::fmt_date(d.due_date), d.title))
      .collect();
    body.push_str(&html::list(&items));
  }

  body.push_str("<h2>Recent documents</h2>");
  if documents.is_empty() {
    body.push_str("<p class=\"muted\">No documents uploaded yet.</p>");
  } else {
    body.push_str("<ul>");
    for doc in documents.iter().take(PREVIEW_LEN) {
      body.push_str(&format!(
        "<li><a href=\"/documents/{}\">{}</a> <span class=\"muted\">{}</span></li>",
        doc.document_id,
        html::esc(&doc.original_filename),
        doc.category.label(),
      ));
    }
    body.push_str("</ul>");
  }

  Ok(html::page(&case.title, &body))
}
