//! `GET /timeline`

use axum::{extract::State, response::Html};
use binder_ai::ChatBackend;
use binder_core::{
  store::CaseStore,
  timeline::{EventKind, build_timeline},
};

use crate::{AppState, Error, Result, current_case, html};

pub async fn show<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
) -> Result<Html<String>> {
  let store = state.store.as_ref();
  let case = current_case(store).await?;
  let id = case.case_id;

  let incidents = store.list_incidents(id, None).await.map_err(Error::store)?;
  let deadlines = store.list_deadlines(id).await.map_err(Error::store)?;
  let documents = store.list_documents(id, None).await.map_err(Error::store)?;
  let events = build_timeline(&incidents, &deadlines, &documents);

  let mut body = String::new();
  if events.is_empty() {
    body.push_str("<p class=\"muted\">Nothing dated has been recorded yet.</p>");
  } else {
    body.push_str("<table><tr><th>Date</th><th>Kind</th><th>Event</th></tr>");
    for event in &events {
      let (kind, href) = match event.kind {
        EventKind::Incident => {
          ("Incident", format!("/incidents/{}/edit", event.record_id))
        }
        EventKind::Deadline => {
          ("Deadline", format!("/deadlines/{}/edit", event.record_id))
        }
        EventKind::Document => ("Document", format!("/documents/{}", event.record_id)),
      };
      body.push_str(&format!(
        "<tr><td>{}</td><td>{kind}</td><td><a href=\"{href}\">{}</a><br>\
         <span class=\"muted\">{}</span></td></tr>",
        event.date.format("%Y-%m-%d"),
        html::esc(&event.title),
        html::esc_opt(event.detail.as_deref()),
      ));
    }
    body.push_str("</table>");
  }
  Ok(html::page("Timeline", &body))
}
