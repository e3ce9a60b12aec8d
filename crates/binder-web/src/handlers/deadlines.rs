//! Deadlines: bucketed list, create, edit, complete and reopen.

use axum::{
  Form,
  extract::{Path, State},
  response::{Html, Redirect},
};
use binder_ai::ChatBackend;
use binder_core::{
  deadline::DeadlineBuckets,
  record::{Deadline, Priority},
  store::CaseStore,
};
use chrono::Local;
use strum::IntoEnumIterator;
use uuid::Uuid;

use super::owned;
use crate::{AppState, Error, Result, current_case, forms::DeadlineForm, html};

fn deadline_form(action: &str, deadline: Option<&Deadline>) -> String {
  let levels: Vec<Priority> = Priority::iter().collect();
  let priorities: Vec<(&str, &str)> =
    levels.iter().map(|p| (p.as_ref(), p.as_ref())).collect();
  let current = deadline.map(|d| d.priority).unwrap_or_default();

  html::FormBuilder::new(action)
    .required_text("title", "Title", deadline.map(|d| d.title.as_str()))
    .date("due_date", "Due date", deadline.and_then(|d| d.due_date))
    .select("priority", "Priority", &priorities, Some(current.as_ref()))
    .textarea("description", "Description", deadline.and_then(|d| d.description.as_deref()))
    .finish("Save deadline")
}

fn section(title: &str, deadlines: &[Deadline]) -> String {
  if deadlines.is_empty() {
    return String::new();
  }
  let mut out = format!(
    "<h2>{title}</h2><table><tr><th>Due</th><th>Title</th><th>Priority</th><th></th></tr>"
  );
  for d in deadlines {
    let toggle = if d.completed {
      html::post_button(&format!("/deadlines/{}/reopen", d.deadline_id), "Reopen")
    } else {
      html::post_button(&format!("/deadlines/{}/complete", d.deadline_id), "Complete")
    };
    out.push_str(&format!(
      "<tr><td>{}</td><td>{}</td><td>{}</td><td><a href=\"/deadlines/{}/edit\">Edit</a> {toggle}</td></tr>",
      html::fmt_date(d.due_date),
      html::esc(&d.title),
      d.priority,
      d.deadline_id,
    ));
  }
  out.push_str("</table>");
  out
}

pub async fn list<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
) -> Result<Html<String>> {
  let case = current_case(state.store.as_ref()).await?;
  let deadlines = state
    .store
    .list_deadlines(case.case_id)
    .await
    .map_err(Error::store)?;
  let buckets = DeadlineBuckets::partition(deadlines, Local::now().date_naive());

  let mut body = String::from("<p><a href=\"/deadlines/new\">Add a deadline</a></p>");
  if buckets.pending() == 0 && buckets.completed.is_empty() {
    body.push_str("<p class=\"muted\">No deadlines.</p>");
  }
  body.push_str(&section("Overdue", &buckets.overdue));
  body.push_str(&section("Upcoming", &buckets.upcoming));
  body.push_str(&section("No due date", &buckets.undated));
  body.push_str(&section("Completed", &buckets.completed));
  Ok(html::page("Deadlines", &body))
}

pub async fn new_form() -> Html<String> {
  html::page("Add deadline", &deadline_form("/deadlines/new", None))
}

pub async fn create<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Form(form): Form<DeadlineForm>,
) -> Result<Redirect> {
  let input = form.into_input()?;
  let case = current_case(state.store.as_ref()).await?;
  let deadline = state
    .store
    .add_deadline(case.case_id, input)
    .await
    .map_err(Error::store)?;
  tracing::info!(deadline_id = %deadline.deadline_id, "deadline added");
  Ok(Redirect::to("/deadlines"))
}

async fn find<S: CaseStore, B: ChatBackend>(state: &AppState<S, B>, id: Uuid) -> Result<Deadline> {
  let case = current_case(state.store.as_ref()).await?;
  let deadline = state.store.get_deadline(id).await.map_err(Error::store)?;
  owned(deadline, &case, |d| d.case_id)
}

pub async fn edit_form<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<Html<String>> {
  let deadline = find(&state, id).await?;
  let action = format!("/deadlines/{id}/edit");
  Ok(html::page("Edit deadline", &deadline_form(&action, Some(&deadline))))
}

pub async fn update<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
  Form(form): Form<DeadlineForm>,
) -> Result<Redirect> {
  find(&state, id).await?;
  let input = form.into_input()?;
  state
    .store
    .update_deadline(id, input)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  Ok(Redirect::to("/deadlines"))
}

async fn set_completed<S: CaseStore, B: ChatBackend>(
  state: &AppState<S, B>,
  id: Uuid,
  completed: bool,
) -> Result<Redirect> {
  find(state, id).await?;
  state
    .store
    .set_deadline_completed(id, completed)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  tracing::info!(deadline_id = %id, completed, "deadline status changed");
  Ok(Redirect::to("/deadlines"))
}

pub async fn complete<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<Redirect> {
  set_completed(&state, id, true).await
}

pub async fn reopen<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<Redirect> {
  set_completed(&state, id, false).await
}
