//! Parents and guardians: list, create, edit.

use axum::{
  Form,
  extract::{Path, State},
  response::{Html, Redirect},
};
use binder_ai::ChatBackend;
use binder_core::{record::Parent, store::CaseStore};
use uuid::Uuid;

use super::owned;
use crate::{AppState, Error, Result, current_case, forms::ParentForm, html};

fn parent_form(action: &str, parent: Option<&Parent>) -> String {
  html::FormBuilder::new(action)
    .required_text("name", "Name", parent.map(|p| p.name.as_str()))
    .text("relationship", "Relationship", parent.and_then(|p| p.relationship.as_deref()))
    .textarea("address", "Address", parent.and_then(|p| p.address.as_deref()))
    .text("phone", "Phone", parent.and_then(|p| p.phone.as_deref()))
    .text("email", "Email", parent.and_then(|p| p.email.as_deref()))
    .text("employment", "Employment", parent.and_then(|p| p.employment.as_deref()))
    .textarea("history", "History", parent.and_then(|p| p.history.as_deref()))
    .textarea("notes", "Notes", parent.and_then(|p| p.notes.as_deref()))
    .finish("Save parent")
}

pub async fn list<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
) -> Result<Html<String>> {
  let case = current_case(state.store.as_ref()).await?;
  let parents = state
    .store
    .list_parents(case.case_id)
    .await
    .map_err(Error::store)?;

  let mut body = String::from("<p><a href=\"/parents/new\">Add a parent</a></p>");
  if parents.is_empty() {
    body.push_str("<p class=\"muted\">No parents recorded.</p>");
  }
  for parent in &parents {
    body.push_str(&format!(
      "<h2>{}</h2><dl>{}{}{}{}{}</dl><p><a href=\"/parents/{}/edit\">Edit</a></p>",
      html::esc(&parent.name),
      html::detail("Relationship", parent.relationship.as_deref()),
      html::detail("Phone", parent.phone.as_deref()),
      html::detail("Email", parent.email.as_deref()),
      html::detail("Employment", parent.employment.as_deref()),
      html::detail("History", parent.history.as_deref()),
      parent.parent_id,
    ));
  }
  Ok(html::page("Parents", &body))
}

pub async fn new_form() -> Html<String> {
  html::page("Add parent", &parent_form("/parents/new", None))
}

pub async fn create<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Form(form): Form<ParentForm>,
) -> Result<Redirect> {
  let input = form.into_input()?;
  let case = current_case(state.store.as_ref()).await?;
  let parent = state
    .store
    .add_parent(case.case_id, input)
    .await
    .map_err(Error::store)?;
  tracing::info!(parent_id = %parent.parent_id, "parent added");
  Ok(Redirect::to("/parents"))
}

async fn find<S: CaseStore, B: ChatBackend>(state: &AppState<S, B>, id: Uuid) -> Result<Parent> {
  let case = current_case(state.store.as_ref()).await?;
  let parent = state.store.get_parent(id).await.map_err(Error::store)?;
  owned(parent, &case, |p| p.case_id)
}

pub async fn edit_form<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<Html<String>> {
  let parent = find(&state, id).await?;
  let action = format!("/parents/{id}/edit");
  Ok(html::page("Edit parent", &parent_form(&action, Some(&parent))))
}

pub async fn update<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
  Form(form): Form<ParentForm>,
) -> Result<Redirect> {
  find(&state, id).await?;
  let input = form.into_input()?;
  state
    .store
    .update_parent(id, input)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  Ok(Redirect::to("/parents"))
}
