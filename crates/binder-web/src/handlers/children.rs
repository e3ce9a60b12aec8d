//! Children of the case: list, create, edit.

use axum::{
  Form,
  extract::{Path, State},
  response::{Html, Redirect},
};
use binder_ai::ChatBackend;
use binder_core::{record::Child, store::CaseStore};
use chrono::Local;
use uuid::Uuid;

use super::owned;
use crate::{AppState, Error, Result, current_case, forms::ChildForm, html};

fn child_form(action: &str, child: Option<&Child>) -> String {
  html::FormBuilder::new(action)
    .required_text("name", "Name", child.map(|c| c.name.as_str()))
    .date("date_of_birth", "Date of birth", child.and_then(|c| c.date_of_birth))
    .text("gender", "Gender", child.and_then(|c| c.gender.as_deref()))
    .text("school", "School", child.and_then(|c| c.school.as_deref()))
    .text("grade", "Grade", child.and_then(|c| c.grade.as_deref()))
    .textarea(
      "medical_needs",
      "Medical needs",
      child.and_then(|c| c.medical_needs.as_deref()),
    )
    .text(
      "current_placement",
      "Current placement",
      child.and_then(|c| c.current_placement.as_deref()),
    )
    .textarea("notes", "Notes", child.and_then(|c| c.notes.as_deref()))
    .finish("Save child")
}

pub async fn list<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
) -> Result<Html<String>> {
  let case = current_case(state.store.as_ref()).await?;
  let children = state
    .store
    .list_children(case.case_id)
    .await
    .map_err(Error::store)?;
  let today = Local::now().date_naive();

  let mut body = String::from("<p><a href=\"/children/new\">Add a child</a></p>");
  if children.is_empty() {
    body.push_str("<p class=\"muted\">No children recorded.</p>");
  } else {
    body.push_str(
      "<table><tr><th>Name</th><th>Age</th><th>School</th><th>Placement</th><th></th></tr>",
    );
    for child in &children {
      body.push_str(&format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
         <td><a href=\"/children/{}/edit\">Edit</a></td></tr>",
        html::esc(&child.name),
        child.age_on(today).map(|a| a.to_string()).unwrap_or_default(),
        html::esc_opt(child.school.as_deref()),
        html::esc_opt(child.current_placement.as_deref()),
        child.child_id,
      ));
    }
    body.push_str("</table>");
  }
  Ok(html::page("Children", &body))
}

pub async fn new_form() -> Html<String> {
  html::page("Add child", &child_form("/children/new", None))
}

pub async fn create<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Form(form): Form<ChildForm>,
) -> Result<Redirect> {
  let input = form.into_input()?;
  let case = current_case(state.store.as_ref()).await?;
  let child = state
    .store
    .add_child(case.case_id, input)
    .await
    .map_err(Error::store)?;
  tracing::info!(child_id = %child.child_id, "child added");
  Ok(Redirect::to("/children"))
}

async fn find<S: CaseStore, B: ChatBackend>(state: &AppState<S, B>, id: Uuid) -> Result<Child> {
  let case = current_case(state.store.as_ref()).await?;
  let child = state.store.get_child(id).await.map_err(Error::store)?;
  owned(child, &case, |c| c.case_id)
}

pub async fn edit_form<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<Html<String>> {
  let child = find(&state, id).await?;
  let action = format!("/children/{id}/edit");
  Ok(html::page("Edit child", &child_form(&action, Some(&child))))
}

pub async fn update<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
  Form(form): Form<ChildForm>,
) -> Result<Redirect> {
  find(&state, id).await?;
  let input = form.into_input()?;
  state
    .store
    .update_child(id, input)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  Ok(Redirect::to("/children"))
}
