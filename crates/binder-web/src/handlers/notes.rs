//! Case notes: list with tag filter, create, edit.

use axum::{
  Form,
  extract::{Path, Query, State},
  response::{Html, Redirect},
};
use binder_ai::ChatBackend;
use binder_core::{parse, record::CaseNote, store::CaseStore};
use serde::Deserialize;
use uuid::Uuid;

use super::owned;
use crate::{AppState, Error, Result, current_case, forms::NoteForm, html};

fn note_form(action: &str, note: Option<&CaseNote>) -> String {
  let tags = note.map(|n| n.tags.join(", "));
  html::FormBuilder::new(action)
    .text("title", "Title", note.and_then(|n| n.title.as_deref()))
    .textarea("content", "Content *", note.map(|n| n.content.as_str()))
    .text("note_type", "Type", note.and_then(|n| n.note_type.as_deref()))
    .text("tags", "Tags (comma separated)", tags.as_deref())
    .checkbox("important", "Important", note.is_some_and(|n| n.important))
    .checkbox("follow_up", "Needs follow-up", note.is_some_and(|n| n.follow_up))
    .finish("Save note")
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub tag: Option<String>,
}

pub async fn list<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Query(params): Query<ListParams>,
) -> Result<Html<String>> {
  let tag = parse::text(params.tag);
  let case = current_case(state.store.as_ref()).await?;
  let notes = state
    .store
    .list_notes(case.case_id, tag.clone())
    .await
    .map_err(Error::store)?;

  let mut body = String::from("<p><a href=\"/notes/new\">Write a note</a></p>");
  if let Some(tag) = &tag {
    body.push_str(&format!(
      "<p>Tagged <strong>{}</strong> · <a href=\"/notes\">show all</a></p>",
      html::esc(tag)
    ));
  }
  if notes.is_empty() {
    body.push_str("<p class=\"muted\">No notes.</p>");
  }
  for note in &notes {
    let mut flags = Vec::new();
    if note.important {
      flags.push("important");
    }
    if note.follow_up {
      flags.push("follow-up");
    }
    let tags: String = note
      .tags
      .iter()
      .map(|t| format!("<a href=\"/notes?tag={0}\">#{0}</a> ", html::esc(t)))
      .collect();
    body.push_str(&format!(
      "<h2>{}</h2><p class=\"muted\">{} {} {}</p><pre>{}</pre><p>{tags}<a href=\"/notes/{}/edit\">Edit</a></p>",
      html::esc(note.title.as_deref().unwrap_or("Untitled")),
      note.updated_at.format("%Y-%m-%d %H:%M"),
      html::esc_opt(note.note_type.as_deref()),
      flags.join(", "),
      html::esc(&note.content),
      note.note_id,
    ));
  }
  Ok(html::page("Notes", &body))
}

pub async fn new_form() -> Html<String> {
  html::page("Write note", &note_form("/notes/new", None))
}

pub async fn create<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Form(form): Form<NoteForm>,
) -> Result<Redirect> {
  let input = form.into_input()?;
  let case = current_case(state.store.as_ref()).await?;
  let note = state
    .store
    .add_note(case.case_id, input)
    .await
    .map_err(Error::store)?;
  tracing::info!(note_id = %note.note_id, "note added");
  Ok(Redirect::to("/notes"))
}

async fn find<S: CaseStore, B: ChatBackend>(state: &AppState<S, B>, id: Uuid) -> Result<CaseNote> {
  let case = current_case(state.store.as_ref()).await?;
  let note = state.store.get_note(id).await.map_err(Error::store)?;
  owned(note, &case, |n| n.case_id)
}

pub async fn edit_form<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<Html<String>> {
  let note = find(&state, id).await?;
  let action = format!("/notes/{id}/edit");
  Ok(html::page("Edit note", &note_form(&action, Some(&note))))
}

pub async fn update<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
  Form(form): Form<NoteForm>,
) -> Result<Redirect> {
  find(&state, id).await?;
  let input = form.into_input()?;
  state
    .store
    .update_note(id, input)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  Ok(Redirect::to("/notes"))
}
