//! Documents: list, upload pipeline, detail and metadata edit.
//!
//! An upload is validated, written to the upload directory, text-extracted
//! on a blocking thread, optionally categorised and analysed by the model,
//! and finally recorded. If recording fails the written file is removed.

use axum::{
  Form,
  extract::{Multipart, Path, Query, State},
  response::{Html, Redirect},
};
use binder_ai::{ChatBackend, payload::DocumentAnalysis};
use binder_core::{
  parse,
  record::{Case, Document, DocumentCategory, NewDocument},
  store::CaseStore,
};
use binder_extract::{StoredFile, extract, format_file_size, save_upload, usable_text};
use bytes::Bytes;
use serde::Deserialize;
use strum::IntoEnumIterator;
use uuid::Uuid;

use super::{owned, with_blank};
use crate::{AppState, Error, Result, current_case, forms::DocumentForm, html};

fn category_options(categories: &[DocumentCategory]) -> Vec<(&str, &str)> {
  categories.iter().map(|c| (c.as_ref(), c.label())).collect()
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub category: Option<String>,
}

pub async fn list<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Query(params): Query<ListParams>,
) -> Result<Html<String>> {
  let category = parse::chosen_category(params.category.as_deref());
  let case = current_case(state.store.as_ref()).await?;
  let documents = state
    .store
    .list_documents(case.case_id, category)
    .await
    .map_err(Error::store)?;

  let categories: Vec<DocumentCategory> = DocumentCategory::iter().collect();
  let filter = html::FormBuilder::new("/documents")
    .method_get()
    .select(
      "category",
      "Category",
      &with_blank("All categories", category_options(&categories)),
      category.as_ref().map(|c| c.as_ref()),
    )
    .finish("Filter");

  let mut body = String::from("<p><a href=\"/documents/upload\">Upload a document</a></p>");
  body.push_str(&filter);
  if documents.is_empty() {
    body.push_str("<p class=\"muted\">No documents.</p>");
  } else {
    body.push_str(
      "<table><tr><th>File</th><th>Category</th><th>Date</th><th>Size</th><th>Uploaded</th></tr>",
    );
    for doc in &documents {
      body.push_str(&format!(
        "<tr><td><a href=\"/documents/{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        doc.document_id,
        html::esc(&doc.original_filename),
        doc.category.label(),
        html::fmt_date(doc.document_date),
        format_file_size(doc.file_size),
        doc.uploaded_at.format("%Y-%m-%d %H:%M"),
      ));
    }
    body.push_str("</table>");
  }
  Ok(html::page("Documents", &body))
}

// ─── Upload ──────────────────────────────────────────────────────────────────

pub async fn upload_form() -> Html<String> {
  let categories: Vec<DocumentCategory> = DocumentCategory::iter().collect();
  let form = html::FormBuilder::new("/documents/upload")
    .multipart()
    .file("file", "File")
    .select(
      "category",
      "Category",
      &with_blank("Suggest from content", category_options(&categories)),
      None,
    )
    .textarea("description", "Description", None)
    .date("document_date", "Document date", None)
    .checkbox("analyze", "Analyse the document after upload", false)
    .finish("Upload");
  html::page(
    "Upload document",
    &format!(
      "{form}<p class=\"muted\">Accepted: txt, pdf, doc, docx, png, jpg, jpeg, gif, mp3, wav, ogg.</p>"
    ),
  )
}

/// The non-file parts of an upload submission.
#[derive(Debug, Default)]
struct UploadFields {
  file:          Option<(String, Bytes)>,
  category:      Option<String>,
  description:   Option<String>,
  document_date: Option<String>,
  analyze:       Option<String>,
}

async fn read_fields(mut multipart: Multipart) -> Result<UploadFields> {
  let mut fields = UploadFields::default();
  while let Some(field) = multipart.next_field().await? {
    let name = field.name().unwrap_or_default().to_owned();
    match name.as_str() {
      "file" => {
        let name = field.file_name().unwrap_or_default().to_owned();
        let data = field.bytes().await?;
        fields.file = Some((name, data));
      }
      "category" => fields.category = Some(field.text().await?),
      "description" => fields.description = Some(field.text().await?),
      "document_date" => fields.document_date = Some(field.text().await?),
      "analyze" => fields.analyze = Some(field.text().await?),
      _ => {}
    }
  }
  Ok(fields)
}

pub async fn upload<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  multipart: Multipart,
) -> Result<Redirect> {
  let mut fields = read_fields(multipart).await?;
  let (original_name, data) = fields
    .file
    .take()
    .filter(|(name, _)| !name.trim().is_empty())
    .ok_or_else(|| Error::BadRequest("Choose a file to upload.".to_owned()))?;

  let case = current_case(state.store.as_ref()).await?;
  let stored = save_upload(&state.config.upload_dir, &original_name, &data).await?;

  match record_upload(&state, &case, &stored, fields).await {
    Ok(document) => {
      tracing::info!(
        document_id = %document.document_id,
        filename = %document.filename,
        size = document.file_size,
        "document uploaded",
      );
      Ok(Redirect::to("/documents"))
    }
    Err(e) => {
      if let Err(rm) = tokio::fs::remove_file(&stored.path).await {
        tracing::warn!(path = %stored.path.display(), error = %rm, "could not remove upload");
      }
      Err(e)
    }
  }
}

async fn record_upload<S: CaseStore, B: ChatBackend>(
  state: &AppState<S, B>,
  case: &Case,
  stored: &StoredFile,
  fields: UploadFields,
) -> Result<Document> {
  let extraction = extract(stored.path.clone(), stored.file_type).await;
  let text = extraction.text().map(str::to_owned);

  let category = match (parse::chosen_category(fields.category.as_deref()), &text) {
    (Some(chosen), _) => chosen,
    (None, Some(text)) => state
      .assistant
      .suggest_category(&stored.original_filename, text)
      .await
      .into_payload(),
    (None, None) => DocumentCategory::Other,
  };

  let (ai_summary, ai_analysis) = match (&text, parse::flag(fields.analyze.as_deref())) {
    (Some(text), true) => {
      let analysis = state
        .assistant
        .analyze_document(text, Some(category.as_ref()))
        .await;
      let summary = (!analysis.is_fallback()).then(|| analysis.payload().summary.clone());
      (summary, Some(analysis.to_json()?))
    }
    _ => (None, None),
  };

  let document = NewDocument {
    case_id: case.case_id,
    filename: stored.filename.clone(),
    original_filename: stored.original_filename.clone(),
    file_type: stored.file_type.to_string(),
    file_size: stored.size,
    content_hash: stored.content_hash.clone(),
    category,
    description: parse::text(fields.description),
    document_date: parse::date(fields.document_date.as_deref()),
    extracted_text: extraction.into_stored(),
    ai_summary,
    ai_analysis,
  };
  state.store.add_document(document).await.map_err(Error::store)
}

// ─── Detail and edit ─────────────────────────────────────────────────────────

async fn find<S: CaseStore, B: ChatBackend>(state: &AppState<S, B>, id: Uuid) -> Result<Document> {
  let case = current_case(state.store.as_ref()).await?;
  let document = state.store.get_document(id).await.map_err(Error::store)?;
  owned(document, &case, |d| d.case_id)
}

fn analysis_section(value: &serde_json::Value) -> String {
  let mut out = String::from("<h2>Analysis</h2>");
  if let Some(err) = value.get("error").and_then(|e| e.as_str()) {
    out.push_str(&format!("<p class=\"error\">{}</p>", html::esc(err)));
  }
  let Ok(analysis) = serde_json::from_value::<DocumentAnalysis>(value.clone()) else {
    return out;
  };
  let sections = [
    ("Key points", &analysis.key_points),
    ("Important dates", &analysis.important_dates),
    ("Obligations", &analysis.obligations),
    ("Restrictions", &analysis.restrictions),
    ("Concerning the children", &analysis.children_related),
    ("Action items", &analysis.action_items),
    ("Red flags", &analysis.red_flags),
  ];
  for (title, items) in sections {
    if !items.is_empty() {
      out.push_str(&format!("<h3>{title}</h3>{}", html::list(items)));
    }
  }
  out
}

pub async fn show<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<Html<String>> {
  let doc = find(&state, id).await?;

  let mut body = String::from("<dl>");
  body.push_str(&html::detail("Category", Some(doc.category.label())));
  body.push_str(&html::detail("Type", Some(doc.file_type.to_uppercase().as_str())));
  body.push_str(&html::detail("Size", Some(format_file_size(doc.file_size).as_str())));
  body.push_str(&html::detail("Document date", Some(html::fmt_date(doc.document_date).as_str())));
  body.push_str(&html::detail(
    "Uploaded",
    Some(doc.uploaded_at.format("%Y-%m-%d %H:%M").to_string().as_str()),
  ));
  body.push_str(&html::detail("Description", doc.description.as_deref()));
  body.push_str(&html::detail("SHA-256", Some(doc.content_hash.as_str())));
  body.push_str(&format!(
    "</dl><p><a href=\"/documents/{}/edit\">Edit details</a></p>",
    doc.document_id,
  ));

  if let Some(summary) = doc.ai_summary.as_deref() {
    body.push_str(&format!("<h2>Summary</h2><p>{}</p>", html::esc(summary)));
  }
  if let Some(analysis) = &doc.ai_analysis {
    body.push_str(&analysis_section(analysis));
  }

  body.push_str("<h2>Extracted text</h2>");
  match (usable_text(doc.extracted_text.as_deref()), doc.extracted_text.as_deref()) {
    (Some(text), _) => body.push_str(&format!("<pre>{}</pre>", html::esc(text))),
    (None, Some(failure)) if !failure.trim().is_empty() => {
      body.push_str(&format!("<p class=\"error\">{}</p>", html::esc(failure)));
    }
    _ => body.push_str("<p class=\"muted\">No text was extracted from this file.</p>"),
  }

  Ok(html::page(&doc.original_filename, &body))
}

pub async fn edit_form<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<Html<String>> {
  let doc = find(&state, id).await?;
  let categories: Vec<DocumentCategory> = DocumentCategory::iter().collect();
  let form = html::FormBuilder::new(&format!("/documents/{id}/edit"))
    .select(
      "category",
      "Category",
      &category_options(&categories),
      Some(doc.category.as_ref()),
    )
    .textarea("description", "Description", doc.description.as_deref())
    .date("document_date", "Document date", doc.document_date)
    .finish("Save");
  Ok(html::page(&format!("Edit {}", doc.original_filename), &form))
}

pub async fn update<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
  Form(form): Form<DocumentForm>,
) -> Result<Redirect> {
  find(&state, id).await?;
  state
    .store
    .update_document(id, form.into_input())
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  Ok(Redirect::to(&format!("/documents/{id}")))
}
