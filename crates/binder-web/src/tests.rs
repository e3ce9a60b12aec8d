//! Router tests against an in-memory store and a temporary upload directory.
//!
//! Most tests use a model backend without an API key, so every model call
//! falls back. Those that need real replies use a scripted backend.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use binder_ai::{AiConfig, Assistant, ChatBackend, OpenAiBackend, ScriptedBackend};
use binder_core::{
  record::{DeadlineInput, DocumentCategory, Severity},
  store::CaseStore,
};
use binder_store_sqlite::SqliteStore;
use chrono::{Days, Local};
use tempfile::TempDir;
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{AppState, ServerConfig, router};

const BOUNDARY: &str = "binder-test-boundary";

struct Harness {
  store:  Arc<SqliteStore>,
  router: Router,
  dir:    TempDir,
}

impl Harness {
  fn upload_dir(&self) -> std::path::PathBuf { self.dir.path().join("uploads") }
}

async fn setup() -> Harness {
  setup_with(OpenAiBackend::new(&AiConfig::default()).unwrap()).await
}

/// A harness whose model replies come from `replies`, in order.
async fn scripted(replies: &[&str]) -> Harness {
  setup_with(ScriptedBackend::replying(
    replies.iter().map(|r| Ok(r.to_string())),
  ))
  .await
}

async fn setup_with<B: ChatBackend + 'static>(backend: B) -> Harness {
  let dir = tempfile::tempdir().unwrap();
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let config = ServerConfig {
    upload_dir: dir.path().join("uploads"),
    ..Default::default()
  };
  let router = router(AppState {
    store:     store.clone(),
    assistant: Arc::new(Assistant::new(backend)),
    config:    Arc::new(config),
  });
  Harness { store, router, dir }
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Option<String>, String) {
  let resp = router.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let location = resp
    .headers()
    .get(header::LOCATION)
    .map(|v| v.to_str().unwrap().to_owned());
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  (status, location, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get(router: &Router, uri: &str) -> (StatusCode, String) {
  let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
  let (status, _, body) = send(router, req).await;
  (status, body)
}

async fn post_form(router: &Router, uri: &str, form: &str) -> (StatusCode, Option<String>) {
  let req = Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
    .body(Body::from(form.to_owned()))
    .unwrap();
  let (status, location, _) = send(router, req).await;
  (status, location)
}

/// A multipart body with one file part followed by plain text fields.
fn multipart(filename: &str, content: &[u8], fields: &[(&str, &str)]) -> Body {
  let mut body = format!(
    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
     Content-Type: application/octet-stream\r\n\r\n"
  )
  .into_bytes();
  body.extend_from_slice(content);
  body.extend_from_slice(b"\r\n");
  for (name, value) in fields {
    body.extend_from_slice(
      format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
      )
      .as_bytes(),
    );
  }
  body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
  Body::from(body)
}

async fn upload(
  router: &Router,
  filename: &str,
  content: &[u8],
  fields: &[(&str, &str)],
) -> (StatusCode, Option<String>) {
  let req = Request::builder()
    .method("POST")
    .uri("/documents/upload")
    .header(
      header::CONTENT_TYPE,
      format!("multipart/form-data; boundary={BOUNDARY}"),
    )
    .body(multipart(filename, content, fields))
    .unwrap();
  let (status, location, _) = send(router, req).await;
  (status, location)
}

// ─── Case and people ─────────────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_creates_the_case_once() {
  let h = setup().await;

  let (status, body) = get(&h.router, "/").await;
  assert_eq!(status, StatusCode::OK);
  assert!(body.contains("My Family Law Case"));
  let (status, _) = get(&h.router, "/").await;
  assert_eq!(status, StatusCode::OK);

  assert_eq!(h.store.list_cases().await.unwrap().len(), 1);
}

#[tokio::test]
async fn case_edit_updates_details() {
  let h = setup().await;
  let (status, location) = post_form(
    &h.router,
    "/case/edit",
    "title=Smith+v+Smith&court=Family+Court&filing_date=2024-01-15",
  )
  .await;
  assert_eq!(status, StatusCode::SEE_OTHER);
  assert_eq!(location.as_deref(), Some("/"));

  let case = h.store.current_case().await.unwrap();
  assert_eq!(case.title, "Smith v Smith");
  assert_eq!(case.court.as_deref(), Some("Family Court"));
  assert_eq!(case.filing_date.unwrap().to_string(), "2024-01-15");
}

#[tokio::test]
async fn invalid_date_is_stored_as_none() {
  let h = setup().await;
  let (status, location) =
    post_form(&h.router, "/children/new", "name=Ava&date_of_birth=2024-13-45").await;
  assert_eq!(status, StatusCode::SEE_OTHER);
  assert_eq!(location.as_deref(), Some("/children"));

  let case = h.store.current_case().await.unwrap();
  let children = h.store.list_children(case.case_id).await.unwrap();
  assert_eq!(children.len(), 1);
  assert_eq!(children[0].name, "Ava");
  assert_eq!(children[0].date_of_birth, None);

  let (_, page) = get(&h.router, "/children").await;
  assert!(page.contains("Ava"));
}

#[tokio::test]
async fn blank_required_field_is_rejected() {
  let h = setup().await;
  let (status, _) = post_form(&h.router, "/notes/new", "title=Call&content=+++").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let case = h.store.current_case().await.unwrap();
  assert!(h.store.list_notes(case.case_id, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_ids_are_404() {
  let h = setup().await;
  let id = Uuid::new_v4();

  let (status, body) = get(&h.router, &format!("/children/{id}/edit")).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body.contains("does not exist"));

  let (status, _) = post_form(&h.router, &format!("/parents/{id}/edit"), "name=Jo").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _) = post_form(&h.router, &format!("/deadlines/{id}/complete"), "").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _) = get(&h.router, &format!("/documents/{id}")).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _) = get(&h.router, "/no/such/page").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn disallowed_upload_writes_nothing() {
  let h = setup().await;
  let (status, _) = upload(&h.router, "payload.exe", b"MZ", &[]).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let written = std::fs::read_dir(h.upload_dir())
    .map(|entries| entries.count())
    .unwrap_or(0);
  assert_eq!(written, 0);

  let case = h.store.current_case().await.unwrap();
  assert!(h.store.list_documents(case.case_id, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn text_upload_is_stored_and_extracted() {
  let h = setup().await;
  let (status, location) = upload(&h.router, "hello.txt", b"Hello", &[
    ("category", "correspondence"),
    ("description", "Email from school"),
    ("document_date", "2024-04-02"),
  ])
  .await;
  assert_eq!(status, StatusCode::SEE_OTHER);
  assert_eq!(location.as_deref(), Some("/documents"));

  let case = h.store.current_case().await.unwrap();
  let docs = h.store.list_documents(case.case_id, None).await.unwrap();
  assert_eq!(docs.len(), 1);
  let doc = &docs[0];
  assert_eq!(doc.extracted_text.as_deref(), Some("Hello"));
  assert_eq!(doc.original_filename, "hello.txt");
  assert_eq!(doc.file_type, "txt");
  assert_eq!(doc.file_size, 5);
  assert_eq!(doc.category, DocumentCategory::Correspondence);
  assert!(doc.filename.starts_with("hello_") && doc.filename.ends_with(".txt"));
  assert!(doc.ai_analysis.is_none());

  let on_disk = std::fs::read(h.upload_dir().join(&doc.filename)).unwrap();
  assert_eq!(on_disk, b"Hello");

  let (status, page) = get(&h.router, &format!("/documents/{}", doc.document_id)).await;
  assert_eq!(status, StatusCode::OK);
  assert!(page.contains("<pre>Hello</pre>"));
  assert!(page.contains("5.0B"));
}

#[tokio::test]
async fn upload_without_category_falls_back_to_other() {
  let h = setup().await;
  let (status, _) =
    upload(&h.router, "order.txt", b"The court orders...", &[("analyze", "on")]).await;
  assert_eq!(status, StatusCode::SEE_OTHER);

  let case = h.store.current_case().await.unwrap();
  let docs = h.store.list_documents(case.case_id, None).await.unwrap();
  let doc = &docs[0];
  assert_eq!(doc.category, DocumentCategory::Other);
  assert_eq!(doc.ai_summary, None);
  let analysis = doc.ai_analysis.as_ref().unwrap();
  assert_eq!(analysis["summary"], "Document analysis failed");
  assert!(analysis["error"].is_string());
}

#[tokio::test]
async fn upload_uses_suggested_category_and_parsed_summary() {
  let h = scripted(&[
    "  School\n",
    r#"{"summary":"Spring report card","key_points":["Attendance 98%"]}"#,
  ])
  .await;
  let (status, _) =
    upload(&h.router, "report.txt", b"Term 2 report", &[("analyze", "on")]).await;
  assert_eq!(status, StatusCode::SEE_OTHER);

  let case = h.store.current_case().await.unwrap();
  let doc = h.store.list_documents(case.case_id, None).await.unwrap().remove(0);
  assert_eq!(doc.category, DocumentCategory::School);
  assert_eq!(doc.ai_summary.as_deref(), Some("Spring report card"));
  let analysis = doc.ai_analysis.as_ref().unwrap();
  assert!(analysis.get("error").is_none());
  assert_eq!(analysis["key_points"][0], "Attendance 98%");

  let (_, page) = get(&h.router, &format!("/documents/{}", doc.document_id)).await;
  assert!(page.contains("Spring report card"));
}

#[tokio::test]
async fn chosen_category_skips_the_suggestion() {
  let h = scripted(&[r#"{"summary":"Interim order"}"#]).await;
  upload(&h.router, "order.txt", b"It is ordered", &[
    ("category", "court_order"),
    ("analyze", "on"),
  ])
  .await;

  let case = h.store.current_case().await.unwrap();
  let doc = h.store.list_documents(case.case_id, None).await.unwrap().remove(0);
  assert_eq!(doc.category, DocumentCategory::CourtOrder);
  assert_eq!(doc.ai_summary.as_deref(), Some("Interim order"));
}

#[tokio::test]
async fn filename_without_a_safe_stem_is_renamed() {
  let h = setup().await;
  let (status, _) =
    upload(&h.router, "$$$.txt", b"x", &[("category", "other")]).await;
  assert_eq!(status, StatusCode::SEE_OTHER);

  let case = h.store.current_case().await.unwrap();
  let doc = h.store.list_documents(case.case_id, None).await.unwrap().remove(0);
  assert_eq!(doc.original_filename, "upload.txt");
  assert!(doc.filename.starts_with("upload_"));
}

#[tokio::test]
async fn document_edit_changes_category() {
  let h = setup().await;
  upload(&h.router, "note.txt", b"x", &[("category", "other")]).await;
  let case = h.store.current_case().await.unwrap();
  let doc = h.store.list_documents(case.case_id, None).await.unwrap().remove(0);

  let (status, _) = post_form(
    &h.router,
    &format!("/documents/{}/edit", doc.document_id),
    "category=medical&description=Clinic+letter",
  )
  .await;
  assert_eq!(status, StatusCode::SEE_OTHER);

  let (_, page) = get(&h.router, "/documents?category=medical").await;
  assert!(page.contains("<form method=\"get\" action=\"/documents\">"));
  assert!(page.contains("note.txt"));
  let (_, page) = get(&h.router, "/documents?category=school").await;
  assert!(!page.contains("note.txt"));
}

// ─── Incidents, deadlines, notes ─────────────────────────────────────────────

#[tokio::test]
async fn incident_assessment_fallback_keeps_severity() {
  let h = setup().await;
  let (status, _) = post_form(
    &h.router,
    "/incidents/new",
    "incident_date=2024-03-09T18%3A45&severity=high&description=Late+return&ai_assess=on",
  )
  .await;
  assert_eq!(status, StatusCode::SEE_OTHER);

  let case = h.store.current_case().await.unwrap();
  let incidents = h.store.list_incidents(case.case_id, None).await.unwrap();
  assert_eq!(incidents.len(), 1);
  assert_eq!(incidents[0].severity, Some(Severity::High));
  let assessment = incidents[0].ai_assessment.as_ref().unwrap();
  assert!(assessment["error"].as_str().unwrap().starts_with("Failed to analyze incident"));
}

#[tokio::test]
async fn parsed_assessment_replaces_severity() {
  let h = scripted(&[
    r#"{"severity_assessment":"critical","legal_implications":"Possible abduction",
        "recommended_actions":["Call the police"]}"#,
  ])
  .await;
  let (status, _) = post_form(
    &h.router,
    "/incidents/new",
    "severity=low&description=Child+not+returned&incident_type=custody&ai_assess=on",
  )
  .await;
  assert_eq!(status, StatusCode::SEE_OTHER);

  let case = h.store.current_case().await.unwrap();
  let incident = h.store.list_incidents(case.case_id, None).await.unwrap().remove(0);
  assert_eq!(incident.severity, Some(Severity::Critical));
  let assessment = incident.ai_assessment.as_ref().unwrap();
  assert!(assessment.get("error").is_none());
  assert_eq!(assessment["legal_implications"], "Possible abduction");

  let (_, page) = get(&h.router, "/incidents").await;
  assert!(page.contains("Possible abduction"));
  assert!(page.contains("Call the police"));
}

#[tokio::test]
async fn unparseable_severity_keeps_the_recorded_one() {
  let h = scripted(&[r#"{"severity_assessment":"serious","legal_implications":"Unclear"}"#])
    .await;
  post_form(
    &h.router,
    "/incidents/new",
    "severity=medium&description=Shouting+at+exchange&ai_assess=on",
  )
  .await;

  let case = h.store.current_case().await.unwrap();
  let incident = h.store.list_incidents(case.case_id, None).await.unwrap().remove(0);
  assert_eq!(incident.severity, Some(Severity::Medium));
  assert_eq!(incident.ai_assessment.as_ref().unwrap()["legal_implications"], "Unclear");
}

#[tokio::test]
async fn deadline_complete_and_reopen() {
  let h = setup().await;
  let case = h.store.current_case().await.unwrap();
  let due = Local::now().date_naive().checked_add_days(Days::new(2));
  let deadline = h
    .store
    .add_deadline(case.case_id, DeadlineInput {
      title: "Serve papers".into(),
      due_date: due,
      ..Default::default()
    })
    .await
    .unwrap();

  let (_, page) = get(&h.router, "/deadlines").await;
  assert!(page.contains("<h2>Upcoming</h2>"));
  assert!(!page.contains("<h2>Completed</h2>"));

  let uri = format!("/deadlines/{}/complete", deadline.deadline_id);
  let (status, location) = post_form(&h.router, &uri, "").await;
  assert_eq!(status, StatusCode::SEE_OTHER);
  assert_eq!(location.as_deref(), Some("/deadlines"));

  let stored = h.store.get_deadline(deadline.deadline_id).await.unwrap().unwrap();
  assert!(stored.completed);
  let (_, page) = get(&h.router, "/deadlines").await;
  assert!(!page.contains("<h2>Upcoming</h2>"));
  assert!(page.contains("<h2>Completed</h2>"));

  let uri = format!("/deadlines/{}/reopen", deadline.deadline_id);
  post_form(&h.router, &uri, "").await;
  let stored = h.store.get_deadline(deadline.deadline_id).await.unwrap().unwrap();
  assert!(!stored.completed);
  assert_eq!(stored.completed_at, None);
}

#[tokio::test]
async fn note_content_is_escaped() {
  let h = setup().await;
  post_form(
    &h.router,
    "/notes/new",
    "content=%3Cscript%3Ealert(1)%3C%2Fscript%3E&tags=school",
  )
  .await;

  let (status, page) = get(&h.router, "/notes?tag=school").await;
  assert_eq!(status, StatusCode::OK);
  assert!(!page.contains("<script>"));
  assert!(page.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn json_api_is_nested() {
  let h = setup().await;
  let (status, body) = get(&h.router, "/api/case").await;
  assert_eq!(status, StatusCode::OK);
  let json: serde_json::Value = serde_json::from_str(&body).unwrap();
  assert_eq!(json["title"], "My Family Law Case");
}
