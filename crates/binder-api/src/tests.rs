//! Router tests against an in-memory store. Most use a model backend without
//! an API key, so every assistant call takes its fallback path offline; the
//! rest replay scripted model replies.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use binder_ai::{AiConfig, Assistant, ChatBackend, OpenAiBackend, ScriptedBackend};
use binder_core::{
  record::{
    DeadlineInput, DocumentCategory, IncidentInput, NewDocument, NoteInput,
  },
  store::CaseStore,
};
use binder_store_sqlite::SqliteStore;
use chrono::{Days, Local, NaiveDate};
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::api_router;

async fn setup() -> (Arc<SqliteStore>, Router) {
  setup_with(OpenAiBackend::new(&AiConfig::default()).unwrap()).await
}

async fn setup_with<B: ChatBackend + 'static>(backend: B) -> (Arc<SqliteStore>, Router) {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let router = api_router(store.clone(), Arc::new(Assistant::new(backend)));
  (store, router)
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(json) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(json.to_string())
    }
    None => Body::empty(),
  };
  let resp = router
    .clone()
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
  send(router, "GET", uri, None).await
}

fn text_document(case_id: Uuid, text: Option<&str>) -> NewDocument {
  NewDocument {
    case_id,
    filename: "letter_1234abcd.txt".into(),
    original_filename: "letter.txt".into(),
    file_type: "txt".into(),
    file_size: 5,
    content_hash: "00".into(),
    category: DocumentCategory::Correspondence,
    document_date: NaiveDate::from_ymd_opt(2024, 4, 2),
    extracted_text: text.map(str::to_owned),
    ..Default::default()
  }
}

// ─── Case ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn case_is_created_once() {
  let (store, router) = setup().await;

  let (status, first) = get(&router, "/case").await;
  assert_eq!(status, StatusCode::OK);
  let (_, second) = get(&router, "/case").await;

  assert_eq!(first["case_id"], second["case_id"]);
  assert_eq!(first["title"], "My Family Law Case");
  assert_eq!(store.list_cases().await.unwrap().len(), 1);
}

#[tokio::test]
async fn children_list_is_scoped_to_the_case() {
  let (store, router) = setup().await;
  let case = store.current_case().await.unwrap();
  store
    .add_child(case.case_id, binder_core::record::ChildInput {
      name: "Ava".into(),
      ..Default::default()
    })
    .await
    .unwrap();

  let (status, body) = get(&router, "/children").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 1);
  assert_eq!(body[0]["name"], "Ava");

  let (_, parents) = get(&router, "/parents").await;
  assert_eq!(parents, json!([]));
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_category_filter_is_rejected() {
  let (_, router) = setup().await;
  let (status, body) = get(&router, "/documents?category=recipes").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("recipes"));
}

#[tokio::test]
async fn document_filter_and_lookup() {
  let (store, router) = setup().await;
  let case = store.current_case().await.unwrap();
  let doc = store
    .add_document(text_document(case.case_id, Some("Hello")))
    .await
    .unwrap();

  let (_, listed) = get(&router, "/documents?category=correspondence").await;
  assert_eq!(listed.as_array().unwrap().len(), 1);
  let (_, empty) = get(&router, "/documents?category=medical").await;
  assert_eq!(empty, json!([]));

  let (status, one) = get(&router, &format!("/documents/{}", doc.document_id)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(one["extracted_text"], "Hello");
  assert_eq!(one["category"], "correspondence");
}

#[tokio::test]
async fn missing_document_is_404_json() {
  let (_, router) = setup().await;
  let (status, body) = get(&router, &format!("/documents/{}", Uuid::new_v4())).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].is_string());
}

// ─── Deadlines ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn completing_a_deadline_moves_it_out_of_upcoming() {
  let (store, router) = setup().await;
  let case = store.current_case().await.unwrap();
  let today = Local::now().date_naive();

  let soon = store
    .add_deadline(case.case_id, DeadlineInput {
      title: "File financial disclosure".into(),
      due_date: today.checked_add_days(Days::new(3)),
      ..Default::default()
    })
    .await
    .unwrap();
  store
    .add_deadline(case.case_id, DeadlineInput {
      title: "Missed".into(),
      due_date: today.checked_sub_days(Days::new(3)),
      ..Default::default()
    })
    .await
    .unwrap();

  let (_, upcoming) = get(&router, "/deadlines?status=upcoming").await;
  assert_eq!(upcoming.as_array().unwrap().len(), 1);
  assert_eq!(upcoming[0]["title"], "File financial disclosure");
  let (_, overdue) = get(&router, "/deadlines?status=overdue").await;
  assert_eq!(overdue[0]["title"], "Missed");

  let (status, done) = send(
    &router,
    "POST",
    &format!("/deadlines/{}/complete", soon.deadline_id),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(done["completed"], true);
  assert!(done["completed_at"].is_string());

  let (_, upcoming) = get(&router, "/deadlines?status=upcoming").await;
  assert_eq!(upcoming, json!([]));
  let (_, completed) = get(&router, "/deadlines?status=completed").await;
  assert_eq!(completed.as_array().unwrap().len(), 1);
  let (_, all) = get(&router, "/deadlines").await;
  assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn deadline_status_must_be_known() {
  let (_, router) = setup().await;
  let (status, _) = get(&router, "/deadlines?status=someday").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn completing_unknown_deadline_is_404() {
  let (_, router) = setup().await;
  let (status, _) = send(
    &router,
    "POST",
    &format!("/deadlines/{}/complete", Uuid::new_v4()),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Notes, incidents, timeline ──────────────────────────────────────────────

#[tokio::test]
async fn notes_filter_by_tag() {
  let (store, router) = setup().await;
  let case = store.current_case().await.unwrap();
  for (content, tags) in [("pickup late", vec!["exchange"]), ("dentist", vec!["medical"])] {
    store
      .add_note(case.case_id, NoteInput {
        content: content.into(),
        tags: tags.into_iter().map(String::from).collect(),
        ..Default::default()
      })
      .await
      .unwrap();
  }

  let (_, notes) = get(&router, "/notes?tag=exchange").await;
  assert_eq!(notes.as_array().unwrap().len(), 1);
  assert_eq!(notes[0]["content"], "pickup late");
}

#[tokio::test]
async fn timeline_merges_records_newest_first() {
  let (store, router) = setup().await;
  let case = store.current_case().await.unwrap();

  store
    .add_incident(case.case_id, IncidentInput {
      incident_date: NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(18, 0, 0)),
      incident_type: Some("missed_visit".into()),
      description: "No show".into(),
      ..Default::default()
    })
    .await
    .unwrap();
  store
    .add_deadline(case.case_id, DeadlineInput {
      title: "Hearing".into(),
      due_date: NaiveDate::from_ymd_opt(2024, 6, 1),
      ..Default::default()
    })
    .await
    .unwrap();
  store
    .add_document(text_document(case.case_id, None))
    .await
    .unwrap();

  let (_, incidents) = get(&router, "/incidents?incident_type=missed_visit").await;
  assert_eq!(incidents.as_array().unwrap().len(), 1);

  let (status, events) = get(&router, "/timeline").await;
  assert_eq!(status, StatusCode::OK);
  let kinds: Vec<&str> = events
    .as_array()
    .unwrap()
    .iter()
    .map(|e| e["kind"].as_str().unwrap())
    .collect();
  assert_eq!(kinds, vec!["deadline", "incident", "document"]);
}

// ─── Assistant ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn checklist_without_api_key_returns_fallback() {
  let (_, router) = setup().await;
  let (status, body) = send(
    &router,
    "POST",
    "/assistant/checklist",
    Some(json!({ "hearing_type": "custody review" })),
  )
  .await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["checklist_title"], "Case Preparation Checklist");
  assert!(body["error"].as_str().unwrap().starts_with("Failed to generate checklist"));
}

#[tokio::test]
async fn case_summary_without_api_key_returns_fallback() {
  let (_, router) = setup().await;
  let (status, body) = send(&router, "POST", "/assistant/case-summary", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["executive_summary"], "Case summary generation failed");
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn analysis_needs_extracted_text() {
  let (store, router) = setup().await;
  let case = store.current_case().await.unwrap();
  let blank = store
    .add_document(text_document(case.case_id, None))
    .await
    .unwrap();
  let failed = store
    .add_document(text_document(
      case.case_id,
      Some("Error extracting PDF text: bad xref"),
    ))
    .await
    .unwrap();

  for doc in [blank, failed] {
    let uri = format!("/assistant/documents/{}/analysis", doc.document_id);
    let (status, _) = send(&router, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }
}

#[tokio::test]
async fn analysis_fallback_is_persisted_without_summary() {
  let (store, router) = setup().await;
  let case = store.current_case().await.unwrap();
  let doc = store
    .add_document(text_document(case.case_id, Some("Hello")))
    .await
    .unwrap();

  let uri = format!("/assistant/documents/{}/analysis", doc.document_id);
  let (status, body) = send(&router, "POST", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body["ai_summary"].is_null());
  assert_eq!(body["ai_analysis"]["summary"], "Document analysis failed");
  assert!(body["ai_analysis"]["error"].is_string());

  let stored = store.get_document(doc.document_id).await.unwrap().unwrap();
  assert!(stored.ai_analysis.is_some());
}

#[tokio::test]
async fn parsed_analysis_stores_the_summary() {
  let (store, router) = setup_with(ScriptedBackend::replying([Ok(
    r#"{"summary":"Father has alternate weekends","red_flags":["Late filing"]}"#.to_owned(),
  )]))
  .await;
  let case = store.current_case().await.unwrap();
  let doc = store
    .add_document(text_document(case.case_id, Some("Parenting plan ...")))
    .await
    .unwrap();

  let uri = format!("/assistant/documents/{}/analysis", doc.document_id);
  let (status, body) = send(&router, "POST", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["ai_summary"], "Father has alternate weekends");
  assert!(body["ai_analysis"].get("error").is_none());
  assert_eq!(body["ai_analysis"]["red_flags"][0], "Late filing");

  let stored = store.get_document(doc.document_id).await.unwrap().unwrap();
  assert_eq!(stored.ai_summary.as_deref(), Some("Father has alternate weekends"));
}

#[tokio::test]
async fn parsed_checklist_is_returned_without_error() {
  let (_, router) = setup_with(ScriptedBackend::replying([Ok(
    r#"{"checklist_title":"Custody hearing","preparation_items":[
        {"category":"Evidence","items":["Print texts"],"priority":"high"}]}"#
      .to_owned(),
  )]))
  .await;
  let (status, body) = send(&router, "POST", "/assistant/checklist", Some(json!({}))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["checklist_title"], "Custody hearing");
  assert_eq!(body["preparation_items"][0]["items"][0], "Print texts");
  assert!(body.get("error").is_none());
}
