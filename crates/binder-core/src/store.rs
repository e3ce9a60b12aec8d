//! The `CaseStore` trait.
//!
//! Implemented by storage backends (e.g. `binder-store-sqlite`). Higher layers
//! (`binder-web`, `binder-api`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::record::{
  Case, CaseInput, CaseNote, Child, ChildInput, Deadline, DeadlineInput,
  Document, DocumentCategory, DocumentInput, Incident, IncidentInput,
  NewDocument, NoteInput, Parent, ParentInput, Severity,
};

/// Abstraction over a binder storage backend.
///
/// Every write is committed before the returned future resolves. Lookups by
/// id return `None` for unknown ids; updates return `None` when the row does
/// not exist. Dependent rows of a case are removed when the case is deleted.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CaseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Cases ─────────────────────────────────────────────────────────────

  /// Return the earliest-created case, creating the default case first if
  /// the store holds none. Never creates more than one case.
  fn current_case(
    &self,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  fn get_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + '_;

  fn list_cases(
    &self,
  ) -> impl Future<Output = Result<Vec<Case>, Self::Error>> + Send + '_;

  fn update_case(
    &self,
    id: Uuid,
    input: CaseInput,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + '_;

  /// Delete a case and, by cascade, every record that references it.
  /// Returns `false` if no such case existed.
  fn delete_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Children ──────────────────────────────────────────────────────────

  fn add_child(
    &self,
    case_id: Uuid,
    input: ChildInput,
  ) -> impl Future<Output = Result<Child, Self::Error>> + Send + '_;

  fn get_child(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Child>, Self::Error>> + Send + '_;

  fn list_children(
    &self,
    case_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Child>, Self::Error>> + Send + '_;

  fn update_child(
    &self,
    id: Uuid,
    input: ChildInput,
  ) -> impl Future<Output = Result<Option<Child>, Self::Error>> + Send + '_;

  // ── Parents ───────────────────────────────────────────────────────────

  fn add_parent(
    &self,
    case_id: Uuid,
    input: ParentInput,
  ) -> impl Future<Output = Result<Parent, Self::Error>> + Send + '_;

  fn get_parent(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Parent>, Self::Error>> + Send + '_;

  fn list_parents(
    &self,
    case_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Parent>, Self::Error>> + Send + '_;

  fn update_parent(
    &self,
    id: Uuid,
    input: ParentInput,
  ) -> impl Future<Output = Result<Option<Parent>, Self::Error>> + Send + '_;

  // ── Documents ─────────────────────────────────────────────────────────

  /// Record metadata for a file that has already been written to disk.
  fn add_document(
    &self,
    input: NewDocument,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + '_;

  fn get_document(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + '_;

  /// Newest upload first, optionally restricted to one category.
  fn list_documents(
    &self,
    case_id: Uuid,
    category: Option<DocumentCategory>,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  fn update_document(
    &self,
    id: Uuid,
    input: DocumentInput,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + '_;

  /// Overwrite the stored model summary and full analysis payload.
  fn record_document_analysis(
    &self,
    id: Uuid,
    summary: Option<String>,
    analysis: serde_json::Value,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + '_;

  // ── Incidents ─────────────────────────────────────────────────────────

  fn add_incident(
    &self,
    case_id: Uuid,
    input: IncidentInput,
  ) -> impl Future<Output = Result<Incident, Self::Error>> + Send + '_;

  fn get_incident(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Incident>, Self::Error>> + Send + '_;

  /// Most recent first, optionally restricted to one incident type.
  fn list_incidents(
    &self,
    case_id: Uuid,
    incident_type: Option<String>,
  ) -> impl Future<Output = Result<Vec<Incident>, Self::Error>> + Send + '_;

  fn update_incident(
    &self,
    id: Uuid,
    input: IncidentInput,
  ) -> impl Future<Output = Result<Option<Incident>, Self::Error>> + Send + '_;

  /// Store a model assessment; `severity`, when given, replaces the
  /// incident's severity.
  fn record_incident_assessment(
    &self,
    id: Uuid,
    severity: Option<Severity>,
    assessment: serde_json::Value,
  ) -> impl Future<Output = Result<Option<Incident>, Self::Error>> + Send + '_;

  // ── Deadlines ─────────────────────────────────────────────────────────

  fn add_deadline(
    &self,
    case_id: Uuid,
    input: DeadlineInput,
  ) -> impl Future<Output = Result<Deadline, Self::Error>> + Send + '_;

  fn get_deadline(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Deadline>, Self::Error>> + Send + '_;

  /// Ordered by due date, undated last.
  fn list_deadlines(
    &self,
    case_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Deadline>, Self::Error>> + Send + '_;

  fn update_deadline(
    &self,
    id: Uuid,
    input: DeadlineInput,
  ) -> impl Future<Output = Result<Option<Deadline>, Self::Error>> + Send + '_;

  /// Flip the completed flag; sets `completed_at` when completing and clears
  /// it when reopening.
  fn set_deadline_completed(
    &self,
    id: Uuid,
    completed: bool,
  ) -> impl Future<Output = Result<Option<Deadline>, Self::Error>> + Send + '_;

  // ── Notes ─────────────────────────────────────────────────────────────

  fn add_note(
    &self,
    case_id: Uuid,
    input: NoteInput,
  ) -> impl Future<Output = Result<CaseNote, Self::Error>> + Send + '_;

  fn get_note(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<CaseNote>, Self::Error>> + Send + '_;

  /// Newest first, optionally restricted to notes carrying `tag`.
  fn list_notes(
    &self,
    case_id: Uuid,
    tag: Option<String>,
  ) -> impl Future<Output = Result<Vec<CaseNote>, Self::Error>> + Send + '_;

  fn update_note(
    &self,
    id: Uuid,
    input: NoteInput,
  ) -> impl Future<Output = Result<Option<CaseNote>, Self::Error>> + Send + '_;
}
