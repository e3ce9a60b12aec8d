//! The prompt operations offered to the rest of the binder.
//!
//! None of these fail: any backend, transport or parse error is logged and
//! turned into [`Assessment::Fallback`] carrying the operation's default
//! payload.

use binder_core::{record::DocumentCategory, snapshot::CaseSnapshot};
use serde::de::DeserializeOwned;
use strum::IntoEnumIterator;

use crate::{
  Assessment, ChatBackend, ChatRequest, OpenAiBackend, Result,
  payload::{CaseSummary, Checklist, DocumentAnalysis, IncidentAssessment},
};

/// Characters of document text offered for category suggestion.
pub const PREVIEW_CHARS: usize = 500;

const CATEGORY_MAX_TOKENS: u32 = 50;

// ─── Prompts ─────────────────────────────────────────────────────────────────

const DOCUMENT_PROMPT: &str = r#"You analyse documents filed in family law and child custody matters for a self-represented parent.
Extract what matters to them: important dates, obligations, restrictions, rights, and anything bearing on the children's best interests.
Reply with a single JSON object of this shape:
{
  "summary": "Brief summary of the document",
  "key_points": ["Important points"],
  "important_dates": ["Dates and deadlines mentioned"],
  "obligations": ["Obligations or requirements"],
  "restrictions": ["Restrictions or limitations"],
  "children_related": ["Points about the children"],
  "suggested_category": "One of: court_order, custody_agreement, medical, school, correspondence, financial, police_report, evaluation, other",
  "action_items": ["Things the parent should do"],
  "red_flags": ["Concerning issues that need attention"]
}"#;

const CASE_PROMPT: &str = r#"You review family law custody cases. Summarise the case described by the JSON the user sends, focusing on the children's best interests, so that a self-represented parent understands where they stand.
Reply with a single JSON object of this shape:
{
  "executive_summary": "Overall case summary",
  "children_best_interests": "Analysis focused on the children's wellbeing",
  "key_strengths": ["Strengths in the case"],
  "areas_of_concern": ["Areas that need attention"],
  "recommended_actions": ["Specific actions to take"],
  "documentation_gaps": ["Documentation that should be obtained"],
  "legal_considerations": ["Legal points to consider"]
}"#;

const INCIDENT_PROMPT: &str = r#"You assess incidents recorded in child custody cases, judging their severity and the appropriate response.
Reply with a single JSON object of this shape:
{
  "severity_assessment": "low | medium | high | critical",
  "legal_implications": "Potential legal implications",
  "recommended_actions": ["Immediate actions to take"],
  "documentation_needs": ["What should be documented"],
  "follow_up_suggestions": ["Follow-up actions"]
}"#;

const CHECKLIST_PROMPT: &str = r#"You help self-represented parents prepare for family court. Produce a practical, actionable preparation checklist.
Reply with a single JSON object of this shape:
{
  "checklist_title": "Title for this checklist",
  "preparation_items": [
    { "category": "Category name", "items": ["Specific action items"], "priority": "high | medium | low" }
  ],
  "timeline_suggestions": ["When to complete items"],
  "common_mistakes": ["Common mistakes to avoid"]
}"#;

// ─── Assistant ───────────────────────────────────────────────────────────────

/// Model-backed helpers for documents, incidents and whole-case review.
pub struct Assistant<B = OpenAiBackend> {
  backend: B,
}

impl<B: ChatBackend> Assistant<B> {
  pub fn new(backend: B) -> Self { Self { backend } }

  pub fn backend(&self) -> &B { &self.backend }

  async fn ask_json<T: DeserializeOwned>(
    &self,
    system: &str,
    user: String,
  ) -> Result<T> {
    let reply = self.backend.complete(ChatRequest::json(system, user)).await?;
    Ok(serde_json::from_str(&reply)?)
  }

  /// Extract the key facts of a document from its text.
  pub async fn analyze_document(
    &self,
    text: &str,
    document_type: Option<&str>,
  ) -> Assessment<DocumentAnalysis> {
    let user = format!(
      "Please analyse this legal document.\n\nDocument type: {}\n\nDocument content:\n{text}",
      document_type.unwrap_or("Unknown"),
    );
    settle(
      self.ask_json(DOCUMENT_PROMPT, user).await,
      "Failed to analyze document",
      DocumentAnalysis::fallback,
    )
  }

  /// Review everything recorded for a case.
  pub async fn case_summary(&self, snapshot: &CaseSnapshot) -> Assessment<CaseSummary> {
    let result = match serde_json::to_string(snapshot) {
      Ok(json) => {
        self
          .ask_json(CASE_PROMPT, format!("Analyse this family law case: {json}"))
          .await
      }
      Err(e) => Err(e.into()),
    };
    settle(result, "Failed to generate case summary", CaseSummary::fallback)
  }

  /// Pick the best category for an upload from its name and leading text.
  ///
  /// A reply that is not exactly one of the category names yields
  /// [`DocumentCategory::Other`].
  pub async fn suggest_category(
    &self,
    filename: &str,
    content: &str,
  ) -> Assessment<DocumentCategory> {
    let options = DocumentCategory::iter()
      .map(|c| c.as_ref().to_owned())
      .collect::<Vec<_>>()
      .join(", ");
    let preview: String = content.chars().take(PREVIEW_CHARS).collect();
    let user = format!(
      "Based on the filename \"{filename}\" and the content preview below, choose the most \
       appropriate category from these options: {options}.\n\nContent preview:\n{preview}\n\n\
       Respond with just the category name."
    );

    let result = self
      .backend
      .complete(ChatRequest::text(user, CATEGORY_MAX_TOKENS))
      .await
      .map(|reply| category_from_reply(&reply));
    settle(result, "Failed to suggest category", DocumentCategory::default)
  }

  /// Judge the severity and consequences of an incident.
  pub async fn assess_incident(
    &self,
    description: &str,
    incident_type: Option<&str>,
  ) -> Assessment<IncidentAssessment> {
    let user = format!(
      "Analyse this incident.\nType: {}\nDescription: {description}",
      incident_type.unwrap_or("unspecified"),
    );
    settle(
      self.ask_json(INCIDENT_PROMPT, user).await,
      "Failed to analyze incident",
      IncidentAssessment::fallback,
    )
  }

  /// Build a hearing preparation checklist.
  pub async fn preparation_checklist(
    &self,
    case_type: &str,
    hearing_type: Option<&str>,
  ) -> Assessment<Checklist> {
    let user = format!(
      "Create a preparation checklist for:\nCase type: {case_type}\nHearing type: {}",
      hearing_type.unwrap_or("General case preparation"),
    );
    settle(
      self.ask_json(CHECKLIST_PROMPT, user).await,
      "Failed to generate checklist",
      Checklist::fallback,
    )
  }
}

fn category_from_reply(reply: &str) -> DocumentCategory {
  let label = reply.trim().to_lowercase();
  DocumentCategory::iter()
    .find(|c| c.as_ref() == label)
    .unwrap_or_default()
}

fn settle<T>(
  result: Result<T>,
  context: &str,
  fallback: impl FnOnce() -> T,
) -> Assessment<T> {
  match result {
    Ok(payload) => Assessment::Parsed(payload),
    Err(e) => {
      tracing::warn!(error = %e, "{context}");
      Assessment::Fallback { error: format!("{context}: {e}"), payload: fallback() }
    }
  }
}

#[cfg(test)]
mod tests {
  use binder_core::record::{Case, Severity};
  use chrono::Utc;

  use super::*;
  use crate::{Error, ScriptedBackend};

  fn assistant(replies: Vec<Result<String>>) -> Assistant<ScriptedBackend> {
    Assistant::new(ScriptedBackend::replying(replies))
  }

  #[tokio::test]
  async fn analysis_parses_partial_reply() {
    let a = assistant(vec![Ok(
      r#"{"summary":"Temporary custody order","key_points":["Weekend visits"]}"#.into(),
    )]);

    let result = a.analyze_document("ORDER ...", Some("court_order")).await;
    let Assessment::Parsed(analysis) = result else {
      panic!("expected parsed analysis");
    };
    assert_eq!(analysis.summary, "Temporary custody order");
    assert_eq!(analysis.key_points, vec!["Weekend visits"]);
    assert!(analysis.red_flags.is_empty());

    let sent = a.backend().requests();
    assert!(sent[0].json);
    assert!(sent[0].user.contains("Document type: court_order"));
  }

  #[tokio::test]
  async fn malformed_reply_falls_back_with_error() {
    let a = assistant(vec![Ok("not json at all".into())]);

    let result = a.analyze_document("text", None).await;
    assert!(result.is_fallback());
    assert_eq!(result.payload().summary, "Document analysis failed");
    assert_eq!(result.payload().suggested_category, "other");

    let json = result.to_json().unwrap();
    let error = json["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to analyze document: "));
  }

  #[tokio::test]
  async fn backend_failure_falls_back() {
    let a = assistant(vec![Err(Error::MissingApiKey)]);
    let result = a.preparation_checklist("Family Law", None).await;
    assert_eq!(result.payload().checklist_title, "Case Preparation Checklist");
    assert!(result.error().unwrap().contains("no API key"));
  }

  #[tokio::test]
  async fn category_reply_is_normalised() {
    let a = assistant(vec![Ok("  Police_Report\n".into())]);
    let result = a.suggest_category("report.pdf", "Officer responded").await;
    assert_eq!(result, Assessment::Parsed(DocumentCategory::PoliceReport));
  }

  #[tokio::test]
  async fn unknown_category_becomes_other() {
    let a = assistant(vec![Ok("birth certificate".into())]);
    let result = a.suggest_category("cert.pdf", "").await;
    assert_eq!(result.into_payload(), DocumentCategory::Other);
  }

  #[tokio::test]
  async fn category_preview_is_truncated() {
    let a = assistant(vec![Ok("school".into())]);
    let long = "x".repeat(2_000);
    a.suggest_category("report.txt", &long).await;

    let sent = a.backend().requests();
    assert!(!sent[0].json);
    assert_eq!(sent[0].max_tokens, Some(50));
    assert!(sent[0].user.contains(&"x".repeat(PREVIEW_CHARS)));
    assert!(!sent[0].user.contains(&"x".repeat(PREVIEW_CHARS + 1)));
  }

  #[tokio::test]
  async fn incident_severity_is_read_from_reply() {
    let a = assistant(vec![Ok(
      r#"{"severity_assessment":"High","legal_implications":"Possible contempt"}"#.into(),
    )]);
    let result = a.assess_incident("Refused exchange", Some("missed_visit")).await;
    assert_eq!(result.payload().severity(), Some(Severity::High));

    let fallback = assistant(vec![]).assess_incident("x", None).await;
    assert!(fallback.is_fallback());
    assert_eq!(fallback.payload().severity(), Some(Severity::Medium));
  }

  #[tokio::test]
  async fn case_summary_sends_snapshot_json() {
    let now = Utc::now();
    let snapshot = CaseSnapshot {
      case:      Case {
        case_id:     uuid::Uuid::new_v4(),
        case_number: Some("FL-7".into()),
        title:       "Doe custody".into(),
        case_type:   Some("Family Law".into()),
        court:       None,
        judge:       None,
        status:      "Open".into(),
        filing_date: None,
        created_at:  now,
        updated_at:  now,
      },
      children:  vec![],
      parents:   vec![],
      documents: vec![],
      incidents: vec![],
      deadlines: vec![],
      notes:     vec![],
    };
    let a = assistant(vec![Ok(r#"{"executive_summary":"Stable"}"#.into())]);

    let result = a.case_summary(&snapshot).await;
    assert_eq!(result.payload().executive_summary, "Stable");
    assert!(a.backend().requests()[0].user.contains("\"case_number\":\"FL-7\""));
  }
}
