//! Record types: the case and everything that hangs off it.
//!
//! Every non-case record carries the `case_id` of its owning case. The
//! relationship is enforced by the store (foreign keys with cascading
//! delete), never by these types.

use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

/// Title given to the case created on first visit.
pub const DEFAULT_CASE_TITLE: &str = "My Family Law Case";
pub const DEFAULT_CASE_TYPE: &str = "Family Law";
pub const DEFAULT_CASE_STATUS: &str = "Open";

// ─── Enumerations ────────────────────────────────────────────────────────────

/// The fixed set of document categories. Also the allow-list that model
/// suggestions are validated against.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DocumentCategory {
  CourtOrder,
  CustodyAgreement,
  Medical,
  School,
  Correspondence,
  Financial,
  PoliceReport,
  Evaluation,
  #[default]
  Other,
}

impl DocumentCategory {
  /// Human-readable label for page headings and select boxes.
  pub fn label(self) -> &'static str {
    match self {
      Self::CourtOrder => "Court order",
      Self::CustodyAgreement => "Custody agreement",
      Self::Medical => "Medical",
      Self::School => "School",
      Self::Correspondence => "Correspondence",
      Self::Financial => "Financial",
      Self::PoliceReport => "Police report",
      Self::Evaluation => "Evaluation",
      Self::Other => "Other",
    }
  }

  /// Parse a value read back from storage; unknown values are an error.
  pub fn parse_stored(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownCategory(s.to_owned()))
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Severity {
  Low,
  Medium,
  High,
  Critical,
}

impl Severity {
  pub fn parse_stored(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownSeverity(s.to_owned()))
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Default,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Priority {
  Low,
  #[default]
  Medium,
  High,
}

impl Priority {
  pub fn parse_stored(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownPriority(s.to_owned()))
  }
}

// ─── Case ────────────────────────────────────────────────────────────────────

/// The root record of a custody matter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
  pub case_id:     Uuid,
  pub case_number: Option<String>,
  pub title:       String,
  pub case_type:   Option<String>,
  pub court:       Option<String>,
  pub judge:       Option<String>,
  pub status:      String,
  pub filing_date: Option<NaiveDate>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// Editable case fields. A missing title falls back to the default title.
#[derive(Debug, Clone, Default)]
pub struct CaseInput {
  pub case_number: Option<String>,
  pub title:       Option<String>,
  pub case_type:   Option<String>,
  pub court:       Option<String>,
  pub judge:       Option<String>,
  pub status:      Option<String>,
  pub filing_date: Option<NaiveDate>,
}

// ─── Child ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Child {
  pub child_id:          Uuid,
  pub case_id:           Uuid,
  pub name:              String,
  pub date_of_birth:     Option<NaiveDate>,
  pub gender:            Option<String>,
  pub school:            Option<String>,
  pub grade:             Option<String>,
  pub medical_needs:     Option<String>,
  pub current_placement: Option<String>,
  pub notes:             Option<String>,
  pub created_at:        DateTime<Utc>,
}

impl Child {
  /// Age in whole years on `today`, if a date of birth is known.
  pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
    let dob = self.date_of_birth?;
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
      years -= 1;
    }
    u32::try_from(years).ok()
  }
}

#[derive(Debug, Clone, Default)]
pub struct ChildInput {
  pub name:              String,
  pub date_of_birth:     Option<NaiveDate>,
  pub gender:            Option<String>,
  pub school:            Option<String>,
  pub grade:             Option<String>,
  pub medical_needs:     Option<String>,
  pub current_placement: Option<String>,
  pub notes:             Option<String>,
}

// ─── Parent ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parent {
  pub parent_id:    Uuid,
  pub case_id:      Uuid,
  pub name:         String,
  /// Relationship to the children, e.g. "mother", "step-father".
  pub relationship: Option<String>,
  pub address:      Option<String>,
  pub phone:        Option<String>,
  pub email:        Option<String>,
  pub employment:   Option<String>,
  /// Relevant history: prior orders, substance use, criminal record.
  pub history:      Option<String>,
  pub notes:        Option<String>,
  pub created_at:   DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ParentInput {
  pub name:         String,
  pub relationship: Option<String>,
  pub address:      Option<String>,
  pub phone:        Option<String>,
  pub email:        Option<String>,
  pub employment:   Option<String>,
  pub history:      Option<String>,
  pub notes:        Option<String>,
}

// ─── Document ────────────────────────────────────────────────────────────────

/// An uploaded file. The bytes live on disk; only metadata is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
  pub document_id:       Uuid,
  pub case_id:           Uuid,
  /// Generated on-disk name, relative to the configured upload directory.
  pub filename:          String,
  pub original_filename: String,
  /// Lower-case extension, e.g. `"pdf"`.
  pub file_type:         String,
  pub file_size:         u64,
  /// SHA-256 hex digest of the stored bytes.
  pub content_hash:      String,
  pub category:          DocumentCategory,
  pub description:       Option<String>,
  /// The date the document itself carries (order date, letter date).
  pub document_date:     Option<NaiveDate>,
  pub extracted_text:    Option<String>,
  pub ai_summary:        Option<String>,
  pub ai_analysis:       Option<serde_json::Value>,
  pub uploaded_at:       DateTime<Utc>,
}

/// Input to [`crate::store::CaseStore::add_document`].
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
  pub case_id:           Uuid,
  pub filename:          String,
  pub original_filename: String,
  pub file_type:         String,
  pub file_size:         u64,
  pub content_hash:      String,
  pub category:          DocumentCategory,
  pub description:       Option<String>,
  pub document_date:     Option<NaiveDate>,
  pub extracted_text:    Option<String>,
  pub ai_summary:        Option<String>,
  pub ai_analysis:       Option<serde_json::Value>,
}

/// The user-editable subset of a document's metadata.
#[derive(Debug, Clone, Default)]
pub struct DocumentInput {
  pub category:      DocumentCategory,
  pub description:   Option<String>,
  pub document_date: Option<NaiveDate>,
}

// ─── Incident ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
  pub incident_id:        Uuid,
  pub case_id:            Uuid,
  pub incident_date:      Option<NaiveDateTime>,
  pub incident_type:      Option<String>,
  pub severity:           Option<Severity>,
  pub description:        String,
  pub location:           Option<String>,
  pub witnesses:          Option<String>,
  pub children_involved:  Option<String>,
  pub police_called:      bool,
  pub follow_up_required: bool,
  pub follow_up_notes:    Option<String>,
  pub ai_assessment:      Option<serde_json::Value>,
  pub created_at:         DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct IncidentInput {
  pub incident_date:      Option<NaiveDateTime>,
  pub incident_type:      Option<String>,
  pub severity:           Option<Severity>,
  pub description:        String,
  pub location:           Option<String>,
  pub witnesses:          Option<String>,
  pub children_involved:  Option<String>,
  pub police_called:      bool,
  pub follow_up_required: bool,
  pub follow_up_notes:    Option<String>,
}

// ─── Deadline ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deadline {
  pub deadline_id:  Uuid,
  pub case_id:      Uuid,
  pub title:        String,
  pub due_date:     Option<NaiveDate>,
  pub description:  Option<String>,
  pub priority:     Priority,
  pub completed:    bool,
  pub completed_at: Option<DateTime<Utc>>,
  pub created_at:   DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct DeadlineInput {
  pub title:       String,
  pub due_date:    Option<NaiveDate>,
  pub description: Option<String>,
  pub priority:    Priority,
}

// ─── CaseNote ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseNote {
  pub note_id:    Uuid,
  pub case_id:    Uuid,
  pub title:      Option<String>,
  pub content:    String,
  pub note_type:  Option<String>,
  pub tags:       Vec<String>,
  pub important:  bool,
  pub follow_up:  bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NoteInput {
  pub title:     Option<String>,
  pub content:   String,
  pub note_type: Option<String>,
  pub tags:      Vec<String>,
  pub important: bool,
  pub follow_up: bool,
}
