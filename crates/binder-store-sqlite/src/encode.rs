//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Instants are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`,
//! date-times as `YYYY-MM-DDTHH:MM:SS`. Enums use their snake_case names.
//! Tags and model payloads are compact JSON. UUIDs are hyphenated lowercase.

use binder_core::record::{
  Case, CaseNote, Child, Deadline, Document, DocumentCategory, Incident, Parent,
  Priority, Severity,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

// ─── NaiveDate / NaiveDateTime ───────────────────────────────────────────────

pub fn encode_date(d: Option<NaiveDate>) -> Option<String> {
  d.map(|d| d.format("%Y-%m-%d").to_string())
}

fn decode_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.map(|s| {
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
      .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
  })
  .transpose()
}

pub fn encode_datetime(d: Option<NaiveDateTime>) -> Option<String> {
  d.map(|d| d.format(DATETIME_FORMAT).to_string())
}

fn decode_datetime(s: Option<String>) -> Result<Option<NaiveDateTime>> {
  s.map(|s| {
    NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT)
      .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
  })
  .transpose()
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_tags(tags: &[String]) -> Result<String> {
  Ok(serde_json::to_string(tags)?)
}

fn decode_tags(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

pub fn encode_json(value: Option<&serde_json::Value>) -> Option<String> {
  value.map(serde_json::Value::to_string)
}

fn decode_json(s: Option<String>) -> Result<Option<serde_json::Value>> {
  Ok(
    s.as_deref()
      .map(serde_json::from_str::<serde_json::Value>)
      .transpose()?,
  )
}

// ─── Row types ───────────────────────────────────────────────────────────────
//
// Each `Raw*` struct holds the column values exactly as read. `from_row`
// expects the column order of the matching `*_COLUMNS` constant.

pub const CASE_COLUMNS: &str = "case_id, case_number, title, case_type, court, judge, \
   status, filing_date, created_at, updated_at";

pub struct RawCase {
  pub case_id:     String,
  pub case_number: Option<String>,
  pub title:       String,
  pub case_type:   Option<String>,
  pub court:       Option<String>,
  pub judge:       Option<String>,
  pub status:      String,
  pub filing_date: Option<String>,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawCase {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      case_id:     row.get(0)?,
      case_number: row.get(1)?,
      title:       row.get(2)?,
      case_type:   row.get(3)?,
      court:       row.get(4)?,
      judge:       row.get(5)?,
      status:      row.get(6)?,
      filing_date: row.get(7)?,
      created_at:  row.get(8)?,
      updated_at:  row.get(9)?,
    })
  }

  pub fn into_case(self) -> Result<Case> {
    Ok(Case {
      case_id:     decode_uuid(&self.case_id)?,
      case_number: self.case_number,
      title:       self.title,
      case_type:   self.case_type,
      court:       self.court,
      judge:       self.judge,
      status:      self.status,
      filing_date: decode_date(self.filing_date)?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

pub const CHILD_COLUMNS: &str = "child_id, case_id, name, date_of_birth, gender, school, \
   grade, medical_needs, current_placement, notes, created_at";

pub struct RawChild {
  pub child_id:          String,
  pub case_id:           String,
  pub name:              String,
  pub date_of_birth:     Option<String>,
  pub gender:            Option<String>,
  pub school:            Option<String>,
  pub grade:             Option<String>,
  pub medical_needs:     Option<String>,
  pub current_placement: Option<String>,
  pub notes:             Option<String>,
  pub created_at:        String,
}

impl RawChild {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      child_id:          row.get(0)?,
      case_id:           row.get(1)?,
      name:              row.get(2)?,
      date_of_birth:     row.get(3)?,
      gender:            row.get(4)?,
      school:            row.get(5)?,
      grade:             row.get(6)?,
      medical_needs:     row.get(7)?,
      current_placement: row.get(8)?,
      notes:             row.get(9)?,
      created_at:        row.get(10)?,
    })
  }

  pub fn into_child(self) -> Result<Child> {
    Ok(Child {
      child_id:          decode_uuid(&self.child_id)?,
      case_id:           decode_uuid(&self.case_id)?,
      name:              self.name,
      date_of_birth:     decode_date(self.date_of_birth)?,
      gender:            self.gender,
      school:            self.school,
      grade:             self.grade,
      medical_needs:     self.medical_needs,
      current_placement: self.current_placement,
      notes:             self.notes,
      created_at:        decode_dt(&self.created_at)?,
    })
  }
}

pub const PARENT_COLUMNS: &str = "parent_id, case_id, name, relationship, address, phone, \
   email, employment, history, notes, created_at";

pub struct RawParent {
  pub parent_id:    String,
  pub case_id:      String,
  pub name:         String,
  pub relationship: Option<String>,
  pub address:      Option<String>,
  pub phone:        Option<String>,
  pub email:        Option<String>,
  pub employment:   Option<String>,
  pub history:      Option<String>,
  pub notes:        Option<String>,
  pub created_at:   String,
}

impl RawParent {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      parent_id:    row.get(0)?,
      case_id:      row.get(1)?,
      name:         row.get(2)?,
      relationship: row.get(3)?,
      address:      row.get(4)?,
      phone:        row.get(5)?,
      email:        row.get(6)?,
      employment:   row.get(7)?,
      history:      row.get(8)?,
      notes:        row.get(9)?,
      created_at:   row.get(10)?,
    })
  }

  pub fn into_parent(self) -> Result<Parent> {
    Ok(Parent {
      parent_id:    decode_uuid(&self.parent_id)?,
      case_id:      decode_uuid(&self.case_id)?,
      name:         self.name,
      relationship: self.relationship,
      address:      self.address,
      phone:        self.phone,
      email:        self.email,
      employment:   self.employment,
      history:      self.history,
      notes:        self.notes,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

pub const DOCUMENT_COLUMNS: &str = "document_id, case_id, filename, original_filename, \
   file_type, file_size, content_hash, category, description, document_date, \
   extracted_text, ai_summary, ai_analysis, uploaded_at";

pub struct RawDocument {
  pub document_id:       String,
  pub case_id:           String,
  pub filename:          String,
  pub original_filename: String,
  pub file_type:         String,
  pub file_size:         i64,
  pub content_hash:      String,
  pub category:          String,
  pub description:       Option<String>,
  pub document_date:     Option<String>,
  pub extracted_text:    Option<String>,
  pub ai_summary:        Option<String>,
  pub ai_analysis:       Option<String>,
  pub uploaded_at:       String,
}

impl RawDocument {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      document_id:       row.get(0)?,
      case_id:           row.get(1)?,
      filename:          row.get(2)?,
      original_filename: row.get(3)?,
      file_type:         row.get(4)?,
      file_size:         row.get(5)?,
      content_hash:      row.get(6)?,
      category:          row.get(7)?,
      description:       row.get(8)?,
      document_date:     row.get(9)?,
      extracted_text:    row.get(10)?,
      ai_summary:        row.get(11)?,
      ai_analysis:       row.get(12)?,
      uploaded_at:       row.get(13)?,
    })
  }

  pub fn into_document(self) -> Result<Document> {
    Ok(Document {
      document_id:       decode_uuid(&self.document_id)?,
      case_id:           decode_uuid(&self.case_id)?,
      filename:          self.filename,
      original_filename: self.original_filename,
      file_type:         self.file_type,
      file_size:         u64::try_from(self.file_size)
        .map_err(|_| Error::StoredFileSize(self.file_size))?,
      content_hash:      self.content_hash,
      category:          DocumentCategory::parse_stored(&self.category)?,
      description:       self.description,
      document_date:     decode_date(self.document_date)?,
      extracted_text:    self.extracted_text,
      ai_summary:        self.ai_summary,
      ai_analysis:       decode_json(self.ai_analysis)?,
      uploaded_at:       decode_dt(&self.uploaded_at)?,
    })
  }
}

pub const INCIDENT_COLUMNS: &str = "incident_id, case_id, incident_date, incident_type, \
   severity, description, location, witnesses, children_involved, police_called, \
   follow_up_required, follow_up_notes, ai_assessment, created_at";

pub struct RawIncident {
  pub incident_id:        String,
  pub case_id:            String,
  pub incident_date:      Option<String>,
  pub incident_type:      Option<String>,
  pub severity:           Option<String>,
  pub description:        String,
  pub location:           Option<String>,
  pub witnesses:          Option<String>,
  pub children_involved:  Option<String>,
  pub police_called:      bool,
  pub follow_up_required: bool,
  pub follow_up_notes:    Option<String>,
  pub ai_assessment:      Option<String>,
  pub created_at:         String,
}

impl RawIncident {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      incident_id:        row.get(0)?,
      case_id:            row.get(1)?,
      incident_date:      row.get(2)?,
      incident_type:      row.get(3)?,
      severity:           row.get(4)?,
      description:        row.get(5)?,
      location:           row.get(6)?,
      witnesses:          row.get(7)?,
      children_involved:  row.get(8)?,
      police_called:      row.get(9)?,
      follow_up_required: row.get(10)?,
      follow_up_notes:    row.get(11)?,
      ai_assessment:      row.get(12)?,
      created_at:         row.get(13)?,
    })
  }

  pub fn into_incident(self) -> Result<Incident> {
    Ok(Incident {
      incident_id:        decode_uuid(&self.incident_id)?,
      case_id:            decode_uuid(&self.case_id)?,
      incident_date:      decode_datetime(self.incident_date)?,
      incident_type:      self.incident_type,
      severity:           self
        .severity
        .as_deref()
        .map(Severity::parse_stored)
        .transpose()?,
      description:        self.description,
      location:           self.location,
      witnesses:          self.witnesses,
      children_involved:  self.children_involved,
      police_called:      self.police_called,
      follow_up_required: self.follow_up_required,
      follow_up_notes:    self.follow_up_notes,
      ai_assessment:      decode_json(self.ai_assessment)?,
      created_at:         decode_dt(&self.created_at)?,
    })
  }
}

pub const DEADLINE_COLUMNS: &str = "deadline_id, case_id, title, due_date, description, \
   priority, completed, completed_at, created_at";

pub struct RawDeadline {
  pub deadline_id:  String,
  pub case_id:      String,
  pub title:        String,
  pub due_date:     Option<String>,
  pub description:  Option<String>,
  pub priority:     String,
  pub completed:    bool,
  pub completed_at: Option<String>,
  pub created_at:   String,
}

impl RawDeadline {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      deadline_id:  row.get(0)?,
      case_id:      row.get(1)?,
      title:        row.get(2)?,
      due_date:     row.get(3)?,
      description:  row.get(4)?,
      priority:     row.get(5)?,
      completed:    row.get(6)?,
      completed_at: row.get(7)?,
      created_at:   row.get(8)?,
    })
  }

  pub fn into_deadline(self) -> Result<Deadline> {
    Ok(Deadline {
      deadline_id:  decode_uuid(&self.deadline_id)?,
      case_id:      decode_uuid(&self.case_id)?,
      title:        self.title,
      due_date:     decode_date(self.due_date)?,
      description:  self.description,
      priority:     Priority::parse_stored(&self.priority)?,
      completed:    self.completed,
      completed_at: decode_opt_dt(self.completed_at)?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

pub const NOTE_COLUMNS: &str = "note_id, case_id, title, content, note_type, tags, \
   important, follow_up, created_at, updated_at";

pub struct RawNote {
  pub note_id:    String,
  pub case_id:    String,
  pub title:      Option<String>,
  pub content:    String,
  pub note_type:  Option<String>,
  pub tags:       String,
  pub important:  bool,
  pub follow_up:  bool,
  pub created_at: String,
  pub updated_at: String,
}

impl RawNote {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      note_id:    row.get(0)?,
      case_id:    row.get(1)?,
      title:      row.get(2)?,
      content:    row.get(3)?,
      note_type:  row.get(4)?,
      tags:       row.get(5)?,
      important:  row.get(6)?,
      follow_up:  row.get(7)?,
      created_at: row.get(8)?,
      updated_at: row.get(9)?,
    })
  }

  pub fn into_note(self) -> Result<CaseNote> {
    Ok(CaseNote {
      note_id:    decode_uuid(&self.note_id)?,
      case_id:    decode_uuid(&self.case_id)?,
      title:      self.title,
      content:    self.content,
      note_type:  self.note_type,
      tags:       decode_tags(&self.tags)?,
      important:  self.important,
      follow_up:  self.follow_up,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
