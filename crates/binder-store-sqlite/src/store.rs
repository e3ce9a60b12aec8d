//! [`SqliteStore`], the SQLite implementation of [`CaseStore`].

use std::path::Path;

use binder_core::{
  record::{
    Case, CaseInput, CaseNote, Child, ChildInput, DEFAULT_CASE_STATUS,
    DEFAULT_CASE_TITLE, DEFAULT_CASE_TYPE, Deadline, DeadlineInput, Document,
    DocumentCategory, DocumentInput, Incident, IncidentInput, NewDocument,
    NoteInput, Parent, ParentInput, Severity,
  },
  store::CaseStore,
};
use chrono::Utc;
use rusqlite::{OptionalExtension as _, Row};
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    CASE_COLUMNS, CHILD_COLUMNS, DEADLINE_COLUMNS, DOCUMENT_COLUMNS,
    INCIDENT_COLUMNS, NOTE_COLUMNS, PARENT_COLUMNS, RawCase, RawChild,
    RawDeadline, RawDocument, RawIncident, RawNote, RawParent, encode_date,
    encode_datetime, encode_dt, encode_json, encode_tags, encode_uuid,
  },
  error::Error,
  schema::{CONNECTION_PRAGMAS, migrate},
};

type RowMapper<R> = fn(&Row<'_>) -> rusqlite::Result<R>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A case binder store backed by a single SQLite file.
///
/// Clones share the same connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and bring its schema up to date.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(CONNECTION_PRAGMAS)?;
        migrate(conn)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The schema version recorded in `PRAGMA user_version`.
  pub async fn schema_version(&self) -> Result<i64> {
    Ok(
      self
        .conn
        .call(|conn| {
          Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
        })
        .await?,
    )
  }

  /// Run a single-row query keyed by one text parameter.
  async fn fetch_optional<R: Send + 'static>(
    &self,
    sql: String,
    key: String,
    map: RowMapper<R>,
  ) -> Result<Option<R>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(conn.query_row(&sql, rusqlite::params![key], map).optional()?)
        })
        .await?,
    )
  }

  /// Run a multi-row query with positional text parameters.
  async fn fetch_all<R: Send + 'static>(
    &self,
    sql: String,
    params: Vec<Option<String>>,
    map: RowMapper<R>,
  ) -> Result<Vec<R>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(&sql)?;
          let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), map)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }
}

// ─── CaseStore impl ──────────────────────────────────────────────────────────

impl CaseStore for SqliteStore {
  type Error = Error;

  // ── Cases ─────────────────────────────────────────────────────────────────

  async fn current_case(&self) -> Result<Case> {
    let new_id = encode_uuid(Uuid::new_v4());
    let now = encode_dt(Utc::now());
    let select = format!(
      "SELECT {CASE_COLUMNS} FROM cases ORDER BY created_at, rowid LIMIT 1"
    );

    // Select-or-insert inside one transaction on the connection thread, so
    // concurrent first visits still produce a single case.
    let raw: RawCase = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let existing =
          tx.query_row(&select, [], RawCase::from_row).optional()?;
        let raw = match existing {
          Some(raw) => raw,
          None => {
            tx.execute(
              "INSERT INTO cases (case_id, title, case_type, status, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
              rusqlite::params![
                new_id,
                DEFAULT_CASE_TITLE,
                DEFAULT_CASE_TYPE,
                DEFAULT_CASE_STATUS,
                now,
              ],
            )?;
            tracing::info!(case_id = %new_id, "created default case");
            RawCase {
              case_id:     new_id,
              case_number: None,
              title:       DEFAULT_CASE_TITLE.to_owned(),
              case_type:   Some(DEFAULT_CASE_TYPE.to_owned()),
              court:       None,
              judge:       None,
              status:      DEFAULT_CASE_STATUS.to_owned(),
              filing_date: None,
              created_at:  now.clone(),
              updated_at:  now,
            }
          }
        };
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_case()
  }

  async fn get_case(&self, id: Uuid) -> Result<Option<Case>> {
    let sql = format!("SELECT {CASE_COLUMNS} FROM cases WHERE case_id = ?1");
    self
      .fetch_optional(sql, encode_uuid(id), RawCase::from_row)
      .await?
      .map(RawCase::into_case)
      .transpose()
  }

  async fn list_cases(&self) -> Result<Vec<Case>> {
    let sql = format!("SELECT {CASE_COLUMNS} FROM cases ORDER BY created_at, rowid");
    self
      .fetch_all(sql, vec![], RawCase::from_row)
      .await?
      .into_iter()
      .map(RawCase::into_case)
      .collect()
  }

  async fn update_case(&self, id: Uuid, input: CaseInput) -> Result<Option<Case>> {
    let id_str = encode_uuid(id);
    let title = input.title.unwrap_or_else(|| DEFAULT_CASE_TITLE.to_owned());
    let status = input.status.unwrap_or_else(|| DEFAULT_CASE_STATUS.to_owned());
    let filing_date = encode_date(input.filing_date);
    let now = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE cases SET
             case_number = ?2, title = ?3, case_type = ?4, court = ?5,
             judge = ?6, status = ?7, filing_date = ?8, updated_at = ?9
           WHERE case_id = ?1",
          rusqlite::params![
            id_str,
            input.case_number,
            title,
            input.case_type,
            input.court,
            input.judge,
            status,
            filing_date,
            now,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_case(id).await
  }

  async fn delete_case(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM cases WHERE case_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    if deleted > 0 {
      tracing::info!(case_id = %id, "deleted case and dependent records");
    }
    Ok(deleted > 0)
  }

  // ── Children ──────────────────────────────────────────────────────────────

  async fn add_child(&self, case_id: Uuid, input: ChildInput) -> Result<Child> {
    let child = Child {
      child_id: Uuid::new_v4(),
      case_id,
      name: input.name,
      date_of_birth: input.date_of_birth,
      gender: input.gender,
      school: input.school,
      grade: input.grade,
      medical_needs: input.medical_needs,
      current_placement: input.current_placement,
      notes: input.notes,
      created_at: Utc::now(),
    };

    let row = child.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO children (
             child_id, case_id, name, date_of_birth, gender, school, grade,
             medical_needs, current_placement, notes, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            encode_uuid(row.child_id),
            encode_uuid(row.case_id),
            row.name,
            encode_date(row.date_of_birth),
            row.gender,
            row.school,
            row.grade,
            row.medical_needs,
            row.current_placement,
            row.notes,
            encode_dt(row.created_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(child)
  }

  async fn get_child(&self, id: Uuid) -> Result<Option<Child>> {
    let sql = format!("SELECT {CHILD_COLUMNS} FROM children WHERE child_id = ?1");
    self
      .fetch_optional(sql, encode_uuid(id), RawChild::from_row)
      .await?
      .map(RawChild::into_child)
      .transpose()
  }

  async fn list_children(&self, case_id: Uuid) -> Result<Vec<Child>> {
    let sql = format!(
      "SELECT {CHILD_COLUMNS} FROM children WHERE case_id = ?1 ORDER BY created_at, rowid"
    );
    self
      .fetch_all(sql, vec![Some(encode_uuid(case_id))], RawChild::from_row)
      .await?
      .into_iter()
      .map(RawChild::into_child)
      .collect()
  }

  async fn update_child(&self, id: Uuid, input: ChildInput) -> Result<Option<Child>> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE children SET
             name = ?2, date_of_birth = ?3, gender = ?4, school = ?5, grade = ?6,
             medical_needs = ?7, current_placement = ?8, notes = ?9
           WHERE child_id = ?1",
          rusqlite::params![
            id_str,
            input.name,
            encode_date(input.date_of_birth),
            input.gender,
            input.school,
            input.grade,
            input.medical_needs,
            input.current_placement,
            input.notes,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_child(id).await
  }

  // ── Parents ───────────────────────────────────────────────────────────────

  async fn add_parent(&self, case_id: Uuid, input: ParentInput) -> Result<Parent> {
    let parent = Parent {
      parent_id: Uuid::new_v4(),
      case_id,
      name: input.name,
      relationship: input.relationship,
      address: input.address,
      phone: input.phone,
      email: input.email,
      employment: input.employment,
      history: input.history,
      notes: input.notes,
      created_at: Utc::now(),
    };

    let row = parent.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO parents (
             parent_id, case_id, name, relationship, address, phone, email,
             employment, history, notes, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            encode_uuid(row.parent_id),
            encode_uuid(row.case_id),
            row.name,
            row.relationship,
            row.address,
            row.phone,
            row.email,
            row.employment,
            row.history,
            row.notes,
            encode_dt(row.created_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(parent)
  }

  async fn get_parent(&self, id: Uuid) -> Result<Option<Parent>> {
    let sql = format!("SELECT {PARENT_COLUMNS} FROM parents WHERE parent_id = ?1");
    self
      .fetch_optional(sql, encode_uuid(id), RawParent::from_row)
      .await?
      .map(RawParent::into_parent)
      .transpose()
  }

  async fn list_parents(&self, case_id: Uuid) -> Result<Vec<Parent>> {
    let sql = format!(
      "SELECT {PARENT_COLUMNS} FROM parents WHERE case_id = ?1 ORDER BY created_at, rowid"
    );
    self
      .fetch_all(sql, vec![Some(encode_uuid(case_id))], RawParent::from_row)
      .await?
      .into_iter()
      .map(RawParent::into_parent)
      .collect()
  }

  async fn update_parent(&self, id: Uuid, input: ParentInput) -> Result<Option<Parent>> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE parents SET
             name = ?2, relationship = ?3, address = ?4, phone = ?5, email = ?6,
             employment = ?7, history = ?8, notes = ?9
           WHERE parent_id = ?1",
          rusqlite::params![
            id_str,
            input.name,
            input.relationship,
            input.address,
            input.phone,
            input.email,
            input.employment,
            input.history,
            input.notes,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_parent(id).await
  }

  // ── Documents ─────────────────────────────────────────────────────────────

  async fn add_document(&self, input: NewDocument) -> Result<Document> {
    let document = Document {
      document_id:       Uuid::new_v4(),
      case_id:           input.case_id,
      filename:          input.filename,
      original_filename: input.original_filename,
      file_type:         input.file_type,
      file_size:         input.file_size,
      content_hash:      input.content_hash,
      category:          input.category,
      description:       input.description,
      document_date:     input.document_date,
      extracted_text:    input.extracted_text,
      ai_summary:        input.ai_summary,
      ai_analysis:       input.ai_analysis,
      uploaded_at:       Utc::now(),
    };

    let file_size = i64::try_from(document.file_size)
      .map_err(|_| Error::FileTooLarge(document.file_size))?;
    let analysis = encode_json(document.ai_analysis.as_ref());
    let row = document.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (
             document_id, case_id, filename, original_filename, file_type,
             file_size, content_hash, category, description, document_date,
             extracted_text, ai_summary, ai_analysis, uploaded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
          rusqlite::params![
            encode_uuid(row.document_id),
            encode_uuid(row.case_id),
            row.filename,
            row.original_filename,
            row.file_type,
            file_size,
            row.content_hash,
            row.category.as_ref(),
            row.description,
            encode_date(row.document_date),
            row.extracted_text,
            row.ai_summary,
            analysis,
            encode_dt(row.uploaded_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(document)
  }

  async fn get_document(&self, id: Uuid) -> Result<Option<Document>> {
    let sql =
      format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE document_id = ?1");
    self
      .fetch_optional(sql, encode_uuid(id), RawDocument::from_row)
      .await?
      .map(RawDocument::into_document)
      .transpose()
  }

  async fn list_documents(
    &self,
    case_id: Uuid,
    category: Option<DocumentCategory>,
  ) -> Result<Vec<Document>> {
    let sql = format!(
      "SELECT {DOCUMENT_COLUMNS} FROM documents
       WHERE case_id = ?1 AND (?2 IS NULL OR category = ?2)
       ORDER BY uploaded_at DESC, rowid DESC"
    );
    let params = vec![
      Some(encode_uuid(case_id)),
      category.map(|c| c.as_ref().to_owned()),
    ];
    self
      .fetch_all(sql, params, RawDocument::from_row)
      .await?
      .into_iter()
      .map(RawDocument::into_document)
      .collect()
  }

  async fn update_document(
    &self,
    id: Uuid,
    input: DocumentInput,
  ) -> Result<Option<Document>> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE documents SET category = ?2, description = ?3, document_date = ?4
           WHERE document_id = ?1",
          rusqlite::params![
            id_str,
            input.category.as_ref(),
            input.description,
            encode_date(input.document_date),
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_document(id).await
  }

  async fn record_document_analysis(
    &self,
    id: Uuid,
    summary: Option<String>,
    analysis: serde_json::Value,
  ) -> Result<Option<Document>> {
    let id_str = encode_uuid(id);
    let analysis = analysis.to_string();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE documents SET ai_summary = ?2, ai_analysis = ?3 WHERE document_id = ?1",
          rusqlite::params![id_str, summary, analysis],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_document(id).await
  }

  // ── Incidents ─────────────────────────────────────────────────────────────

  async fn add_incident(&self, case_id: Uuid, input: IncidentInput) -> Result<Incident> {
    let incident = Incident {
      incident_id: Uuid::new_v4(),
      case_id,
      incident_date: input.incident_date,
      incident_type: input.incident_type,
      severity: input.severity,
      description: input.description,
      location: input.location,
      witnesses: input.witnesses,
      children_involved: input.children_involved,
      police_called: input.police_called,
      follow_up_required: input.follow_up_required,
      follow_up_notes: input.follow_up_notes,
      ai_assessment: None,
      created_at: Utc::now(),
    };

    let row = incident.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO incidents (
             incident_id, case_id, incident_date, incident_type, severity,
             description, location, witnesses, children_involved,
             police_called, follow_up_required, follow_up_notes, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          rusqlite::params![
            encode_uuid(row.incident_id),
            encode_uuid(row.case_id),
            encode_datetime(row.incident_date),
            row.incident_type,
            row.severity.map(|s| s.as_ref().to_owned()),
            row.description,
            row.location,
            row.witnesses,
            row.children_involved,
            row.police_called,
            row.follow_up_required,
            row.follow_up_notes,
            encode_dt(row.created_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(incident)
  }

  async fn get_incident(&self, id: Uuid) -> Result<Option<Incident>> {
    let sql =
      format!("SELECT {INCIDENT_COLUMNS} FROM incidents WHERE incident_id = ?1");
    self
      .fetch_optional(sql, encode_uuid(id), RawIncident::from_row)
      .await?
      .map(RawIncident::into_incident)
      .transpose()
  }

  async fn list_incidents(
    &self,
    case_id: Uuid,
    incident_type: Option<String>,
  ) -> Result<Vec<Incident>> {
    let sql = format!(
      "SELECT {INCIDENT_COLUMNS} FROM incidents
       WHERE case_id = ?1 AND (?2 IS NULL OR incident_type = ?2)
       ORDER BY incident_date IS NULL, incident_date DESC, created_at DESC"
    );
    self
      .fetch_all(
        sql,
        vec![Some(encode_uuid(case_id)), incident_type],
        RawIncident::from_row,
      )
      .await?
      .into_iter()
      .map(RawIncident::into_incident)
      .collect()
  }

  async fn update_incident(
    &self,
    id: Uuid,
    input: IncidentInput,
  ) -> Result<Option<Incident>> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE incidents SET
             incident_date = ?2, incident_type = ?3, severity = ?4,
             description = ?5, location = ?6, witnesses = ?7,
             children_involved = ?8, police_called = ?9,
             follow_up_required = ?10, follow_up_notes = ?11
           WHERE incident_id = ?1",
          rusqlite::params![
            id_str,
            encode_datetime(input.incident_date),
            input.incident_type,
            input.severity.map(|s| s.as_ref().to_owned()),
            input.description,
            input.location,
            input.witnesses,
            input.children_involved,
            input.police_called,
            input.follow_up_required,
            input.follow_up_notes,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_incident(id).await
  }

  async fn record_incident_assessment(
    &self,
    id: Uuid,
    severity: Option<Severity>,
    assessment: serde_json::Value,
  ) -> Result<Option<Incident>> {
    let id_str = encode_uuid(id);
    let severity = severity.map(|s| s.as_ref().to_owned());
    let assessment = assessment.to_string();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE incidents SET severity = COALESCE(?2, severity), ai_assessment = ?3
           WHERE incident_id = ?1",
          rusqlite::params![id_str, severity, assessment],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_incident(id).await
  }

  // ── Deadlines ─────────────────────────────────────────────────────────────

  async fn add_deadline(&self, case_id: Uuid, input: DeadlineInput) -> Result<Deadline> {
    let deadline = Deadline {
      deadline_id: Uuid::new_v4(),
      case_id,
      title: input.title,
      due_date: input.due_date,
      description: input.description,
      priority: input.priority,
      completed: false,
      completed_at: None,
      created_at: Utc::now(),
    };

    let row = deadline.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO deadlines (
             deadline_id, case_id, title, due_date, description, priority,
             completed, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
          rusqlite::params![
            encode_uuid(row.deadline_id),
            encode_uuid(row.case_id),
            row.title,
            encode_date(row.due_date),
            row.description,
            row.priority.as_ref(),
            encode_dt(row.created_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(deadline)
  }

  async fn get_deadline(&self, id: Uuid) -> Result<Option<Deadline>> {
    let sql =
      format!("SELECT {DEADLINE_COLUMNS} FROM deadlines WHERE deadline_id = ?1");
    self
      .fetch_optional(sql, encode_uuid(id), RawDeadline::from_row)
      .await?
      .map(RawDeadline::into_deadline)
      .transpose()
  }

  async fn list_deadlines(&self, case_id: Uuid) -> Result<Vec<Deadline>> {
    let sql = format!(
      "SELECT {DEADLINE_COLUMNS} FROM deadlines WHERE case_id = ?1
       ORDER BY due_date IS NULL, due_date, created_at"
    );
    self
      .fetch_all(sql, vec![Some(encode_uuid(case_id))], RawDeadline::from_row)
      .await?
      .into_iter()
      .map(RawDeadline::into_deadline)
      .collect()
  }

  async fn update_deadline(
    &self,
    id: Uuid,
    input: DeadlineInput,
  ) -> Result<Option<Deadline>> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE deadlines SET title = ?2, due_date = ?3, description = ?4, priority = ?5
           WHERE deadline_id = ?1",
          rusqlite::params![
            id_str,
            input.title,
            encode_date(input.due_date),
            input.description,
            input.priority.as_ref(),
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_deadline(id).await
  }

  async fn set_deadline_completed(
    &self,
    id: Uuid,
    completed: bool,
  ) -> Result<Option<Deadline>> {
    let id_str = encode_uuid(id);
    let completed_at = completed.then(|| encode_dt(Utc::now()));
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE deadlines SET completed = ?2, completed_at = ?3 WHERE deadline_id = ?1",
          rusqlite::params![id_str, completed, completed_at],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_deadline(id).await
  }

  // ── Notes ─────────────────────────────────────────────────────────────────

  async fn add_note(&self, case_id: Uuid, input: NoteInput) -> Result<CaseNote> {
    let now = Utc::now();
    let note = CaseNote {
      note_id: Uuid::new_v4(),
      case_id,
      title: input.title,
      content: input.content,
      note_type: input.note_type,
      tags: input.tags,
      important: input.important,
      follow_up: input.follow_up,
      created_at: now,
      updated_at: now,
    };

    let tags = encode_tags(&note.tags)?;
    let row = note.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO case_notes (
             note_id, case_id, title, content, note_type, tags, important,
             follow_up, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
          rusqlite::params![
            encode_uuid(row.note_id),
            encode_uuid(row.case_id),
            row.title,
            row.content,
            row.note_type,
            tags,
            row.important,
            row.follow_up,
            encode_dt(row.created_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(note)
  }

  async fn get_note(&self, id: Uuid) -> Result<Option<CaseNote>> {
    let sql = format!("SELECT {NOTE_COLUMNS} FROM case_notes WHERE note_id = ?1");
    self
      .fetch_optional(sql, encode_uuid(id), RawNote::from_row)
      .await?
      .map(RawNote::into_note)
      .transpose()
  }

  async fn list_notes(&self, case_id: Uuid, tag: Option<String>) -> Result<Vec<CaseNote>> {
    let sql = format!(
      "SELECT {NOTE_COLUMNS} FROM case_notes
       WHERE case_id = ?1
         AND (?2 IS NULL OR EXISTS (
           SELECT 1 FROM json_each(case_notes.tags) WHERE json_each.value = ?2
         ))
       ORDER BY created_at DESC, rowid DESC"
    );
    self
      .fetch_all(sql, vec![Some(encode_uuid(case_id)), tag], RawNote::from_row)
      .await?
      .into_iter()
      .map(RawNote::into_note)
      .collect()
  }

  async fn update_note(&self, id: Uuid, input: NoteInput) -> Result<Option<CaseNote>> {
    let id_str = encode_uuid(id);
    let tags = encode_tags(&input.tags)?;
    let now = encode_dt(Utc::now());
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE case_notes SET
             title = ?2, content = ?3, note_type = ?4, tags = ?5,
             important = ?6, follow_up = ?7, updated_at = ?8
           WHERE note_id = ?1",
          rusqlite::params![
            id_str,
            input.title,
            input.content,
            input.note_type,
            tags,
            input.important,
            input.follow_up,
            now,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_note(id).await
  }
}
