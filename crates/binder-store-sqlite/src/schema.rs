//! SQL schema for the binder SQLite store.
//!
//! The schema is an ordered list of migrations. `PRAGMA user_version` records
//! how many have been applied; [`migrate`] applies the rest, each in its own
//! transaction. Never edit a released migration, append a new one.

use rusqlite::Connection;

/// Per-connection settings, executed on every open.
pub const CONNECTION_PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

const V1_TABLES: &str = "
CREATE TABLE cases (
    case_id      TEXT PRIMARY KEY,
    case_number  TEXT,             -- deliberately not UNIQUE; every case field is optional
    title        TEXT NOT NULL,
    case_type    TEXT,
    court        TEXT,
    judge        TEXT,
    status       TEXT NOT NULL DEFAULT 'Open',
    filing_date  TEXT,             -- YYYY-MM-DD
    created_at   TEXT NOT NULL,    -- RFC 3339 UTC
    updated_at   TEXT NOT NULL
);

CREATE TABLE children (
    child_id          TEXT PRIMARY KEY,
    case_id           TEXT NOT NULL REFERENCES cases(case_id) ON DELETE CASCADE,
    name              TEXT NOT NULL,
    date_of_birth     TEXT,
    gender            TEXT,
    school            TEXT,
    grade             TEXT,
    medical_needs     TEXT,
    current_placement TEXT,
    notes             TEXT,
    created_at        TEXT NOT NULL
);

CREATE TABLE parents (
    parent_id    TEXT PRIMARY KEY,
    case_id      TEXT NOT NULL REFERENCES cases(case_id) ON DELETE CASCADE,
    name         TEXT NOT NULL,
    relationship TEXT,
    address      TEXT,
    phone        TEXT,
    email        TEXT,
    employment   TEXT,
    history      TEXT,
    notes        TEXT,
    created_at   TEXT NOT NULL
);

CREATE TABLE documents (
    document_id       TEXT PRIMARY KEY,
    case_id           TEXT NOT NULL REFERENCES cases(case_id) ON DELETE CASCADE,
    filename          TEXT NOT NULL,   -- generated name inside the upload dir
    original_filename TEXT NOT NULL,
    file_type         TEXT NOT NULL,
    file_size         INTEGER NOT NULL,
    content_hash      TEXT NOT NULL,   -- SHA-256 hex
    category          TEXT NOT NULL DEFAULT 'other',
    description       TEXT,
    document_date     TEXT,
    extracted_text    TEXT,
    ai_summary        TEXT,
    ai_analysis       TEXT,            -- JSON
    uploaded_at       TEXT NOT NULL
);

CREATE TABLE incidents (
    incident_id        TEXT PRIMARY KEY,
    case_id            TEXT NOT NULL REFERENCES cases(case_id) ON DELETE CASCADE,
    incident_date      TEXT,           -- YYYY-MM-DDTHH:MM:SS
    incident_type      TEXT,
    severity           TEXT,
    description        TEXT NOT NULL,
    location           TEXT,
    witnesses          TEXT,
    children_involved  TEXT,
    police_called      INTEGER NOT NULL DEFAULT 0,
    follow_up_required INTEGER NOT NULL DEFAULT 0,
    follow_up_notes    TEXT,
    ai_assessment      TEXT,           -- JSON
    created_at         TEXT NOT NULL
);

CREATE TABLE deadlines (
    deadline_id  TEXT PRIMARY KEY,
    case_id      TEXT NOT NULL REFERENCES cases(case_id) ON DELETE CASCADE,
    title        TEXT NOT NULL,
    due_date     TEXT,
    description  TEXT,
    priority     TEXT NOT NULL DEFAULT 'medium',
    completed    INTEGER NOT NULL DEFAULT 0,
    completed_at TEXT,
    created_at   TEXT NOT NULL
);

CREATE TABLE case_notes (
    note_id    TEXT PRIMARY KEY,
    case_id    TEXT NOT NULL REFERENCES cases(case_id) ON DELETE CASCADE,
    title      TEXT,
    content    TEXT NOT NULL,
    note_type  TEXT,
    tags       TEXT NOT NULL DEFAULT '[]',
    important  INTEGER NOT NULL DEFAULT 0,
    follow_up  INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

const V2_INDEXES: &str = "
CREATE INDEX children_case_idx   ON children(case_id);
CREATE INDEX parents_case_idx    ON parents(case_id);
CREATE INDEX documents_case_idx  ON documents(case_id, category);
CREATE INDEX incidents_case_idx  ON incidents(case_id, incident_date);
CREATE INDEX deadlines_case_idx  ON deadlines(case_id, due_date);
CREATE INDEX case_notes_case_idx ON case_notes(case_id);
";

/// Ordered migrations; index `i` brings the schema to version `i + 1`.
pub const MIGRATIONS: &[&str] = &[V1_TABLES, V2_INDEXES];

/// Apply every migration newer than the database's `user_version`.
pub fn migrate(conn: &mut Connection) -> rusqlite::Result<usize> {
  let current: i64 =
    conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
  let current = usize::try_from(current).unwrap_or(0);

  let mut applied = 0;
  for (index, sql) in MIGRATIONS.iter().enumerate().skip(current) {
    let version = index + 1;
    let tx = conn.transaction()?;
    tx.execute_batch(sql)?;
    tx.pragma_update(None, "user_version", version as i64)?;
    tx.commit()?;
    tracing::info!(version, "applied schema migration");
    applied += 1;
  }
  Ok(applied)
}
