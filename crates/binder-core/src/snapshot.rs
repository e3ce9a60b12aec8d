//! A serialisable view of everything recorded for one case, used as the
//! input to whole-case summaries.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
  record::{Case, CaseNote, Child, Deadline, DocumentCategory, Incident, Parent},
  store::CaseStore,
};

/// Document metadata without the extracted text, which can be large.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentDigest {
  pub original_filename: String,
  pub category:          DocumentCategory,
  pub document_date:     Option<NaiveDate>,
  pub description:       Option<String>,
  pub ai_summary:        Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseSnapshot {
  pub case:      Case,
  pub children:  Vec<Child>,
  pub parents:   Vec<Parent>,
  pub documents: Vec<DocumentDigest>,
  pub incidents: Vec<Incident>,
  pub deadlines: Vec<Deadline>,
  pub notes:     Vec<CaseNote>,
}

impl CaseSnapshot {
  /// Load every record belonging to `case` from `store`.
  pub async fn load<S: CaseStore>(store: &S, case: Case) -> Result<Self, S::Error> {
    let id = case.case_id;
    let documents = store
      .list_documents(id, None)
      .await?
      .into_iter()
      .map(|d| DocumentDigest {
        original_filename: d.original_filename,
        category:          d.category,
        document_date:     d.document_date,
        description:       d.description,
        ai_summary:        d.ai_summary,
      })
      .collect();

    Ok(Self {
      children: store.list_children(id).await?,
      parents: store.list_parents(id).await?,
      documents,
      incidents: store.list_incidents(id, None).await?,
      deadlines: store.list_deadlines(id).await?,
      notes: store.list_notes(id, None).await?,
      case,
    })
  }
}
