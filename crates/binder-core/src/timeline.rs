//! The case timeline: incidents, deadlines, and dated documents merged into
//! one sequence, newest first.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{Deadline, Document, Incident};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
  Incident,
  Deadline,
  Document,
}

/// One entry on the timeline. `record_id` points back at the source row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
  pub kind:      EventKind,
  pub record_id: Uuid,
  pub date:      NaiveDateTime,
  pub title:     String,
  pub detail:    Option<String>,
}

/// Merge the three record streams. Records without a date are left out.
///
/// Sorting is stable, so events sharing a date keep the order incidents,
/// deadlines, documents.
pub fn build_timeline(
  incidents: &[Incident],
  deadlines: &[Deadline],
  documents: &[Document],
) -> Vec<TimelineEvent> {
  let incident_events = incidents.iter().filter_map(|i| {
    Some(TimelineEvent {
      kind:      EventKind::Incident,
      record_id: i.incident_id,
      date:      i.incident_date?,
      title:     i
        .incident_type
        .clone()
        .unwrap_or_else(|| "Incident".to_owned()),
      detail:    Some(i.description.clone()),
    })
  });

  let deadline_events = deadlines.iter().filter_map(|d| {
    Some(TimelineEvent {
      kind:      EventKind::Deadline,
      record_id: d.deadline_id,
      date:      d.due_date?.and_hms_opt(0, 0, 0)?,
      title:     d.title.clone(),
      detail:    d.description.clone(),
    })
  });

  let document_events = documents.iter().filter_map(|doc| {
    Some(TimelineEvent {
      kind:      EventKind::Document,
      record_id: doc.document_id,
      date:      doc.document_date?.and_hms_opt(0, 0, 0)?,
      title:     doc.original_filename.clone(),
      detail:    doc.description.clone().or_else(|| doc.ai_summary.clone()),
    })
  });

  let mut events: Vec<TimelineEvent> = incident_events
    .chain(deadline_events)
    .chain(document_events)
    .collect();
  events.sort_by(|a, b| b.date.cmp(&a.date));
  events
}
