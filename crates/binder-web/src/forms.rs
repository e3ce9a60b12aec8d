//! Typed HTML form submissions and their conversion into store inputs.
//!
//! Every field arrives as an optional string so a submission never fails to
//! deserialise. Conversion applies the lenient parsers from
//! [`binder_core::parse`]: blank text is `None`, unparseable dates are
//! `None`, unknown choices fall back to defaults. Only missing required text
//! is an error.

use binder_core::{
  parse,
  record::{
    CaseInput, ChildInput, DeadlineInput, DocumentInput, IncidentInput,
    NoteInput, ParentInput,
  },
};
use serde::Deserialize;

use crate::Result;

#[derive(Debug, Default, Deserialize)]
pub struct CaseForm {
  pub case_number: Option<String>,
  pub title:       Option<String>,
  pub case_type:   Option<String>,
  pub court:       Option<String>,
  pub judge:       Option<String>,
  pub status:      Option<String>,
  pub filing_date: Option<String>,
}

impl CaseForm {
  pub fn into_input(self) -> CaseInput {
    CaseInput {
      filing_date: parse::date(self.filing_date.as_deref()),
      case_number: parse::text(self.case_number),
      title:       parse::text(self.title),
      case_type:   parse::text(self.case_type),
      court:       parse::text(self.court),
      judge:       parse::text(self.judge),
      status:      parse::text(self.status),
    }
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChildForm {
  pub name:              Option<String>,
  pub date_of_birth:     Option<String>,
  pub gender:            Option<String>,
  pub school:            Option<String>,
  pub grade:             Option<String>,
  pub medical_needs:     Option<String>,
  pub current_placement: Option<String>,
  pub notes:             Option<String>,
}

impl ChildForm {
  pub fn into_input(self) -> Result<ChildInput> {
    Ok(ChildInput {
      date_of_birth:     parse::date(self.date_of_birth.as_deref()),
      name:              parse::required(self.name, "name")?,
      gender:            parse::text(self.gender),
      school:            parse::text(self.school),
      grade:             parse::text(self.grade),
      medical_needs:     parse::text(self.medical_needs),
      current_placement: parse::text(self.current_placement),
      notes:             parse::text(self.notes),
    })
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct ParentForm {
  pub name:         Option<String>,
  pub relationship: Option<String>,
  pub address:      Option<String>,
  pub phone:        Option<String>,
  pub email:        Option<String>,
  pub employment:   Option<String>,
  pub history:      Option<String>,
  pub notes:        Option<String>,
}

impl ParentForm {
  pub fn into_input(self) -> Result<ParentInput> {
    Ok(ParentInput {
      name:         parse::required(self.name, "name")?,
      relationship: parse::text(self.relationship),
      address:      parse::text(self.address),
      phone:        parse::text(self.phone),
      email:        parse::text(self.email),
      employment:   parse::text(self.employment),
      history:      parse::text(self.history),
      notes:        parse::text(self.notes),
    })
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentForm {
  pub category:      Option<String>,
  pub description:   Option<String>,
  pub document_date: Option<String>,
}

impl DocumentForm {
  pub fn into_input(self) -> DocumentInput {
    DocumentInput {
      category:      parse::category(self.category.as_deref()),
      document_date: parse::date(self.document_date.as_deref()),
      description:   parse::text(self.description),
    }
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct IncidentForm {
  pub incident_date:      Option<String>,
  pub incident_type:      Option<String>,
  pub severity:           Option<String>,
  pub description:        Option<String>,
  pub location:           Option<String>,
  pub witnesses:          Option<String>,
  pub children_involved:  Option<String>,
  pub police_called:      Option<String>,
  pub follow_up_required: Option<String>,
  pub follow_up_notes:    Option<String>,
  /// Ask the model to assess the incident after saving.
  pub ai_assess:          Option<String>,
}

impl IncidentForm {
  /// The input plus whether a model assessment was requested.
  pub fn into_input(self) -> Result<(IncidentInput, bool)> {
    let assess = parse::flag(self.ai_assess.as_deref());
    let input = IncidentInput {
      incident_date:      parse::datetime(self.incident_date.as_deref()),
      severity:           parse::severity(self.severity.as_deref()),
      police_called:      parse::flag(self.police_called.as_deref()),
      follow_up_required: parse::flag(self.follow_up_required.as_deref()),
      description:        parse::required(self.description, "description")?,
      incident_type:      parse::text(self.incident_type),
      location:           parse::text(self.location),
      witnesses:          parse::text(self.witnesses),
      children_involved:  parse::text(self.children_involved),
      follow_up_notes:    parse::text(self.follow_up_notes),
    };
    Ok((input, assess))
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeadlineForm {
  pub title:       Option<String>,
  pub due_date:    Option<String>,
  pub description: Option<String>,
  pub priority:    Option<String>,
}

impl DeadlineForm {
  pub fn into_input(self) -> Result<DeadlineInput> {
    Ok(DeadlineInput {
      due_date:    parse::date(self.due_date.as_deref()),
      priority:    parse::priority(self.priority.as_deref()),
      title:       parse::required(self.title, "title")?,
      description: parse::text(self.description),
    })
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct NoteForm {
  pub title:     Option<String>,
  pub content:   Option<String>,
  pub note_type: Option<String>,
  pub tags:      Option<String>,
  pub important: Option<String>,
  pub follow_up: Option<String>,
}

impl NoteForm {
  pub fn into_input(self) -> Result<NoteInput> {
    Ok(NoteInput {
      tags:      parse::tags(self.tags.as_deref()),
      important: parse::flag(self.important.as_deref()),
      follow_up: parse::flag(self.follow_up.as_deref()),
      content:   parse::required(self.content, "content")?,
      title:     parse::text(self.title),
      note_type: parse::text(self.note_type),
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::Error;

  #[test]
  fn unparseable_dates_become_none() {
    let input = ChildForm {
      name: Some("Ava".into()),
      date_of_birth: Some("not-a-date".into()),
      ..Default::default()
    }
    .into_input()
    .unwrap();
    assert_eq!(input.date_of_birth, None);

    let input = CaseForm {
      filing_date: Some("2024-02-30".into()),
      ..Default::default()
    }
    .into_input();
    assert_eq!(input.filing_date, None);
  }

  #[test]
  fn blank_required_text_is_rejected() {
    let err = NoteForm { content: Some("   ".into()), ..Default::default() }
      .into_input()
      .unwrap_err();
    assert!(matches!(err, Error::Form(_)));
  }

  #[test]
  fn incident_checkboxes_and_assessment_flag() {
    let (input, assess) = IncidentForm {
      description: Some("Late return".into()),
      incident_date: Some("2024-03-09T18:45".into()),
      police_called: Some("on".into()),
      severity: Some("extreme".into()),
      ai_assess: Some("on".into()),
      ..Default::default()
    }
    .into_input()
    .unwrap();

    assert!(assess);
    assert!(input.police_called);
    assert!(!input.follow_up_required);
    assert_eq!(input.severity, None);
    assert_eq!(
      input.incident_date,
      NaiveDate::from_ymd_opt(2024, 3, 9).and_then(|d| d.and_hms_opt(18, 45, 0))
    );
  }

  #[test]
  fn note_tags_are_split_and_trimmed() {
    let input = NoteForm {
      content: Some("Met with counsellor".into()),
      tags: Some(" school, ,counsellor ".into()),
      ..Default::default()
    }
    .into_input()
    .unwrap();
    assert_eq!(input.tags, vec!["school", "counsellor"]);
  }
}
