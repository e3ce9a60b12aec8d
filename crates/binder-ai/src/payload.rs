//! Reply shapes for each model operation, and their fallback values.
//!
//! Every field defaults to empty so a reply that omits keys still parses.

use binder_core::record::Severity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentAnalysis {
  pub summary:            String,
  pub key_points:         Vec<String>,
  pub important_dates:    Vec<String>,
  pub obligations:        Vec<String>,
  pub restrictions:       Vec<String>,
  pub children_related:   Vec<String>,
  pub suggested_category: String,
  pub action_items:       Vec<String>,
  pub red_flags:          Vec<String>,
}

impl DocumentAnalysis {
  pub fn fallback() -> Self {
    Self {
      summary: "Document analysis failed".to_owned(),
      suggested_category: "other".to_owned(),
      ..Default::default()
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseSummary {
  pub executive_summary:       String,
  pub children_best_interests: String,
  pub key_strengths:           Vec<String>,
  pub areas_of_concern:        Vec<String>,
  pub recommended_actions:     Vec<String>,
  pub documentation_gaps:      Vec<String>,
  pub legal_considerations:    Vec<String>,
}

impl CaseSummary {
  pub fn fallback() -> Self {
    Self {
      executive_summary: "Case summary generation failed".to_owned(),
      children_best_interests: "Unable to analyze at this time".to_owned(),
      ..Default::default()
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentAssessment {
  /// One of `low`, `medium`, `high`, `critical` when the model complies.
  pub severity_assessment:   String,
  pub legal_implications:    String,
  pub recommended_actions:   Vec<String>,
  pub documentation_needs:   Vec<String>,
  pub follow_up_suggestions: Vec<String>,
}

impl IncidentAssessment {
  pub fn fallback() -> Self {
    Self {
      severity_assessment: "medium".to_owned(),
      legal_implications: "Unable to assess at this time".to_owned(),
      ..Default::default()
    }
  }

  /// The suggested severity, if it names a known level.
  pub fn severity(&self) -> Option<Severity> {
    self.severity_assessment.trim().parse().ok()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecklistSection {
  pub category: String,
  pub items:    Vec<String>,
  /// `high`, `medium` or `low`.
  pub priority: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Checklist {
  pub checklist_title:      String,
  pub preparation_items:    Vec<ChecklistSection>,
  pub timeline_suggestions: Vec<String>,
  pub common_mistakes:      Vec<String>,
}

impl Checklist {
  pub fn fallback() -> Self {
    Self {
      checklist_title: "Case Preparation Checklist".to_owned(),
      ..Default::default()
    }
  }
}
