//! Incident log: list, create, edit, and optional model assessment.

use axum::{
  Form,
  extract::{Path, Query, State},
  response::{Html, Redirect},
};
use binder_ai::{ChatBackend, payload::IncidentAssessment};
use binder_core::{
  parse,
  record::{Incident, Severity},
  store::CaseStore,
};
use serde::Deserialize;
use strum::IntoEnumIterator;
use uuid::Uuid;

use super::{owned, with_blank};
use crate::{AppState, Error, Result, current_case, forms::IncidentForm, html};

fn incident_form(action: &str, incident: Option<&Incident>) -> String {
  let levels: Vec<Severity> = Severity::iter().collect();
  let severities = with_blank("Not assessed", levels.iter().map(|s| (s.as_ref(), s.as_ref())));

  html::FormBuilder::new(action)
    .datetime("incident_date", "When", incident.and_then(|i| i.incident_date))
    .text("incident_type", "Type", incident.and_then(|i| i.incident_type.as_deref()))
    .select(
      "severity",
      "Severity",
      &severities,
      incident.and_then(|i| i.severity.as_ref()).map(|s| s.as_ref()),
    )
    .textarea("description", "Description *", incident.map(|i| i.description.as_str()))
    .text("location", "Location", incident.and_then(|i| i.location.as_deref()))
    .text("witnesses", "Witnesses", incident.and_then(|i| i.witnesses.as_deref()))
    .text(
      "children_involved",
      "Children involved",
      incident.and_then(|i| i.children_involved.as_deref()),
    )
    .checkbox("police_called", "Police were called", incident.is_some_and(|i| i.police_called))
    .checkbox(
      "follow_up_required",
      "Follow-up required",
      incident.is_some_and(|i| i.follow_up_required),
    )
    .textarea(
      "follow_up_notes",
      "Follow-up notes",
      incident.and_then(|i| i.follow_up_notes.as_deref()),
    )
    .checkbox("ai_assess", "Assess with the model after saving", false)
    .finish("Save incident")
}

fn assessment_summary(value: &serde_json::Value) -> String {
  let Ok(assessment) = serde_json::from_value::<IncidentAssessment>(value.clone()) else {
    return String::new();
  };
  let mut out = format!(
    "<p><strong>Assessment:</strong> {} · {}</p>",
    html::esc(&assessment.severity_assessment),
    html::esc(&assessment.legal_implications),
  );
  out.push_str(&html::list(&assessment.recommended_actions));
  out
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub incident_type: Option<String>,
}

pub async fn list<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Query(params): Query<ListParams>,
) -> Result<Html<String>> {
  let incident_type = parse::text(params.incident_type);
  let case = current_case(state.store.as_ref()).await?;
  let incidents = state
    .store
    .list_incidents(case.case_id, incident_type.clone())
    .await
    .map_err(Error::store)?;

  let filter = html::FormBuilder::new("/incidents")
    .method_get()
    .text("incident_type", "Type", incident_type.as_deref())
    .finish("Filter");

  let mut body = String::from("<p><a href=\"/incidents/new\">Log an incident</a></p>");
  body.push_str(&filter);
  if incidents.is_empty() {
    body.push_str("<p class=\"muted\">No incidents logged.</p>");
  }
  for incident in &incidents {
    let when = match incident.incident_date {
      Some(_) => html::fmt_datetime(incident.incident_date),
      None => "Undated".to_owned(),
    };
    body.push_str(&format!(
      "<h2>{} <span class=\"muted\">{}</span></h2><p>{}</p><dl>{}{}{}{}</dl>",
      html::esc(&when),
      html::esc_opt(incident.incident_type.as_deref()),
      html::esc(&incident.description),
      html::detail("Severity", incident.severity.as_ref().map(|s| s.as_ref())),
      html::detail("Location", incident.location.as_deref()),
      html::detail("Witnesses", incident.witnesses.as_deref()),
      html::detail("Police called", incident.police_called.then_some("Yes")),
    ));
    if let Some(value) = &incident.ai_assessment {
      body.push_str(&assessment_summary(value));
    }
    body.push_str(&format!(
      "<p><a href=\"/incidents/{}/edit\">Edit</a></p>",
      incident.incident_id
    ));
  }
  Ok(html::page("Incidents", &body))
}

pub async fn new_form() -> Html<String> {
  html::page("Log incident", &incident_form("/incidents/new", None))
}

/// Ask the model about `incident` and store its answer. A parsed severity
/// replaces the recorded one; a fallback leaves it unchanged.
async fn assess<S: CaseStore, B: ChatBackend>(state: &AppState<S, B>, incident: &Incident) -> Result<()> {
  let assessment = state
    .assistant
    .assess_incident(&incident.description, incident.incident_type.as_deref())
    .await;
  let severity = if assessment.is_fallback() {
    None
  } else {
    assessment.payload().severity()
  };
  state
    .store
    .record_incident_assessment(incident.incident_id, severity, assessment.to_json()?)
    .await
    .map_err(Error::store)?;
  Ok(())
}

pub async fn create<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Form(form): Form<IncidentForm>,
) -> Result<Redirect> {
  let (input, ai_assess) = form.into_input()?;
  let case = current_case(state.store.as_ref()).await?;
  let incident = state
    .store
    .add_incident(case.case_id, input)
    .await
    .map_err(Error::store)?;
  tracing::info!(incident_id = %incident.incident_id, "incident logged");

  if ai_assess {
    assess(&state, &incident).await?;
  }
  Ok(Redirect::to("/incidents"))
}

async fn find<S: CaseStore, B: ChatBackend>(state: &AppState<S, B>, id: Uuid) -> Result<Incident> {
  let case = current_case(state.store.as_ref()).await?;
  let incident = state.store.get_incident(id).await.map_err(Error::store)?;
  owned(incident, &case, |i| i.case_id)
}

pub async fn edit_form<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<Html<String>> {
  let incident = find(&state, id).await?;
  let action = format!("/incidents/{id}/edit");
  Ok(html::page("Edit incident", &incident_form(&action, Some(&incident))))
}

pub async fn update<S: CaseStore, B: ChatBackend>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
  Form(form): Form<IncidentForm>,
) -> Result<Redirect> {
  find(&state, id).await?;
  let (input, ai_assess) = form.into_input()?;
  let incident = state
    .store
    .update_incident(id, input)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  if ai_assess {
    assess(&state, &incident).await?;
  }
  Ok(Redirect::to("/incidents"))
}
