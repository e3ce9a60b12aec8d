//! Lenient parsers for submitted form fields.
//!
//! Malformed optional values degrade to `None` instead of failing the
//! request. Only required text fields can produce an error.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
  Error, Result,
  record::{DocumentCategory, Priority, Severity},
};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

const DATETIME_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%dT%H:%M:%S",
  "%Y-%m-%d %H:%M",
  "%Y-%m-%d %H:%M:%S",
];

/// Trim a text field; blank becomes `None`.
pub fn text(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

/// A text field that must be present and non-blank.
pub fn required(value: Option<String>, field: &'static str) -> Result<String> {
  text(value).ok_or(Error::MissingField(field))
}

/// Parse a calendar date. Anything unparseable is `None`.
pub fn date(value: Option<&str>) -> Option<NaiveDate> {
  let raw = value?.trim();
  DATE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Parse a date-time, accepting HTML `datetime-local` values and bare dates
/// (taken as midnight). Anything unparseable is `None`.
pub fn datetime(value: Option<&str>) -> Option<NaiveDateTime> {
  let raw = value?.trim();
  DATETIME_FORMATS
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    .or_else(|| date(Some(raw)).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// HTML checkbox semantics: present-and-truthy is `true`.
pub fn flag(value: Option<&str>) -> bool {
  matches!(
    value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
    Some("on" | "true" | "1" | "yes")
  )
}

/// Comma-separated tags, trimmed, empties dropped.
pub fn tags(value: Option<&str>) -> Vec<String> {
  value
    .unwrap_or_default()
    .split(',')
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_owned)
    .collect()
}

/// Unknown or blank categories fall into [`DocumentCategory::Other`].
pub fn category(value: Option<&str>) -> DocumentCategory {
  value
    .and_then(|v| DocumentCategory::from_str(v.trim()).ok())
    .unwrap_or_default()
}

/// Like [`category`] but keeps "not chosen" distinct from "other".
pub fn chosen_category(value: Option<&str>) -> Option<DocumentCategory> {
  value
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .and_then(|v| DocumentCategory::from_str(v).ok())
}

pub fn severity(value: Option<&str>) -> Option<Severity> {
  value.and_then(|v| Severity::from_str(v.trim()).ok())
}

pub fn priority(value: Option<&str>) -> Priority {
  value
    .and_then(|v| Priority::from_str(v.trim()).ok())
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn malformed_dates_become_none() {
    assert_eq!(date(Some("2024-13-45")), None);
    assert_eq!(date(Some("next tuesday")), None);
    assert_eq!(date(Some("")), None);
    assert_eq!(date(None), None);
  }

  #[test]
  fn iso_and_us_dates_parse() {
    let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
    assert_eq!(date(Some("2024-03-09")), expected);
    assert_eq!(date(Some(" 03/09/2024 ")), expected);
  }

  #[test]
  fn datetime_accepts_html_local_and_bare_dates() {
    let dt = datetime(Some("2024-03-09T14:30")).unwrap();
    assert_eq!(dt.to_string(), "2024-03-09 14:30:00");

    let midnight = datetime(Some("2024-03-09")).unwrap();
    assert_eq!(midnight.to_string(), "2024-03-09 00:00:00");

    assert_eq!(datetime(Some("yesterday-ish")), None);
  }

  #[test]
  fn required_rejects_blank() {
    assert!(matches!(
      required(Some("   ".into()), "name"),
      Err(Error::MissingField("name"))
    ));
    assert_eq!(required(Some(" Ada ".into()), "name").unwrap(), "Ada");
  }

  #[test]
  fn checkbox_and_tags() {
    assert!(flag(Some("on")));
    assert!(!flag(Some("off")));
    assert!(!flag(None));
    assert_eq!(tags(Some("school, ,medical ,")), vec!["school", "medical"]);
  }

  #[test]
  fn enum_fallbacks() {
    assert_eq!(category(Some("not-a-category")), DocumentCategory::Other);
    assert_eq!(chosen_category(Some("")), None);
    assert_eq!(chosen_category(Some("medical")), Some(DocumentCategory::Medical));
    assert_eq!(priority(Some("urgent")), Priority::Medium);
    assert_eq!(severity(Some("Critical")), Some(Severity::Critical));
    assert_eq!(severity(Some("meh")), None);
  }
}
