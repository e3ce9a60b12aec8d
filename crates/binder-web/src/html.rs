//! HTML generation.
//!
//! Pages are plain strings assembled here. Every dynamic value goes through
//! [`esc`] before it reaches the output.

use std::borrow::Cow;

use axum::response::Html;
use chrono::{NaiveDate, NaiveDateTime};

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;max-width:60rem;margin:0 auto;padding:1rem;color:#222}\
nav a{margin-right:.8rem}\
table{border-collapse:collapse;width:100%}td,th{border-bottom:1px solid #ddd;padding:.3rem;text-align:left}\
label{display:block;margin-top:.6rem}input,select,textarea{width:100%;max-width:32rem}\
input[type=checkbox]{width:auto}.muted{color:#777}.error{color:#a00}\
.stats span{display:inline-block;margin-right:1.2rem}pre{white-space:pre-wrap}";

const NAV: &[(&str, &str)] = &[
  ("/", "Dashboard"),
  ("/case/edit", "Case"),
  ("/children", "Children"),
  ("/parents", "Parents"),
  ("/documents", "Documents"),
  ("/incidents", "Incidents"),
  ("/deadlines", "Deadlines"),
  ("/notes", "Notes"),
  ("/timeline", "Timeline"),
];

/// Escape text for use in element content or a quoted attribute.
pub fn esc(raw: &str) -> Cow<'_, str> { quick_xml::escape::escape(raw) }

/// Escape an optional value; `None` renders as nothing.
pub fn esc_opt(raw: Option<&str>) -> Cow<'_, str> { esc(raw.unwrap_or_default()) }

/// Wrap `body` in the site layout.
pub fn page(title: &str, body: &str) -> Html<String> {
  let nav: String = NAV
    .iter()
    .map(|(href, label)| format!("<a href=\"{href}\">{label}</a>"))
    .collect();
  Html(format!(
    "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
     <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
     <title>{title} · Case Binder</title><style>{STYLE}</style></head>\
     <body><nav>{nav}</nav><h1>{title}</h1>\n{body}\n</body></html>",
    title = esc(title),
  ))
}

pub fn fmt_date(date: Option<NaiveDate>) -> String {
  date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

pub fn fmt_datetime(dt: Option<NaiveDateTime>) -> String {
  dt.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
    .unwrap_or_default()
}

/// A `<dt>/<dd>` pair, skipped when the value is blank.
pub fn detail(label: &str, value: Option<&str>) -> String {
  match value.filter(|v| !v.trim().is_empty()) {
    Some(v) => format!("<dt>{}</dt><dd>{}</dd>", esc(label), esc(v)),
    None => String::new(),
  }
}

/// An unordered list, or nothing when `items` is empty.
pub fn list(items: &[String]) -> String {
  if items.is_empty() {
    return String::new();
  }
  let lis: String = items.iter().map(|i| format!("<li>{}</li>", esc(i))).collect();
  format!("<ul>{lis}</ul>")
}

/// A one-button form posting to `action`.
pub fn post_button(action: &str, label: &str) -> String {
  format!(
    "<form method=\"post\" action=\"{}\" style=\"display:inline\">\
     <button type=\"submit\">{}</button></form>",
    esc(action),
    esc(label),
  )
}

// ─── Form builder ────────────────────────────────────────────────────────────

/// Incrementally builds an HTML `<form>`.
pub struct FormBuilder {
  action:    String,
  get:       bool,
  multipart: bool,
  fields:    String,
}

impl FormBuilder {
  pub fn new(action: &str) -> Self {
    Self { action: action.to_owned(), get: false, multipart: false, fields: String::new() }
  }

  /// Submit as a query string, for filter forms.
  pub fn method_get(mut self) -> Self {
    self.get = true;
    self
  }

  pub fn multipart(mut self) -> Self {
    self.multipart = true;
    self
  }

  pub fn text(mut self, name: &str, label: &str, value: Option<&str>) -> Self {
    self.fields.push_str(&format!(
      "<label for=\"{name}\">{label}</label>\
       <input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\">",
      esc_opt(value),
    ));
    self
  }

  pub fn required_text(mut self, name: &str, label: &str, value: Option<&str>) -> Self {
    self.fields.push_str(&format!(
      "<label for=\"{name}\">{label} *</label>\
       <input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\" required>",
      esc_opt(value),
    ));
    self
  }

  pub fn textarea(mut self, name: &str, label: &str, value: Option<&str>) -> Self {
    self.fields.push_str(&format!(
      "<label for=\"{name}\">{label}</label>\
       <textarea id=\"{name}\" name=\"{name}\" rows=\"5\">{}</textarea>",
      esc_opt(value),
    ));
    self
  }

  pub fn date(mut self, name: &str, label: &str, value: Option<NaiveDate>) -> Self {
    self.fields.push_str(&format!(
      "<label for=\"{name}\">{label}</label>\
       <input type=\"date\" id=\"{name}\" name=\"{name}\" value=\"{}\">",
      fmt_date(value),
    ));
    self
  }

  pub fn datetime(
    mut self,
    name: &str,
    label: &str,
    value: Option<NaiveDateTime>,
  ) -> Self {
    let value = value
      .map(|d| d.format("%Y-%m-%dT%H:%M").to_string())
      .unwrap_or_default();
    self.fields.push_str(&format!(
      "<label for=\"{name}\">{label}</label>\
       <input type=\"datetime-local\" id=\"{name}\" name=\"{name}\" value=\"{value}\">",
    ));
    self
  }

  pub fn checkbox(mut self, name: &str, label: &str, checked: bool) -> Self {
    let checked = if checked { " checked" } else { "" };
    self.fields.push_str(&format!(
      "<label><input type=\"checkbox\" name=\"{name}\" value=\"on\"{checked}> {label}</label>",
    ));
    self
  }

  /// A `<select>`; `options` are `(value, label)` pairs.
  pub fn select(
    mut self,
    name: &str,
    label: &str,
    options: &[(&str, &str)],
    selected: Option<&str>,
  ) -> Self {
    let opts: String = options
      .iter()
      .map(|(value, text)| {
        let sel = if Some(*value) == selected { " selected" } else { "" };
        format!("<option value=\"{}\"{sel}>{}</option>", esc(value), esc(text))
      })
      .collect();
    self.fields.push_str(&format!(
      "<label for=\"{name}\">{label}</label><select id=\"{name}\" name=\"{name}\">{opts}</select>",
    ));
    self
  }

  pub fn file(mut self, name: &str, label: &str) -> Self {
    self.fields.push_str(&format!(
      "<label for=\"{name}\">{label} *</label>\
       <input type=\"file\" id=\"{name}\" name=\"{name}\" required>",
    ));
    self
  }

  pub fn finish(self, submit: &str) -> String {
    let method = if self.get { "get" } else { "post" };
    let enctype = if self.multipart { " enctype=\"multipart/form-data\"" } else { "" };
    format!(
      "<form method=\"{method}\" action=\"{}\"{enctype}>{}<p><button type=\"submit\">{}</button></p></form>",
      esc(&self.action),
      self.fields,
      esc(submit),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn values_are_escaped() {
    let form = FormBuilder::new("/notes/new")
      .text("title", "Title", Some("\"><script>alert(1)</script>"))
      .textarea("content", "Content", Some("a < b & c"))
      .finish("Save");
    assert!(!form.contains("<script>"));
    assert!(form.contains("&lt;script&gt;"));
    assert!(form.contains("a &lt; b &amp; c"));
  }

  #[test]
  fn select_marks_the_chosen_option() {
    let form = FormBuilder::new("/x")
      .select("priority", "Priority", &[("low", "Low"), ("high", "High")], Some("high"))
      .finish("Go");
    assert!(form.contains("<option value=\"high\" selected>High</option>"));
    assert!(form.contains("<option value=\"low\">Low</option>"));
  }

  #[test]
  fn filter_forms_submit_with_get() {
    let filter = FormBuilder::new("/incidents").method_get().finish("Filter");
    assert!(filter.starts_with("<form method=\"get\" action=\"/incidents\">"));
    let form = FormBuilder::new("/incidents/new").finish("Save");
    assert!(form.starts_with("<form method=\"post\""));
  }

  #[test]
  fn page_escapes_title() {
    let Html(body) = page("Tom & Jerry", "<p>hi</p>");
    assert!(body.contains("<h1>Tom &amp; Jerry</h1>"));
    assert!(body.contains("<p>hi</p>"));
  }
}
