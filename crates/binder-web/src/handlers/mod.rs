//! HTML page handlers, one module per record type.
//!
//! Every handler resolves the current case first. Record ids that do not
//! exist, or that belong to another case, are 404. Successful form posts
//! answer `303 See Other` back to the relevant list page.

pub mod case;
pub mod children;
pub mod dashboard;
pub mod deadlines;
pub mod documents;
pub mod incidents;
pub mod notes;
pub mod parents;
pub mod timeline;

use binder_core::record::Case;
use uuid::Uuid;

use crate::{Error, Result};

/// Fallback for unknown paths.
pub async fn not_found() -> Error { Error::NotFound }

/// Keep `record` only when it belongs to `case`.
pub(crate) fn owned<T>(
  record: Option<T>,
  case: &Case,
  case_id: impl Fn(&T) -> Uuid,
) -> Result<T> {
  record
    .filter(|r| case_id(r) == case.case_id)
    .ok_or(Error::NotFound)
}

/// `(value, label)` pairs for a `<select>`, led by a blank "any" option.
pub(crate) fn with_blank<'a>(
  blank: &'a str,
  options: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Vec<(&'a str, &'a str)> {
  std::iter::once(("", blank)).chain(options).collect()
}
