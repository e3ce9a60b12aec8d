//! Upload handling for the binder: the file-type allow-list, unique on-disk
//! names, content hashing, and text extraction from PDF, Word and plain-text
//! files.
//!
//! Extraction never fails an upload. Parser errors surface as
//! [`Extraction::Failed`] and are stored as a sentinel string starting with
//! [`FAILURE_PREFIX`].

pub mod error;
mod extract;
mod kind;
mod size;
mod upload;

pub use error::{Error, Result};
pub use extract::{Extraction, FAILURE_PREFIX, extract, usable_text};
pub use kind::FileKind;
pub use size::format_file_size;
pub use upload::{StoredFile, sanitize_filename, save_upload};
