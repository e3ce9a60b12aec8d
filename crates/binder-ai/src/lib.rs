//! Model-assisted review for the binder.
//!
//! [`Assistant`] wraps a [`ChatBackend`] (normally [`OpenAiBackend`]) and
//! exposes five operations: document analysis, whole-case summary, category
//! suggestion, incident assessment and hearing preparation checklists. Each
//! returns an [`Assessment`] and never an error.

pub mod error;
mod assessment;
mod assistant;
mod backend;
pub mod payload;
#[cfg(any(test, feature = "test-util"))]
mod scripted;

pub use assessment::Assessment;
pub use assistant::{Assistant, PREVIEW_CHARS};
pub use backend::{AiConfig, ChatBackend, ChatRequest, OpenAiBackend};
pub use error::{Error, Result};
#[cfg(any(test, feature = "test-util"))]
pub use scripted::ScriptedBackend;
