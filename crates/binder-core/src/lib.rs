//! Core types and trait definitions for the case binder.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Every other crate depends on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod deadline;
pub mod error;
pub mod parse;
pub mod record;
pub mod snapshot;
pub mod store;
pub mod timeline;

pub use error::{Error, Result};
