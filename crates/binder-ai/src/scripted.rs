//! An in-process [`ChatBackend`] that replays canned replies.

use std::{collections::VecDeque, sync::Mutex};

use crate::{ChatBackend, ChatRequest, Error, Result};

/// Replays canned replies in order and records every request.
///
/// Once the script runs out, each call fails with [`Error::EmptyResponse`].
#[derive(Default)]
pub struct ScriptedBackend {
  replies:  Mutex<VecDeque<Result<String>>>,
  requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
  pub fn replying<I>(replies: I) -> Self
  where
    I: IntoIterator<Item = Result<String>>,
  {
    Self {
      replies:  Mutex::new(replies.into_iter().collect()),
      requests: Mutex::default(),
    }
  }

  /// Every request seen so far, oldest first.
  pub fn requests(&self) -> Vec<ChatRequest> {
    self.requests.lock().map(|r| r.clone()).unwrap_or_default()
  }
}

impl ChatBackend for ScriptedBackend {
  async fn complete(&self, request: ChatRequest) -> Result<String> {
    if let Ok(mut requests) = self.requests.lock() {
      requests.push(request);
    }
    self
      .replies
      .lock()
      .ok()
      .and_then(|mut replies| replies.pop_front())
      .unwrap_or(Err(Error::EmptyResponse))
  }
}
