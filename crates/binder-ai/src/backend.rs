//! Chat-completion backends.

use std::{fmt, future::Future, time::Duration};

use reqwest::{Client, header};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Settings for the hosted model endpoint.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
  /// Bearer token. Without one every call degrades to its fallback.
  pub api_key:      Option<String>,
  /// OpenAI-compatible base URL, without the `/chat/completions` suffix.
  pub base_url:     String,
  pub model:        String,
  pub timeout_secs: u64,
}

impl Default for AiConfig {
  fn default() -> Self {
    Self {
      api_key:      None,
      base_url:     "https://api.openai.com/v1".to_owned(),
      model:        "gpt-4o".to_owned(),
      timeout_secs: 60,
    }
  }
}

impl fmt::Debug for AiConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AiConfig")
      .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
      .field("base_url", &self.base_url)
      .field("model", &self.model)
      .field("timeout_secs", &self.timeout_secs)
      .finish()
  }
}

// ─── Backend trait ───────────────────────────────────────────────────────────

/// One prompt sent to a chat model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
  pub system:     Option<String>,
  pub user:       String,
  /// Ask the model for a single JSON object.
  pub json:       bool,
  pub max_tokens: Option<u32>,
}

impl ChatRequest {
  pub fn json(system: &str, user: String) -> Self {
    Self { system: Some(system.to_owned()), user, json: true, max_tokens: None }
  }

  pub fn text(user: String, max_tokens: u32) -> Self {
    Self { system: None, user, json: false, max_tokens: Some(max_tokens) }
  }
}

/// A chat model that turns a prompt into reply text.
pub trait ChatBackend: Send + Sync {
  fn complete(
    &self,
    request: ChatRequest,
  ) -> impl Future<Output = Result<String>> + Send + '_;
}

// ─── OpenAI-compatible backend ───────────────────────────────────────────────

/// Backend speaking the OpenAI `chat/completions` protocol.
///
/// The inner [`reqwest::Client`] is `Arc`-based, so clones share a pool.
#[derive(Clone)]
pub struct OpenAiBackend {
  client:   Client,
  base_url: String,
  api_key:  Option<String>,
  model:    String,
}

impl OpenAiBackend {
  pub fn new(config: &AiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_owned(),
      api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
      model: config.model.clone(),
    })
  }

  pub fn model(&self) -> &str { &self.model }

  pub fn has_api_key(&self) -> bool { self.api_key.is_some() }
}

#[derive(Serialize)]
struct WireRequest<'a> {
  model:           &'a str,
  messages:        Vec<WireMessage<'a>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens:      Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
  role:    &'static str,
  content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
  #[serde(rename = "type")]
  kind: &'static str,
}

#[derive(Deserialize)]
struct WireResponse {
  choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
  message: WireReply,
}

#[derive(Deserialize)]
struct WireReply {
  content: Option<String>,
}

impl ChatBackend for OpenAiBackend {
  async fn complete(&self, request: ChatRequest) -> Result<String> {
    let api_key = self.api_key.as_deref().ok_or(Error::MissingApiKey)?;

    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &request.system {
      messages.push(WireMessage { role: "system", content: system });
    }
    messages.push(WireMessage { role: "user", content: &request.user });

    let body = WireRequest {
      model: &self.model,
      messages,
      max_tokens: request.max_tokens,
      response_format: request.json.then_some(ResponseFormat { kind: "json_object" }),
    };

    let resp = self
      .client
      .post(format!("{}/chat/completions", self.base_url))
      .header(header::AUTHORIZATION, format!("Bearer {api_key}"))
      .json(&body)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status { status: status.as_u16(), body });
    }

    let reply: WireResponse = resp.json().await?;
    reply
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .filter(|c| !c.trim().is_empty())
      .ok_or(Error::EmptyResponse)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn missing_key_fails_without_network() {
    let backend = OpenAiBackend::new(&AiConfig {
      api_key: Some("   ".into()),
      base_url: "http://127.0.0.1:9".into(),
      ..Default::default()
    })
    .unwrap();
    assert!(!backend.has_api_key());

    let err = backend
      .complete(ChatRequest::text("hello".into(), 5))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::MissingApiKey));
  }

  #[test]
  fn debug_output_redacts_the_key() {
    let config = AiConfig { api_key: Some("sk-secret".into()), ..Default::default() };
    let printed = format!("{config:?}");
    assert!(!printed.contains("sk-secret"));
    assert!(printed.contains("gpt-4o"));
  }

  #[test]
  fn wire_request_sets_json_mode() {
    let body = WireRequest {
      model:           "gpt-4o",
      messages:        vec![WireMessage { role: "user", content: "hi" }],
      max_tokens:      None,
      response_format: Some(ResponseFormat { kind: "json_object" }),
    };
    let value = serde_json::to_value(&body).unwrap();
    assert_eq!(value["response_format"]["type"], "json_object");
    assert!(value.get("max_tokens").is_none());
  }
}
