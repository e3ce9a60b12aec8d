use serde::{Serialize, Serializer};

/// The outcome of a model call: either the parsed reply, or a default
/// payload together with the reason the call failed.
///
/// Serialises as the payload itself, with an extra `error` field for
/// fallbacks. `T` must therefore serialise as a map for fallbacks to be
/// representable.
#[derive(Debug, Clone, PartialEq)]
pub enum Assessment<T> {
  Parsed(T),
  Fallback { error: String, payload: T },
}

impl<T> Assessment<T> {
  pub fn payload(&self) -> &T {
    match self {
      Self::Parsed(p) | Self::Fallback { payload: p, .. } => p,
    }
  }

  pub fn into_payload(self) -> T {
    match self {
      Self::Parsed(p) | Self::Fallback { payload: p, .. } => p,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      Self::Parsed(_) => None,
      Self::Fallback { error, .. } => Some(error),
    }
  }

  pub fn is_fallback(&self) -> bool { matches!(self, Self::Fallback { .. }) }
}

impl<T: Serialize> Assessment<T> {
  /// The serialised form, as stored alongside records.
  pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(self)
  }
}

impl<T: Serialize> Serialize for Assessment<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct WithError<'a, T> {
      error:   &'a str,
      #[serde(flatten)]
      payload: &'a T,
    }

    match self {
      Self::Parsed(payload) => payload.serialize(serializer),
      Self::Fallback { error, payload } => {
        WithError { error, payload }.serialize(serializer)
      }
    }
  }
}
