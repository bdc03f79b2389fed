//! Query normalization.

use crate::error::{Error, Result};
use crate::searchers::tokenizer::words;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Message used when no query was supplied at all.
pub const MISSING_QUERY: &str = "Search query is required";

/// A normalized search query: lower-cased, surrounding whitespace trimmed.
///
/// Nothing else is done to the text. Accents, punctuation and inner
/// whitespace are kept as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SearchQuery(String);

impl SearchQuery {
  pub fn normalize(raw: &str) -> Self {
    Self(raw.trim().to_lowercase())
  }

  /// Validates a loosely typed query value and normalizes it.
  ///
  /// Only a JSON string is accepted. A missing value or any other JSON type
  /// is an [`Error::InvalidInput`].
  pub fn from_value(value: Option<&Value>) -> Result<Self> {
    match value {
      Some(Value::String(raw)) => Ok(Self::normalize(raw)),
      Some(Value::Null) | None => Err(Error::InvalidInput(MISSING_QUERY.to_string())),
      Some(other) => Err(Error::InvalidInput(format!(
        "Search query must be a string, got {}",
        json_type_name(other)
      ))),
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// The whitespace-separated terms of the query.
  pub fn terms(&self) -> impl Iterator<Item = &str> {
    words(&self.0)
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl AsRef<str> for SearchQuery {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for SearchQuery {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

fn json_type_name(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
