//! Error types for catalog search.

use crate::types::CatalogKind;
use thiserror::Error;

/// Result type alias for catalog search operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while searching the catalogs.
///
/// Only `InvalidInput` ever reaches a caller of the engine. Catalog failures
/// are absorbed per catalog and scoring panics are folded into a degraded
/// [`SearchResponse`](crate::types::SearchResponse).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
  /// The query was missing or was not a string.
  #[error("Invalid input: {0}")]
  InvalidInput(String),

  /// A catalog fetch failed or timed out.
  #[error("Catalog '{kind}' unavailable: {message}")]
  CollaboratorUnavailable {
    /// The catalog that could not be fetched.
    kind: CatalogKind,
    /// What the collaborator reported.
    message: String,
  },

  /// Scoring blew up in an unexpected way.
  #[error("Scoring failed: {0}")]
  Scoring(String),

  /// The configuration was rejected.
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

impl Error {
  /// Shorthand for a [`Error::CollaboratorUnavailable`].
  pub fn unavailable(kind: CatalogKind, message: impl Into<String>) -> Self {
    Self::CollaboratorUnavailable {
      kind,
      message: message.into(),
    }
  }
}
