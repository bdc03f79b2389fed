//! Engine configuration.

use crate::error::{Error, Result};
use crate::types::CatalogKind;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables for a [`SearchEngine`](crate::engine::SearchEngine).
///
/// Every key is optional when deserializing; missing keys take the defaults
/// below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
  /// Maximum number of package results.
  #[serde(default = "default_package_limit")]
  pub package_limit: usize,
  /// Maximum number of plugin results.
  #[serde(default = "default_plugin_limit")]
  pub plugin_limit: usize,
  /// Maximum number of category results.
  #[serde(default = "default_category_limit")]
  pub category_limit: usize,
  /// Lifetime of cached responses in seconds. `None` disables the cache.
  #[serde(default)]
  pub cache_ttl_secs: Option<u64>,
  /// Most distinct queries the cache holds at once.
  #[serde(default = "default_cache_max_entries")]
  pub cache_max_entries: usize,
}

fn default_package_limit() -> usize {
  10
}

fn default_plugin_limit() -> usize {
  10
}

fn default_category_limit() -> usize {
  5
}

fn default_cache_max_entries() -> usize {
  1024
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      package_limit: default_package_limit(),
      plugin_limit: default_plugin_limit(),
      category_limit: default_category_limit(),
      cache_ttl_secs: None,
      cache_max_entries: default_cache_max_entries(),
    }
  }
}

impl SearchConfig {
  /// Sets the maximum number of package results.
  ///
  /// # Arguments
  ///
  /// * `limit` - The cap. Zero turns the package catalog off.
  pub fn package_limit(mut self, limit: usize) -> Self {
    self.package_limit = limit;
    self
  }

  /// Sets the maximum number of plugin results.
  pub fn plugin_limit(mut self, limit: usize) -> Self {
    self.plugin_limit = limit;
    self
  }

  /// Sets the maximum number of category results.
  pub fn category_limit(mut self, limit: usize) -> Self {
    self.category_limit = limit;
    self
  }

  /// Enable the result cache with the given lifetime.
  ///
  /// # Arguments
  ///
  /// * `ttl` - The lifetime, rounded up to whole seconds. A zero duration
  ///   leaves the cache disabled.
  pub fn cache_ttl(mut self, ttl: Duration) -> Self {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    self.cache_ttl_secs = (secs > 0).then_some(secs);
    self
  }

  /// Sets how many distinct queries the cache may hold.
  pub fn cache_max_entries(mut self, max_entries: usize) -> Self {
    self.cache_max_entries = max_entries;
    self
  }

  /// The result cap for `kind`.
  pub fn limit_for(&self, kind: CatalogKind) -> usize {
    match kind {
      CatalogKind::Package => self.package_limit,
      CatalogKind::Plugin => self.plugin_limit,
      CatalogKind::Category => self.category_limit,
    }
  }

  /// The cache lifetime, if caching is enabled.
  ///
  /// A zero lifetime or a zero capacity both mean no cache.
  pub fn cache_ttl_duration(&self) -> Option<Duration> {
    if self.cache_max_entries == 0 {
      return None;
    }
    self
      .cache_ttl_secs
      .filter(|&secs| secs > 0)
      .map(Duration::from_secs)
  }

  /// Parse and validate a JSON configuration document.
  pub fn from_json_str(json: &str) -> Result<Self> {
    let config: Self = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
  }

  /// Read, parse and validate a JSON configuration file.
  pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
    let json = std::fs::read_to_string(path)?;
    Self::from_json_str(&json)
  }

  /// Reject settings that would build a cache which can never serve a hit.
  pub fn validate(&self) -> Result<()> {
    if self.cache_ttl_secs == Some(0) {
      return Err(Error::Config(
        "cache_ttl_secs must be positive; omit it to disable caching".to_string(),
      ));
    }
    if self.cache_ttl_secs.is_some() && self.cache_max_entries == 0 {
      return Err(Error::Config(
        "cache_max_entries must be positive when caching is enabled".to_string(),
      ));
    }
    Ok(())
  }
}
