//! In-memory catalog implementation.

use crate::catalog::source::CatalogSource;
use crate::error::Result;
use crate::types::{CategoryRecord, PackageRecord, PluginRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Catalogs held in memory.
///
/// Deserializes from `{ "packages": [...], "plugins": [...], "categories": [...] }`;
/// any of the three lists may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryCatalog {
  #[serde(default)]
  pub packages: Vec<PackageRecord>,
  #[serde(default)]
  pub plugins: Vec<PluginRecord>,
  #[serde(default)]
  pub categories: Vec<CategoryRecord>,
}

impl InMemoryCatalog {
  /// Create a new empty in-memory catalog.
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a package record.
  pub fn with_package(mut self, record: PackageRecord) -> Self {
    self.packages.push(record);
    self
  }

  pub fn with_plugin(mut self, record: PluginRecord) -> Self {
    self.plugins.push(record);
    self
  }

  pub fn with_category(mut self, record: CategoryRecord) -> Self {
    self.categories.push(record);
    self
  }

  /// Parse catalogs from a JSON document.
  pub fn from_json_str(json: &str) -> Result<Self> {
    Ok(serde_json::from_str(json)?)
  }

  pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
    let json = std::fs::read_to_string(path)?;
    Self::from_json_str(&json)
  }

  /// Total number of records across the three catalogs.
  pub fn len(&self) -> usize {
    self.packages.len() + self.plugins.len() + self.categories.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl CatalogSource for InMemoryCatalog {
  fn fetch_packages(&self) -> Result<Vec<PackageRecord>> {
    Ok(self.packages.clone())
  }

  fn fetch_plugins(&self) -> Result<Vec<PluginRecord>> {
    Ok(self.plugins.clone())
  }

  fn fetch_categories(&self) -> Result<Vec<CategoryRecord>> {
    Ok(self.categories.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{CatalogKind, SearchableItem};

  const CATALOG: &str = r#"{
    "packages": [
      { "_id": "pk1", "title": "Professional Logo Design", "category": { "name": "Design" }, "price": 120 }
    ],
    "plugins": [
      { "id": "pl1", "name": "WordPress SEO Booster", "category": "Marketing" },
      { "id": "pl2", "name": "Cache Warmer" }
    ]
  }"#;

  #[test]
  fn test_load_from_json() {
    let catalog = InMemoryCatalog::from_json_str(CATALOG).unwrap();
    assert_eq!(catalog.len(), 3);
    assert!(catalog.categories.is_empty());
    assert_eq!(catalog.packages[0].category.as_deref(), Some("Design"));
    assert_eq!(catalog.packages[0].extra["price"], 120);
  }

  #[test]
  fn test_fetch_preserves_order_and_kind() {
    let catalog = InMemoryCatalog::from_json_str(CATALOG).unwrap();
    let plugins = catalog.fetch(CatalogKind::Plugin).unwrap();
    let ids: Vec<&str> = plugins.iter().map(SearchableItem::id).collect();
    assert_eq!(ids, vec!["pl1", "pl2"]);
    assert!(plugins.iter().all(|item| item.kind() == CatalogKind::Plugin));
    assert!(catalog.fetch(CatalogKind::Category).unwrap().is_empty());
  }

  #[test]
  fn test_builder() {
    let catalog = InMemoryCatalog::new()
      .with_package(PackageRecord::new("pk", "Logo"))
      .with_category(CategoryRecord::new("c", "Design"));
    assert_eq!(catalog.len(), 2);
    assert!(!catalog.is_empty());
  }
}
