//! Defines the `CatalogSource` trait, the read-only boundary to catalog storage.

use crate::error::Result;
use crate::types::{CatalogKind, CategoryRecord, PackageRecord, PluginRecord, SearchableItem};

/// Read-only access to the three catalogs.
///
/// Each fetch returns a snapshot of all active records of one catalog. The
/// engine calls the three fetches independently (concurrently with the
/// `parallel` feature) and treats an `Err` as "this catalog is unavailable":
/// that catalog contributes no results and the others are unaffected.
/// Timeouts and retries, if any, belong to the implementation.
///
/// The `Send` and `Sync` bounds are required so the engine can fetch from
/// several threads at once.
pub trait CatalogSource: Send + Sync {
  /// Fetches all active service packages.
  fn fetch_packages(&self) -> Result<Vec<PackageRecord>>;

  /// Fetches all active plugins.
  fn fetch_plugins(&self) -> Result<Vec<PluginRecord>>;

  /// Fetches all active categories.
  fn fetch_categories(&self) -> Result<Vec<CategoryRecord>>;

  /// Fetches one catalog as searchable items, in the order the source returned them.
  fn fetch(&self, kind: CatalogKind) -> Result<Vec<SearchableItem>> {
    Ok(match kind {
      CatalogKind::Package => self.fetch_packages()?.into_iter().map(SearchableItem::from).collect(),
      CatalogKind::Plugin => self.fetch_plugins()?.into_iter().map(SearchableItem::from).collect(),
      CatalogKind::Category => self.fetch_categories()?.into_iter().map(SearchableItem::from).collect(),
    })
  }
}

impl<S: CatalogSource + ?Sized> CatalogSource for std::sync::Arc<S> {
  fn fetch_packages(&self) -> Result<Vec<PackageRecord>> {
    (**self).fetch_packages()
  }

  fn fetch_plugins(&self) -> Result<Vec<PluginRecord>> {
    (**self).fetch_plugins()
  }

  fn fetch_categories(&self) -> Result<Vec<CategoryRecord>> {
    (**self).fetch_categories()
  }

  fn fetch(&self, kind: CatalogKind) -> Result<Vec<SearchableItem>> {
    (**self).fetch(kind)
  }
}
