#![allow(dead_code)]

use catalog_search::prelude::*;
use catalog_search::Result;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A small storefront used across the tests.
pub fn sample_catalog() -> InMemoryCatalog {
  let mut logo_package = PackageRecord::new("pk1", "Professional Logo Design")
    .description("Three concepts and unlimited revisions")
    .category("Design");
  logo_package.extra.insert("price".into(), serde_json::json!(99));

  InMemoryCatalog::new()
    .with_package(logo_package)
    .with_package(PackageRecord::new("pk2", "Website Maintenance").category("Development"))
    .with_plugin(PluginRecord::new("pl1", "WordPress SEO Booster").category("Marketing"))
    .with_plugin(PluginRecord::new("pl2", "Logo Watermark").description("Stamp your logo on images"))
    .with_category(CategoryRecord::new("c1", "Logo Design").description("Brand marks and identities"))
    .with_category(CategoryRecord::new("c2", "Marketing"))
}

/// Wraps a source and counts catalog fetches.
pub struct CountingSource<S> {
  pub inner: S,
  pub fetches: AtomicUsize,
}

impl<S> CountingSource<S> {
  pub fn new(inner: S) -> Self {
    Self {
      inner,
      fetches: AtomicUsize::new(0),
    }
  }

  pub fn fetches(&self) -> usize {
    self.fetches.load(Ordering::SeqCst)
  }
}

impl<S: CatalogSource> CatalogSource for CountingSource<S> {
  fn fetch_packages(&self) -> Result<Vec<PackageRecord>> {
    self.fetches.fetch_add(1, Ordering::SeqCst);
    self.inner.fetch_packages()
  }

  fn fetch_plugins(&self) -> Result<Vec<PluginRecord>> {
    self.fetches.fetch_add(1, Ordering::SeqCst);
    self.inner.fetch_plugins()
  }

  fn fetch_categories(&self) -> Result<Vec<CategoryRecord>> {
    self.fetches.fetch_add(1, Ordering::SeqCst);
    self.inner.fetch_categories()
  }
}

/// The sample catalog, except that the plugin catalog is down.
pub struct PluginsDown(pub InMemoryCatalog);

impl CatalogSource for PluginsDown {
  fn fetch_packages(&self) -> Result<Vec<PackageRecord>> {
    self.0.fetch_packages()
  }

  fn fetch_plugins(&self) -> Result<Vec<PluginRecord>> {
    Err(Error::unavailable(CatalogKind::Plugin, "connection refused"))
  }

  fn fetch_categories(&self) -> Result<Vec<CategoryRecord>> {
    self.0.fetch_categories()
  }
}

/// A source whose category fetch panics.
pub struct CategoriesPanic(pub InMemoryCatalog);

impl CatalogSource for CategoriesPanic {
  fn fetch_packages(&self) -> Result<Vec<PackageRecord>> {
    self.0.fetch_packages()
  }

  fn fetch_plugins(&self) -> Result<Vec<PluginRecord>> {
    self.0.fetch_plugins()
  }

  fn fetch_categories(&self) -> Result<Vec<CategoryRecord>> {
    panic!("category index corrupted")
  }
}

/// Checks the invariants every response must satisfy.
pub fn assert_well_formed(response: &SearchResponse) {
  let bucketed = response.packages.len() + response.plugins.len() + response.categories.len();
  assert_eq!(response.total_results, response.all_results.len());
  assert_eq!(response.all_results.len(), bucketed);
  assert!(response.packages.len() <= 10);
  assert!(response.plugins.len() <= 10);
  assert!(response.categories.len() <= 5);
  assert!(response.all_results.iter().all(|r| r.score > 0.0));
  assert!(response
    .all_results
    .windows(2)
    .all(|w| w[0].score >= w[1].score));
  for kind in CatalogKind::ALL {
    assert!(response.bucket(kind).iter().all(|r| r.kind() == kind));
  }
}
