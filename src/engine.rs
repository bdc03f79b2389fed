//! The search facade that fetches, scores and merges the three catalogs.

use crate::cache::{Clock, ResultCache};
use crate::catalog::CatalogSource;
use crate::config::SearchConfig;
use crate::error::Error;
use crate::merge::merge;
use crate::query::SearchQuery;
use crate::rules::CatalogRules;
use crate::searchers::CatalogScanner;
use crate::types::{CatalogKind, ScoredResult, SearchResponse};
use serde_json::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The results of one catalog pipeline.
#[derive(Debug)]
struct CatalogOutcome {
  kind: CatalogKind,
  results: Vec<ScoredResult>,
  /// The catalog could not be fetched and contributed nothing.
  degraded: bool,
}

/// Searches the package, plugin and category catalogs and returns one ranked
/// response.
///
/// A search goes through these steps:
///
/// 1. **Validate**: only [`search_value`](Self::search_value) can reject a
///    query, when it is missing or not a string.
/// 2. **Normalize**: lower-case and trim. An empty query returns an empty
///    response straight away, without touching the catalogs.
/// 3. **Fetch and score**: one pipeline per catalog fetches its snapshot and
///    scores it. The pipelines share nothing and run in parallel with the
///    `parallel` feature. A pipeline whose fetch fails or panics yields an
///    empty list; the other catalogs are unaffected.
/// 4. **Join and merge**: once all three pipelines are done their lists are
///    merged into `all_results`.
///
/// `search` never fails. A panic while scoring is caught here and reported
/// through the response's `error` field with empty result lists.
///
/// # Examples
///
/// ```rust
/// use catalog_search::prelude::*;
///
/// let catalog = InMemoryCatalog::new()
///     .with_plugin(PluginRecord::new("pl1", "WordPress SEO Booster"))
///     .with_category(CategoryRecord::new("c1", "Logo Design"));
///
/// let engine = SearchEngine::builder(catalog).build();
/// let response = engine.search("WordPress");
///
/// assert_eq!(response.plugins[0].score, 80.0);
/// assert_eq!(response.all_results[0].id(), "pl1");
/// ```
pub struct SearchEngine {
  source: Arc<dyn CatalogSource>,
  /// One scanner per catalog, in merge order.
  scanners: Vec<CatalogScanner>,
  cache: Option<ResultCache>,
}

impl SearchEngine {
  /// Creates a builder that will search the catalogs of `source`.
  pub fn builder(source: impl CatalogSource + 'static) -> SearchEngineBuilder {
    SearchEngineBuilder::new(Arc::new(source))
  }

  /// Creates a builder around an already shared source.
  pub fn builder_shared(source: Arc<dyn CatalogSource>) -> SearchEngineBuilder {
    SearchEngineBuilder::new(source)
  }

  /// Searches for the raw query text.
  pub fn search(&self, raw: &str) -> SearchResponse {
    self.execute(SearchQuery::normalize(raw))
  }

  /// Searches for a loosely typed query value.
  ///
  /// A missing value or a value that is not a JSON string produces an empty
  /// response carrying the validation error. No catalog is fetched.
  pub fn search_value(&self, value: Option<&Value>) -> SearchResponse {
    match SearchQuery::from_value(value) {
      Ok(query) => self.execute(query),
      Err(err) => {
        debug!(error = %err, "rejected search query");
        SearchResponse::failed("", err.to_string())
      }
    }
  }

  /// Searches for an already normalized query.
  pub fn execute(&self, query: SearchQuery) -> SearchResponse {
    if query.is_empty() {
      return SearchResponse::empty("");
    }

    if let Some(cache) = &self.cache {
      if let Some(hit) = cache.get(&query) {
        debug!(query = %query, "search served from cache");
        return hit;
      }
    }

    let outcomes = match contain(|| self.scan_all(&query)) {
      Ok(outcomes) => outcomes,
      Err(message) => {
        error!(query = %query, error = %message, "search pipeline panicked");
        return SearchResponse::failed(query.into_inner(), Error::Scoring(message).to_string());
      }
    };

    let degraded = outcomes.iter().any(|outcome| outcome.degraded);
    let response = assemble(query.as_str(), outcomes);
    debug!(
      query = %query,
      total = response.total_results,
      degraded,
      "search complete"
    );

    if let Some(cache) = &self.cache {
      if !degraded {
        cache.insert(&query, response.clone());
      }
    }
    response
  }

  /// The configured scanners, in merge order.
  pub fn scanners(&self) -> &[CatalogScanner] {
    &self.scanners
  }

  pub fn cache(&self) -> Option<&ResultCache> {
    self.cache.as_ref()
  }

  /// Runs every catalog pipeline and waits for all of them.
  #[cfg(feature = "parallel")]
  fn scan_all(&self, query: &SearchQuery) -> Vec<CatalogOutcome> {
    self
      .scanners
      .par_iter()
      .map(|scanner| self.scan_catalog(scanner, query))
      .collect()
  }

  /// Runs every catalog pipeline and waits for all of them.
  #[cfg(not(feature = "parallel"))]
  fn scan_all(&self, query: &SearchQuery) -> Vec<CatalogOutcome> {
    self
      .scanners
      .iter()
      .map(|scanner| self.scan_catalog(scanner, query))
      .collect()
  }

  fn scan_catalog(&self, scanner: &CatalogScanner, query: &SearchQuery) -> CatalogOutcome {
    let kind = scanner.kind();
    let fetched = contain(|| self.source.fetch(kind))
      .unwrap_or_else(|message| Err(Error::unavailable(kind, format!("fetch panicked: {message}"))));
    match fetched {
      Ok(items) => {
        let fetched = items.len();
        let results = scanner.scan(items, query);
        debug!(catalog = %kind, fetched, matched = results.len(), "catalog scanned");
        CatalogOutcome {
          kind,
          results,
          degraded: false,
        }
      }
      Err(err) => {
        warn!(catalog = %kind, error = %err, "catalog fetch failed, continuing without it");
        CatalogOutcome {
          kind,
          results: Vec::new(),
          degraded: true,
        }
      }
    }
  }
}

/// Buckets the pipeline outcomes by catalog and merges them.
fn assemble(query: &str, outcomes: Vec<CatalogOutcome>) -> SearchResponse {
  let mut response = SearchResponse::empty(query);
  for outcome in outcomes {
    let bucket = match outcome.kind {
      CatalogKind::Package => &mut response.packages,
      CatalogKind::Plugin => &mut response.plugins,
      CatalogKind::Category => &mut response.categories,
    };
    bucket.extend(outcome.results);
  }

  response.all_results = merge(&[
    response.packages.as_slice(),
    response.plugins.as_slice(),
    response.categories.as_slice(),
  ]);
  response.total_results = response.all_results.len();
  response
}

/// Runs `f`, turning a panic into its message.
fn contain<T>(f: impl FnOnce() -> T) -> std::result::Result<T, String> {
  panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(&*payload))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(message) = payload.downcast_ref::<&str>() {
    (*message).to_string()
  } else if let Some(message) = payload.downcast_ref::<String>() {
    message.clone()
  } else {
    "unknown panic".to_string()
  }
}

/// A builder for creating `SearchEngine` instances.
///
/// # Examples
///
/// ```
/// use catalog_search::prelude::*;
/// use std::time::Duration;
///
/// let engine = SearchEngine::builder(InMemoryCatalog::new())
///     .config(SearchConfig::default().category_limit(3).cache_ttl(Duration::from_secs(30)))
///     .rules(
///         CatalogRules::builder(CatalogKind::Plugin)
///             .field("name", FieldRule::default())
///             .limit(20)
///             .build(),
///     )
///     .build();
///
/// assert_eq!(engine.scanners()[1].rules().limit, 20);
/// assert_eq!(engine.scanners()[2].rules().limit, 3);
/// assert!(engine.cache().is_some());
/// ```
pub struct SearchEngineBuilder {
  source: Arc<dyn CatalogSource>,
  config: SearchConfig,
  rules: Vec<CatalogRules>,
  clock: Option<Arc<dyn Clock>>,
}

impl SearchEngineBuilder {
  fn new(source: Arc<dyn CatalogSource>) -> Self {
    Self {
      source,
      config: SearchConfig::default(),
      rules: Vec::new(),
      clock: None,
    }
  }

  /// Sets the engine configuration.
  pub fn config(mut self, config: SearchConfig) -> Self {
    self.config = config;
    self
  }

  /// Replaces the built-in field rules for one catalog.
  ///
  /// The rules' own limit is used instead of the configured one.
  pub fn rules(mut self, rules: CatalogRules) -> Self {
    self.rules.retain(|existing| existing.kind != rules.kind);
    self.rules.push(rules);
    self
  }

  /// Sets the clock used by the result cache.
  pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
    self.clock = Some(clock);
    self
  }

  /// Builds the `SearchEngine`.
  pub fn build(self) -> SearchEngine {
    let scanners = CatalogKind::ALL
      .iter()
      .map(|&kind| {
        let rules = self
          .rules
          .iter()
          .find(|rules| rules.kind == kind)
          .cloned()
          .unwrap_or_else(|| CatalogRules::for_kind(kind, &self.config));
        CatalogScanner::new(rules)
      })
      .collect();

    let max_entries = self.config.cache_max_entries;
    let cache = self.config.cache_ttl_duration().map(|ttl| match self.clock {
      Some(clock) => ResultCache::with_clock(ttl, max_entries, clock),
      None => ResultCache::new(ttl, max_entries),
    });

    SearchEngine {
      source: self.source,
      scanners,
      cache,
    }
  }
}
