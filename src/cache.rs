//! Time-bounded cache of search responses, keyed by normalized query.

use crate::query::SearchQuery;
use crate::types::SearchResponse;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of the current time for cache expiry.
pub trait Clock: Send + Sync {
  fn now(&self) -> Instant;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> Instant {
    Instant::now()
  }
}

/// A clock that only moves when advanced.
///
/// Lets callers drive cache expiry deterministically, for example in tests.
#[derive(Debug)]
pub struct ManualClock {
  start: Instant,
  elapsed_nanos: AtomicU64,
}

impl ManualClock {
  pub fn new() -> Self {
    Self {
      start: Instant::now(),
      elapsed_nanos: AtomicU64::new(0),
    }
  }

  /// Move the clock forward by `by`.
  pub fn advance(&self, by: Duration) {
    let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
    self.elapsed_nanos.fetch_add(nanos, Ordering::SeqCst);
  }
}

impl Default for ManualClock {
  fn default() -> Self {
    Self::new()
  }
}

impl Clock for ManualClock {
  fn now(&self) -> Instant {
    self.start + Duration::from_nanos(self.elapsed_nanos.load(Ordering::SeqCst))
  }
}

struct CacheEntry {
  response: SearchResponse,
  expires_at: Instant,
}

/// Responses cached for a fixed lifetime, up to a fixed number of queries.
///
/// Entries are never refreshed in place. An expired entry is dropped when its
/// query is looked up again, or by the sweep that runs once the cache is full.
/// If the sweep frees nothing, the entries closest to expiry are evicted.
pub struct ResultCache {
  ttl: Duration,
  max_entries: usize,
  clock: Arc<dyn Clock>,
  entries: DashMap<String, CacheEntry>,
}

impl ResultCache {
  /// Create a cache on the system clock.
  ///
  /// # Arguments
  ///
  /// * `ttl` - How long a response stays valid after it is stored.
  /// * `max_entries` - Upper bound on the number of stored queries. Zero
  ///   stores nothing.
  pub fn new(ttl: Duration, max_entries: usize) -> Self {
    Self::with_clock(ttl, max_entries, Arc::new(SystemClock))
  }

  /// Create a cache that reads the time from `clock`.
  pub fn with_clock(ttl: Duration, max_entries: usize, clock: Arc<dyn Clock>) -> Self {
    Self {
      ttl,
      max_entries,
      clock,
      entries: DashMap::new(),
    }
  }

  pub fn ttl(&self) -> Duration {
    self.ttl
  }

  pub fn max_entries(&self) -> usize {
    self.max_entries
  }

  /// Returns the cached response for `query` if it has not expired.
  pub fn get(&self, query: &SearchQuery) -> Option<SearchResponse> {
    let now = self.clock.now();
    let hit = self
      .entries
      .get(query.as_str())
      .map(|entry| (entry.expires_at > now).then(|| entry.response.clone()));

    match hit {
      Some(Some(response)) => Some(response),
      Some(None) => {
        self.entries.remove_if(query.as_str(), |_, entry| entry.expires_at <= now);
        None
      }
      None => None,
    }
  }

  /// Store `response` for `query`, making room first if the cache is full.
  pub fn insert(&self, query: &SearchQuery, response: SearchResponse) {
    if self.max_entries == 0 {
      return;
    }
    let now = self.clock.now();
    if self.entries.len() >= self.max_entries && !self.entries.contains_key(query.as_str()) {
      self.make_room(now);
    }

    let expires_at = now + self.ttl;
    self.entries.insert(
      query.as_str().to_string(),
      CacheEntry {
        response,
        expires_at,
      },
    );
  }

  /// Drop expired entries, then the entries closest to expiry until one
  /// slot is free.
  fn make_room(&self, now: Instant) {
    self.entries.retain(|_, entry| entry.expires_at > now);
    while self.entries.len() >= self.max_entries {
      let oldest = self
        .entries
        .iter()
        .min_by_key(|entry| entry.value().expires_at)
        .map(|entry| entry.key().clone());
      match oldest {
        Some(key) => {
          self.entries.remove(&key);
        }
        None => break,
      }
    }
  }

  /// Number of stored entries, expired ones included.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn clear(&self) {
    self.entries.clear();
  }
}

impl fmt::Debug for ResultCache {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ResultCache")
      .field("ttl", &self.ttl)
      .field("max_entries", &self.max_entries)
      .field("entries", &self.entries.len())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn query(text: &str) -> SearchQuery {
    SearchQuery::normalize(text)
  }

  #[test]
  fn test_hit_then_expiry() {
    let clock = Arc::new(ManualClock::new());
    let cache = ResultCache::with_clock(Duration::from_secs(60), 16, clock.clone());
    let logo = query("logo");

    assert!(cache.get(&logo).is_none());
    cache.insert(&logo, SearchResponse::empty("logo"));

    clock.advance(Duration::from_secs(59));
    assert_eq!(cache.get(&logo), Some(SearchResponse::empty("logo")));

    clock.advance(Duration::from_secs(1));
    assert!(cache.get(&logo).is_none());
    assert!(cache.is_empty());
  }

  #[test]
  fn test_keys_are_normalized_queries() {
    let cache = ResultCache::new(Duration::from_secs(60), 16);
    cache.insert(&query("  LOGO "), SearchResponse::empty("logo"));
    assert!(cache.get(&query("logo")).is_some());
    assert!(cache.get(&query("logos")).is_none());
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
  }

  #[test]
  fn test_full_cache_evicts_oldest() {
    let clock = Arc::new(ManualClock::new());
    let cache = ResultCache::with_clock(Duration::from_secs(60), 3, clock.clone());

    for text in ["a", "b", "c", "d", "e"] {
      cache.insert(&query(text), SearchResponse::empty(text));
      clock.advance(Duration::from_secs(1));
    }

    assert_eq!(cache.len(), 3);
    assert!(cache.get(&query("a")).is_none());
    assert!(cache.get(&query("b")).is_none());
    assert!(cache.get(&query("c")).is_some());
    assert!(cache.get(&query("e")).is_some());
  }

  #[test]
  fn test_full_cache_sweeps_expired_entries() {
    let clock = Arc::new(ManualClock::new());
    let cache = ResultCache::with_clock(Duration::from_secs(1), 100, clock.clone());

    for i in 0..100 {
      cache.insert(&query(&format!("q{i}")), SearchResponse::empty(""));
    }
    assert_eq!(cache.len(), 100);

    clock.advance(Duration::from_millis(1100));
    for i in 0..10 {
      cache.insert(&query(&format!("fresh{i}")), SearchResponse::empty(""));
    }
    assert_eq!(cache.len(), 10);
  }

  #[test]
  fn test_refreshing_a_key_does_not_evict() {
    let cache = ResultCache::new(Duration::from_secs(60), 2);
    cache.insert(&query("a"), SearchResponse::empty("a"));
    cache.insert(&query("b"), SearchResponse::empty("b"));
    cache.insert(&query("b"), SearchResponse::empty("b"));

    assert_eq!(cache.len(), 2);
    assert!(cache.get(&query("a")).is_some());
  }

  #[test]
  fn test_zero_capacity_stores_nothing() {
    let cache = ResultCache::new(Duration::from_secs(60), 0);
    cache.insert(&query("logo"), SearchResponse::empty("logo"));
    assert!(cache.is_empty());
  }
}
