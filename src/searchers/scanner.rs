//! Scores every record of one catalog against a query.

use crate::merge::rank;
use crate::query::SearchQuery;
use crate::rules::CatalogRules;
use crate::searchers::similarity::{Scorer, MAX_SCORE};
use crate::types::{CatalogKind, ScoredResult, SearchableItem};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Applies a catalog's field rules to its records.
///
/// A record's score is the best score of any of its fields. Records scoring
/// zero are dropped, the rest are ranked (stable, highest first) and cut to
/// the catalog's limit.
#[derive(Debug, Clone)]
pub struct CatalogScanner {
  /// Fields to score and the result cap.
  rules: CatalogRules,
}

impl CatalogScanner {
  /// Creates a new scanner.
  ///
  /// # Arguments
  ///
  /// * `rules` - The catalog the scanner serves, which of its fields are
  ///   scored, and how many results it keeps.
  pub fn new(rules: CatalogRules) -> Self {
    Self { rules }
  }

  /// The catalog this scanner serves.
  pub fn kind(&self) -> CatalogKind {
    self.rules.kind
  }

  pub fn rules(&self) -> &CatalogRules {
    &self.rules
  }

  /// Match a single record against the query.
  pub fn match_entity(&self, item: SearchableItem, scorer: &Scorer<'_>) -> Option<ScoredResult> {
    let mut result = ScoredResult::new(item, 0.0);
    let mut best = 0.0_f64;

    for (field, rule) in &self.rules.fields {
      let score = match result.item.field_text(field) {
        Some(text) => (scorer.score(&text) * rule.boost).clamp(0.0, MAX_SCORE),
        None => continue,
      };
      result.field_scores.insert(field.clone(), score);
      if score > best {
        best = score;
      }
    }

    if best <= 0.0 {
      return None;
    }
    result.score = best;
    Some(result)
  }

  /// Score, filter, rank and cap `items`.
  pub fn scan(&self, items: Vec<SearchableItem>, query: &SearchQuery) -> Vec<ScoredResult> {
    if self.rules.limit == 0 {
      return Vec::new();
    }
    let scorer = Scorer::new(query);

    #[cfg(feature = "parallel")]
    let mut results: Vec<ScoredResult> = items
      .into_par_iter()
      .filter_map(|item| self.match_entity(item, &scorer))
      .collect();

    #[cfg(not(feature = "parallel"))]
    let mut results: Vec<ScoredResult> = items
      .into_iter()
      .filter_map(|item| self.match_entity(item, &scorer))
      .collect();

    rank(&mut results);
    results.truncate(self.rules.limit);
    results
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::SearchConfig;
  use crate::rules::FieldRule;
  use crate::types::{CategoryRecord, PackageRecord, PluginRecord};

  fn scanner(kind: CatalogKind) -> CatalogScanner {
    CatalogScanner::new(CatalogRules::for_kind(kind, &SearchConfig::default()))
  }

  fn ids(results: &[ScoredResult]) -> Vec<&str> {
    results.iter().map(|r| r.id()).collect()
  }

  #[test]
  fn test_best_field_wins() {
    let items = vec![PackageRecord::new("p1", "Brand Kit")
      .description("A professional logo and palette")
      .category("Logo")
      .into()];

    let results = scanner(CatalogKind::Package).scan(items, &SearchQuery::normalize("logo"));

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 100.0);
    assert_eq!(results[0].field_scores["category"], 100.0);
    assert_eq!(results[0].field_scores["description"], 60.0);
    assert_eq!(results[0].kind(), CatalogKind::Package);
  }

  #[test]
  fn test_plugin_prefix_scenario() {
    let items = vec![PluginRecord::new("pl1", "WordPress SEO Booster").into()];
    let results = scanner(CatalogKind::Plugin).scan(items, &SearchQuery::normalize("wordpress"));
    assert_eq!(results[0].score, 80.0);
  }

  #[test]
  fn test_category_typo_scenario() {
    let items = vec![CategoryRecord::new("c1", "Logo Design").into()];
    let results = scanner(CatalogKind::Category).scan(items, &SearchQuery::normalize("lgoo design"));
    assert_eq!(results[0].score, 50.0);
  }

  #[test]
  fn test_non_matches_are_dropped() {
    let items = vec![
      CategoryRecord::new("c1", "xyz").into(),
      CategoryRecord::new("c2", "").into(),
      CategoryRecord::new("c3", "Logos").into(),
    ];
    let results = scanner(CatalogKind::Category).scan(items, &SearchQuery::normalize("qqqq"));
    assert!(results.is_empty());
  }

  #[test]
  fn test_equal_scores_keep_fetch_order() {
    let items = vec![
      PluginRecord::new("a", "Logo Maker").into(),
      PluginRecord::new("b", "Super Logo").into(),
      PluginRecord::new("c", "Logo Tools").into(),
      PluginRecord::new("d", "My Logo").into(),
    ];
    let results = scanner(CatalogKind::Plugin).scan(items, &SearchQuery::normalize("logo"));
    assert_eq!(ids(&results), vec!["a", "c", "b", "d"]);
  }

  #[test]
  fn test_results_are_capped() {
    let items: Vec<SearchableItem> = (0..8)
      .map(|i| CategoryRecord::new(format!("c{i}"), format!("Design {i}")).into())
      .collect();
    let results = scanner(CatalogKind::Category).scan(items, &SearchQuery::normalize("design"));
    assert_eq!(ids(&results), vec!["c0", "c1", "c2", "c3", "c4"]);
  }

  #[test]
  fn test_zero_limit_returns_nothing() {
    let rules = CatalogRules::builder(CatalogKind::Category)
      .field("name", FieldRule::default())
      .limit(0)
      .build();
    let items = vec![CategoryRecord::new("c1", "design").into()];
    assert!(CatalogScanner::new(rules).scan(items, &SearchQuery::normalize("design")).is_empty());
  }

  #[test]
  fn test_boost_is_clamped() {
    let rules = CatalogRules::builder(CatalogKind::Category)
      .field("name", FieldRule::default().boost(3.0))
      .field("description", FieldRule::default().boost(0.5))
      .build();
    let items = vec![CategoryRecord::new("c1", "design").description("design").into()];
    let results = CatalogScanner::new(rules).scan(items, &SearchQuery::normalize("design"));
    assert_eq!(results[0].score, 100.0);
    assert_eq!(results[0].field_scores["description"], 50.0);
  }
}
