//! Field-weighting policy for each catalog.

use crate::config::SearchConfig;
use crate::types::CatalogKind;
use serde::{Deserialize, Serialize};

/// Which fields of one catalog are scored, and how many results it may return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRules {
  pub kind: CatalogKind,
  /// Scored fields, in evaluation order.
  pub fields: Vec<(String, FieldRule)>,
  /// Cap on the number of results for this catalog.
  pub limit: usize,
}

impl CatalogRules {
  /// Create a new rules builder for `kind`.
  pub fn builder(kind: CatalogKind) -> CatalogRulesBuilder {
    CatalogRulesBuilder {
      kind,
      fields: Vec::new(),
      limit: SearchConfig::default().limit_for(kind),
    }
  }

  /// The built-in policy for `kind`, capped by `config`.
  ///
  /// * packages: title, description, category name
  /// * plugins: name, description, category name
  /// * categories: name, description
  pub fn for_kind(kind: CatalogKind, config: &SearchConfig) -> Self {
    let builder = Self::builder(kind).limit(config.limit_for(kind));
    let builder = match kind {
      CatalogKind::Package => builder.field("title", FieldRule::default()),
      CatalogKind::Plugin | CatalogKind::Category => builder.field("name", FieldRule::default()),
    };
    let builder = builder.field("description", FieldRule::default());
    let builder = match kind {
      CatalogKind::Package | CatalogKind::Plugin => builder.field("category", FieldRule::default()),
      CatalogKind::Category => builder,
    };
    builder.build()
  }
}

/// Builder for catalog rules.
#[derive(Debug)]
pub struct CatalogRulesBuilder {
  kind: CatalogKind,
  fields: Vec<(String, FieldRule)>,
  limit: usize,
}

impl CatalogRulesBuilder {
  /// Add a scored field. Adding the same name twice replaces the earlier rule.
  pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
    let name = name.into();
    match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
      Some((_, existing)) => *existing = rule,
      None => self.fields.push((name, rule)),
    }
    self
  }

  /// Set the result cap.
  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = limit;
    self
  }

  /// Build the catalog rules.
  pub fn build(self) -> CatalogRules {
    CatalogRules {
      kind: self.kind,
      fields: self.fields,
      limit: self.limit,
    }
  }
}

/// Rule for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
  /// Multiplier applied to the field's similarity score. The result is
  /// clamped back into `[0, 100]`.
  #[serde(default = "default_boost")]
  pub boost: f64,
}

fn default_boost() -> f64 {
  1.0
}

impl Default for FieldRule {
  fn default() -> Self {
    Self {
      boost: default_boost(),
    }
  }
}

impl FieldRule {
  /// Set the boost factor.
  pub fn boost(mut self, boost: f64) -> Self {
    self.boost = boost;
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn field_names(rules: &CatalogRules) -> Vec<&str> {
    rules.fields.iter().map(|(name, _)| name.as_str()).collect()
  }

  #[test]
  fn test_builtin_fields_and_caps() {
    let config = SearchConfig::default();

    let packages = CatalogRules::for_kind(CatalogKind::Package, &config);
    assert_eq!(field_names(&packages), vec!["title", "description", "category"]);
    assert_eq!(packages.limit, 10);

    let plugins = CatalogRules::for_kind(CatalogKind::Plugin, &config);
    assert_eq!(field_names(&plugins), vec!["name", "description", "category"]);
    assert_eq!(plugins.limit, 10);

    let categories = CatalogRules::for_kind(CatalogKind::Category, &config);
    assert_eq!(field_names(&categories), vec!["name", "description"]);
    assert_eq!(categories.limit, 5);

    assert!(packages.fields.iter().all(|(_, rule)| rule.boost == 1.0));
  }

  #[test]
  fn test_caps_follow_config() {
    let config = SearchConfig::default().category_limit(2);
    assert_eq!(CatalogRules::for_kind(CatalogKind::Category, &config).limit, 2);
  }

  #[test]
  fn test_repeated_field_replaces_rule() {
    let rules = CatalogRules::builder(CatalogKind::Plugin)
      .field("name", FieldRule::default())
      .field("name", FieldRule::default().boost(0.5))
      .build();
    assert_eq!(rules.fields, vec![("name".to_string(), FieldRule { boost: 0.5 })]);
  }
}
