//! Core data types for catalog search.

use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Type alias for catalog record identifiers.
pub type EntityId = String;

/// The three searchable catalogs.
///
/// The declaration order is also the merge order: packages, then plugins,
/// then categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
  /// Service packages.
  Package,
  /// Add-on plugins.
  Plugin,
  /// Categories that packages and plugins are filed under.
  Category,
}

impl CatalogKind {
  /// Every catalog, in merge order.
  pub const ALL: [CatalogKind; 3] = [CatalogKind::Package, CatalogKind::Plugin, CatalogKind::Category];

  /// The lowercase name used in logs and in the `type` tag of results.
  pub fn as_str(&self) -> &'static str {
    match self {
      CatalogKind::Package => "package",
      CatalogKind::Plugin => "plugin",
      CatalogKind::Category => "category",
    }
  }
}

impl fmt::Display for CatalogKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A service package as the package catalog hands it out.
///
/// Keys other than the ones named here are kept in `extra` and written back
/// out untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
  /// Identifier; `_id` is accepted on input.
  #[serde(alias = "_id")]
  pub id: EntityId,
  /// Display title.
  #[serde(default)]
  pub title: String,
  /// Free-text description, if any.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  /// Name of the category the package is filed under.
  #[serde(
    default,
    deserialize_with = "deserialize_category",
    skip_serializing_if = "Option::is_none"
  )]
  pub category: Option<String>,
  /// Every other key of the record, kept as-is.
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// An add-on plugin as the plugin catalog hands it out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginRecord {
  #[serde(alias = "_id")]
  pub id: EntityId,
  #[serde(default)]
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(
    default,
    deserialize_with = "deserialize_category",
    skip_serializing_if = "Option::is_none"
  )]
  pub category: Option<String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// A category as the category catalog hands it out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
  #[serde(alias = "_id")]
  pub id: EntityId,
  #[serde(default)]
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl PackageRecord {
  /// Create a package with no description, category or extra keys.
  ///
  /// # Arguments
  ///
  /// * `id` - The catalog identifier.
  /// * `title` - The display title, which is the primary scored field.
  pub fn new(id: impl Into<EntityId>, title: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      title: title.into(),
      ..Default::default()
    }
  }

  /// Sets the free-text description.
  pub fn description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  /// Sets the name of the category the package is filed under.
  pub fn category(mut self, category: impl Into<String>) -> Self {
    self.category = Some(category.into());
    self
  }
}

impl PluginRecord {
  /// Create a plugin with only an id and a name.
  pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      ..Default::default()
    }
  }

  pub fn description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  /// Sets the name of the category the plugin is filed under.
  pub fn category(mut self, category: impl Into<String>) -> Self {
    self.category = Some(category.into());
    self
  }
}

impl CategoryRecord {
  /// Create a category with only an id and a name.
  pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      ..Default::default()
    }
  }

  pub fn description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }
}

/// Accepts `"category": "Design"` as well as `"category": { "name": "Design", ... }`.
fn deserialize_category<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum CategoryField {
    Name(String),
    Ref { name: Option<String> },
  }

  let field: Option<CategoryField> = Option::deserialize(deserializer)?;
  Ok(field.and_then(|field| match field {
    CategoryField::Name(name) => Some(name),
    CategoryField::Ref { name } => name,
  }))
}

/// Keys a search result writes itself.
///
/// A pass-through key with one of these names is moved under `meta` on the
/// wire so it cannot shadow the result's own value.
pub const RESERVED_KEYS: [&str; 4] = ["type", "score", "fieldScores", "meta"];

/// A catalog record projected for scoring.
///
/// Serialized with a `type` tag (`"package"`, `"plugin"` or `"category"`)
/// next to the record's own keys. Pass-through keys named in
/// [`RESERVED_KEYS`] are nested under `meta`.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchableItem {
  Package(PackageRecord),
  Plugin(PluginRecord),
  Category(CategoryRecord),
}

impl SearchableItem {
  /// The catalog the record came from.
  pub fn kind(&self) -> CatalogKind {
    match self {
      SearchableItem::Package(_) => CatalogKind::Package,
      SearchableItem::Plugin(_) => CatalogKind::Plugin,
      SearchableItem::Category(_) => CatalogKind::Category,
    }
  }

  pub fn id(&self) -> &str {
    match self {
      SearchableItem::Package(p) => &p.id,
      SearchableItem::Plugin(p) => &p.id,
      SearchableItem::Category(c) => &c.id,
    }
  }

  /// Returns the text of a named field, if the record has one.
  ///
  /// Known fields are read from the typed record. Any other name is looked
  /// up in the pass-through keys, where strings and numbers are accepted.
  pub fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
    let known = match (self, field) {
      (SearchableItem::Package(p), "title") => Some(Some(p.title.as_str())),
      (SearchableItem::Package(p), "description") => Some(p.description.as_deref()),
      (SearchableItem::Package(p), "category") => Some(p.category.as_deref()),
      (SearchableItem::Plugin(p), "name") => Some(Some(p.name.as_str())),
      (SearchableItem::Plugin(p), "description") => Some(p.description.as_deref()),
      (SearchableItem::Plugin(p), "category") => Some(p.category.as_deref()),
      (SearchableItem::Category(c), "name") => Some(Some(c.name.as_str())),
      (SearchableItem::Category(c), "description") => Some(c.description.as_deref()),
      _ => None,
    };

    if let Some(text) = known {
      return text.map(Cow::Borrowed);
    }

    match self.extra().get(field)? {
      Value::String(s) => Some(Cow::Borrowed(s.as_str())),
      Value::Number(n) => Some(Cow::Owned(n.to_string())),
      _ => None,
    }
  }

  /// The pass-through keys of the underlying record.
  pub fn extra(&self) -> &Map<String, Value> {
    match self {
      SearchableItem::Package(p) => &p.extra,
      SearchableItem::Plugin(p) => &p.extra,
      SearchableItem::Category(c) => &c.extra,
    }
  }

  /// The record's keys as written on the wire: the `type` tag, the record's
  /// own keys, and any reserved pass-through keys nested under `meta`.
  fn wire_fields(&self) -> serde_json::Result<Map<String, Value>> {
    let record = match self {
      SearchableItem::Package(p) => serde_json::to_value(p)?,
      SearchableItem::Plugin(p) => serde_json::to_value(p)?,
      SearchableItem::Category(c) => serde_json::to_value(c)?,
    };
    let record = match record {
      Value::Object(fields) => fields,
      _ => Map::new(),
    };

    let mut fields = Map::new();
    let mut meta = Map::new();
    for (key, value) in record {
      if RESERVED_KEYS.contains(&key.as_str()) {
        meta.insert(key, value);
      } else {
        fields.insert(key, value);
      }
    }
    fields.insert("type".to_string(), Value::from(self.kind().as_str()));
    if !meta.is_empty() {
      fields.insert("meta".to_string(), Value::Object(meta));
    }
    Ok(fields)
  }
}

impl Serialize for SearchableItem {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    self.wire_fields().map_err(S::Error::custom)?.serialize(serializer)
  }
}

impl From<PackageRecord> for SearchableItem {
  fn from(record: PackageRecord) -> Self {
    SearchableItem::Package(record)
  }
}

impl From<PluginRecord> for SearchableItem {
  fn from(record: PluginRecord) -> Self {
    SearchableItem::Plugin(record)
  }
}

impl From<CategoryRecord> for SearchableItem {
  fn from(record: CategoryRecord) -> Self {
    SearchableItem::Category(record)
  }
}

/// A record that matched the query, with its final score.
///
/// Serialized flat: the record's wire keys (see [`SearchableItem`]) followed
/// by `score` and, when any field was scored, `fieldScores`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResult {
  /// The matched record, carrying its `type` tag.
  pub item: SearchableItem,
  /// The best field score, in `(0, 100]`.
  pub score: f64,
  /// Score of every field that had text, keyed by field name.
  pub field_scores: BTreeMap<String, f64>,
}

impl Serialize for ScoredResult {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    let fields = self.item.wire_fields().map_err(S::Error::custom)?;
    let mut map = serializer.serialize_map(None)?;
    for (key, value) in &fields {
      map.serialize_entry(key, value)?;
    }
    map.serialize_entry("score", &self.score)?;
    if !self.field_scores.is_empty() {
      map.serialize_entry("fieldScores", &self.field_scores)?;
    }
    map.end()
  }
}

impl ScoredResult {
  /// Wrap a matched record with its final score and no field breakdown.
  pub fn new(item: SearchableItem, score: f64) -> Self {
    Self {
      item,
      score,
      field_scores: BTreeMap::new(),
    }
  }

  /// Record the score one field reached.
  pub fn with_field_score(mut self, field: impl Into<String>, score: f64) -> Self {
    self.field_scores.insert(field.into(), score);
    self
  }

  pub fn kind(&self) -> CatalogKind {
    self.item.kind()
  }

  pub fn id(&self) -> &str {
    self.item.id()
  }
}

/// The outward result of one search.
///
/// `total_results` always equals `all_results.len()`, which in turn equals
/// the sum of the three per-catalog lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
  /// Best package matches, at most the package limit.
  pub packages: Vec<ScoredResult>,
  /// Best plugin matches, at most the plugin limit.
  pub plugins: Vec<ScoredResult>,
  /// Best category matches, at most the category limit.
  pub categories: Vec<ScoredResult>,
  /// The three lists above merged and ranked by score.
  pub all_results: Vec<ScoredResult>,
  /// The normalized query the results were computed for.
  pub query: String,
  pub total_results: usize,
  /// Set when the search was rejected or failed while scoring.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl SearchResponse {
  /// A response with no results at all.
  pub fn empty(query: impl Into<String>) -> Self {
    Self {
      query: query.into(),
      ..Default::default()
    }
  }

  /// An empty response carrying a diagnostic.
  pub fn failed(query: impl Into<String>, error: impl Into<String>) -> Self {
    Self {
      query: query.into(),
      error: Some(error.into()),
      ..Default::default()
    }
  }

  /// Returns the per-catalog list for `kind`.
  pub fn bucket(&self, kind: CatalogKind) -> &[ScoredResult] {
    match kind {
      CatalogKind::Package => &self.packages,
      CatalogKind::Plugin => &self.plugins,
      CatalogKind::Category => &self.categories,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.total_results == 0
  }
}
