//! Tiered string similarity between a query and a single text field.
//!
//! Tiers are tried in order and the first one that applies decides the score:
//!
//! | tier      | condition (both sides lower-cased)  | score          |
//! |-----------|-------------------------------------|----------------|
//! | exact     | `text == query`                     | 100            |
//! | prefix    | `text.starts_with(query)`           | 80             |
//! | substring | `text.contains(query)`              | 60             |
//! | fuzzy     | best word similarity                | `0.0 ..= 50.0` |
//!
//! The fuzzy tier compares every whitespace-separated word of the text with
//! every term of the query using a normalized Levenshtein similarity
//! (`1 - distance / max(len)`), and scales the best pair to the `0..=50` range.

use crate::query::SearchQuery;
use crate::searchers::tokenizer::words;
use serde::Serialize;

/// Score of an exact match.
pub const EXACT_SCORE: f64 = 100.0;
/// Score of a prefix match.
pub const PREFIX_SCORE: f64 = 80.0;
/// Score of a substring match.
pub const SUBSTRING_SCORE: f64 = 60.0;
/// Upper bound of the fuzzy tier.
pub const FUZZY_CEILING: f64 = 50.0;
/// Largest score any field can reach.
pub const MAX_SCORE: f64 = EXACT_SCORE;

/// Which tier produced a field score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
  Exact,
  Prefix,
  Substring,
  Fuzzy,
}

/// The outcome of scoring one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMatch {
  pub tier: MatchTier,
  pub score: f64,
}

/// Scores text fields against one normalized query.
///
/// Build one per query and reuse it for every field of every record, so the
/// query terms are only split once.
#[derive(Debug, Clone)]
pub struct Scorer<'q> {
  query: &'q str,
  terms: Vec<&'q str>,
}

impl<'q> Scorer<'q> {
  /// Create a scorer for a normalized query.
  ///
  /// # Arguments
  ///
  /// * `query` - The query every field will be compared with. Its terms feed
  ///   the fuzzy tier.
  pub fn new(query: &'q SearchQuery) -> Self {
    Self {
      query: query.as_str(),
      terms: query.terms().collect(),
    }
  }

  /// `query` must already be lower-case.
  fn from_normalized(query: &'q str) -> Self {
    Self {
      query,
      terms: words(query).collect(),
    }
  }

  /// Returns the score of `text`, in `[0, 100]`.
  pub fn score(&self, text: &str) -> f64 {
    self.classify(text).score
  }

  /// Returns the tier and score of `text`.
  pub fn classify(&self, text: &str) -> FieldMatch {
    let text = text.to_lowercase();

    if text == self.query {
      return FieldMatch {
        tier: MatchTier::Exact,
        score: EXACT_SCORE,
      };
    }
    if text.starts_with(self.query) {
      return FieldMatch {
        tier: MatchTier::Prefix,
        score: PREFIX_SCORE,
      };
    }
    if text.contains(self.query) {
      return FieldMatch {
        tier: MatchTier::Substring,
        score: SUBSTRING_SCORE,
      };
    }

    // An empty text has no words and so scores 0 here.
    let best = words(&text)
      .flat_map(|word| self.terms.iter().map(move |term| normalized_similarity(word, term)))
      .fold(0.0_f64, f64::max);

    FieldMatch {
      tier: MatchTier::Fuzzy,
      score: best * FUZZY_CEILING,
    }
  }
}

/// Scores `text` against `query`, ignoring case on both sides.
pub fn score(text: &str, query: &str) -> f64 {
  let query = query.to_lowercase();
  Scorer::from_normalized(&query).score(text)
}

/// Levenshtein edit distance in characters (insert, delete and substitute all cost 1).
pub fn levenshtein(a: &str, b: &str) -> usize {
  strsim::levenshtein(a, b)
}

/// `1 - distance / max(len(a), len(b))`, or 0 when both strings are empty.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
  let max_len = a.chars().count().max(b.chars().count());
  if max_len == 0 {
    return 0.0;
  }
  1.0 - levenshtein(a, b) as f64 / max_len as f64
}
