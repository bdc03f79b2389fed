//! Ranking and cross-catalog merging of scored results.

use crate::types::ScoredResult;
use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

fn by_score_desc(a: &ScoredResult, b: &ScoredResult) -> Ordering {
  b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
}

/// Sort results by score, highest first.
///
/// The sort is stable: results with equal scores keep their input order.
#[cfg(feature = "parallel")]
pub fn rank(results: &mut [ScoredResult]) {
  results.par_sort_by(by_score_desc);
}

/// Sort results by score, highest first.
///
/// The sort is stable: results with equal scores keep their input order.
#[cfg(not(feature = "parallel"))]
pub fn rank(results: &mut [ScoredResult]) {
  results.sort_by(by_score_desc);
}

/// Concatenate per-catalog lists in the given order and rank the whole.
///
/// No cap is applied; the output holds every input result. Ties keep the
/// concatenation order, so for equal scores earlier lists come first.
pub fn merge(lists: &[&[ScoredResult]]) -> Vec<ScoredResult> {
  let mut merged: Vec<ScoredResult> = Vec::with_capacity(lists.iter().map(|l| l.len()).sum());
  for list in lists {
    merged.extend_from_slice(list);
  }
  rank(&mut merged);
  merged
}
