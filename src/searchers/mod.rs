//! Scoring building blocks.
//!
//! - [`similarity`]: the tiered exact / prefix / substring / fuzzy scorer for one text field.
//! - [`CatalogScanner`]: applies the scorer across a catalog's weighted fields,
//!   keeps the best field per record, then filters, ranks and caps.
//! - [`tokenizer`]: whitespace word splitting used by the fuzzy tier.

/// Scores and ranks the records of one catalog.
pub mod scanner;
/// Tiered string similarity.
pub mod similarity;
/// Whitespace tokenization.
pub mod tokenizer;

pub use scanner::CatalogScanner;
pub use similarity::{MatchTier, Scorer};
