//! Catalog search - free-text search and ranking over service packages,
//! plugins and categories.
//!
//! A query is normalized once, scored against each catalog's weighted fields
//! with a tiered similarity (exact, prefix, substring, then Levenshtein-based
//! fuzzy), capped per catalog and merged into one ranked list.
//!
//! ```rust
//! use catalog_search::prelude::*;
//!
//! let catalog = InMemoryCatalog::new()
//!     .with_package(PackageRecord::new("pk1", "Professional Logo Design"))
//!     .with_category(CategoryRecord::new("c1", "Logo Design"));
//!
//! let engine = SearchEngine::builder(catalog).build();
//! let response = engine.search("  Logo ");
//!
//! assert_eq!(response.query, "logo");
//! assert_eq!(response.categories[0].score, 80.0);
//! assert_eq!(response.packages[0].score, 60.0);
//! assert_eq!(response.total_results, 2);
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod merge;
pub mod query;
pub mod rules;
pub mod searchers;
pub mod types;

pub use error::{Error, Result};

pub mod prelude {
  //! Convenient re-exports for common types and traits.

  pub use crate::cache::{Clock, ManualClock, ResultCache, SystemClock};
  pub use crate::catalog::*;
  pub use crate::config::*;
  pub use crate::engine::*;
  pub use crate::error::Error;
  pub use crate::query::*;
  pub use crate::rules::*;
  pub use crate::searchers::*;
  pub use crate::types::*;
}
