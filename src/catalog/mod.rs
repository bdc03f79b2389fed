//! Catalog sources that feed the engine.

pub mod memory;
pub mod source;

pub use memory::InMemoryCatalog;
pub use source::CatalogSource;
