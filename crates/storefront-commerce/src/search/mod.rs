//! Search module.
//!
//! Query types accepted by the catalog provider.

mod query;

pub use query::{CollectionQuery, ProductQuery, SortOption};
