//! Product catalog module.
//!
//! Contains product and collection types, the seed catalog and the
//! provider trait used to read it.

mod collection;
mod product;
mod provider;
mod seed;

pub use collection::{collection_tag, CategoryRef, Collection, ALL_COLLECTION};
pub use product::{
    Image, OptionValue, PriceRange, Product, ProductOption, ProductVariant, SelectedOption, Seo,
};
pub use provider::{CatalogProvider, StaticCatalog};
pub use seed::{seed_collections, seed_products};
