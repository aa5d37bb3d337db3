//! Storefront domain types and logic.
//!
//! - **Catalog**: products, variants, collections and the read-only provider
//! - **Cart**: cart lines priced from their stored unit price
//! - **Checkout**: order snapshots and the checkout state machine
//! - **Search**: product and collection queries
//!
//! # Example
//!
//! ```rust
//! use storefront_commerce::prelude::*;
//!
//! let products = seed_products();
//! let hoodie = &products[0];
//!
//! let mut cart = Cart::new();
//! cart.add_variant(hoodie, &hoodie.variants[0]).unwrap();
//! cart.add_variant(hoodie, &hoodie.variants[0]).unwrap();
//! assert_eq!(cart.cost.total_amount.display_amount(), "100.00");
//!
//! let order = Order::from_cart(&cart).unwrap();
//! assert_eq!(order.total_price, cart.cost.total_amount);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod search;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        seed_collections, seed_products, CatalogProvider, Collection, Image, PriceRange, Product,
        ProductOption, ProductVariant, SelectedOption, StaticCatalog,
    };

    // Cart
    pub use crate::cart::{Cart, CartCost, CartLine, LineCost, Merchandise};

    // Checkout
    pub use crate::checkout::{CheckoutFlow, CheckoutState, CheckoutView, Order};

    // Search
    pub use crate::search::{CollectionQuery, ProductQuery, SortOption};
}
