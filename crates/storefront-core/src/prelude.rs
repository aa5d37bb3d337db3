//! Prelude for convenient imports.
//!
//! ```rust,ignore
//! use storefront_core::prelude::*;
//! ```

pub use storefront_cache::{CacheTag, CookieJar, CookieOptions};
pub use storefront_commerce::prelude::*;

pub use crate::{
    CartStore, Environment, PersistenceMode, Storefront, StorefrontConfig, StorefrontError,
};
