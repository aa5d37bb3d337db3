//! ACME storefront core.
//!
//! Wires the catalog, cart persistence and the order log into a
//! [`Storefront`] and exposes the cart and checkout actions on it.
//!
//! # Architecture
//!
//! - Actions read the cart through a [`CartStore`], apply one change and
//!   save the whole cart back through the cookie jar of the request.
//! - The cart cookie carries either the cart itself or a session id,
//!   selected by [`PersistenceMode`].
//! - Every cart mutation revalidates the `cart` cache tag.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use storefront_core::prelude::*;
//!
//! let storefront = Storefront::builder(StorefrontConfig::default()).build();
//! let mut jar = CookieJar::from_headers(&request_headers);
//!
//! storefront.add_item(&mut jar, Some("1-1")).await?;
//!
//! let mut flow = CheckoutFlow::new();
//! storefront.place_order(&mut jar, &mut flow).await?;
//! if let Some(location) = flow.redirect() {
//!     // redirect the client
//! }
//! ```

pub mod config;
pub mod prelude;
pub mod store;

mod actions;
mod app;
mod error;
mod orders;

pub use app::{Storefront, StorefrontBuilder, SESSIONS_FILE};
pub use config::{Environment, PersistenceMode, StorefrontConfig};
pub use error::StorefrontError;
pub use orders::OrderLog;
pub use store::{CartStore, CookieCartStore, SessionCartStore};
