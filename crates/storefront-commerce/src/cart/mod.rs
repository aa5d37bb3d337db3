//! Shopping cart module.
//!
//! Contains the cart, its lines and their pricing.

mod cart;
mod pricing;

pub use cart::{Cart, CartLine, Merchandise, CHECKOUT_URL};
pub use pricing::{CartCost, LineCost};
