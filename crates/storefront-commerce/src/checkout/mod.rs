//! Checkout module.
//!
//! Contains the order snapshot and the checkout state machine.

mod flow;
mod order;

pub use flow::{CheckoutFlow, CheckoutState, CheckoutView, EMPTY_ORDER_REASON, STOREFRONT_ROOT};
pub use order::{Order, ORDER_NUMBER_LIMIT, ORDER_STATUS_URL};
