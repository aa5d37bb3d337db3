//! Order types.

use crate::cart::{Cart, CartLine};
use crate::ids::OrderId;
use crate::money::Money;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) of generated order numbers.
pub const ORDER_NUMBER_LIMIT: u32 = 100_000;

/// Where a customer can follow up on an order.
pub const ORDER_STATUS_URL: &str = "/order/status";

/// An immutable snapshot of a cart at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Human-facing order number. Random and not guaranteed unique.
    pub order_number: u32,
    /// Order status page.
    pub customer_url: String,
    /// The cart lines at checkout time.
    pub line_items: Vec<CartLine>,
    /// The cart total at checkout time.
    pub total_price: Money,
    /// Creation time, serialized as RFC 3339.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Snapshot a cart. Returns `None` for a cart with no lines.
    pub fn from_cart(cart: &Cart) -> Option<Self> {
        if cart.is_empty() {
            return None;
        }

        Some(Self {
            id: OrderId::generate(),
            order_number: rand::thread_rng().gen_range(0..ORDER_NUMBER_LIMIT),
            customer_url: ORDER_STATUS_URL.to_string(),
            line_items: cart.lines.clone(),
            total_price: cart.cost.total_amount,
            created_at: Utc::now(),
        })
    }

    /// Sum of line quantities.
    pub fn item_count(&self) -> i64 {
        self.line_items.iter().map(|l| l.quantity).sum()
    }
}
