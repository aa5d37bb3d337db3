//! Cart and cart line types.

use crate::cart::{CartCost, LineCost};
use crate::catalog::{Product, ProductVariant, SelectedOption};
use crate::error::CommerceError;
use crate::ids::{CartId, CartLineId, VariantId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Where the cart hands off to checkout.
pub const CHECKOUT_URL: &str = "/checkout";

/// A shopping cart.
///
/// `cost` and `total_quantity` are derived from `lines` and refreshed by
/// every mutating method.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    /// Checkout reference.
    pub checkout_url: String,
    /// Aggregate cost.
    pub cost: CartCost,
    /// Sum of line quantities.
    pub total_quantity: i64,
    /// Lines in insertion order.
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self {
            id: CartId::generate(),
            checkout_url: CHECKOUT_URL.to_string(),
            cost: CartCost::zero(Currency::USD),
            total_quantity: 0,
            lines: Vec::new(),
        }
    }

    /// Add one unit of a variant.
    ///
    /// An existing line for the variant is incremented; otherwise a new
    /// line of quantity one is appended at the variant's price.
    pub fn add_variant(
        &mut self,
        product: &Product,
        variant: &ProductVariant,
    ) -> Result<CartLineId, CommerceError> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.merchandise.id == variant.id) {
            let quantity = line.quantity.checked_add(1).ok_or(CommerceError::Overflow)?;
            line.set_quantity(quantity)?;
            let id = line.id.clone();
            self.recalculate()?;
            return Ok(id);
        }

        let line = CartLine::new(product, variant)?;
        let id = line.id.clone();
        self.lines.push(line);
        self.recalculate()?;
        Ok(id)
    }

    /// Set the quantity of a line, matched by line id or merchandise id.
    ///
    /// A quantity of zero or less removes every matching line; otherwise
    /// only the first match is updated. Returns the number of lines
    /// affected, which is zero for an unknown id.
    pub fn update_line(&mut self, line_id: &str, quantity: i64) -> Result<usize, CommerceError> {
        let affected = if quantity <= 0 {
            let before = self.lines.len();
            self.lines.retain(|l| !l.matches(line_id));
            before - self.lines.len()
        } else {
            match self.lines.iter_mut().find(|l| l.matches(line_id)) {
                Some(line) => {
                    line.set_quantity(quantity)?;
                    1
                }
                None => 0,
            }
        };

        self.recalculate()?;
        Ok(affected)
    }

    /// Recompute `cost` and `total_quantity` from the lines.
    pub fn recalculate(&mut self) -> Result<(), CommerceError> {
        self.cost = CartCost::from_lines(&self.lines)?;
        self.total_quantity = self
            .lines
            .iter()
            .try_fold(0_i64, |sum, l| sum.checked_add(l.quantity))
            .ok_or(CommerceError::Overflow)?;
        Ok(())
    }

    /// Look up a line by its id.
    pub fn line(&self, line_id: &CartLineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.id == line_id)
    }

    /// Check if cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

/// A line in the cart: one variant and its quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Unique line identifier.
    pub id: CartLineId,
    /// Quantity, always positive.
    pub quantity: i64,
    /// Price of one unit, captured when the line was created.
    pub unit_price: Money,
    /// Line total.
    pub cost: LineCost,
    /// Snapshot of the purchased variant.
    pub merchandise: Merchandise,
}

impl CartLine {
    /// Create a line of quantity one for a variant.
    pub fn new(product: &Product, variant: &ProductVariant) -> Result<Self, CommerceError> {
        Ok(Self {
            id: CartLineId::generate(),
            quantity: 1,
            unit_price: variant.price,
            cost: LineCost::for_quantity(variant.price, 1)?,
            merchandise: Merchandise {
                id: variant.id.clone(),
                title: variant.title.clone(),
                selected_options: variant.selected_options.clone(),
                product: product.clone(),
            },
        })
    }

    /// Set the quantity and reprice from the stored unit price.
    pub fn set_quantity(&mut self, quantity: i64) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        self.cost = LineCost::for_quantity(self.unit_price, quantity)?;
        self.quantity = quantity;
        Ok(())
    }

    fn matches(&self, id: &str) -> bool {
        self.id.as_str() == id || self.merchandise.id.as_str() == id
    }
}

/// What a cart line buys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Merchandise {
    /// Variant id.
    pub id: VariantId,
    /// Variant title.
    pub title: String,
    /// Variant option values.
    pub selected_options: Vec<SelectedOption>,
    /// Owning product.
    pub product: Product,
}
