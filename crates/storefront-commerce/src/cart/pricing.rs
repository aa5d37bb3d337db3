//! Cart pricing calculations.

use crate::cart::CartLine;
use crate::error::CommerceError;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Aggregate cost of a cart.
///
/// Tax and shipping are never charged, so they are always zero and the
/// total equals the subtotal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    /// Sum of line totals.
    pub subtotal_amount: Money,
    /// Amount due.
    pub total_amount: Money,
    /// Tax amount.
    pub total_tax_amount: Money,
    /// Shipping amount.
    pub shipping_amount: Money,
}

impl CartCost {
    /// Zero cost in the given currency.
    pub fn zero(currency: Currency) -> Self {
        let zero = Money::zero(currency);
        Self {
            subtotal_amount: zero,
            total_amount: zero,
            total_tax_amount: zero,
            shipping_amount: zero,
        }
    }

    /// Sum the line totals.
    ///
    /// The currency is taken from the first line, falling back to USD for
    /// an empty cart. Lines in any other currency are a mismatch error.
    pub fn from_lines(lines: &[CartLine]) -> Result<Self, CommerceError> {
        let currency = lines
            .first()
            .map(|l| l.cost.total_amount.currency)
            .unwrap_or_default();

        let subtotal = lines.iter().try_fold(Money::zero(currency), |acc, line| {
            let amount = &line.cost.total_amount;
            if amount.currency != currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: currency.code().to_string(),
                    got: amount.currency.code().to_string(),
                });
            }
            acc.try_add(amount).ok_or(CommerceError::Overflow)
        })?;

        Ok(Self {
            subtotal_amount: subtotal,
            total_amount: subtotal,
            ..Self::zero(currency)
        })
    }
}

/// Cost of a single line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineCost {
    /// Unit price times quantity.
    pub total_amount: Money,
}

impl LineCost {
    /// Price `quantity` units.
    pub fn for_quantity(unit_price: Money, quantity: i64) -> Result<Self, CommerceError> {
        let total_amount = unit_price
            .try_multiply(quantity)
            .ok_or(CommerceError::Overflow)?;
        Ok(Self { total_amount })
    }
}
