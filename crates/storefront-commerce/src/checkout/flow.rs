//! Checkout flow state machine.
//!
//! ```text
//! Idle --begin--> Processing --complete(Some)--> Success(order)
//!                            --complete(None)--> Failed(reason) --retry--> Idle
//! ```

use crate::cart::Cart;
use crate::checkout::Order;
use crate::CommerceError;
use serde::{Deserialize, Serialize};

/// Where the client navigates after a successful checkout.
pub const STOREFRONT_ROOT: &str = "/";

/// Reason recorded when the order creator returns nothing.
pub const EMPTY_ORDER_REASON: &str = "cart is empty or no longer exists";

/// States of the checkout flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "state", content = "detail", rename_all = "lowercase")]
pub enum CheckoutState {
    /// Cart displayed, nothing submitted.
    #[default]
    Idle,
    /// Order submission in flight.
    Processing,
    /// Order placed.
    Success(Order),
    /// Order creation failed.
    Failed(String),
}

impl CheckoutState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Idle => "idle",
            CheckoutState::Processing => "processing",
            CheckoutState::Success(_) => "success",
            CheckoutState::Failed(_) => "failed",
        }
    }

    /// Check if no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutState::Success(_))
    }
}

/// What the checkout page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckoutView {
    /// Nothing to check out.
    EmptyCart,
    /// Cart lines and the place-order action.
    Review,
    /// Waiting for the order.
    Processing,
    /// Order number and the link back to the storefront.
    Confirmation,
    /// Failure reason and the retry action.
    Failed,
}

/// Client-side checkout flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CheckoutFlow {
    state: CheckoutState,
    /// Number of submissions so far.
    attempts: u32,
}

impl CheckoutFlow {
    /// Create a flow in the idle state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The placed order, once the flow has succeeded.
    pub fn order(&self) -> Option<&Order> {
        match &self.state {
            CheckoutState::Success(order) => Some(order),
            _ => None,
        }
    }

    /// Submit the order: `Idle -> Processing`.
    pub fn begin(&mut self) -> Result<(), CommerceError> {
        match self.state {
            CheckoutState::Idle => {
                self.state = CheckoutState::Processing;
                self.attempts += 1;
                Ok(())
            }
            _ => Err(self.invalid("processing")),
        }
    }

    /// Apply the order creator's result: `Processing -> Success | Failed`.
    pub fn complete(&mut self, order: Option<Order>) -> Result<&CheckoutState, CommerceError> {
        match order {
            Some(order) => self.transition_from_processing(CheckoutState::Success(order)),
            None => self.fail(EMPTY_ORDER_REASON),
        }
    }

    /// Record a failure while processing: `Processing -> Failed`.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<&CheckoutState, CommerceError> {
        self.transition_from_processing(CheckoutState::Failed(reason.into()))
    }

    /// Return to the cart after a failure: `Failed -> Idle`.
    pub fn retry(&mut self) -> Result<(), CommerceError> {
        match self.state {
            CheckoutState::Failed(_) => {
                self.state = CheckoutState::Idle;
                Ok(())
            }
            _ => Err(self.invalid("idle")),
        }
    }

    /// Navigation target once the flow is done.
    ///
    /// Only a successful checkout navigates; reloading the root makes the
    /// client re-read the now cleared cart.
    pub fn redirect(&self) -> Option<&'static str> {
        self.order().map(|_| STOREFRONT_ROOT)
    }

    /// Derive the page to show from the flow and the current cart.
    pub fn view(&self, cart: Option<&Cart>) -> CheckoutView {
        match &self.state {
            CheckoutState::Processing => CheckoutView::Processing,
            CheckoutState::Success(_) => CheckoutView::Confirmation,
            CheckoutState::Failed(_) => CheckoutView::Failed,
            CheckoutState::Idle => match cart {
                Some(cart) if !cart.is_empty() => CheckoutView::Review,
                _ => CheckoutView::EmptyCart,
            },
        }
    }

    fn transition_from_processing(
        &mut self,
        next: CheckoutState,
    ) -> Result<&CheckoutState, CommerceError> {
        if self.state != CheckoutState::Processing {
            return Err(self.invalid(next.as_str()));
        }
        self.state = next;
        Ok(&self.state)
    }

    fn invalid(&self, to: &str) -> CommerceError {
        CommerceError::InvalidCheckoutTransition {
            from: self.state.as_str().to_string(),
            to: to.to_string(),
        }
    }
}
