//! Place an order for the cart.

use anyhow::{bail, Result};
use dialoguer::Confirm;
use storefront_commerce::checkout::{CheckoutFlow, CheckoutState, CheckoutView};

use super::cart::print_cart;
use super::CheckoutArgs;
use crate::context::Context;
use crate::output::{format_money, state_badge};

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mut exchange = ctx.begin()?;
    let mut flow = CheckoutFlow::new();

    ctx.output.header("Checkout");

    // Step 1: Review
    ctx.output.step(1, 3, "Reviewing cart");
    let cart = ctx.storefront.get_cart(&exchange.jar).await?;
    if flow.view(cart.as_ref()) == CheckoutView::EmptyCart {
        if ctx.output.is_json() {
            ctx.output.json(flow.state());
        }
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }
    if !ctx.output.is_json() {
        print_cart(cart.as_ref(), ctx);
    }

    // Confirmation
    if !args.yes && !ctx.output.is_json() {
        ctx.output.info("");
        let confirmed = Confirm::new()
            .with_prompt("Place order?")
            .default(true)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Checkout cancelled");
            return Ok(());
        }
    }

    // Step 2: Place the order
    ctx.output.step(2, 3, "Placing order");
    let spinner = ctx.output.spinner("Processing...");
    let result = ctx.storefront.place_order(&mut exchange.jar, &mut flow).await;
    spinner.finish_and_clear();
    result?;

    ctx.finish(exchange)?;

    if ctx.output.is_json() {
        ctx.output.json(flow.state());
    }

    ctx.output.debug(&format!(
        "Checkout {} after {} attempt(s)",
        state_badge(flow.state()),
        flow.attempts()
    ));

    match flow.state() {
        CheckoutState::Success(order) => {
            ctx.output.step(3, 3, "Done");
            ctx.output.success("Order placed");
            ctx.output.kv("Order", &format!("#{}", order.order_number));
            ctx.output.kv("Items", &order.item_count().to_string());
            ctx.output.kv("Total", &format_money(&order.total_price));
            ctx.output.kv("Status", &order.customer_url);
            if let Some(location) = flow.redirect() {
                ctx.output.info(&format!("Returning to {}", location));
            }
            Ok(())
        }
        CheckoutState::Failed(reason) => bail!("Checkout failed: {}", reason),
        state => bail!("Checkout ended in unexpected state: {}", state.as_str()),
    }
}
