//! Cart commands.

use anyhow::Result;
use storefront_commerce::cart::Cart;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::format_money;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => show_cart(ctx).await,
        CartCommand::Add { variant } => add_item(&variant, ctx).await,
        CartCommand::Update { line, quantity } => update_item(&line, quantity, ctx).await,
        CartCommand::Remove { line } => update_item(&line, 0, ctx).await,
    }
}

async fn show_cart(ctx: &Context) -> Result<()> {
    let exchange = ctx.begin()?;
    let cart = ctx.storefront.get_cart(&exchange.jar).await?;
    ctx.finish(exchange)?;

    print_cart(cart.as_ref(), ctx);
    Ok(())
}

async fn add_item(variant: &str, ctx: &Context) -> Result<()> {
    let mut exchange = ctx.begin()?;
    let before = ctx.storefront.get_cart(&exchange.jar).await?;
    let cart = ctx
        .storefront
        .add_item(&mut exchange.jar, Some(variant))
        .await?;
    let changed = exchange.jar.has_changes();
    ctx.finish(exchange)?;

    if changed {
        ctx.output.success(&format!("Added {} to cart", variant));
    } else {
        ctx.output.warn(&format!("Variant not found: {}", variant));
    }
    print_cart(cart.as_ref().or(before.as_ref()), ctx);
    Ok(())
}

async fn update_item(line: &str, quantity: i64, ctx: &Context) -> Result<()> {
    let mut exchange = ctx.begin()?;
    let cart = ctx
        .storefront
        .update_item(&mut exchange.jar, line, quantity)
        .await?;
    ctx.finish(exchange)?;

    match &cart {
        None => ctx.output.warn("No cart yet. Add an item first."),
        Some(_) if quantity <= 0 => ctx.output.success(&format!("Removed {}", line)),
        Some(_) => ctx
            .output
            .success(&format!("Set quantity of {} to {}", line, quantity)),
    }
    print_cart(cart.as_ref(), ctx);
    Ok(())
}

/// Print a cart, or an empty-cart notice.
pub fn print_cart(cart: Option<&Cart>, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&cart);
        return;
    }

    let Some(cart) = cart.filter(|c| !c.is_empty()) else {
        ctx.output.info("Your cart is empty.");
        return;
    };

    ctx.output.header(&format!("Cart ({} items)", cart.total_quantity));
    let widths = [12, 32, 5, 12];
    ctx.output.table_row(&["LINE", "ITEM", "QTY", "TOTAL"], &widths);
    for line in &cart.lines {
        let item = format!("{} ({})", line.merchandise.product.title, line.merchandise.title);
        let quantity = line.quantity.to_string();
        let total = format_money(&line.cost.total_amount);
        ctx.output.table_row(
            &[line.id.as_str(), &item, &quantity, &total],
            &widths,
        );
    }

    ctx.output.info("");
    ctx.output.kv("Subtotal", &format_money(&cart.cost.subtotal_amount));
    ctx.output.kv("Total", &format_money(&cart.cost.total_amount));
}
