//! Catalog browsing commands.

use anyhow::{bail, Result};
use storefront_commerce::catalog::{collection_tag, Product};
use storefront_commerce::search::{CollectionQuery, ProductQuery, SortOption};

use super::{CollectionArgs, ProductArgs, ProductsArgs};
use crate::context::Context;
use crate::output::format_money;

/// List products.
pub async fn products(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let sort = parse_sort(&args.sort, ctx);
    let mut query = ProductQuery::new().with_sort(sort).reversed(args.reverse);
    if let Some(q) = args.query {
        query = query.with_query(q);
    }
    if args.limit > 0 {
        query = query.with_limit(args.limit);
    }

    let products = ctx.storefront.catalog().products(&query).await;

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header(&format!("Products ({})", sort.display_name()));
    print_products(&products, ctx);
    Ok(())
}

/// Show one product with its variants.
pub async fn product(args: ProductArgs, ctx: &Context) -> Result<()> {
    let Some(product) = ctx.storefront.catalog().product(&args.handle).await else {
        bail!("Product not found: {}", args.handle);
    };

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.header(&product.title);
    ctx.output.kv("handle", &product.handle);
    ctx.output.kv("description", &product.description);
    ctx.output.kv("price", &price_label(&product));
    if !product.tags.is_empty() {
        ctx.output.kv("tags", &product.tags.join(", "));
    }
    if !product.available_for_sale {
        ctx.output.warn("Not available for sale");
    }

    ctx.output.info("");
    ctx.output.info("Variants:");
    let widths = [8, 20, 12];
    ctx.output.table_row(&["ID", "TITLE", "PRICE"], &widths);
    for variant in &product.variants {
        let price = format_money(&variant.price);
        ctx.output
            .table_row(&[variant.id.as_str(), &variant.title, &price], &widths);
    }

    ctx.output.info("");
    ctx.output.info(&format!(
        "Add to cart with: storefront cart add {}",
        product.variants.first().map(|v| v.id.as_str()).unwrap_or("<variant>")
    ));
    Ok(())
}

/// List collections.
pub async fn collections(ctx: &Context) -> Result<()> {
    let collections = ctx.storefront.catalog().collections().await;

    if ctx.output.is_json() {
        ctx.output.json(&collections);
        return Ok(());
    }

    ctx.output.header("Collections");
    for collection in &collections {
        ctx.output.list_item(&format!(
            "{} ({}) - {}",
            collection.title, collection.handle, collection.description
        ));
    }
    Ok(())
}

/// List the products of a collection.
pub async fn collection(args: CollectionArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.storefront.catalog();
    // Unknown handles still list the products tagged with the handle.
    let collection = catalog.collection(&args.handle).await;
    if collection.is_none() {
        ctx.output
            .debug(&format!("No collection '{}', filtering by tag", args.handle));
    }

    let sort = parse_sort(&args.sort, ctx);
    let mut query = CollectionQuery::new(&args.handle)
        .with_sort(sort)
        .reversed(args.reverse);
    if let Some(q) = args.query {
        query = query.with_query(q);
    }

    let products = catalog.collection_products(&query).await;

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    match &collection {
        Some(collection) => {
            ctx.output.header(&collection.title);
            if !collection.parent_category_tree.is_empty() {
                let path: Vec<&str> = collection
                    .parent_category_tree
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect();
                ctx.output.kv("in", &path.join(" / "));
            }
        }
        None => ctx.output.header(&collection_tag(&args.handle)),
    }
    print_products(&products, ctx);
    Ok(())
}

fn parse_sort(key: &str, ctx: &Context) -> SortOption {
    let sort = SortOption::from_key(key);
    if sort.key() != key {
        ctx.output
            .warn(&format!("Unknown sort key '{}', using {}", key, sort.key()));
    }
    sort
}

fn price_label(product: &Product) -> String {
    let min = &product.price_range.min_variant_price;
    let max = &product.price_range.max_variant_price;
    if min == max {
        format_money(min)
    } else {
        format!("{} - {}", format_money(min), format_money(max))
    }
}

fn print_products(products: &[Product], ctx: &Context) {
    if products.is_empty() {
        ctx.output.info("No products found");
        return;
    }

    let widths = [20, 24, 12];
    ctx.output.table_row(&["HANDLE", "TITLE", "PRICE"], &widths);
    for product in products {
        let price = price_label(product);
        ctx.output
            .table_row(&[product.handle.as_str(), &product.title, &price], &widths);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_commerce::catalog::seed_products;

    #[test]
    fn test_price_label() {
        let products = seed_products();
        assert_eq!(price_label(&products[2]), "15.00 USD");
    }
}
