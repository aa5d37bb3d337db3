//! Built-in ACME catalog.

use crate::catalog::{
    Collection, Image, PriceRange, Product, ProductOption, ProductVariant, Seo, ALL_COLLECTION,
};
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use chrono::Utc;

/// The seed products, in catalog (relevance) order.
pub fn seed_products() -> Vec<Product> {
    vec![
        product(
            "1",
            "black-hoodie",
            "Acme Hoodie",
            "A comfortable, warm hoodie for everyday wear.",
            vec![
                ProductOption::new("Size", &["S", "M", "L", "XL"]),
                ProductOption::new("Color", &["Black", "Gray"]),
            ],
            vec![
                ProductVariant::new("1-1", "Small / Black", usd(5000))
                    .with_option("Size", "S")
                    .with_option("Color", "Black"),
                ProductVariant::new("1-2", "Medium / Black", usd(5000))
                    .with_option("Size", "M")
                    .with_option("Color", "Black"),
            ],
            "https://images.unsplash.com/photo-1556905055-8f358a7a47b2?auto=format&fit=crop&w=800&q=80",
            &["Hoodie", "Clothing"],
        ),
        product(
            "2",
            "acme-t-shirt",
            "Acme T-Shirt",
            "A classic t-shirt for any occasion.",
            vec![
                ProductOption::new("Size", &["S", "M", "L", "XL"]),
                ProductOption::new("Color", &["White", "Gray"]),
            ],
            vec![ProductVariant::new("2-1", "Small", usd(2500))
                .with_option("Size", "s")
                .with_option("Color", "White")],
            "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?auto=format&fit=crop&w=800&q=80",
            &["T-Shirt", "Clothing"],
        ),
        product(
            "3",
            "acme-mug",
            "Acme Mug",
            "A sturdy mug for your morning coffee.",
            Vec::new(),
            vec![ProductVariant::new("3-1", "Default Title", usd(1500))],
            "https://images.unsplash.com/photo-1514228742587-6b1558fcca3d?auto=format&fit=crop&w=800&q=80",
            &["Mug", "Accessories"],
        ),
    ]
}

/// The seed collections. `all` comes first and is the parent of the rest.
pub fn seed_collections() -> Vec<Collection> {
    vec![
        Collection::new(ALL_COLLECTION, "All Products", "All of our products."),
        Collection::new("clothing", "Clothing", "Our clothing collection.")
            .with_parent(ALL_COLLECTION, "All Products"),
        Collection::new("accessories", "Accessories", "Our accessories collection.")
            .with_parent(ALL_COLLECTION, "All Products"),
    ]
}

fn usd(cents: i64) -> Money {
    Money::new(cents, Currency::USD)
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    handle: &str,
    title: &str,
    description: &str,
    options: Vec<ProductOption>,
    variants: Vec<ProductVariant>,
    image_url: &str,
    tags: &[&str],
) -> Product {
    let price_range = PriceRange::from_variants(&variants).unwrap_or(PriceRange {
        max_variant_price: Money::zero(Currency::USD),
        min_variant_price: Money::zero(Currency::USD),
    });
    let image = Image {
        url: image_url.to_string(),
        alt_text: title.to_string(),
        width: 800,
        height: 800,
    };

    Product {
        id: ProductId::new(id),
        handle: handle.to_string(),
        available_for_sale: variants.iter().any(|v| v.available_for_sale),
        title: title.to_string(),
        description: description.to_string(),
        description_html: format!("<p>{}</p>", description),
        options,
        price_range,
        variants,
        featured_image: image.clone(),
        images: vec![image],
        seo: Seo {
            title: title.to_string(),
            description: description.to_string(),
        },
        tags: tags.iter().map(|t| t.to_string()).collect(),
        updated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_handles_are_unique() {
        let products = seed_products();
        let handles: HashSet<_> = products.iter().map(|p| p.handle.as_str()).collect();
        assert_eq!(handles.len(), products.len());
    }

    #[test]
    fn test_seed_variant_ids_are_unique() {
        let products = seed_products();
        let ids: Vec<_> = products
            .iter()
            .flat_map(|p| p.variants.iter().map(|v| v.id.as_str()))
            .collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(ids, vec!["1-1", "1-2", "2-1", "3-1"]);
    }

    #[test]
    fn test_seed_prices() {
        let products = seed_products();
        let hoodie = &products[0];
        assert_eq!(hoodie.price_range.min_variant_price.display_amount(), "50.00");
        assert_eq!(products[1].min_price().display_amount(), "25.00");
        assert_eq!(products[2].min_price().display_amount(), "15.00");
        assert_eq!(hoodie.description_html, "<p>A comfortable, warm hoodie for everyday wear.</p>");
    }

    #[test]
    fn test_seed_collections() {
        let collections = seed_collections();
        assert_eq!(collections.len(), 3);
        assert!(collections[0].is_all());
        assert_eq!(collections[1].parent_category_tree[0].name, "All Products");
    }
}
