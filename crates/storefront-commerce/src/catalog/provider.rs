//! Read-only catalog lookup.

use async_trait::async_trait;

use crate::catalog::{
    collection_tag, seed_collections, seed_products, Collection, Product, ProductVariant,
    ALL_COLLECTION,
};
use crate::ids::VariantId;
use crate::search::{CollectionQuery, ProductQuery};

/// Source of products and collections.
///
/// All reads are infallible: an unknown handle is simply `None`.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Look up a product by its handle.
    async fn product(&self, handle: &str) -> Option<Product>;

    /// List products: query filter, then sort, then reverse, then limit.
    async fn products(&self, query: &ProductQuery) -> Vec<Product>;

    /// List every collection.
    async fn collections(&self) -> Vec<Collection>;

    /// Look up a collection by its handle.
    async fn collection(&self, handle: &str) -> Option<Collection>;

    /// List the products of a collection: query filter, then collection
    /// filter, then sort, then reverse.
    async fn collection_products(&self, query: &CollectionQuery) -> Vec<Product>;

    /// Resolve a variant id to the variant and its owning product.
    async fn find_variant(&self, variant_id: &VariantId) -> Option<(Product, ProductVariant)>;
}

/// Catalog over a fixed in-memory product list.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    products: Vec<Product>,
    collections: Vec<Collection>,
}

impl StaticCatalog {
    /// Create a catalog over the given data.
    pub fn new(products: Vec<Product>, collections: Vec<Collection>) -> Self {
        Self {
            products,
            collections,
        }
    }

    /// Create a catalog over the built-in ACME products.
    pub fn seeded() -> Self {
        Self::new(seed_products(), seed_collections())
    }

    fn matching(&self, query: Option<&str>) -> Vec<Product> {
        match query {
            Some(q) => self
                .products
                .iter()
                .filter(|p| p.matches_query(q))
                .cloned()
                .collect(),
            None => self.products.clone(),
        }
    }

    fn is_known_collection(&self, handle: &str) -> bool {
        self.collections.iter().any(|c| c.handle == handle)
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn product(&self, handle: &str) -> Option<Product> {
        self.products.iter().find(|p| p.handle == handle).cloned()
    }

    async fn products(&self, query: &ProductQuery) -> Vec<Product> {
        let mut products = self.matching(query.query.as_deref());

        query.sort_key.apply(&mut products);
        if query.reverse {
            products.reverse();
        }
        if let Some(limit) = query.limit.filter(|l| *l > 0) {
            products.truncate(limit);
        }
        products
    }

    async fn collections(&self) -> Vec<Collection> {
        self.collections.clone()
    }

    async fn collection(&self, handle: &str) -> Option<Collection> {
        self.collections.iter().find(|c| c.handle == handle).cloned()
    }

    async fn collection_products(&self, query: &CollectionQuery) -> Vec<Product> {
        let mut products = self.matching(query.query.as_deref());

        if query.collection != ALL_COLLECTION {
            let tag = collection_tag(&query.collection);
            let tagged: Vec<Product> = products.iter().filter(|p| p.has_tag(&tag)).cloned().collect();
            // Known collections always filter. For other handles a tag
            // nobody carries leaves the listing as is.
            if !tagged.is_empty() || self.is_known_collection(&query.collection) {
                products = tagged;
            }
        }

        query.sort_key.apply(&mut products);
        if query.reverse {
            products.reverse();
        }
        products
    }

    async fn find_variant(&self, variant_id: &VariantId) -> Option<(Product, ProductVariant)> {
        self.products
            .iter()
            .find_map(|p| p.variant(variant_id).map(|v| (p.clone(), v.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SortOption;

    fn handles(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.handle.as_str()).collect()
    }

    #[tokio::test]
    async fn test_product_by_handle() {
        let catalog = StaticCatalog::seeded();
        let mug = catalog.product("acme-mug").await.unwrap();
        assert_eq!(mug.title, "Acme Mug");
        assert!(catalog.product("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_products_default_order() {
        let catalog = StaticCatalog::seeded();
        let products = catalog.products(&ProductQuery::new()).await;
        assert_eq!(handles(&products), vec!["black-hoodie", "acme-t-shirt", "acme-mug"]);
    }

    #[tokio::test]
    async fn test_products_sorted_by_price() {
        let catalog = StaticCatalog::seeded();

        let asc = catalog
            .products(&ProductQuery::new().with_sort(SortOption::PriceAsc))
            .await;
        assert_eq!(handles(&asc), vec!["acme-mug", "acme-t-shirt", "black-hoodie"]);

        let desc = catalog
            .products(&ProductQuery::new().with_sort(SortOption::PriceDesc))
            .await;
        assert_eq!(handles(&desc), vec!["black-hoodie", "acme-t-shirt", "acme-mug"]);

        let reversed = catalog
            .products(&ProductQuery::new().with_sort(SortOption::PriceAsc).reversed(true))
            .await;
        assert_eq!(handles(&reversed), handles(&desc));
    }

    #[tokio::test]
    async fn test_sorting_leaves_seed_order_alone() {
        let catalog = StaticCatalog::seeded();
        catalog
            .products(&ProductQuery::new().with_sort(SortOption::PriceAsc))
            .await;
        let products = catalog.products(&ProductQuery::new()).await;
        assert_eq!(products[0].handle, "black-hoodie");
    }

    #[tokio::test]
    async fn test_products_query_and_limit() {
        let catalog = StaticCatalog::seeded();

        let coffee = catalog.products(&ProductQuery::new().with_query("COFFEE")).await;
        assert_eq!(handles(&coffee), vec!["acme-mug"]);

        let limited = catalog.products(&ProductQuery::new().with_limit(2)).await;
        assert_eq!(limited.len(), 2);

        let unlimited = catalog.products(&ProductQuery::new().with_limit(0)).await;
        assert_eq!(unlimited.len(), 3);
    }

    #[tokio::test]
    async fn test_collection_products_by_tag() {
        let catalog = StaticCatalog::seeded();

        let clothing = catalog
            .collection_products(&CollectionQuery::new("clothing"))
            .await;
        assert_eq!(handles(&clothing), vec!["black-hoodie", "acme-t-shirt"]);

        let accessories = catalog
            .collection_products(&CollectionQuery::new("accessories"))
            .await;
        assert_eq!(handles(&accessories), vec!["acme-mug"]);

        let all = catalog.collection_products(&CollectionQuery::all()).await;
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_known_collection_filters_even_when_empty() {
        let catalog = StaticCatalog::seeded();

        let mugs = catalog
            .collection_products(&CollectionQuery::new("clothing").with_query("mug"))
            .await;
        assert!(mugs.is_empty());

        let hoodies = catalog
            .collection_products(&CollectionQuery::new("accessories").with_query("hoodie"))
            .await;
        assert!(hoodies.is_empty());

        let shirts = catalog
            .collection_products(&CollectionQuery::new("clothing").with_query("shirt"))
            .await;
        assert_eq!(handles(&shirts), vec!["acme-t-shirt"]);
    }

    #[tokio::test]
    async fn test_collection_products_by_capitalised_handle() {
        let catalog = StaticCatalog::seeded();
        let hoodies = catalog
            .collection_products(&CollectionQuery::new("hoodie"))
            .await;
        assert_eq!(handles(&hoodies), vec!["black-hoodie"]);
    }

    #[tokio::test]
    async fn test_collection_products_unknown_tag_is_unfiltered() {
        let catalog = StaticCatalog::seeded();
        let products = catalog
            .collection_products(&CollectionQuery::new("furniture"))
            .await;
        assert_eq!(products.len(), 3);
    }

    #[tokio::test]
    async fn test_collection_products_sorted() {
        let catalog = StaticCatalog::seeded();
        let products = catalog
            .collection_products(&CollectionQuery::new("clothing").with_sort(SortOption::PriceAsc))
            .await;
        assert_eq!(handles(&products), vec!["acme-t-shirt", "black-hoodie"]);
    }

    #[tokio::test]
    async fn test_collections() {
        let catalog = StaticCatalog::seeded();
        assert_eq!(catalog.collections().await.len(), 3);
        assert_eq!(catalog.collection("clothing").await.unwrap().title, "Clothing");
        assert!(catalog.collection("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_find_variant() {
        let catalog = StaticCatalog::seeded();
        let (product, variant) = catalog.find_variant(&VariantId::new("1-2")).await.unwrap();
        assert_eq!(product.handle, "black-hoodie");
        assert_eq!(variant.title, "Medium / Black");
        assert!(catalog.find_variant(&VariantId::new("9-9")).await.is_none());
    }
}
