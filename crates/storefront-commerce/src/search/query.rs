//! Catalog query types.

use crate::catalog::{Product, ALL_COLLECTION};
use serde::{Deserialize, Serialize};

/// Sort options for product listings.
///
/// On the wire a sort option is its key; unknown keys read as relevance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "&'static str")]
pub enum SortOption {
    /// Catalog order.
    #[default]
    Relevance,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
}

impl SortOption {
    /// All options, in the order a sort menu lists them.
    pub const ALL: [SortOption; 3] = [
        SortOption::Relevance,
        SortOption::PriceAsc,
        SortOption::PriceDesc,
    ];

    /// Parse a sort key (`relevance`, `price-asc`, `price-desc`).
    ///
    /// Unknown keys fall back to relevance.
    pub fn from_key(key: &str) -> Self {
        match key {
            "price-asc" => SortOption::PriceAsc,
            "price-desc" => SortOption::PriceDesc,
            _ => SortOption::Relevance,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            SortOption::Relevance => "relevance",
            SortOption::PriceAsc => "price-asc",
            SortOption::PriceDesc => "price-desc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Relevance => "Relevance",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
        }
    }

    /// Sort products in place by minimum variant price. Stable, so equal
    /// prices keep catalog order.
    pub fn apply(&self, products: &mut [Product]) {
        match self {
            SortOption::Relevance => {}
            SortOption::PriceAsc => products.sort_by_key(|p| p.min_price().amount_cents),
            SortOption::PriceDesc => {
                products.sort_by_key(|p| std::cmp::Reverse(p.min_price().amount_cents))
            }
        }
    }
}

impl From<String> for SortOption {
    fn from(key: String) -> Self {
        SortOption::from_key(&key)
    }
}

impl From<SortOption> for &'static str {
    fn from(sort: SortOption) -> Self {
        sort.key()
    }
}

/// Query over the whole catalog.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    /// Case-insensitive substring over title and description.
    pub query: Option<String>,
    /// Reverse the list after sorting.
    #[serde(default)]
    pub reverse: bool,
    /// Sort order.
    #[serde(default)]
    pub sort_key: SortOption,
    /// Maximum number of products; `None` or 0 means unlimited.
    pub limit: Option<usize>,
}

impl ProductQuery {
    /// Create an empty query (every product, catalog order).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text query. Empty strings are ignored.
    pub fn with_query(mut self, q: impl Into<String>) -> Self {
        let q = q.into();
        if !q.is_empty() {
            self.query = Some(q);
        }
        self
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort_key = sort;
        self
    }

    /// Reverse the result.
    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Limit the number of products returned.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Query over the products of one collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionQuery {
    /// Collection handle; `all` passes every product through.
    pub collection: String,
    /// Reverse the list after sorting.
    #[serde(default)]
    pub reverse: bool,
    /// Sort order.
    #[serde(default)]
    pub sort_key: SortOption,
    /// Case-insensitive substring over title and description.
    pub query: Option<String>,
}

impl CollectionQuery {
    /// Create a query for a collection handle.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            reverse: false,
            sort_key: SortOption::Relevance,
            query: None,
        }
    }

    /// Query the pass-through collection.
    pub fn all() -> Self {
        Self::new(ALL_COLLECTION)
    }

    /// Set the text query. Empty strings are ignored.
    pub fn with_query(mut self, q: impl Into<String>) -> Self {
        let q = q.into();
        if !q.is_empty() {
            self.query = Some(q);
        }
        self
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort_key = sort;
        self
    }

    /// Reverse the result.
    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_keys() {
        assert_eq!(SortOption::from_key("price-asc"), SortOption::PriceAsc);
        assert_eq!(SortOption::from_key("price-desc"), SortOption::PriceDesc);
        assert_eq!(SortOption::from_key("relevance"), SortOption::Relevance);
        assert_eq!(SortOption::from_key("bogus"), SortOption::Relevance);

        for option in SortOption::ALL {
            assert_eq!(SortOption::from_key(option.key()), option);
        }
    }

    #[test]
    fn test_query_builder() {
        let query = ProductQuery::new()
            .with_query("acme")
            .with_sort(SortOption::PriceAsc)
            .reversed(true)
            .with_limit(2);

        assert_eq!(query.query.as_deref(), Some("acme"));
        assert_eq!(query.sort_key, SortOption::PriceAsc);
        assert!(query.reverse);
        assert_eq!(query.limit, Some(2));
    }

    #[test]
    fn test_empty_query_is_ignored() {
        assert!(ProductQuery::new().with_query("").query.is_none());
        assert!(CollectionQuery::all().with_query("").query.is_none());
    }

    #[test]
    fn test_query_wire_format() {
        let query: CollectionQuery =
            serde_json::from_str(r#"{"collection":"clothing","sortKey":"price-asc","query":null}"#)
                .unwrap();
        assert_eq!(query.collection, "clothing");
        assert_eq!(query.sort_key, SortOption::PriceAsc);
        assert!(!query.reverse);

        let json = serde_json::to_value(ProductQuery::new().with_sort(SortOption::PriceDesc)).unwrap();
        assert_eq!(json["sortKey"], "price-desc");
    }

    #[test]
    fn test_unknown_sort_key_reads_as_relevance() {
        let query: ProductQuery = serde_json::from_str(r#"{"sortKey":"newest"}"#).unwrap();
        assert_eq!(query.sort_key, SortOption::Relevance);
    }
}
