//! Product and variant types.

use crate::ids::{ProductId, VariantId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// URL-friendly slug (unique).
    pub handle: String,
    /// Whether any variant can be purchased.
    pub available_for_sale: bool,
    /// Product title.
    pub title: String,
    /// Plain-text description.
    pub description: String,
    /// Description rendered as HTML.
    pub description_html: String,
    /// Option definitions (e.g. Size, Color).
    pub options: Vec<ProductOption>,
    /// Lowest and highest variant price.
    pub price_range: PriceRange,
    /// Purchasable variants.
    pub variants: Vec<ProductVariant>,
    /// Image shown in listings.
    pub featured_image: Image,
    /// All product images.
    pub images: Vec<Image>,
    /// Search engine metadata.
    pub seo: Seo,
    /// Tags, also used for collection membership.
    pub tags: Vec<String>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Look up a variant of this product.
    pub fn variant(&self, variant_id: &VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| &v.id == variant_id)
    }

    /// Check if the product carries a tag (exact, case-sensitive match).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Case-insensitive substring match over title and description.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }

    /// The price used for price sorting.
    pub fn min_price(&self) -> Money {
        self.price_range.min_variant_price
    }
}

/// A product variant (e.g., size/color combination).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Variant identifier, unique across the catalog.
    pub id: VariantId,
    /// Variant title (e.g., "Small / Black").
    pub title: String,
    /// Whether this variant can be purchased.
    pub available_for_sale: bool,
    /// Option values that define this variant.
    pub selected_options: Vec<SelectedOption>,
    /// Unit price.
    pub price: Money,
}

impl ProductVariant {
    /// Create a new variant with no selected options.
    pub fn new(id: impl Into<VariantId>, title: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            available_for_sale: true,
            selected_options: Vec::new(),
            price,
        }
    }

    /// Add a selected option to this variant.
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.selected_options.push(SelectedOption::new(name, value));
        self
    }
}

/// A selected option value (e.g., Size: M).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Option value (e.g., "M", "Black").
    pub value: String,
}

impl SelectedOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An option definition with its allowed values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductOption {
    pub id: String,
    pub name: String,
    pub values: Vec<OptionValue>,
}

impl ProductOption {
    /// Build an option whose value ids are the lowercased value names.
    pub fn new(name: impl Into<String>, values: &[&str]) -> Self {
        let name = name.into();
        Self {
            id: name.to_lowercase(),
            name,
            values: values
                .iter()
                .map(|v| OptionValue {
                    id: v.to_lowercase(),
                    name: v.to_string(),
                })
                .collect(),
        }
    }
}

/// One allowed value of a [`ProductOption`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionValue {
    pub id: String,
    pub name: String,
}

/// Price range across a product's variants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub max_variant_price: Money,
    pub min_variant_price: Money,
}

impl PriceRange {
    /// Compute the range from a variant list. Returns None for no variants.
    pub fn from_variants(variants: &[ProductVariant]) -> Option<Self> {
        let min = variants.iter().map(|v| v.price).min_by_key(|m| m.amount_cents)?;
        let max = variants.iter().map(|v| v.price).max_by_key(|m| m.amount_cents)?;
        Some(Self {
            max_variant_price: max,
            min_variant_price: min,
        })
    }
}

/// Product image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url: String,
    pub alt_text: String,
    pub width: u32,
    pub height: u32,
}

/// Search engine metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seo {
    pub title: String,
    pub description: String,
}
