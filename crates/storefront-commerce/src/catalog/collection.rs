//! Collections group products by tag.

use crate::catalog::Seo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Handle of the pass-through collection that contains every product.
pub const ALL_COLLECTION: &str = "all";

/// A named group of products.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// URL-friendly handle (unique).
    pub handle: String,
    /// Display title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Search engine metadata.
    pub seo: Seo,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Listing path, `/search/<handle>`.
    pub path: String,
    /// Breadcrumb parents, root first.
    pub parent_category_tree: Vec<CategoryRef>,
}

/// A breadcrumb entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
}

impl Collection {
    /// Create a root-level collection.
    pub fn new(
        handle: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let handle = handle.into();
        let title = title.into();
        let description = description.into();
        Self {
            path: format!("/search/{}", handle),
            seo: Seo {
                title: title.clone(),
                description: description.clone(),
            },
            handle,
            title,
            description,
            updated_at: Utc::now(),
            parent_category_tree: Vec::new(),
        }
    }

    /// Nest this collection under a parent.
    pub fn with_parent(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.parent_category_tree.push(CategoryRef {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    /// Check if this is the pass-through "all" collection.
    pub fn is_all(&self) -> bool {
        self.handle == ALL_COLLECTION
    }
}

/// Derive the product tag for a collection handle by upper-casing its
/// first character (`clothing` -> `Clothing`).
pub fn collection_tag(handle: &str) -> String {
    let mut chars = handle.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
