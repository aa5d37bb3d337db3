//! Cache tags and revalidation.
//!
//! Readers remember the generation of the tags they depend on; a writer
//! bumps the generation after a mutation so those readers know their view
//! is stale.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Logical tags for cached views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheTag {
    Collections,
    Products,
    CollectionProducts,
    Cart,
    Mode,
}

impl CacheTag {
    pub const ALL: [CacheTag; 5] = [
        CacheTag::Collections,
        CacheTag::Products,
        CacheTag::CollectionProducts,
        CacheTag::Cart,
        CacheTag::Mode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheTag::Collections => "collections",
            CacheTag::Products => "products",
            CacheTag::CollectionProducts => "collection-products",
            CacheTag::Cart => "cart",
            CacheTag::Mode => "mode",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl std::fmt::Display for CacheTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generation counter per tag.
#[derive(Debug, Default)]
pub struct Revalidator {
    generations: RwLock<HashMap<CacheTag, u64>>,
}

impl Revalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every view of a tag stale. Returns the new generation.
    pub fn revalidate(&self, tag: CacheTag) -> u64 {
        let mut generations = match self.generations.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let generation = generations.entry(tag).or_insert(0);
        *generation += 1;
        tracing::debug!(tag = %tag, generation = *generation, "revalidated");
        *generation
    }

    /// Current generation of a tag; zero if it was never revalidated.
    pub fn generation(&self, tag: CacheTag) -> u64 {
        let generations = match self.generations.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        generations.get(&tag).copied().unwrap_or(0)
    }

    /// Check if a view taken at `seen` is still current.
    pub fn is_fresh(&self, tag: CacheTag, seen: u64) -> bool {
        self.generation(tag) == seen
    }
}
