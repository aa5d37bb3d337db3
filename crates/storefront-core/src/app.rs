//! Storefront wiring.

use std::path::Path;
use std::sync::Arc;

use storefront_cache::{Cache, KvSessionStore, Revalidator};
use storefront_commerce::cart::Cart;
use storefront_commerce::catalog::{CatalogProvider, StaticCatalog};

use crate::config::{PersistenceMode, StorefrontConfig};
use crate::orders::OrderLog;
use crate::store::{CartStore, CookieCartStore, SessionCartStore};
use crate::StorefrontError;

/// Session documents file inside the data directory.
pub const SESSIONS_FILE: &str = "sessions.json";

/// A configured storefront: catalog, cart persistence, revalidation and
/// the order log.
///
/// Cart and checkout actions are methods on this type; each takes the
/// cookie jar of the request it serves.
///
/// # Example
///
/// ```rust,ignore
/// let storefront = Storefront::builder(StorefrontConfig::default()).build();
///
/// let mut jar = CookieJar::from_headers(&request_headers);
/// let cart = storefront.add_item(&mut jar, Some("1-1")).await?;
/// let response_headers = jar.set_cookie_headers()?;
/// ```
#[derive(Clone)]
pub struct Storefront {
    config: StorefrontConfig,
    catalog: Arc<dyn CatalogProvider>,
    store: Arc<dyn CartStore>,
    revalidator: Arc<Revalidator>,
    orders: Arc<OrderLog>,
}

impl Storefront {
    /// Start building a storefront.
    pub fn builder(config: StorefrontConfig) -> StorefrontBuilder {
        StorefrontBuilder::new(config)
    }

    /// Build a storefront whose session documents (in session mode) are
    /// kept under the configured data directory, relative to `base`.
    pub fn open(config: StorefrontConfig, base: &Path) -> Result<Self, StorefrontError> {
        let mut builder = StorefrontBuilder::new(config);
        if builder.config.persistence.mode == PersistenceMode::Session {
            let path = builder.config.data_dir(base).join(SESSIONS_FILE);
            tracing::debug!(path = %path.display(), "opening session file");
            builder = builder.with_session_cache(Cache::open_file(path)?);
        }
        Ok(builder.build())
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn catalog(&self) -> &dyn CatalogProvider {
        self.catalog.as_ref()
    }

    pub fn store(&self) -> &dyn CartStore {
        self.store.as_ref()
    }

    pub fn revalidator(&self) -> &Revalidator {
        &self.revalidator
    }

    pub fn orders(&self) -> &OrderLog {
        &self.orders
    }
}

/// Builder for [`Storefront`].
pub struct StorefrontBuilder {
    config: StorefrontConfig,
    catalog: Option<Arc<dyn CatalogProvider>>,
    store: Option<Arc<dyn CartStore>>,
    session_cache: Option<Cache>,
}

impl StorefrontBuilder {
    pub fn new(config: StorefrontConfig) -> Self {
        Self {
            config,
            catalog: None,
            store: None,
            session_cache: None,
        }
    }

    /// Replace the seed catalog.
    pub fn with_catalog(mut self, catalog: Arc<dyn CatalogProvider>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Replace the configured cart store.
    pub fn with_store(mut self, store: Arc<dyn CartStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Cache backing session documents in session mode. Defaults to an
    /// in-memory cache.
    pub fn with_session_cache(mut self, cache: Cache) -> Self {
        self.session_cache = Some(cache);
        self
    }

    pub fn build(self) -> Storefront {
        let config = self.config;
        let store = match self.store {
            Some(store) => store,
            None => default_store(&config, self.session_cache),
        };
        tracing::debug!(mode = store.mode().as_str(), "cart store ready");

        Storefront {
            catalog: self
                .catalog
                .unwrap_or_else(|| Arc::new(StaticCatalog::seeded())),
            store,
            revalidator: Arc::new(Revalidator::new()),
            orders: Arc::new(OrderLog::new()),
            config,
        }
    }
}

fn default_store(config: &StorefrontConfig, session_cache: Option<Cache>) -> Arc<dyn CartStore> {
    let name = config.cookie.name.clone();
    let options = config.cookie_options();
    match config.persistence.mode {
        PersistenceMode::Cookie => Arc::new(CookieCartStore::new(name, options)),
        PersistenceMode::Session => {
            let cache = session_cache.unwrap_or_else(Cache::in_memory);
            let sessions = Arc::new(KvSessionStore::<Cart>::new(cache));
            Arc::new(SessionCartStore::new(name, options, sessions))
        }
    }
}
