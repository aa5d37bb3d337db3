//! Cart persistence.
//!
//! Cart actions only see the [`CartStore`] trait. Where the document
//! actually lives is decided by the implementation:
//!
//! - [`CookieCartStore`]: the cookie carries the cart itself, base64url
//!   encoded JSON.
//! - [`SessionCartStore`]: the cookie carries a session id and the cart is
//!   kept in a [`SessionStore`].

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use storefront_cache::{CacheError, CookieJar, CookieOptions, SessionId, SessionStore};
use storefront_commerce::cart::Cart;

use crate::config::PersistenceMode;
use crate::StorefrontError;

/// Browsers drop cookies larger than this.
pub const MAX_COOKIE_BYTES: usize = 4096;

/// Load and save the cart of the client behind a cookie jar.
///
/// Writes are unconditional; concurrent requests of one client race and
/// the last save wins.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Load the cart. An unreadable cookie is treated as no cart.
    async fn load(&self, jar: &CookieJar) -> Result<Option<Cart>, StorefrontError>;

    /// Persist the whole cart.
    async fn save(&self, jar: &mut CookieJar, cart: &Cart) -> Result<(), StorefrontError>;

    /// Forget the cart and expire the cookie.
    async fn clear(&self, jar: &mut CookieJar) -> Result<(), StorefrontError>;

    /// Which strategy this is.
    fn mode(&self) -> PersistenceMode;
}

/// Cart stored in the cookie value.
#[derive(Debug, Clone)]
pub struct CookieCartStore {
    cookie_name: String,
    options: CookieOptions,
}

impl CookieCartStore {
    pub fn new(cookie_name: impl Into<String>, options: CookieOptions) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            options,
        }
    }

    /// Encode a cart as a cookie value.
    pub fn encode(cart: &Cart) -> Result<String, StorefrontError> {
        let json = serde_json::to_vec(cart)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decode a cookie value. Returns `None` for anything malformed.
    pub fn decode(value: &str) -> Option<Cart> {
        let bytes = match URL_SAFE_NO_PAD.decode(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "cart cookie is not base64");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(cart) => Some(cart),
            Err(e) => {
                tracing::warn!(error = %e, "cart cookie is not a cart");
                None
            }
        }
    }
}

#[async_trait]
impl CartStore for CookieCartStore {
    async fn load(&self, jar: &CookieJar) -> Result<Option<Cart>, StorefrontError> {
        Ok(jar.get(&self.cookie_name).and_then(Self::decode))
    }

    async fn save(&self, jar: &mut CookieJar, cart: &Cart) -> Result<(), StorefrontError> {
        let value = Self::encode(cart)?;
        let size = self.cookie_name.len() + 1 + value.len();
        if size > MAX_COOKIE_BYTES {
            tracing::warn!(
                cart_id = %cart.id,
                bytes = size,
                limit = MAX_COOKIE_BYTES,
                "cart cookie exceeds browser limit"
            );
        }
        jar.set(&self.cookie_name, value, &self.options);
        Ok(())
    }

    async fn clear(&self, jar: &mut CookieJar) -> Result<(), StorefrontError> {
        jar.remove(&self.cookie_name, &self.options);
        Ok(())
    }

    fn mode(&self) -> PersistenceMode {
        PersistenceMode::Cookie
    }
}

/// Cart stored in a session store, addressed by a session id cookie.
pub struct SessionCartStore {
    cookie_name: String,
    options: CookieOptions,
    sessions: Arc<dyn SessionStore<Cart>>,
}

impl SessionCartStore {
    pub fn new(
        cookie_name: impl Into<String>,
        options: CookieOptions,
        sessions: Arc<dyn SessionStore<Cart>>,
    ) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            options,
            sessions,
        }
    }

    fn session_id(&self, jar: &CookieJar) -> Option<SessionId> {
        let raw = jar.get(&self.cookie_name)?;
        let id = SessionId::parse(raw);
        if id.is_none() {
            tracing::warn!("cart cookie does not hold a session id");
        }
        id
    }
}

#[async_trait]
impl CartStore for SessionCartStore {
    async fn load(&self, jar: &CookieJar) -> Result<Option<Cart>, StorefrontError> {
        let Some(id) = self.session_id(jar) else {
            return Ok(None);
        };
        match self.sessions.get(&id).await {
            Ok(cart) => Ok(cart),
            Err(CacheError::SerializeError(e)) => {
                tracing::warn!(session = %id, error = %e, "stored cart is not a cart");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, jar: &mut CookieJar, cart: &Cart) -> Result<(), StorefrontError> {
        let id = match self.session_id(jar) {
            Some(id) => id,
            None => {
                let id = SessionId::generate();
                tracing::debug!(session = %id, "new cart session");
                id
            }
        };
        self.sessions.put(&id, cart).await?;
        // Re-set so the expiry slides with activity.
        jar.set(&self.cookie_name, id.as_str(), &self.options);
        Ok(())
    }

    async fn clear(&self, jar: &mut CookieJar) -> Result<(), StorefrontError> {
        if let Some(id) = self.session_id(jar) {
            self.sessions.delete(&id).await?;
        }
        jar.remove(&self.cookie_name, &self.options);
        Ok(())
    }

    fn mode(&self) -> PersistenceMode {
        PersistenceMode::Session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_cache::{Cache, KvSessionStore};
    use storefront_commerce::catalog::seed_products;

    fn cart() -> Cart {
        let products = seed_products();
        let hoodie = &products[0];
        let mut cart = Cart::new();
        cart.add_variant(hoodie, &hoodie.variants[0]).unwrap();
        cart
    }

    fn session_store(cache: Cache) -> SessionCartStore {
        SessionCartStore::new(
            "cart",
            CookieOptions::default(),
            Arc::new(KvSessionStore::<Cart>::new(cache)),
        )
    }

    #[test]
    fn test_cookie_encoding_roundtrip() {
        let cart = cart();
        let value = CookieCartStore::encode(&cart).unwrap();
        assert!(!value.contains(';'));
        assert!(!value.contains('='));
        assert_eq!(CookieCartStore::decode(&value), Some(cart));
    }

    #[test]
    fn test_malformed_cookie_is_no_cart() {
        assert_eq!(CookieCartStore::decode("not base64!"), None);
        assert_eq!(CookieCartStore::decode(&URL_SAFE_NO_PAD.encode("{}")), None);
        assert_eq!(CookieCartStore::decode(&URL_SAFE_NO_PAD.encode("[1,2")), None);
    }

    #[tokio::test]
    async fn test_cookie_store_save_load_clear() {
        let store = CookieCartStore::new("cart", CookieOptions::default());
        let mut jar = CookieJar::new();
        assert!(store.load(&jar).await.unwrap().is_none());

        let cart = cart();
        store.save(&mut jar, &cart).await.unwrap();
        assert_eq!(store.load(&jar).await.unwrap(), Some(cart));
        assert_eq!(jar.pending().len(), 1);

        store.clear(&mut jar).await.unwrap();
        assert!(store.load(&jar).await.unwrap().is_none());
        assert!(jar.pending()[0].is_removal());
    }

    #[tokio::test]
    async fn test_session_store_keeps_cart_out_of_cookie() {
        let store = session_store(Cache::in_memory());
        let mut jar = CookieJar::new();
        let cart = cart();

        store.save(&mut jar, &cart).await.unwrap();
        let cookie = jar.get("cart").unwrap().to_string();
        assert!(cookie.starts_with("sess_"));
        assert_eq!(store.load(&jar).await.unwrap(), Some(cart.clone()));

        // A second save reuses the session.
        store.save(&mut jar, &cart).await.unwrap();
        assert_eq!(jar.get("cart"), Some(cookie.as_str()));
    }

    #[tokio::test]
    async fn test_session_store_clear_deletes_document() {
        let cache = Cache::in_memory();
        let store = session_store(cache.clone());
        let mut jar = CookieJar::new();

        store.save(&mut jar, &cart()).await.unwrap();
        let id = SessionId::new(jar.get("cart").unwrap());
        store.clear(&mut jar).await.unwrap();

        assert!(jar.get("cart").is_none());
        let sessions = KvSessionStore::<Cart>::new(cache);
        assert!(sessions.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_session_cart_is_no_cart() {
        let cache = Cache::in_memory();
        let store = session_store(cache.clone());
        let mut jar = CookieJar::new();
        store.save(&mut jar, &cart()).await.unwrap();

        let id = jar.get("cart").unwrap().to_string();
        cache
            .set(&format!("session:{}", id), &serde_json::json!({"garbage": true}))
            .await
            .unwrap();
        assert!(store.load(&jar).await.unwrap().is_none());

        let cart = cart();
        store.save(&mut jar, &cart).await.unwrap();
        assert_eq!(jar.get("cart"), Some(id.as_str()));
        assert_eq!(store.load(&jar).await.unwrap(), Some(cart));
    }

    #[tokio::test]
    async fn test_session_store_ignores_foreign_cookie() {
        let store = session_store(Cache::in_memory());
        let mut jar = CookieJar::new();
        jar.set(
            "cart",
            CookieCartStore::encode(&cart()).unwrap(),
            &CookieOptions::default(),
        );
        assert!(store.load(&jar).await.unwrap().is_none());
    }
}
