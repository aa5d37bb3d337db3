//! Session management using Key-Value store.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{cache_key, Cache, CacheError};

/// A unique session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Prefix of generated ids.
    pub const PREFIX: &'static str = "sess_";

    /// Create a new session ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new cryptographically secure session ID.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(format!("{}{}", Self::PREFIX, URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Parse an id received from a client.
    ///
    /// Only ids shaped like generated ones are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        let body = raw.strip_prefix(Self::PREFIX)?;
        let well_formed = !body.is_empty()
            && body
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        well_formed.then(|| Self(raw.to_string()))
    }

    /// Get the session ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Session data stored in the cache.
///
/// Generic over the user data type `T`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData<T> {
    /// The session ID.
    pub id: SessionId,
    /// User-defined session data.
    pub data: T,
    /// Number of writes so far.
    pub version: u64,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session was last written.
    pub last_accessed: DateTime<Utc>,
}

/// Storage of one document per session.
///
/// Writes are unconditional: the last `put` wins.
#[async_trait]
pub trait SessionStore<T: Send + Sync + 'static>: Send + Sync {
    /// Get the document of a session.
    async fn get(&self, id: &SessionId) -> Result<Option<T>, CacheError>;

    /// Replace the document of a session.
    async fn put(&self, id: &SessionId, data: &T) -> Result<(), CacheError>;

    /// Forget a session.
    async fn delete(&self, id: &SessionId) -> Result<(), CacheError>;
}

/// Session store over a [`Cache`].
///
/// # Example
///
/// ```rust,ignore
/// let sessions = KvSessionStore::<Cart>::new(Cache::in_memory());
/// let id = SessionId::generate();
/// sessions.put(&id, &cart).await?;
/// let cart: Option<Cart> = sessions.get(&id).await?;
/// ```
pub struct KvSessionStore<T> {
    cache: Cache,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> KvSessionStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(cache: Cache) -> Self {
        Self {
            cache,
            _phantom: PhantomData,
        }
    }

    /// Get full session data including version and timestamps.
    pub async fn get_versioned(&self, id: &SessionId) -> Result<Option<SessionData<T>>, CacheError> {
        self.cache.get::<SessionData<T>>(&session_key(id)).await
    }

    /// Check if a session exists.
    pub async fn exists(&self, id: &SessionId) -> Result<bool, CacheError> {
        self.cache.exists(&session_key(id)).await
    }
}

#[async_trait]
impl<T> SessionStore<T> for KvSessionStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, id: &SessionId) -> Result<Option<T>, CacheError> {
        Ok(self.get_versioned(id).await?.map(|s| s.data))
    }

    async fn put(&self, id: &SessionId, data: &T) -> Result<(), CacheError> {
        let key = session_key(id);
        let now = Utc::now();

        // Keep the creation time and bump the version of an existing session.
        // An unreadable document is overwritten as a new session.
        let previous = match self.cache.get::<SessionData<serde_json::Value>>(&key).await {
            Ok(previous) => previous,
            Err(CacheError::SerializeError(e)) => {
                tracing::warn!(session = %id, error = %e, "replacing unreadable session");
                None
            }
            Err(e) => return Err(e),
        };
        let (version, created_at) = match previous {
            Some(previous) => (previous.version + 1, previous.created_at),
            None => (1, now),
        };

        let session_data = SessionData {
            id: id.clone(),
            data,
            version,
            created_at,
            last_accessed: now,
        };
        self.cache.set(&key, &session_data).await?;
        tracing::debug!(session = %id, version, "session written");
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), CacheError> {
        self.cache.delete(&session_key(id)).await
    }
}

fn session_key(id: &SessionId) -> String {
    cache_key!("session", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Basket {
        items: Vec<String>,
    }

    #[test]
    fn test_session_id_generate_format() {
        let id = SessionId::generate();
        let s = id.as_str();

        assert!(s.starts_with("sess_"));
        // 18 bytes encode to 24 base64 chars, plus the prefix
        assert_eq!(s.len(), 29);
    }

    #[test]
    fn test_session_id_generate_uniqueness() {
        let id1 = SessionId::generate();
        let id2 = SessionId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_session_id_parse() {
        let id = SessionId::generate();
        assert_eq!(SessionId::parse(id.as_str()), Some(id));

        assert!(SessionId::parse("sess_").is_none());
        assert!(SessionId::parse("abc123").is_none());
        assert!(SessionId::parse("sess_a;b").is_none());
        assert!(SessionId::parse("eyJpZCI6ImNhcnQifQ").is_none());
    }

    #[test]
    fn test_session_id_serialization() {
        let id = SessionId::new("sess_serialize-me");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""sess_serialize-me""#);

        let deserialized: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[tokio::test]
    async fn test_session_store_roundtrip() {
        let store = KvSessionStore::<Basket>::new(Cache::in_memory());
        let id = SessionId::generate();
        let basket = Basket {
            items: vec!["1-1".to_string()],
        };

        assert!(store.get(&id).await.unwrap().is_none());
        store.put(&id, &basket).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), Some(basket));
        assert!(store.exists(&id).await.unwrap());

        store.delete(&id).await.unwrap();
        assert!(store.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_store_versions_writes() {
        let store = KvSessionStore::<Basket>::new(Cache::in_memory());
        let id = SessionId::generate();

        store.put(&id, &Basket { items: vec![] }).await.unwrap();
        let first = store.get_versioned(&id).await.unwrap().unwrap();
        assert_eq!(first.version, 1);

        store
            .put(&id, &Basket {
                items: vec!["3-1".to_string()],
            })
            .await
            .unwrap();
        let second = store.get_versioned(&id).await.unwrap().unwrap();
        assert_eq!(second.version, 2);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.data.items, vec!["3-1".to_string()]);
    }

    #[tokio::test]
    async fn test_put_replaces_unreadable_session() {
        let cache = Cache::in_memory();
        let store = KvSessionStore::<Basket>::new(cache.clone());
        let id = SessionId::generate();
        cache
            .set(&session_key(&id), &serde_json::json!({"garbage": true}))
            .await
            .unwrap();

        assert!(store.get(&id).await.is_err());

        let basket = Basket {
            items: vec!["mug".to_string()],
        };
        store.put(&id, &basket).await.unwrap();
        let session = store.get_versioned(&id).await.unwrap().unwrap();
        assert_eq!(session.version, 1);
        assert_eq!(session.data, basket);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = KvSessionStore::<Basket>::new(Cache::in_memory());
        let a = SessionId::generate();
        let b = SessionId::generate();

        store
            .put(&a, &Basket {
                items: vec!["a".to_string()],
            })
            .await
            .unwrap();
        assert!(store.get(&b).await.unwrap().is_none());
    }
}
