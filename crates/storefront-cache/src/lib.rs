//! Key-value storage layer for the ACME storefront.
//!
//! Provides a typed cache over pluggable byte backends (in-memory or a
//! JSON file), per-session document storage, the cookie jar used to carry
//! the session between client and server, and cache-tag revalidation.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_cache::prelude::*;
//!
//! let sessions = KvSessionStore::<Cart>::new(Cache::open_file(".storefront/sessions.json")?);
//!
//! let mut jar = CookieJar::from_headers(&request_headers);
//! let id = jar
//!     .get("cart")
//!     .and_then(SessionId::parse)
//!     .unwrap_or_else(SessionId::generate);
//!
//! sessions.put(&id, &cart).await?;
//! jar.set("cart", id.as_str(), &CookieOptions::default());
//! let response_headers = jar.set_cookie_headers()?;
//! ```

mod cookie;
mod error;
mod kv;
mod session;
mod tags;

pub use cookie::{CookieJar, CookieOptions, SameSite, SetCookie, DEFAULT_MAX_AGE_SECS};
pub use error::CacheError;
pub use kv::{Cache, FileBackend, KvBackend, MemoryBackend};
pub use session::{KvSessionStore, SessionData, SessionId, SessionStore};
pub use tags::{CacheTag, Revalidator};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Cache, CacheError, CacheTag, CookieJar, CookieOptions, KvSessionStore, Revalidator,
        SessionId, SessionStore,
    };
}
