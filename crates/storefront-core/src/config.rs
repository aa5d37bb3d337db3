//! Storefront configuration.
//!
//! Read from `storefront.toml` (or `.storefront.toml`, `storefront.json`)
//! in the working directory or any parent. Every field has a default, so
//! a missing file is not an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use storefront_cache::CookieOptions;

use crate::StorefrontError;

/// File names searched for, in order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

/// Environment variable overriding `environment`.
pub const ENV_VAR: &str = "STOREFRONT_ENV";

/// Storefront configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Deployment environment.
    #[serde(default)]
    pub environment: Environment,

    /// Store metadata.
    #[serde(default)]
    pub store: StoreConfig,

    /// Cart cookie settings.
    #[serde(default)]
    pub cookie: CookieConfig,

    /// Where carts live.
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl StorefrontConfig {
    /// Load config from a file. `.json` files are JSON, anything else TOML.
    pub fn load(path: &Path) -> Result<Self, StorefrontError> {
        let content = std::fs::read_to_string(path).map_err(|source| StorefrontError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, StorefrontError> {
        let parse_error = |message: String| StorefrontError::ConfigParse {
            path: path.to_path_buf(),
            message,
        };

        if is_json(path) {
            serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))
        } else {
            toml::from_str(content).map_err(|e| parse_error(e.to_string()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<(), StorefrontError> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)
                .map_err(|e| StorefrontError::ConfigError(e.to_string()))?
        };

        std::fs::write(path, content).map_err(|source| StorefrontError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find a config file in `start` or any parent directory.
    pub fn find(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_FILE_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load the nearest config file, or defaults if there is none.
    ///
    /// Returns the path that was loaded, if any.
    pub fn discover(start: &Path) -> Result<(Self, Option<PathBuf>), StorefrontError> {
        match Self::find(start) {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Apply the `STOREFRONT_ENV` override.
    pub fn with_env_overrides(self) -> Result<Self, StorefrontError> {
        match std::env::var(ENV_VAR) {
            Ok(value) => self.with_environment_name(&value),
            Err(_) => Ok(self),
        }
    }

    /// Override the environment by name.
    pub fn with_environment_name(mut self, name: &str) -> Result<Self, StorefrontError> {
        self.environment = Environment::from_name(name).ok_or_else(|| {
            StorefrontError::ConfigError(format!("unknown environment: {}", name))
        })?;
        Ok(self)
    }

    /// Cookie attributes for the cart cookie.
    ///
    /// `Secure` follows the environment unless set explicitly.
    pub fn cookie_options(&self) -> CookieOptions {
        let secure = self
            .cookie
            .secure
            .unwrap_or(self.environment == Environment::Production);
        CookieOptions::default()
            .secure(secure)
            .max_age_days(self.cookie.max_age_days)
    }

    /// Directory for client and session state, relative to `base` unless
    /// absolute.
    pub fn data_dir(&self, base: &Path) -> PathBuf {
        if self.persistence.data_dir.is_absolute() {
            self.persistence.data_dir.clone()
        } else {
            base.join(&self.persistence.data_dir)
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }
}

/// Store metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store name shown in headers.
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_title() -> String {
    "ACME Store".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

/// Cart cookie settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookieConfig {
    /// Cookie name.
    #[serde(default = "default_cookie_name")]
    pub name: String,

    /// Cookie lifetime in days.
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u32,

    /// Force the `Secure` flag on or off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
}

fn default_cookie_name() -> String {
    "cart".to_string()
}

fn default_max_age_days() -> u32 {
    30
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            max_age_days: default_max_age_days(),
            secure: None,
        }
    }
}

/// Cart persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Persistence strategy.
    #[serde(default)]
    pub mode: PersistenceMode,

    /// Directory for client and session state.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".storefront")
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            mode: PersistenceMode::default(),
            data_dir: default_data_dir(),
        }
    }
}

/// Where the cart document lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceMode {
    /// The cookie holds the whole cart.
    #[default]
    Cookie,
    /// The cookie holds a session id; the cart lives in a session store.
    Session,
}

impl PersistenceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersistenceMode::Cookie => "cookie",
            PersistenceMode::Session => "session",
        }
    }
}

/// Generate a commented default `storefront.toml`.
pub fn generate_default_config(title: &str) -> String {
    format!(
        r#"# Storefront configuration

# development | production (overridden by {env_var})
environment = "development"

[store]
title = "{title}"

[cookie]
name = "cart"
max_age_days = 30
# secure = true

[persistence]
# cookie: the cookie carries the cart itself
# session: the cookie carries a session id, carts are kept in data_dir
mode = "cookie"
data_dir = ".storefront"
"#,
        env_var = ENV_VAR,
        title = title
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir()
            .join(format!("storefront-config-{}-{:x}", std::process::id(), nanos));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.cookie.name, "cart");
        assert_eq!(config.cookie.max_age_days, 30);
        assert_eq!(config.persistence.mode, PersistenceMode::Cookie);
        assert_eq!(config.store.title, "ACME Store");
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let content = generate_default_config("ACME Store");
        let config = StorefrontConfig::parse(Path::new("storefront.toml"), &content).unwrap();
        assert_eq!(config, StorefrontConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let content = r#"
environment = "production"

[persistence]
mode = "session"
"#;
        let config = StorefrontConfig::parse(Path::new("storefront.toml"), content).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.persistence.mode, PersistenceMode::Session);
        assert_eq!(config.persistence.data_dir, PathBuf::from(".storefront"));
        assert_eq!(config.cookie.name, "cart");
    }

    #[test]
    fn test_json_config() {
        let content = r#"{"cookie": {"name": "basket", "secure": true}}"#;
        let config = StorefrontConfig::parse(Path::new("storefront.json"), content).unwrap();
        assert_eq!(config.cookie.name, "basket");
        assert_eq!(config.cookie.secure, Some(true));
    }

    #[test]
    fn test_invalid_config() {
        let result = StorefrontConfig::parse(Path::new("storefront.toml"), "persistence = 3");
        assert!(matches!(result, Err(StorefrontError::ConfigParse { .. })));
    }

    #[test]
    fn test_cookie_options_follow_environment() {
        let dev = StorefrontConfig::default();
        assert!(!dev.cookie_options().secure);
        assert_eq!(dev.cookie_options().max_age, 60 * 60 * 24 * 30);

        let prod = StorefrontConfig::default()
            .with_environment_name("production")
            .unwrap();
        assert!(prod.cookie_options().secure);
        assert!(prod.cookie_options().http_only);

        let mut forced = prod.clone();
        forced.cookie.secure = Some(false);
        assert!(!forced.cookie_options().secure);

        assert!(StorefrontConfig::default().with_environment_name("staging").is_err());
    }

    #[test]
    fn test_find_walks_up() {
        let root = temp_dir();
        let nested = root.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert!(StorefrontConfig::find(&nested).map_or(true, |p| !p.starts_with(&root)));

        let mut config = StorefrontConfig::default();
        config.store.title = "Nested".to_string();
        config.save(&root.join("storefront.toml")).unwrap();

        let (found, path) = StorefrontConfig::discover(&nested).unwrap();
        assert_eq!(path, Some(root.join("storefront.toml")));
        assert_eq!(found.store.title, "Nested");

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_data_dir() {
        let config = StorefrontConfig::default();
        assert_eq!(config.data_dir(Path::new("/srv")), PathBuf::from("/srv/.storefront"));
    }
}
