//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use storefront_cache::CookieJar;
use storefront_core::{Storefront, StorefrontConfig};

use crate::output::Output;

/// File holding the client cookie jar inside the data directory.
pub const COOKIES_FILE: &str = "cookies.json";

/// Execution context for CLI commands.
pub struct Context {
    /// Storefront configuration.
    pub config: StorefrontConfig,
    /// Config file the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    pub storefront: Storefront,
}

/// One simulated request: the cookies the client holds and the jar the
/// storefront reads and writes.
pub struct Exchange {
    browser: CookieJar,
    /// Jar handed to storefront actions.
    pub jar: CookieJar,
}

impl Context {
    /// Load the configuration and open the storefront.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                let config = StorefrontConfig::load(&path)?;
                (config, Some(path))
            }
            None => StorefrontConfig::discover(&cwd)?,
        };
        let config = config.with_env_overrides()?;

        match &config_path {
            Some(path) => output.debug(&format!("Using config {}", path.display())),
            None => output.debug("No config file found, using defaults"),
        }

        let storefront =
            Storefront::open(config.clone(), &cwd).context("Failed to open storefront")?;
        tracing::debug!(
            environment = config.environment.as_str(),
            mode = config.persistence.mode.as_str(),
            "storefront opened"
        );

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            storefront,
        })
    }

    /// Directory holding the cookie jar and session documents.
    pub fn data_dir(&self) -> PathBuf {
        self.config.data_dir(&self.cwd)
    }

    pub fn cookies_path(&self) -> PathBuf {
        self.data_dir().join(COOKIES_FILE)
    }

    /// Start a request carrying the stored client cookies.
    pub fn begin(&self) -> Result<Exchange> {
        let browser = load_jar(&self.cookies_path())?;
        let headers = browser
            .request_headers()
            .context("Failed to build request headers")?;
        Ok(Exchange {
            browser,
            jar: CookieJar::from_headers(&headers),
        })
    }

    /// Finish a request: apply its `Set-Cookie` headers to the client jar
    /// and store it.
    pub fn finish(&self, exchange: Exchange) -> Result<()> {
        let Exchange { mut browser, jar } = exchange;
        if !jar.has_changes() {
            return Ok(());
        }

        for cookie in jar.pending() {
            self.output.debug(&format!("Set-Cookie: {}", cookie.render()));
        }
        let headers = jar
            .set_cookie_headers()
            .context("Failed to build Set-Cookie headers")?;
        browser.apply_set_cookie(&headers);

        let path = self.cookies_path();
        tracing::debug!(path = %path.display(), cookies = browser.iter().count(), "saving client cookies");
        save_jar(&path, &browser)
    }
}

fn resolve(cwd: &Path, path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        cwd.join(path)
    }
}

fn load_jar(path: &Path) -> Result<CookieJar> {
    if !path.exists() {
        return Ok(CookieJar::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn save_jar(path: &Path, jar: &CookieJar) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(jar)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_cache::CookieOptions;

    #[test]
    fn test_jar_file_roundtrip() {
        let dir = std::env::temp_dir().join(format!("storefront-cli-{}", std::process::id()));
        let path = dir.join("nested").join(COOKIES_FILE);

        assert_eq!(load_jar(&path).unwrap(), CookieJar::new());

        let mut jar = CookieJar::new();
        jar.set("cart", "abc", &CookieOptions::default());
        let mut browser = CookieJar::new();
        browser.apply_set_cookie(&jar.set_cookie_headers().unwrap());
        save_jar(&path, &browser).unwrap();

        let loaded = load_jar(&path).unwrap();
        assert_eq!(loaded.get("cart"), Some("abc"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_resolve() {
        assert_eq!(resolve(Path::new("/srv"), "a.toml"), PathBuf::from("/srv/a.toml"));
        assert_eq!(resolve(Path::new("/srv"), "/etc/a.toml"), PathBuf::from("/etc/a.toml"));
    }
}
