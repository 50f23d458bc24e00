//! Runtime configuration loaded from environment variables.
//!
//! | Variable       | Default                  |
//! |----------------|--------------------------|
//! | `HOST`         | `127.0.0.1`              |
//! | `PORT`         | `3000`                   |
//! | `DATABASE_URL` | platform data directory  |
//! | `CORS_ORIGIN`  | `http://localhost:3000`  |
//! | `API_VERSION`  | `v1`                     |
//! | `APP_ENV`      | `development`            |

use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Store location; `None` selects the platform data directory.
    pub database_url: Option<String>,
    /// Allowed CORS origins. `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// Path segment in `/api/{version}/experiments`.
    pub api_version: String,
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_url: None,
            cors_origins: vec!["http://localhost:3000".to_string()],
            api_version: "v1".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Unset or blank
    /// variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(host) = var("HOST") {
            config.host = host;
        }
        if let Some(port) = var("PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{port}'"))?;
        }
        config.database_url = var("DATABASE_URL");
        if let Some(origins) = var("CORS_ORIGIN") {
            config.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(version) = var("API_VERSION") {
            if version.contains('/') {
                bail!("API_VERSION must be a single path segment, got '{version}'");
            }
            config.api_version = version;
        }
        if let Some(environment) = var("APP_ENV") {
            config.environment = environment;
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
