use std::{fmt, path::Path, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "roster.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8000 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Memory,
    Mongodb,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "mongodb" => Ok(StoreKind::Mongodb),
            other => {
                Err(anyhow!("unknown store backend `{other}`, expected `memory` or `mongodb`"))
            }
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Memory => f.write_str("memory"),
            StoreKind::Mongodb => f.write_str("mongodb"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Unset means "not chosen yet"; see [`StoreConfig::backend`].
    #[serde(default)]
    pub backend: Option<StoreKind>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_database() -> String {
    "roster".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { backend: None, url: None, database: default_database() }
    }
}

impl StoreConfig {
    pub fn backend(&self) -> StoreKind {
        self.backend.unwrap_or_default()
    }

    fn validate(&self) -> Result<()> {
        if self.backend() != StoreKind::Mongodb {
            return Ok(());
        }

        let url = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                anyhow!("store.url is required for the mongodb backend; set it or MONGODB_URL")
            })?;
        let lower = url.to_ascii_lowercase();
        if !(lower.starts_with("mongodb://") || lower.starts_with("mongodb+srv://")) {
            bail!("store.url must start with mongodb:// or mongodb+srv://");
        }
        if self.database.trim().is_empty() {
            bail!("store.database must not be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!("unknown log format `{other}`, expected `compact` or `json`")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    /// Loads `.env`, the TOML file named by `CONFIG_PATH`, then environment overrides.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut cfg = Self::from_file(&path)?;
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads a TOML config file. A missing file yields the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Applies environment overrides. `lookup` returns the value of a variable, if set.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("SERVER_PORT `{port}` is not a valid port"))?;
        }
        if let Some(backend) = lookup("ROSTER_STORE") {
            self.store.backend = Some(backend.parse().context("ROSTER_STORE")?);
        }
        if let Some(url) = lookup("MONGODB_URL") {
            self.store.url = Some(url);
            self.store.backend.get_or_insert(StoreKind::Mongodb);
        }
        if let Some(database) = lookup("ROSTER_DATABASE") {
            self.store.database = database;
        }
        if let Some(format) = lookup("ROSTER_LOG_FORMAT") {
            self.log.format = format.parse().context("ROSTER_LOG_FORMAT")?;
        }
        Ok(())
    }

    pub fn validate(&mut self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            self.server.host = ServerConfig::default().host;
        }
        if self.server.port == 0 {
            bail!("server.port must be in 1..=65535");
        }
        self.store.validate()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
