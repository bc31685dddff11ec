//! Configuration management for the todo service
//!
//! Settings come from defaults, an optional TOML file, `TODO_*` environment
//! variables and finally CLI flags, in that order of precedence.

use crate::core::error::{Error, Result};
use crate::storage::IdAllocation;
use crate::types::Namespace;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "todo-service.toml";

/// Available storage backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// In-process document store
    Memory,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Document store configuration
    pub store: StoreConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Metrics configuration
    pub metrics: MetricsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// HTTP server bind address
    pub http_addr: SocketAddr,

    /// Per-request timeout
    #[serde(deserialize_with = "deserialize_duration")]
    pub request_timeout: Duration,
}

/// Document store configuration
///
/// `host` and `port` are the connection target handed to the backend; the
/// memory backend records them but has nothing to dial.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Storage backend type
    pub storage_type: StorageType,

    /// Store host
    pub host: String,

    /// Store port
    pub port: u16,

    /// Logical database name
    pub database: String,

    /// Collection holding the todos
    pub collection: String,

    /// How ids are assigned on create
    pub id_allocation: IdAllocation,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (pretty, json)
    pub format: String,
}

/// Metrics configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsConfig {
    /// Serve Prometheus metrics at `/metrics`
    pub enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::Memory,
            host: "localhost".to_string(),
            port: 27017,
            database: "todo_list_db".to_string(),
            collection: "todo_list_collection".to_string(),
            id_allocation: IdAllocation::Atomic,
        }
    }
}

impl StoreConfig {
    /// Namespace the todos live in
    pub fn namespace(&self) -> Namespace {
        Namespace::new(&self.database, &self.collection)
    }

    /// `host:port` connection target
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Load configuration: the given file (or `todo-service.toml` when it
    /// exists), then environment overrides, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            None => Config::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file {}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::config(format!("Failed to parse config file: {}", e)))
    }

    /// Apply `TODO_*` overrides. `lookup` resolves a variable name, normally
    /// from the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("TODO_HTTP_ADDR") {
            self.server.http_addr = addr
                .parse()
                .map_err(|e| Error::config(format!("Invalid HTTP address: {}", e)))?;
        }

        if let Some(timeout) = lookup("TODO_REQUEST_TIMEOUT") {
            self.server.request_timeout = parse_duration(&timeout)
                .map_err(|e| Error::config(format!("Invalid request timeout: {}", e)))?;
        }

        if let Some(host) = lookup("TODO_STORE_HOST") {
            self.store.host = host;
        }

        if let Some(port) = lookup("TODO_STORE_PORT") {
            self.store.port = port
                .parse()
                .map_err(|e| Error::config(format!("Invalid store port: {}", e)))?;
        }

        if let Some(database) = lookup("TODO_STORE_DATABASE") {
            self.store.database = database;
        }

        if let Some(collection) = lookup("TODO_STORE_COLLECTION") {
            self.store.collection = collection;
        }

        if let Some(allocation) = lookup("TODO_ID_ALLOCATION") {
            self.store.id_allocation = allocation.parse().map_err(Error::config)?;
        }

        if let Some(level) = lookup("TODO_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(format) = lookup("TODO_LOG_FORMAT") {
            self.logging.format = format;
        }

        if let Some(enabled) = lookup("TODO_METRICS_ENABLED") {
            self.metrics.enabled = enabled
                .parse()
                .map_err(|e| Error::config(format!("Invalid metrics flag: {}", e)))?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.store.database.is_empty() {
            return Err(Error::config("Database name must not be empty"));
        }

        if self.store.collection.is_empty() {
            return Err(Error::config("Collection name must not be empty"));
        }

        if self.store.collection.contains('$') || self.store.database.contains(['/', '.', ' ', '$']) {
            return Err(Error::config("Invalid characters in database or collection name"));
        }

        if self.server.request_timeout.is_zero() {
            return Err(Error::config("Request timeout must be greater than zero"));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => return Err(Error::config("Invalid log level")),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => return Err(Error::config("Invalid log format")),
        }

        Ok(())
    }
}

// Custom deserializer for Duration from string
fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct DurationVisitor;

    impl<'de> Visitor<'de> for DurationVisitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a duration string like '30s' or '5m', or a number of seconds")
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Duration, E>
        where
            E: de::Error,
        {
            parse_duration(value).map_err(E::custom)
        }

        fn visit_i64<E>(self, value: i64) -> std::result::Result<Duration, E>
        where
            E: de::Error,
        {
            u64::try_from(value)
                .map(Duration::from_secs)
                .map_err(|_| E::custom("duration must not be negative"))
        }

        fn visit_u64<E>(self, value: u64) -> std::result::Result<Duration, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_secs(value))
        }
    }

    deserializer.deserialize_any(DurationVisitor)
}

/// Simple duration parser for common formats (`250ms`, `30s`, `5m`, `1h`, `30`)
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        let ms: u64 = ms.parse().map_err(|_| "Invalid milliseconds")?;
        Ok(Duration::from_millis(ms))
    } else if let Some(secs) = s.strip_suffix('s') {
        let secs: u64 = secs.parse().map_err(|_| "Invalid seconds")?;
        Ok(Duration::from_secs(secs))
    } else if let Some(mins) = s.strip_suffix('m') {
        let mins: u64 = mins.parse().map_err(|_| "Invalid minutes")?;
        let secs = mins.checked_mul(60).ok_or("Minutes out of range")?;
        Ok(Duration::from_secs(secs))
    } else if let Some(hours) = s.strip_suffix('h') {
        let hours: u64 = hours.parse().map_err(|_| "Invalid hours")?;
        let secs = hours.checked_mul(3600).ok_or("Hours out of range")?;
        Ok(Duration::from_secs(secs))
    } else {
        // Try parsing as raw seconds
        let secs: u64 = s.parse().map_err(|_| "Invalid duration format")?;
        Ok(Duration::from_secs(secs))
    }
}
