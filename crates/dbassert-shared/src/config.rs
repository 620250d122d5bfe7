//! Configuration management for dbassert components

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default configuration file, read from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "dbassert.toml";

/// Prefix of environment variable overrides, e.g. `DBASSERT_DATABASE__URL`.
pub const ENV_PREFIX: &str = "DBASSERT";

/// Main configuration structure for dbassert
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DbAssertConfig {
    /// Catalog database configuration
    pub database: DatabaseConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,

    /// Name checking behaviour
    pub names: NamesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL; without it catalog checks run against an
    /// empty in-memory catalog
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connection_timeout: u64,
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 2,
            connection_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json or pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamesConfig {
    /// Fold `enquote_name` results to lower case unless told otherwise
    pub lowercase_enquoted: bool,
}

impl Default for NamesConfig {
    fn default() -> Self {
        Self {
            lowercase_enquoted: true,
        }
    }
}

impl DbAssertConfig {
    /// Load configuration from the default file and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::build(Some(path.as_ref()), ENV_PREFIX)
    }

    /// Load configuration from environment variables only
    pub fn load_from_env() -> Result<Self, ConfigError> {
        Self::build(None, ENV_PREFIX)
    }

    fn build(path: Option<&Path>, env_prefix: &str) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&DbAssertConfig::default())?);

        if let Some(path) = path.filter(|p| p.exists()) {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DbAssertConfig::default();
        assert_eq!(config.database.url, None);
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.database.connect_timeout(), Duration::from_secs(30));
        assert_eq!(config.observability.logging.level, "warn");
        assert!(config.names.lowercase_enquoted);
    }

    #[test]
    fn test_config_serialization() {
        let config = DbAssertConfig::default();
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: DbAssertConfig = serde_json::from_str(&serialized).unwrap();

        assert_eq!(config.database.max_connections, deserialized.database.max_connections);
        assert_eq!(config.names.lowercase_enquoted, deserialized.names.lowercase_enquoted);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = DbAssertConfig::build(
            Some(Path::new("/nonexistent/dbassert.toml")),
            "DBASSERT_TEST_MISSING",
        )
        .unwrap();
        assert_eq!(config.observability.logging.format, "pretty");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("dbassert-test-{}.toml", std::process::id()));
        let toml = r#"
[database]
url = "postgres://localhost/app"

[names]
lowercase_enquoted = false
"#;
        std::fs::write(&path, toml).unwrap();

        let config = DbAssertConfig::build(Some(path.as_path()), "DBASSERT_TEST_FILE").unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/app"));
        assert_eq!(config.database.max_connections, 2);
        assert!(!config.names.lowercase_enquoted);
    }

    #[test]
    fn test_environment_overrides() {
        std::env::set_var("DBASSERT_TEST_ENV_OBSERVABILITY__LOGGING__LEVEL", "debug");
        std::env::set_var("DBASSERT_TEST_ENV_DATABASE__MAX_CONNECTIONS", "8");

        let config = DbAssertConfig::build(None, "DBASSERT_TEST_ENV").unwrap();
        assert_eq!(config.observability.logging.level, "debug");
        assert_eq!(config.database.max_connections, 8);
    }
}
