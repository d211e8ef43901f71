//! config-rs/lib.rs
//! Process configuration for the churn form service
//! Loads `.env`, reads the environment through a provider and exposes a typed `AppConfig`

use std::collections::HashMap;
use std::env;

use thiserror::Error;

/// Session key used when `SECRET_KEY` is not set. Only suitable for local development.
pub const DEVELOPMENT_SECRET_KEY: &str = "development key";

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Configuration key not set: {0}")]
    Missing(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Source of raw configuration strings
pub trait ConfigProvider: Send + Sync {
    /// Get a string configuration value
    fn get_string(&self, key: &str) -> Result<String, ConfigError>;

    /// Get a non-empty string value, treating blank values as unset
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get_string(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Get a string configuration value with a default
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_non_empty(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a parsed value, warning and falling back to `default` when the value is malformed
    fn get_parsed_or<T>(&self, key: &str, default: T) -> T
    where
        T: std::str::FromStr + std::fmt::Display,
    {
        match self.get_non_empty(key) {
            Some(raw) => raw.parse::<T>().unwrap_or_else(|_| {
                log::warn!("Invalid value '{}' in {}, using default {}", raw, key, default);
                default
            }),
            None => default,
        }
    }

    /// Get a boolean value
    fn get_bool_or(&self, key: &str, default: bool) -> bool {
        match self.get_non_empty(key) {
            Some(raw) => match raw.to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => true,
                "false" | "no" | "0" | "off" => false,
                _ => {
                    log::warn!("Invalid boolean '{}' in {}, using default {}", raw, key, default);
                    default
                }
            },
            None => default,
        }
    }
}

/// Environment variable based configuration provider
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider;

impl EnvConfigProvider {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn get_string(&self, key: &str) -> Result<String, ConfigError> {
        env::var(key).map_err(|e| match e {
            env::VarError::NotPresent => ConfigError::Missing(key.to_string()),
            env::VarError::NotUnicode(_) => ConfigError::InvalidValue {
                key: key.to_string(),
                value: "<non-unicode>".to_string(),
            },
        })
    }
}

/// In-memory config provider for tests or static configuration
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }

    /// Builder-style variant of `set`
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        self.set(key, value);
        self
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_string(&self, key: &str) -> Result<String, ConfigError> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }
}

/// Load a `.env` file from the working directory if one exists
pub fn load_dotenv() {
    match dotenv::dotenv() {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(_) => log::debug!("No .env file found, using process environment"),
    }
}

/// Typed configuration for the churn form service
#[derive(Clone, PartialEq)]
pub struct AppConfig {
    /// Scoring endpoint (`URL`)
    pub scoring_url: Option<String>,
    /// Bearer token for the scoring endpoint (`TOKEN`)
    pub token: Option<String>,
    /// Session signing key (`SECRET_KEY`)
    pub secret_key: String,
    pub host: String,
    pub port: u16,
    /// Outbound scoring timeout (`SCORING_TIMEOUT_SECONDS`)
    pub timeout_seconds: u64,
    /// Disables certificate validation on the scoring call (`SCORING_ACCEPT_INVALID_CERTS`)
    pub accept_invalid_certs: bool,
}

// Token and secret key stay out of Debug output so the config can be logged.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("scoring_url", &self.scoring_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("secret_key", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl AppConfig {
    /// Load `.env` and read the process environment
    pub fn from_env() -> Self {
        load_dotenv();
        Self::from_provider(&EnvConfigProvider::new())
    }

    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Self {
        Self {
            scoring_url: provider.get_non_empty("URL"),
            token: provider.get_non_empty("TOKEN"),
            secret_key: provider.get_string_or("SECRET_KEY", DEVELOPMENT_SECRET_KEY),
            host: provider.get_string_or("HOST", DEFAULT_HOST),
            port: provider.get_parsed_or("PORT", DEFAULT_PORT),
            timeout_seconds: provider.get_parsed_or("SCORING_TIMEOUT_SECONDS", DEFAULT_TIMEOUT_SECONDS),
            accept_invalid_certs: provider.get_bool_or("SCORING_ACCEPT_INVALID_CERTS", false),
        }
    }

    /// `host:port` string for binding the listener
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            // bare IPv6 literal
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn uses_development_secret(&self) -> bool {
        self.secret_key == DEVELOPMENT_SECRET_KEY
    }

    pub fn scorer_configured(&self) -> bool {
        self.scoring_url.is_some() && self.token.is_some()
    }

    /// Fails with `Missing` naming the first absent scoring variable
    pub fn require_scorer(&self) -> Result<(), ConfigError> {
        if self.scoring_url.is_none() {
            return Err(ConfigError::Missing("URL".to_string()));
        }
        if self.token.is_none() {
            return Err(ConfigError::Missing("TOKEN".to_string()));
        }
        Ok(())
    }

    /// Log the configuration and flag insecure or incomplete settings
    pub fn log_summary(&self) {
        log::info!("Listening address: {}", self.bind_address());
        log::info!(
            "Scoring endpoint: {}",
            self.scoring_url.as_deref().unwrap_or("<unset>")
        );
        log::info!("Scoring timeout: {}s", self.timeout_seconds);

        if let Err(err) = self.require_scorer() {
            log::warn!("{}; submissions will fail until URL and TOKEN are set", err);
        }
        if self.uses_development_secret() {
            log::warn!("SECRET_KEY is not set, using the insecure development key");
        }
        if self.accept_invalid_certs {
            log::warn!("TLS certificate validation is DISABLED for the scoring endpoint; use only in test environments");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, Once};

    struct CapturingLogger {
        records: Mutex<Vec<(log::Level, String)>>,
    }

    impl log::Log for CapturingLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    static LOGGER: CapturingLogger = CapturingLogger {
        records: Mutex::new(Vec::new()),
    };

    /// Warnings logged so far that mention `key`
    fn warnings_for(key: &str) -> Vec<String> {
        LOGGER
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, message)| *level == log::Level::Warn && message.contains(key))
            .map(|(_, message)| message.clone())
            .collect()
    }

    fn install_logger() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            log::set_logger(&LOGGER).unwrap();
            log::set_max_level(log::LevelFilter::Trace);
        });
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_provider(&MemoryConfigProvider::new());

        assert_eq!(config.scoring_url, None);
        assert_eq!(config.token, None);
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.timeout_seconds, 30);
        assert!(!config.accept_invalid_certs);
        assert!(config.uses_development_secret());
        assert!(!config.scorer_configured());
    }

    #[test]
    fn test_values_from_provider() {
        let provider = MemoryConfigProvider::new()
            .with("URL", "https://scoring.example.com/v4/deployments/abc/predictions")
            .with("TOKEN", "secret-token")
            .with("SECRET_KEY", "s3cr3t")
            .with("PORT", "8080")
            .with("HOST", "127.0.0.1")
            .with("SCORING_TIMEOUT_SECONDS", "5")
            .with("SCORING_ACCEPT_INVALID_CERTS", "yes");

        let config = AppConfig::from_provider(&provider);

        assert_eq!(
            config.scoring_url.as_deref(),
            Some("https://scoring.example.com/v4/deployments/abc/predictions")
        );
        assert_eq!(config.token.as_deref(), Some("secret-token"));
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.timeout_seconds, 5);
        assert!(config.accept_invalid_certs);
        assert!(!config.uses_development_secret());
        assert!(config.require_scorer().is_ok());
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let provider = MemoryConfigProvider::new().with("PORT", "not-a-port");
        assert_eq!(AppConfig::from_provider(&provider).port, DEFAULT_PORT);
    }

    #[test]
    fn test_malformed_values_warn_before_fallback() {
        install_logger();
        let provider = MemoryConfigProvider::new()
            .with("CONFIG_RS_WARN_PORT", "not-a-port")
            .with("CONFIG_RS_WARN_FLAG", "maybe")
            .with("CONFIG_RS_QUIET_PORT", "8080");

        assert_eq!(provider.get_parsed_or("CONFIG_RS_WARN_PORT", DEFAULT_PORT), DEFAULT_PORT);
        assert!(!provider.get_bool_or("CONFIG_RS_WARN_FLAG", false));
        assert_eq!(provider.get_parsed_or("CONFIG_RS_QUIET_PORT", DEFAULT_PORT), 8080);

        let port_warnings = warnings_for("CONFIG_RS_WARN_PORT");
        assert_eq!(port_warnings.len(), 1);
        assert!(port_warnings[0].contains("'not-a-port'"));
        assert!(port_warnings[0].contains("using default 5000"));

        assert_eq!(warnings_for("CONFIG_RS_WARN_FLAG").len(), 1);
        assert!(warnings_for("CONFIG_RS_QUIET_PORT").is_empty());
    }

    #[test]
    fn test_blank_values_are_unset() {
        let provider = MemoryConfigProvider::new().with("URL", "   ").with("TOKEN", "t");
        let config = AppConfig::from_provider(&provider);

        assert_eq!(config.scoring_url, None);
        assert_eq!(config.require_scorer(), Err(ConfigError::Missing("URL".to_string())));
    }

    #[test]
    fn test_missing_token_reported() {
        let provider = MemoryConfigProvider::new().with("URL", "http://localhost:9000/score");
        let config = AppConfig::from_provider(&provider);

        assert_eq!(config.require_scorer(), Err(ConfigError::Missing("TOKEN".to_string())));
    }

    #[test]
    fn test_ipv6_bind_address() {
        let provider = MemoryConfigProvider::new().with("HOST", "::").with("PORT", "5000");
        assert_eq!(AppConfig::from_provider(&provider).bind_address(), "[::]:5000");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let provider = MemoryConfigProvider::new()
            .with("TOKEN", "very-secret-token")
            .with("SECRET_KEY", "another-secret");
        let rendered = format!("{:?}", AppConfig::from_provider(&provider));

        assert!(!rendered.contains("very-secret-token"));
        assert!(!rendered.contains("another-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_env_provider_missing_key() {
        std::env::remove_var("CONFIG_RS_TEST_UNSET_KEY");
        let provider = EnvConfigProvider::new();
        assert_eq!(
            provider.get_string("CONFIG_RS_TEST_UNSET_KEY"),
            Err(ConfigError::Missing("CONFIG_RS_TEST_UNSET_KEY".to_string()))
        );

        std::env::set_var("CONFIG_RS_TEST_SET_KEY", "value");
        assert_eq!(provider.get_string("CONFIG_RS_TEST_SET_KEY").unwrap(), "value");
        std::env::remove_var("CONFIG_RS_TEST_SET_KEY");
    }
}
