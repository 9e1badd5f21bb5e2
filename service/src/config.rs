use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_aux::prelude::deserialize_vec_from_string_or_vec;

use crate::upstream::UpstreamSettings;

/// Application configuration loaded from multiple sources.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. config.yaml file (if exists)
/// 3. Environment variables with RC_ prefix (always wins)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub static_files: StaticFilesConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP server bind address.
    #[serde(default = "default_host")]
    pub host: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log filter directive (debug, info, warn, error, or a full `EnvFilter` string).
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins for CORS requests.
    /// Use `"*"` to allow any origin.
    /// Accepts either an array or comma-separated string.
    /// Example: `["http://localhost:5173"]` or `"http://localhost:5173,https://app.example.com"`
    #[serde(
        default = "default_allowed_origins",
        deserialize_with = "deserialize_origins"
    )]
    pub allowed_origins: Vec<String>,
}

/// Deserialize origins from comma-separated string or array, filtering empty values.
fn deserialize_origins<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let origins: Vec<String> = deserialize_vec_from_string_or_vec(deserializer)?;
    Ok(origins.into_iter().filter(|s| !s.is_empty()).collect())
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// congress.gov v3 API base URL.
    #[serde(default = "default_congress_base_url")]
    pub congress_base_url: String,

    /// congress.gov API key (required, no compiled-in default).
    #[serde(default)]
    pub congress_api_key: String,

    /// ZIP-to-representative lookup base URL.
    #[serde(default = "default_rep_lookup_base_url")]
    pub rep_lookup_base_url: String,

    /// Congress number for all lookups.
    #[serde(default = "default_congress")]
    pub congress: u32,

    /// Session within the congress (1 or 2).
    #[serde(default = "default_session")]
    pub session: u32,

    /// Default vote-list page size.
    #[serde(default = "default_vote_limit")]
    pub vote_limit: u32,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// How often expired entries are swept from memory, in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StaticFilesConfig {
    /// Directory served for any path no API route matches. Disabled when unset.
    #[serde(default)]
    pub dir: Option<String>,
}

/// Per-client-IP request limiting.
///
/// A client may send `max_requests` in a burst; the allowance refills evenly
/// over `window_secs`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_rate_limit_enabled")]
    pub enabled: bool,

    /// Window over which `max_requests` are replenished, in seconds.
    #[serde(default = "default_rate_limit_window_secs")]
    pub window_secs: u64,

    /// Requests one client IP may make per window.
    #[serde(default = "default_rate_limit_max_requests")]
    pub max_requests: u32,
}

impl RateLimitConfig {
    /// Time to regain one request of allowance.
    #[must_use]
    pub fn replenish_interval(&self) -> Duration {
        let window = Duration::from_secs(self.window_secs);
        window.checked_div(self.max_requests).unwrap_or(window)
    }
}

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 300_000;

// These functions cannot be const because serde uses function pointers for defaults
#[allow(clippy::missing_const_for_fn)]
fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_allowed_origins() -> Vec<String> {
    // Default to empty (no cross-origin requests allowed)
    // Configure explicitly via RC_CORS__ALLOWED_ORIGINS or config.yaml
    vec![]
}

fn default_congress_base_url() -> String {
    "https://api.congress.gov/v3".to_string()
}

fn default_rep_lookup_base_url() -> String {
    "https://whoismyrepresentative.com".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_congress() -> u32 {
    119
}

#[allow(clippy::missing_const_for_fn)]
fn default_session() -> u32 {
    2
}

#[allow(clippy::missing_const_for_fn)]
fn default_vote_limit() -> u32 {
    100
}

#[allow(clippy::missing_const_for_fn)]
fn default_timeout_ms() -> u64 {
    10_000
}

#[allow(clippy::missing_const_for_fn)]
fn default_sweep_interval_secs() -> u64 {
    86_400 // 1 day
}

#[allow(clippy::missing_const_for_fn)]
fn default_rate_limit_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_rate_limit_window_secs() -> u64 {
    60
}

#[allow(clippy::missing_const_for_fn)]
fn default_rate_limit_max_requests() -> u32 {
    1000
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            congress_base_url: default_congress_base_url(),
            congress_api_key: String::new(),
            rep_lookup_base_url: default_rep_lookup_base_url(),
            congress: default_congress(),
            session: default_session(),
            vote_limit: default_vote_limit(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_rate_limit_enabled(),
            window_secs: default_rate_limit_window_secs(),
            max_requests: default_rate_limit_max_requests(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: default_port(),
                host: default_host(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
            },
            cors: CorsConfig::default(),
            upstream: UpstreamConfig::default(),
            cache: CacheConfig::default(),
            static_files: StaticFilesConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Sources are merged in priority order:
    /// 1. Struct defaults (lowest)
    /// 2. config.yaml file (if exists)
    /// 3. Environment variables with RC_ prefix (highest)
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config.yaml")
    }

    /// Load configuration with a custom YAML file path.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(yaml_path: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path))
            .merge(Env::prefixed("RC_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // API key is required
        if self.upstream.congress_api_key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "upstream.congress_api_key is required. Set RC_UPSTREAM__CONGRESS_API_KEY environment variable or configure in config.yaml.".into(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port cannot be 0".into()));
        }

        for (name, url) in [
            ("upstream.congress_base_url", &self.upstream.congress_base_url),
            ("upstream.rep_lookup_base_url", &self.upstream.rep_lookup_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "{name} must start with http:// or https://, got: '{url}'"
                )));
            }
        }

        if !(1..=2).contains(&self.upstream.session) {
            return Err(ConfigError::Validation(format!(
                "upstream.session must be 1 or 2, got: {}",
                self.upstream.session
            )));
        }

        if self.upstream.vote_limit == 0 {
            return Err(ConfigError::Validation(
                "upstream.vote_limit cannot be 0".into(),
            ));
        }

        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&self.upstream.timeout_ms) {
            return Err(ConfigError::Validation(format!(
                "upstream.timeout_ms must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}, got: {}",
                self.upstream.timeout_ms
            )));
        }

        if self.cache.sweep_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "cache.sweep_interval_secs cannot be 0".into(),
            ));
        }

        if self.rate_limit.enabled {
            let limit = &self.rate_limit;
            if limit.window_secs == 0 || limit.max_requests == 0 {
                return Err(ConfigError::Validation(
                    "rate_limit.window_secs and rate_limit.max_requests must be positive".into(),
                ));
            }
            if limit.replenish_interval() < Duration::from_millis(1) {
                return Err(ConfigError::Validation(format!(
                    "rate_limit.max_requests ({}) exceeds one per millisecond of a {}s window",
                    limit.max_requests, limit.window_secs
                )));
            }
        }

        // CORS origins must be valid URLs or "*"
        for origin in &self.cors.allowed_origins {
            if origin != "*" && !origin.starts_with("http://") && !origin.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "cors.allowed_origins contains invalid origin '{origin}'. Must be '*' or start with http:// or https://"
                )));
            }
        }

        Ok(())
    }

    /// Connection settings for the upstream HTTP client.
    #[must_use]
    pub fn upstream_settings(&self) -> UpstreamSettings {
        UpstreamSettings {
            congress_base_url: self.upstream.congress_base_url.clone(),
            api_key: self.upstream.congress_api_key.clone(),
            rep_lookup_base_url: self.upstream.rep_lookup_base_url.clone(),
            congress: self.upstream.congress,
            session: self.upstream.session,
            timeout: Duration::from_millis(self.upstream.timeout_ms),
        }
    }

    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache.sweep_interval_secs)
    }
}
