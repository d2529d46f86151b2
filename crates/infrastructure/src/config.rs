//! Client configuration.
//!
//! Values are layered, later sources winning:
//! 1. built-in defaults
//! 2. a TOML file (`tally.toml` in the working directory, or an explicit path)
//! 3. `TALLY_*` environment variables, e.g. `TALLY_BASE_URL`

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tally_application::ResponseOrdering;
use tally_domain::DEFAULT_PAGE_SIZE;
use url::Url;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "TALLY";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// The base URL is not an absolute http(s) URL.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl {
        /// Configured value.
        url: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A numeric setting is out of range.
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

/// Settings of the REST client and the entity stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server root; request paths such as `api/bills` are resolved against it.
    pub base_url: String,
    /// Transport timeout per request.
    pub timeout_ms: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Page size used when none is given.
    pub page_size: u32,
    /// How completions of overlapping requests are applied.
    pub response_ordering: ResponseOrdering,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_string(),
            timeout_ms: 30_000,
            user_agent: concat!("Tally/", env!("CARGO_PKG_VERSION")).to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            response_ordering: ResponseOrdering::default(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from defaults, the config file and the process
    /// environment.
    ///
    /// Without `path`, an optional `tally.toml` in the working directory is
    /// read; an explicit `path` must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read, a value has the wrong
    /// type, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_sources(path, Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration with an explicit environment source.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_sources(path: Option<&Path>, environment: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("tally").required(false),
        };

        let config: Self = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("timeout_ms", defaults.timeout_ms)?
            .set_default("user_agent", defaults.user_agent)?
            .set_default("page_size", defaults.page_size)?
            .set_default("response_ordering", "latest_issued")?
            .add_source(file)
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialization alone cannot.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::NotPositive("timeout_ms"));
        }
        if self.page_size == 0 {
            return Err(ConfigError::NotPositive("page_size"));
        }
        Ok(())
    }
}
