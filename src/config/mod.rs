// Required external crates for configuration management and serialization
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use config::{Config, ConfigError, Environment, File};

/// Configuration for the chat client and the reply service it talks to
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Scheme, host and port of the reply service
    pub base_url: String,
    /// Path of the reply endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Name of the query parameter carrying the user's text
    #[serde(default = "default_query_param")]
    pub query_param: String,
    /// Optional per-request timeout. Requests never time out when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Configuration for the demo HTTP reply service
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

/// Configuration for application logging
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    pub level: String,
    /// Optional log directory
    pub file: Option<PathBuf>,
}

/// A catalog entry served by the demo reply service
#[derive(Debug, Deserialize, Clone)]
pub struct ProductConfig {
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    /// URL of the product image, returned as `img`
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub best_seller: bool,
}

/// A canned answer about the business, given when any keyword appears
#[derive(Debug, Deserialize, Clone)]
pub struct BusinessInfoConfig {
    pub keywords: Vec<String>,
    pub reply: String,
}

/// Reply rules and catalog for the demo reply service
#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    pub greeting: String,
    pub fallback: String,
    pub reset: String,
    #[serde(default)]
    pub reset_words: Vec<String>,
    #[serde(default)]
    pub greeting_phrases: Vec<String>,
    #[serde(default)]
    pub best_seller_phrases: Vec<String>,
    /// Synonym (as typed by users) to catalog category
    #[serde(default)]
    pub categories: HashMap<String, String>,
    #[serde(default)]
    pub products: Vec<ProductConfig>,
    /// Checked in order; the first entry with a matching keyword answers
    #[serde(default)]
    pub business_info: Vec<BusinessInfoConfig>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

/// Main settings struct that contains all configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Chat client settings
    pub client: ClientConfig,
    /// Demo server settings
    pub server: ServerConfig,
    /// Logging-related settings
    pub logging: LoggingConfig,
    /// Demo reply rules
    pub bot: BotConfig,
}

fn default_endpoint() -> String {
    "/get-response/".to_string()
}

fn default_query_param() -> String {
    "msg".to_string()
}

fn default_category() -> String {
    "Uncategorized".to_string()
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_max_results() -> usize {
    5
}

/// Implementation for loading and parsing configuration
impl Settings {
    /// Creates a new Settings instance by loading config from multiple sources
    /// in the following order of precedence (highest to lowest):
    /// 1. Environment variables prefixed with SILVERBOT_ (`__` between levels)
    /// 2. Local config file (local.toml) if present
    /// 3. Default config file (default.toml)
    pub fn from_dir(config_dir: &Path) -> Result<Self, ConfigError> {
        if !config_dir.exists() {
            return Err(ConfigError::Message(
                format!("Config directory not found at: {}", config_dir.display())
            ));
        }

        let default_config = config_dir.join("default.toml");
        if !default_config.exists() {
            return Err(ConfigError::Message(
                format!("Default configuration file not found at: {}", default_config.display())
            ));
        }

        let local_config = config_dir.join("local.toml");

        let settings = Config::builder()
            .add_source(File::from(default_config))
            .add_source(File::from(local_config).required(false))
            .add_source(
                Environment::with_prefix("SILVERBOT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.client.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Message(
                format!("client.base_url must start with http:// or https://, got: {}", self.client.base_url)
            ));
        }

        if !self.client.endpoint.starts_with('/') {
            return Err(ConfigError::Message(
                format!("client.endpoint must start with '/', got: {}", self.client.endpoint)
            ));
        }

        if self.client.query_param.trim().is_empty() {
            return Err(ConfigError::Message(
                "client.query_param must not be empty".to_string()
            ));
        }

        if self.client.request_timeout_secs == Some(0) {
            return Err(ConfigError::Message(
                "client.request_timeout_secs must be greater than 0 when set".to_string()
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::Message(
                "Port must be between 1 and 65535, got: 0".to_string()
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            _ => Err(ConfigError::Message(
                format!("Invalid logging level: {}. Must be one of: error, warn, info, debug, trace",
                    self.logging.level)
            )),
        }?;

        if let Some(product) = self.bot.products.iter().find(|p| p.price.is_some_and(|v| v < 0.0)) {
            return Err(ConfigError::Message(
                format!("Price of '{}' must not be negative", product.name)
            ));
        }

        if self.bot.max_results == 0 {
            return Err(ConfigError::Message(
                "bot.max_results must be greater than 0".to_string()
            ));
        }

        Ok(())
    }
}
