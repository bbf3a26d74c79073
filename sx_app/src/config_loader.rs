use std::path::Path;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::cli::SearchArgs;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/sx_top_questions.toml";

/// Environment variable overriding the configuration file location
pub const CONFIG_PATH_ENV: &str = "SX_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchSection,
    pub api: ApiSection,
    pub rate_limit: RateLimitSection,
    pub http: HttpSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    pub intitle: String,
    pub tagged: Option<String>,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self { intitle: "git".to_string(), tagged: Some("go".to_string()) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub site: String,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self { base_url: "https://api.stackexchange.com".to_string(), site: "stackoverflow".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RateLimitSection {
    pub capacity: u32,
    pub refill_per_second: f64,
}

impl Default for RateLimitSection {
    fn default() -> Self {
        Self { capacity: sx_ratelimit::presets::STACK_EXCHANGE_BURST, refill_per_second: sx_ratelimit::presets::STACK_EXCHANGE_RATE }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self { connect_timeout_secs: 10, request_timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub dir: String,
    pub level: String,
    /// Mirror log lines to stderr; stdout is reserved for the JSON result
    pub stderr: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { dir: "./logs".to_string(), level: "info".to_string(), stderr: true }
    }
}

impl AppConfig {
    /// Command line filters take precedence over the file
    pub fn apply_args(&mut self, args: SearchArgs) {
        if let Some(intitle) = args.intitle {
            self.search.intitle = intitle;
        }
        if let Some(tagged) = args.tagged {
            self.search.tagged = Some(tagged);
        }
    }
}

/// Load the configuration file, with `SX__SECTION__KEY` environment overrides
pub fn load_app_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path.as_ref()))
        .add_source(Environment::with_prefix("SX").prefix_separator("__").separator("__").try_parsing(true))
        .build()?;

    config.try_deserialize()
}

/// Resolve a load result, falling back to defaults on failure
pub fn config_or_default(loaded: Result<AppConfig, ConfigError>, path: &str) -> AppConfig {
    match loaded {
        Ok(config) => {
            tracing::info!("Loaded config from {path}");
            config
        }
        Err(err) => {
            tracing::warn!("Failed to load config from {}: {}. Using defaults.", path, err);
            AppConfig::default()
        }
    }
}

/// Configuration file path from the environment or the default location
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}
