use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Environment variable prefix shared by every binary (`APP_PORT`, `APP_VIEWER__LOCALE`, ...).
pub const ENV_PREFIX: &str = "APP";

/// Settings every binary carries: where to listen and how to log.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP collector endpoint. Spans are only exported when this is set.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        load_layered(None)
    }
}

/// Load settings of type `T` from an optional base file, overlaid with `APP_*` environment variables.
///
/// A `.env` file in the working directory is read first so its values take part in the overlay.
/// Nested keys use `__` as separator: `APP_DOCUMENT_SERVICE__URL`.
pub fn load_layered<T: DeserializeOwned>(base_file: Option<&Path>) -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let mut builder = Cfg::builder();
    if let Some(path) = base_file {
        builder = builder.add_source(File::from(path).required(false));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}
