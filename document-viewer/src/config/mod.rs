use crate::view::{Messages, ViewSettings};
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub document_service: UpstreamSettings,
    pub case_service: UpstreamSettings,
    #[serde(default)]
    pub viewer: ViewerSettings,
    #[serde(default)]
    pub messages: Messages,
}

/// Where an upstream store lives and how long to wait for it.
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    pub url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl UpstreamSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_request_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewerSettings {
    /// Delay between status refreshes while a document is processing.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Give up polling after this long. Unset polls until the status settles.
    #[serde(default)]
    pub max_poll_duration_secs: Option<u64>,
    /// Locale for rendered dates, e.g. `en_US` or `fr_FR`.
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_duration_secs: None,
            locale: default_locale(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_locale() -> String {
    "en_US".to_string()
}

impl Settings {
    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            poll_interval: Duration::from_millis(self.viewer.poll_interval_ms),
            max_poll_duration: self.viewer.max_poll_duration_secs.map(Duration::from_secs),
            messages: self.messages.clone(),
        }
    }
}

pub fn get_configuration() -> Result<Settings, AppError> {
    let base_path = std::env::current_dir()?;

    // Run either from the workspace root or from inside the crate.
    let configuration_directory = if base_path.ends_with("document-viewer") {
        base_path.join("config")
    } else {
        base_path.join("document-viewer").join("config")
    };

    let base_file = configuration_directory.join("base.yaml");
    let settings: Settings = core_config::load_layered(Some(base_file.as_path()))?;

    if settings.viewer.poll_interval_ms == 0 {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "viewer.poll_interval_ms must be greater than zero"
        )));
    }

    Ok(settings)
}

/// Path of the base configuration file shipped with the crate.
pub fn base_config_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("config")
        .join("base.yaml")
}
