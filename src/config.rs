use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid yaml in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("settings validation failed: {0}")]
    Settings(String),
}

pub const DEFAULT_GATEWAY_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_IMAGE_SIZE: &str = "512x512";
pub const DEFAULT_GATEWAY_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub export_root: PathBuf,
    #[serde(default)]
    pub state_root: Option<PathBuf>,
    #[serde(default)]
    pub gateway: GatewaySettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewaySettings {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_completion_model")]
    pub completion_model: String,
    #[serde(default = "default_image_size")]
    pub image_size: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            completion_model: default_completion_model(),
            image_size: default_image_size(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_GATEWAY_API_BASE.to_string()
}

fn default_completion_model() -> String {
    DEFAULT_COMPLETION_MODEL.to_string()
}

fn default_image_size() -> String {
    DEFAULT_IMAGE_SIZE.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_GATEWAY_TIMEOUT_SECONDS
}

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let settings: Settings = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    validate_settings(&settings)?;
    Ok(settings)
}

pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.export_root.as_os_str().is_empty() {
        return Err(ConfigError::Settings(
            "export_root must be non-empty".to_string(),
        ));
    }
    if settings.gateway.api_base.trim().is_empty() {
        return Err(ConfigError::Settings(
            "gateway.api_base must be non-empty".to_string(),
        ));
    }
    if settings.gateway.completion_model.trim().is_empty() {
        return Err(ConfigError::Settings(
            "gateway.completion_model must be non-empty".to_string(),
        ));
    }
    validate_image_size(&settings.gateway.image_size)?;
    if settings.gateway.timeout_seconds == 0 {
        return Err(ConfigError::Settings(
            "gateway.timeout_seconds must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_image_size(raw: &str) -> Result<(), ConfigError> {
    let valid = raw
        .split_once('x')
        .is_some_and(|(w, h)| w.parse::<u32>().is_ok() && h.parse::<u32>().is_ok());
    if valid {
        return Ok(());
    }
    Err(ConfigError::Settings(format!(
        "gateway.image_size `{raw}` must look like `512x512`"
    )))
}
