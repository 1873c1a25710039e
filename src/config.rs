use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tools::CLOSE_THRESHOLD_PX;

/// Environment variables checked for the inpainting API key, in order
pub const API_KEY_VARS: [&str; 3] = ["STUDIO_API_KEY", "GEMINI_API_KEY", "API_KEY"];

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Environment variable naming a JSON config file that overrides persisted settings
pub const CONFIG_PATH_VAR: &str = "STUDIO_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings for the editor and its inpainting service.
///
/// Persisted with the rest of the app state; the API key is only ever read
/// from the environment and is never written out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub endpoint: String,
    pub model: String,
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Polygon close distance, in screen pixels
    pub close_threshold_px: f32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            close_threshold_px: CLOSE_THRESHOLD_PX,
        }
    }
}

impl StudioConfig {
    /// Parses a JSON config; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reads the file named by `STUDIO_CONFIG`, if that variable is set
    pub fn from_env_path() -> Option<Result<Self, ConfigError>> {
        let path = std::env::var_os(CONFIG_PATH_VAR)?;
        log::info!("Loading config from {}", std::path::Path::new(&path).display());
        Some(Self::from_path(std::path::Path::new(&path)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ConfigError::Invalid(format!("endpoint '{}' is not an http(s) URL", self.endpoint)));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model name is empty".to_string()));
        }
        if !(self.close_threshold_px.is_finite() && self.close_threshold_px > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "close_threshold_px must be positive, got {}",
                self.close_threshold_px
            )));
        }
        Ok(())
    }

    /// Fills in the API key from the environment
    pub fn with_env(mut self) -> Self {
        self.api_key = API_KEY_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|value| !value.trim().is_empty()));
        if self.api_key.is_none() {
            log::warn!("No API key found in {:?}; inpainting is disabled", API_KEY_VARS);
        }
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
