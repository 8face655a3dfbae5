//! Designer configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//! The physical-to-pixel scale is fixed and not configurable.

use std::path::Path;

use card_renderer::{FrameConfig, HostConfig, Size};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Format requested through `RUST_LOG_FORMAT`, if any.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        match std::env::var("RUST_LOG_FORMAT").ok()?.as_str() {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesignerConfig {
    /// Name given to the new project.
    pub project_name: String,
    /// Size of the editor container in screen pixels.
    pub container: Size,
    /// Seed each empty face with a text element naming it.
    pub seed_placeholder: bool,
    /// Log output format, unless overridden by `RUST_LOG_FORMAT`.
    pub log_format: LogFormat,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            project_name: "Untitled card".to_string(),
            container: Size::new(1200.0, 800.0),
            seed_placeholder: true,
            log_format: LogFormat::Text,
        }
    }
}

impl DesignerConfig {
    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Json`] for malformed input and
    /// [`AppError::Config`] for values that fail validation.
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`] if the file cannot be read, otherwise as
    /// [`DesignerConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!("Loaded designer config from {}", path.display());
        Ok(config)
    }

    /// Check that the values can drive a session.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] naming the first bad field.
    pub fn validate(&self) -> AppResult<()> {
        if !self.container.is_drawable() {
            return Err(AppError::Config(format!(
                "container must have a positive size, got {}x{}",
                self.container.width, self.container.height
            )));
        }
        Ok(())
    }

    /// Frame geometry for the card.
    #[must_use]
    pub fn frame_config(&self) -> FrameConfig {
        FrameConfig::default()
    }

    /// Host settings derived from this config.
    #[must_use]
    pub fn host_config(&self) -> HostConfig {
        HostConfig {
            seed_placeholder: self.seed_placeholder,
            surface_size: self.frame_config().surface_size(),
        }
    }
}
