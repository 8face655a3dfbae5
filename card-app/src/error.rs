//! Session-level errors.

use card_core::DesignError;
use card_renderer::RenderError;
use thiserror::Error;

/// Result type for session operations.
pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced by the designer session.
#[derive(Debug, Error)]
pub enum AppError {
    /// Reading a config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A config file or panel payload was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration parsed but is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Designer core anomaly.
    #[error(transparent)]
    Design(#[from] DesignError),

    /// Surface or frame failure.
    #[error(transparent)]
    Render(#[from] RenderError),
}
