//! Renderer error types.

use card_core::{FaceId, SurfaceId};
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while acquiring or drawing a surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The rendering context could not be created.
    #[error("Rendering context unavailable: {0}")]
    SurfaceUnavailable(String),

    /// The acquisition was superseded by a teardown or remount.
    #[error("Surface acquisition for {0} face was cancelled")]
    Cancelled(FaceId),

    /// The face has no ready surface.
    #[error("Surface for {0} face is not ready")]
    NotReady(FaceId),

    /// The surface was already released.
    #[error("{0} has been disposed")]
    Disposed(SurfaceId),

    /// Drawing a frame failed.
    #[error("Frame render failed: {0}")]
    Frame(String),
}
