//! Error types for the card designer.
//!
//! None of these cross a component boundary as a failure. The store is total
//! and absorbs anomalies where they are detected; these values exist so that
//! the anomaly can be logged and, for the control surface, reported back as
//! the reason an action was dropped.

use thiserror::Error;

use crate::{ElementId, FaceId};

/// Result type for operations that can genuinely fail.
pub type DesignResult<T> = Result<T, DesignError>;

/// Anomalies the designer core detects and absorbs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DesignError {
    /// A face's drawable surface could not be acquired.
    #[error("Surface for {face} face could not be initialized: {reason}")]
    InitializationFailure {
        /// Face whose surface failed.
        face: FaceId,
        /// Backend-provided reason.
        reason: String,
    },

    /// An edit targeted an element that no longer exists.
    #[error("Element {id} not found on {face} face")]
    StaleReference {
        /// Face that was searched.
        face: FaceId,
        /// The missing element.
        id: ElementId,
    },

    /// A control was used before the active face's surface was ready.
    #[error("Surface for {0} face is not ready")]
    BindingNotReady(FaceId),

    /// A bounded numeric input was outside its valid range and got clamped.
    #[error("{field} value {value} outside [{min}, {max}]")]
    OutOfRange {
        /// Name of the clamped quantity.
        field: &'static str,
        /// The value as supplied.
        value: f64,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}

/// Clamp `value` into `[min, max]`, logging when it was out of range.
///
/// NaN collapses to `min`; infinities clamp to the nearer bound.
pub(crate) fn clamp_logged(field: &'static str, value: f64, min: f64, max: f64) -> f64 {
    if value.is_finite() && (min..=max).contains(&value) {
        return value;
    }
    let err = DesignError::OutOfRange {
        field,
        value,
        min,
        max,
    };
    tracing::debug!("Clamping: {err}");
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}
