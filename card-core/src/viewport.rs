//! View settings shared by both faces.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ZOOM, GRID_SIZE_PX, MAX_ZOOM, MIN_ZOOM, SNAP_THRESHOLD_PX, ZOOM_STEP,
};
use crate::error::clamp_logged;
use crate::FaceId;

/// Global view state. There is one instance for the whole project; switching
/// face keeps zoom, rotation and overlay toggles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Face currently shown.
    pub active_face: FaceId,
    /// Zoom factor in `[MIN_ZOOM, MAX_ZOOM]`.
    pub zoom: f64,
    /// View rotation in degrees, in `[0, 360)`.
    pub rotation: f64,
    /// Whether grid lines are drawn.
    pub show_grid: bool,
    /// Whether bleed and safe-zone guides are drawn.
    pub show_safe_zones: bool,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            active_face: FaceId::Front,
            zoom: DEFAULT_ZOOM,
            rotation: 0.0,
            show_grid: false,
            show_safe_zones: true,
        }
    }
}

impl ViewportState {
    /// Zoom one step in.
    #[must_use]
    pub fn zoomed_in(self) -> Self {
        self.with_zoom(self.zoom + ZOOM_STEP)
    }

    /// Zoom one step out.
    #[must_use]
    pub fn zoomed_out(self) -> Self {
        self.with_zoom(self.zoom - ZOOM_STEP)
    }

    /// Set the zoom, clamped and rounded to two decimals.
    #[must_use]
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = clamp_zoom(zoom);
        self
    }
}

/// Clamp a zoom factor into `[MIN_ZOOM, MAX_ZOOM]` and round it to two
/// decimals so repeated steps do not accumulate drift.
#[must_use]
pub fn clamp_zoom(zoom: f64) -> f64 {
    let rounded = round2(zoom);
    clamp_logged("zoom", rounded, MIN_ZOOM, MAX_ZOOM)
}

/// Round to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Normalise an angle in degrees into `[0, 360)`. Non-finite input becomes 0.
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let d = degrees.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

/// Snap a surface coordinate to the nearest grid line when it lies within
/// [`SNAP_THRESHOLD_PX`] of it.
#[must_use]
pub fn snap_to_grid(value: f64) -> f64 {
    let nearest = (value / GRID_SIZE_PX).round() * GRID_SIZE_PX;
    if (value - nearest).abs() <= SNAP_THRESHOLD_PX {
        nearest
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_steps_are_exact() {
        let mut vp = ViewportState::default();
        for _ in 0..4 {
            vp = vp.zoomed_in();
        }
        assert!((vp.zoom - 1.4).abs() < f64::EPSILON);
        for _ in 0..4 {
            vp = vp.zoomed_out();
        }
        assert!((vp.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let vp = ViewportState::default().with_zoom(MIN_ZOOM).zoomed_out();
        assert!((vp.zoom - MIN_ZOOM).abs() < f64::EPSILON);
        let vp = vp.with_zoom(100.0);
        assert!((vp.zoom - MAX_ZOOM).abs() < f64::EPSILON);
        let vp = vp.zoomed_in();
        assert!((vp.zoom - MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_to_grid() {
        assert!((snap_to_grid(41.0) - 40.0).abs() < f64::EPSILON);
        assert!((snap_to_grid(-3.0)).abs() < f64::EPSILON);
        assert!((snap_to_grid(50.0) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_degrees() {
        assert!((normalize_degrees(370.0) - 10.0).abs() < 1e-9);
        assert!((normalize_degrees(-10.0) - 350.0).abs() < 1e-9);
        assert!(normalize_degrees(360.0).abs() < 1e-9);
        assert!(normalize_degrees(f64::NAN).abs() < 1e-9);
        assert!((0.0..360.0).contains(&normalize_degrees(-1e-18)));
    }
}
