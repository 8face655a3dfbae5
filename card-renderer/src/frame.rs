//! Card frame composition: physical geometry, print guides and zoom.
//!
//! ## Frame layout
//!
//! ```text
//!   ┌───────────────────────────────────┐  ← bleed edge (frame origin)
//!   │ ┌───────────────────────────────┐ │  ← trim edge (surface origin)
//!   │ │ ┌───────────────────────────┐ │ │  ← safe zone
//!   │ │ │                           │ │ │
//!   │ │ │     drawable surface      │ │ │
//!   │ │ │                           │ │ │
//!   │ │ └───────────────────────────┘ │ │
//!   │ └───────────────────────────────┘ │
//!   └───────────────────────────────────┘
//! ```
//!
//! Layers are emitted bottom to top: background, bleed, safe zone, grid,
//! surface. The guides are only present when their viewport toggle is on;
//! the surface is always last so it draws over every guide.

use card_core::constants::{
    BLEED_MM, CARD_HEIGHT_MM, CARD_WIDTH_MM, CORNER_RADIUS_MM, GRID_SIZE_PX, MAX_DISPLAY_WIDTH_PX,
    MAX_TILT_DEG, PX_PER_MM, SAFE_MARGIN_MM,
};
use card_core::{FaceId, ViewportState};
use serde::{Deserialize, Serialize};

use crate::geometry::{Affine, Point, Rect, Size};

/// Physical card description and display limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Trim width in millimetres.
    pub card_width_mm: f64,
    /// Trim height in millimetres.
    pub card_height_mm: f64,
    /// Corner radius in millimetres.
    pub corner_radius_mm: f64,
    /// Bleed width in millimetres.
    pub bleed_mm: f64,
    /// Safe margin in millimetres.
    pub safe_margin_mm: f64,
    /// Surface pixels per millimetre.
    pub px_per_mm: f64,
    /// Grid spacing in surface pixels.
    pub grid_size_px: f64,
    /// Largest on-screen frame width before zoom.
    pub max_display_width_px: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            card_width_mm: CARD_WIDTH_MM,
            card_height_mm: CARD_HEIGHT_MM,
            corner_radius_mm: CORNER_RADIUS_MM,
            bleed_mm: BLEED_MM,
            safe_margin_mm: SAFE_MARGIN_MM,
            px_per_mm: PX_PER_MM,
            grid_size_px: GRID_SIZE_PX,
            max_display_width_px: MAX_DISPLAY_WIDTH_PX,
        }
    }
}

impl FrameConfig {
    /// Convert millimetres to surface pixels.
    #[must_use]
    pub fn mm_to_px(&self, mm: f64) -> f64 {
        mm * self.px_per_mm
    }

    /// Convert surface pixels to millimetres.
    #[must_use]
    pub fn px_to_mm(&self, px: f64) -> f64 {
        px / self.px_per_mm
    }

    /// Size of the drawable surface (the trimmed card) in surface pixels.
    #[must_use]
    pub fn surface_size(&self) -> Size {
        Size::new(
            self.mm_to_px(self.card_width_mm),
            self.mm_to_px(self.card_height_mm),
        )
    }

    /// Size of the whole frame, bleed included, in surface pixels.
    #[must_use]
    pub fn frame_size(&self) -> Size {
        let bleed = 2.0 * self.mm_to_px(self.bleed_mm);
        let card = self.surface_size();
        Size::new(card.width + bleed, card.height + bleed)
    }

    /// Trim rectangle within the frame.
    #[must_use]
    pub fn trim_rect(&self) -> Rect {
        let bleed = self.mm_to_px(self.bleed_mm);
        let card = self.surface_size();
        Rect::new(bleed, bleed, card.width, card.height)
    }
}

/// A straight guide line in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    /// Start point.
    pub from: Point,
    /// End point.
    pub to: Point,
}

/// One drawable layer of the frame, in frame pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum OverlayLayer {
    /// Card stock behind everything.
    Background {
        /// Trim rectangle.
        rect: Rect,
        /// Corner radius.
        corner_radius: f64,
    },
    /// Region between the bleed edge and the trim edge.
    Bleed {
        /// Bleed edge.
        outer: Rect,
        /// Trim edge.
        inner: Rect,
    },
    /// Boundary of the trim-safe area.
    SafeZone {
        /// Safe rectangle.
        rect: Rect,
        /// Corner radius.
        corner_radius: f64,
    },
    /// Alignment grid over the trim area.
    Grid {
        /// Lines to draw.
        lines: Vec<GridLine>,
    },
    /// The face's live drawable surface.
    Surface {
        /// Face drawn.
        face: FaceId,
        /// Where the surface sits in the frame.
        rect: Rect,
    },
}

/// Placement of the frame on screen for one viewport state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLayout {
    config: FrameConfig,
    /// Scale that fits the unzoomed frame into the container.
    pub fit_scale: f64,
    /// Zoom factor from the viewport.
    pub zoom: f64,
    /// View rotation in degrees.
    pub rotation: f64,
    /// Frame pixels to screen pixels.
    pub transform: Affine,
    /// Screen pixels to frame pixels.
    inverse: Affine,
}

impl FrameLayout {
    /// On-screen size of the frame before zoom.
    #[must_use]
    pub fn display_size(&self) -> Size {
        self.config.frame_size().scale(self.fit_scale)
    }

    /// Effective pixel scale from frame pixels to screen pixels.
    #[must_use]
    pub fn effective_scale(&self) -> f64 {
        self.fit_scale * self.zoom
    }

    /// Map a surface-space point to the screen.
    #[must_use]
    pub fn surface_to_screen(&self, p: Point) -> Point {
        let trim = self.config.trim_rect();
        self.transform.apply(p.add(&trim.origin))
    }

    /// Map a screen point back to surface space.
    #[must_use]
    pub fn screen_to_surface(&self, p: Point) -> Point {
        let trim = self.config.trim_rect();
        self.inverse.apply(p).sub(&trim.origin)
    }

    /// Map a physical point (millimetres from the trim top-left) to the screen.
    #[must_use]
    pub fn mm_to_screen(&self, p: Point) -> Point {
        self.surface_to_screen(p.scale(self.config.px_per_mm))
    }

    /// Map a screen point to millimetres from the trim top-left.
    #[must_use]
    pub fn screen_to_mm(&self, p: Point) -> Point {
        self.screen_to_surface(p).scale(1.0 / self.config.px_per_mm)
    }
}

/// The composed frame: layers bottom to top plus the screen placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Layers, bottom first.
    pub layers: Vec<OverlayLayer>,
    /// Screen placement.
    pub layout: FrameLayout,
}

impl Frame {
    /// Whether grid lines are present.
    #[must_use]
    pub fn has_grid(&self) -> bool {
        self.layers
            .iter()
            .any(|l| matches!(l, OverlayLayer::Grid { .. }))
    }

    /// Whether bleed and safe-zone guides are present.
    #[must_use]
    pub fn has_safe_zones(&self) -> bool {
        self.layers
            .iter()
            .any(|l| matches!(l, OverlayLayer::SafeZone { .. }))
    }

    /// The face whose surface is drawn on top.
    #[must_use]
    pub fn surface_face(&self) -> Option<FaceId> {
        self.layers.iter().rev().find_map(|l| match l {
            OverlayLayer::Surface { face, .. } => Some(*face),
            _ => None,
        })
    }
}

/// Computes frame geometry and overlay layers from viewport state.
#[derive(Debug, Clone, Default)]
pub struct FrameRenderer {
    config: FrameConfig,
}

impl FrameRenderer {
    /// Create a renderer for the given card description.
    #[must_use]
    pub fn new(config: FrameConfig) -> Self {
        Self { config }
    }

    /// Card description in use.
    #[must_use]
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Fit the frame into `container`, preserving its aspect ratio and never
    /// exceeding the maximum display width.
    #[must_use]
    pub fn fit_scale(&self, container: Size) -> f64 {
        let frame = self.config.frame_size();
        let max_fit = self.config.max_display_width_px / frame.width;
        if !container.is_drawable() {
            return max_fit;
        }
        (container.width / frame.width)
            .min(container.height / frame.height)
            .min(max_fit)
    }

    /// Screen placement of the frame: centred in the container, scaled to
    /// fit, then zoomed and rotated about its centre.
    #[must_use]
    pub fn layout(&self, viewport: &ViewportState, container: Size) -> FrameLayout {
        let fit_scale = self.fit_scale(container);
        let frame_center = Rect {
            origin: Point::zero(),
            size: self.config.frame_size(),
        }
        .center();
        let screen_center = if container.is_drawable() {
            Point::new(container.width / 2.0, container.height / 2.0)
        } else {
            frame_center.scale(fit_scale)
        };

        let transform = Affine::translate(screen_center.x, screen_center.y)
            .then_after(&Affine::rotate_degrees(viewport.rotation))
            .then_after(&Affine::scale(fit_scale * viewport.zoom))
            .then_after(&Affine::translate(-frame_center.x, -frame_center.y));
        // fit_scale and zoom are both strictly positive, so this never falls back
        let inverse = transform.inverse().unwrap_or_default();

        FrameLayout {
            config: self.config,
            fit_scale,
            zoom: viewport.zoom,
            rotation: viewport.rotation,
            transform,
            inverse,
        }
    }

    /// Compose the layer stack for the active face.
    #[must_use]
    pub fn compose(&self, viewport: &ViewportState, container: Size) -> Frame {
        let cfg = &self.config;
        let trim = cfg.trim_rect();
        let corner_radius = cfg.mm_to_px(cfg.corner_radius_mm);

        let mut layers = vec![OverlayLayer::Background {
            rect: trim,
            corner_radius,
        }];

        if viewport.show_safe_zones {
            layers.push(OverlayLayer::Bleed {
                outer: Rect {
                    origin: Point::zero(),
                    size: cfg.frame_size(),
                },
                inner: trim,
            });
            let margin = cfg.mm_to_px(cfg.safe_margin_mm);
            layers.push(OverlayLayer::SafeZone {
                rect: trim.inset(margin),
                corner_radius: (corner_radius - margin).max(0.0),
            });
        }

        if viewport.show_grid {
            layers.push(OverlayLayer::Grid {
                lines: grid_lines(trim, cfg.grid_size_px),
            });
        }

        layers.push(OverlayLayer::Surface {
            face: viewport.active_face,
            rect: trim,
        });

        tracing::trace!(
            "Composed {} layers for {} face at zoom {}",
            layers.len(),
            viewport.active_face,
            viewport.zoom
        );

        Frame {
            layers,
            layout: self.layout(viewport, container),
        }
    }
}

/// Interior grid lines of `area`, spaced `step` apart from its top-left.
fn grid_lines(area: Rect, step: f64) -> Vec<GridLine> {
    let mut lines = Vec::new();
    if !(step.is_finite() && step > 0.0) {
        return lines;
    }
    let mut x = area.origin.x + step;
    while x < area.right() {
        lines.push(GridLine {
            from: Point::new(x, area.origin.y),
            to: Point::new(x, area.bottom()),
        });
        x += step;
    }
    let mut y = area.origin.y + step;
    while y < area.bottom() {
        lines.push(GridLine {
            from: Point::new(area.origin.x, y),
            to: Point::new(area.right(), y),
        });
        y += step;
    }
    lines
}

/// Cosmetic 3D tilt that follows the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tilt {
    /// Rotation about the horizontal axis, in degrees.
    pub rotate_x: f64,
    /// Rotation about the vertical axis, in degrees.
    pub rotate_y: f64,
}

impl Tilt {
    /// No tilt.
    pub const NONE: Tilt = Tilt {
        rotate_x: 0.0,
        rotate_y: 0.0,
    };

    /// Tilt towards `pointer` within `container`. Pointer at the centre gives
    /// no tilt; at an edge gives [`MAX_TILT_DEG`].
    #[must_use]
    pub fn from_pointer(pointer: Point, container: Size) -> Self {
        if !container.is_drawable() {
            return Self::NONE;
        }
        let nx = ((pointer.x / container.width) * 2.0 - 1.0).clamp(-1.0, 1.0);
        let ny = ((pointer.y / container.height) * 2.0 - 1.0).clamp(-1.0, 1.0);
        if !(nx.is_finite() && ny.is_finite()) {
            return Self::NONE;
        }
        Self {
            rotate_x: -ny * MAX_TILT_DEG,
            rotate_y: nx * MAX_TILT_DEG,
        }
    }
}
