//! Physical card dimensions and viewport limits.
//!
//! All physical sizes follow the ISO/IEC 7810 ID-1 format (the common
//! credit card / badge size). Pixel values are expressed in the drawable
//! surface's own coordinate space, which never changes with zoom.

// ============================================================================
// Physical card
// ============================================================================

/// Card trim width in millimetres.
pub const CARD_WIDTH_MM: f64 = 85.6;

/// Card trim height in millimetres.
pub const CARD_HEIGHT_MM: f64 = 53.98;

/// Corner radius of the trimmed card in millimetres.
pub const CORNER_RADIUS_MM: f64 = 3.18;

/// Print overrun beyond the trim edge, in millimetres.
pub const BLEED_MM: f64 = 3.0;

/// Inner margin that is guaranteed to survive trimming, in millimetres.
pub const SAFE_MARGIN_MM: f64 = 3.0;

// ============================================================================
// Physical to canvas scale
// ============================================================================

/// Surface pixels per millimetre.
pub const PX_PER_MM: f64 = 10.0;

/// Card trim width in surface pixels.
pub const CARD_WIDTH_PX: f64 = CARD_WIDTH_MM * PX_PER_MM;

/// Card trim height in surface pixels.
pub const CARD_HEIGHT_PX: f64 = CARD_HEIGHT_MM * PX_PER_MM;

/// Width over height of the trimmed card.
pub const CARD_ASPECT_RATIO: f64 = CARD_WIDTH_MM / CARD_HEIGHT_MM;

/// Largest on-screen width the frame is allowed to occupy before zoom.
pub const MAX_DISPLAY_WIDTH_PX: f64 = 900.0;

// ============================================================================
// Viewport
// ============================================================================

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.5;

/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 3.0;

/// Zoom change applied by a single zoom in / zoom out.
pub const ZOOM_STEP: f64 = 0.1;

/// Zoom factor restored by a reset.
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Grid spacing in surface pixels.
pub const GRID_SIZE_PX: f64 = 20.0;

/// Distance in surface pixels within which positions snap to the grid.
pub const SNAP_THRESHOLD_PX: f64 = 5.0;

/// Largest cosmetic tilt angle in degrees.
pub const MAX_TILT_DEG: f64 = 4.0;

// ============================================================================
// Element defaults
// ============================================================================

/// Smallest width or height an element may be resized to, in surface pixels.
pub const MIN_ELEMENT_SIZE_PX: f64 = 1.0;

/// Default text size in surface pixels.
pub const DEFAULT_FONT_SIZE: f64 = 32.0;

/// Smallest allowed font size.
pub const MIN_FONT_SIZE: f64 = 4.0;

/// Largest allowed font size.
pub const MAX_FONT_SIZE: f64 = 200.0;

/// Default text colour.
pub const DEFAULT_TEXT_COLOR: &str = "#111827";

/// Default shape fill colour.
pub const DEFAULT_FILL_COLOR: &str = "#3B82F6";

/// Default stroke colour.
pub const DEFAULT_STROKE_COLOR: &str = "#1F2937";

/// Default font family.
pub const DEFAULT_FONT_FAMILY: &str = "Inter";
