//! Design elements - the items placed on a card face.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    CARD_HEIGHT_PX, CARD_WIDTH_PX, DEFAULT_FILL_COLOR, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE,
    DEFAULT_STROKE_COLOR, DEFAULT_TEXT_COLOR, MAX_FONT_SIZE, MIN_ELEMENT_SIZE_PX, MIN_FONT_SIZE,
};
use crate::error::clamp_logged;
use crate::viewport::normalize_degrees;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Element family, as chosen in the elements panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementVariant {
    /// Text label.
    Text,
    /// Rectangle or ellipse.
    Shape,
    /// Raster or vector image.
    Image,
    /// QR code or barcode.
    Code,
    /// Straight line.
    Line,
}

/// Geometric primitive drawn by a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle (before rotation).
    Rectangle,
    /// Ellipse inscribed in the element box.
    Ellipse,
}

/// Machine-readable code symbology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeSymbology {
    /// QR code.
    Qr,
    /// Linear barcode.
    Barcode,
}

/// The variant-specific content and style of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ElementKind {
    /// A text label.
    Text {
        /// Text content.
        content: String,
        /// Font family name.
        font_family: String,
        /// Font size in surface pixels.
        font_size: f64,
        /// Text color as hex.
        color: String,
        /// Bold weight.
        bold: bool,
    },

    /// A filled and/or stroked primitive.
    Shape {
        /// Primitive drawn.
        shape: ShapeKind,
        /// Fill color as hex.
        fill: String,
        /// Stroke color as hex.
        stroke: String,
        /// Stroke width in surface pixels.
        stroke_width: f64,
    },

    /// An image.
    Image {
        /// Image source URI or asset reference.
        src: String,
    },

    /// A QR code or barcode.
    Code {
        /// Symbology.
        symbology: CodeSymbology,
        /// Encoded payload.
        payload: String,
    },

    /// A straight line across the element box.
    Line {
        /// Stroke color as hex.
        stroke: String,
        /// Stroke width in surface pixels.
        stroke_width: f64,
    },
}

impl ElementKind {
    /// The family this content belongs to.
    #[must_use]
    pub const fn variant(&self) -> ElementVariant {
        match self {
            Self::Text { .. } => ElementVariant::Text,
            Self::Shape { .. } => ElementVariant::Shape,
            Self::Image { .. } => ElementVariant::Image,
            Self::Code { .. } => ElementVariant::Code,
            Self::Line { .. } => ElementVariant::Line,
        }
    }
}

/// Position, size and rotation of an element in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// X position of the top-left corner.
    pub x: f64,
    /// Y position of the top-left corner.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Rotation in degrees, clockwise, in `[0, 360)`.
    pub rotation: f64,
}

impl Transform {
    /// A transform of the given size centred on the card.
    #[must_use]
    pub fn centered(width: f64, height: f64) -> Self {
        Self {
            x: (CARD_WIDTH_PX - width) / 2.0,
            y: (CARD_HEIGHT_PX - height) / 2.0,
            width,
            height,
            rotation: 0.0,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::centered(100.0, 100.0)
    }
}

/// One placeable item on a face.
///
/// Elements never reference each other; a face is a flat list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignElement {
    /// Unique identifier.
    pub id: ElementId,
    /// Display name shown in the layers panel.
    pub name: String,
    /// Content and style.
    pub kind: ElementKind,
    /// Position and size.
    pub transform: Transform,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Whether the element is drawn.
    pub visible: bool,
    /// Locked elements ignore geometry edits.
    pub locked: bool,
}

impl DesignElement {
    /// Create a new element with the given content.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            name: name.into(),
            kind,
            transform: Transform::default(),
            opacity: 1.0,
            visible: true,
            locked: false,
        }
    }

    /// Create an element of `variant` with default content and geometry.
    ///
    /// `label` becomes the element name and, for text, its content.
    #[must_use]
    pub fn with_defaults(variant: ElementVariant, label: &str) -> Self {
        let (kind, width, height) = match variant {
            ElementVariant::Text => (
                ElementKind::Text {
                    content: label.to_string(),
                    font_family: DEFAULT_FONT_FAMILY.to_string(),
                    font_size: DEFAULT_FONT_SIZE,
                    color: DEFAULT_TEXT_COLOR.to_string(),
                    bold: false,
                },
                300.0,
                50.0,
            ),
            ElementVariant::Shape => (
                ElementKind::Shape {
                    shape: ShapeKind::Rectangle,
                    fill: DEFAULT_FILL_COLOR.to_string(),
                    stroke: DEFAULT_STROKE_COLOR.to_string(),
                    stroke_width: 0.0,
                },
                150.0,
                100.0,
            ),
            ElementVariant::Image => (
                ElementKind::Image {
                    src: String::new(),
                },
                200.0,
                200.0,
            ),
            ElementVariant::Code => (
                ElementKind::Code {
                    symbology: CodeSymbology::Qr,
                    payload: String::new(),
                },
                160.0,
                160.0,
            ),
            ElementVariant::Line => (
                ElementKind::Line {
                    stroke: DEFAULT_STROKE_COLOR.to_string(),
                    stroke_width: 2.0,
                },
                300.0,
                2.0,
            ),
        };
        Self::new(label, kind).with_transform(Transform::centered(width, height))
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// The element family.
    #[must_use]
    pub fn variant(&self) -> ElementVariant {
        self.kind.variant()
    }

    /// Check if a point (in surface coordinates) is within the unrotated box.
    #[must_use]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        let t = &self.transform;
        x >= t.x && x <= t.x + t.width && y >= t.y && y <= t.y + t.height
    }

    /// Bring every numeric field into range, using the same rules as
    /// [`DesignElement::apply_patch`]. Non-finite positions become 0.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.opacity = clamp_logged("opacity", self.opacity, 0.0, 1.0);
        let t = &mut self.transform;
        if !t.x.is_finite() {
            t.x = 0.0;
        }
        if !t.y.is_finite() {
            t.y = 0.0;
        }
        t.width = clamp_logged("width", t.width, MIN_ELEMENT_SIZE_PX, f64::MAX);
        t.height = clamp_logged("height", t.height, MIN_ELEMENT_SIZE_PX, f64::MAX);
        t.rotation = normalize_degrees(t.rotation);
        match &mut self.kind {
            ElementKind::Text { font_size, .. } => {
                *font_size = clamp_logged("font_size", *font_size, MIN_FONT_SIZE, MAX_FONT_SIZE);
            }
            ElementKind::Shape { stroke_width, .. } | ElementKind::Line { stroke_width, .. } => {
                *stroke_width = clamp_logged("stroke_width", *stroke_width, 0.0, f64::MAX);
            }
            ElementKind::Image { .. } | ElementKind::Code { .. } => {}
        }
        self
    }

    /// Apply a partial update, clamping numeric fields into range.
    ///
    /// Style fields that do not apply to this element's variant are ignored.
    /// While the element is locked, geometry fields are ignored.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = clamp_logged("opacity", opacity, 0.0, 1.0);
        }

        if self.locked {
            if patch.has_geometry() {
                tracing::debug!("Ignoring geometry edit on locked element {}", self.id);
            }
        } else {
            let t = &mut self.transform;
            if let Some(x) = patch.x.filter(|v| v.is_finite()) {
                t.x = x;
            }
            if let Some(y) = patch.y.filter(|v| v.is_finite()) {
                t.y = y;
            }
            if let Some(width) = patch.width {
                t.width = clamp_logged("width", width, MIN_ELEMENT_SIZE_PX, f64::MAX);
            }
            if let Some(height) = patch.height {
                t.height = clamp_logged("height", height, MIN_ELEMENT_SIZE_PX, f64::MAX);
            }
            if let Some(rotation) = patch.rotation {
                t.rotation = normalize_degrees(rotation);
            }
        }

        self.apply_style(patch);
    }

    fn apply_style(&mut self, patch: &ElementPatch) {
        match &mut self.kind {
            ElementKind::Text {
                content,
                font_family,
                font_size,
                color,
                bold,
            } => {
                if let Some(v) = &patch.content {
                    content.clone_from(v);
                }
                if let Some(v) = &patch.font_family {
                    font_family.clone_from(v);
                }
                if let Some(v) = patch.font_size {
                    *font_size = clamp_logged("font_size", v, MIN_FONT_SIZE, MAX_FONT_SIZE);
                }
                if let Some(v) = &patch.color {
                    color.clone_from(v);
                }
                if let Some(v) = patch.bold {
                    *bold = v;
                }
            }
            ElementKind::Shape {
                shape,
                fill,
                stroke,
                stroke_width,
            } => {
                if let Some(v) = patch.shape {
                    *shape = v;
                }
                if let Some(v) = &patch.fill {
                    fill.clone_from(v);
                }
                if let Some(v) = &patch.stroke {
                    stroke.clone_from(v);
                }
                if let Some(v) = patch.stroke_width {
                    *stroke_width = clamp_logged("stroke_width", v, 0.0, f64::MAX);
                }
            }
            ElementKind::Image { src } => {
                if let Some(v) = &patch.src {
                    src.clone_from(v);
                }
            }
            ElementKind::Code { symbology, payload } => {
                if let Some(v) = patch.symbology {
                    *symbology = v;
                }
                if let Some(v) = &patch.payload {
                    payload.clone_from(v);
                }
            }
            ElementKind::Line {
                stroke,
                stroke_width,
            } => {
                if let Some(v) = &patch.stroke {
                    stroke.clone_from(v);
                }
                if let Some(v) = patch.stroke_width {
                    *stroke_width = clamp_logged("stroke_width", v, 0.0, f64::MAX);
                }
            }
        }
    }
}

/// A partial update delivered by the properties panel.
///
/// `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementPatch {
    /// New display name.
    pub name: Option<String>,
    /// New X position.
    pub x: Option<f64>,
    /// New Y position.
    pub y: Option<f64>,
    /// New width.
    pub width: Option<f64>,
    /// New height.
    pub height: Option<f64>,
    /// New rotation in degrees.
    pub rotation: Option<f64>,
    /// New opacity.
    pub opacity: Option<f64>,
    /// New visibility.
    pub visible: Option<bool>,
    /// New lock state.
    pub locked: Option<bool>,
    /// Text content.
    pub content: Option<String>,
    /// Text font family.
    pub font_family: Option<String>,
    /// Text font size.
    pub font_size: Option<f64>,
    /// Text color.
    pub color: Option<String>,
    /// Text weight.
    pub bold: Option<bool>,
    /// Shape primitive.
    pub shape: Option<ShapeKind>,
    /// Shape fill.
    pub fill: Option<String>,
    /// Shape or line stroke.
    pub stroke: Option<String>,
    /// Shape or line stroke width.
    pub stroke_width: Option<f64>,
    /// Image source.
    pub src: Option<String>,
    /// Code symbology.
    pub symbology: Option<CodeSymbology>,
    /// Code payload.
    pub payload: Option<String>,
}

impl ElementPatch {
    /// A patch that only moves the element.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Whether the patch touches position, size or rotation.
    #[must_use]
    pub fn has_geometry(&self) -> bool {
        self.x.is_some()
            || self.y.is_some()
            || self.width.is_some()
            || self.height.is_some()
            || self.rotation.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_centered_on_card() {
        for variant in [
            ElementVariant::Text,
            ElementVariant::Shape,
            ElementVariant::Image,
            ElementVariant::Code,
            ElementVariant::Line,
        ] {
            let el = DesignElement::with_defaults(variant, "x");
            let t = el.transform;
            assert_eq!(el.variant(), variant);
            assert!((t.x + t.width / 2.0 - CARD_WIDTH_PX / 2.0).abs() < 1e-9);
            assert!((t.y + t.height / 2.0 - CARD_HEIGHT_PX / 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_text_label_becomes_content() {
        let el = DesignElement::with_defaults(ElementVariant::Text, "Jane Doe");
        assert_eq!(el.name, "Jane Doe");
        assert!(matches!(el.kind, ElementKind::Text { ref content, .. } if content == "Jane Doe"));
    }

    #[test]
    fn test_patch_clamps_numeric_fields() {
        let mut el = DesignElement::with_defaults(ElementVariant::Text, "t");
        el.apply_patch(&ElementPatch {
            opacity: Some(1.7),
            width: Some(-20.0),
            rotation: Some(-90.0),
            font_size: Some(1000.0),
            ..ElementPatch::default()
        });
        assert!((el.opacity - 1.0).abs() < f64::EPSILON);
        assert!((el.transform.width - MIN_ELEMENT_SIZE_PX).abs() < f64::EPSILON);
        assert!((el.transform.rotation - 270.0).abs() < f64::EPSILON);
        assert!(
            matches!(el.kind, ElementKind::Text { font_size, .. } if (font_size - MAX_FONT_SIZE).abs() < f64::EPSILON)
        );
    }

    #[test]
    fn test_normalized_clamps_constructed_element() {
        let mut el = DesignElement::with_defaults(ElementVariant::Text, "t");
        el.opacity = 5.0;
        el.transform.width = -40.0;
        el.transform.x = f64::NAN;
        el.transform.rotation = 720.5;
        if let ElementKind::Text { font_size, .. } = &mut el.kind {
            *font_size = 0.5;
        }
        let el = el.normalized();
        assert!((el.opacity - 1.0).abs() < f64::EPSILON);
        assert!((el.transform.width - MIN_ELEMENT_SIZE_PX).abs() < f64::EPSILON);
        assert!(el.transform.x.abs() < f64::EPSILON);
        assert!((el.transform.rotation - 0.5).abs() < 1e-9);
        assert!(
            matches!(el.kind, ElementKind::Text { font_size, .. } if (font_size - MIN_FONT_SIZE).abs() < f64::EPSILON)
        );
    }

    #[test]
    fn test_normalized_keeps_valid_element() {
        let el = DesignElement::with_defaults(ElementVariant::Shape, "box");
        assert_eq!(el.clone().normalized(), el);
    }

    #[test]
    fn test_patch_ignores_foreign_style() {
        let mut el = DesignElement::with_defaults(ElementVariant::Image, "logo");
        let before = el.kind.clone();
        el.apply_patch(&ElementPatch {
            font_size: Some(12.0),
            fill: Some("#FF0000".to_string()),
            ..ElementPatch::default()
        });
        assert_eq!(el.kind, before);
    }

    #[test]
    fn test_locked_element_keeps_geometry() {
        let mut el = DesignElement::with_defaults(ElementVariant::Shape, "box");
        el.apply_patch(&ElementPatch {
            locked: Some(true),
            ..ElementPatch::default()
        });
        let before = el.transform;
        el.apply_patch(&ElementPatch {
            fill: Some("#000000".to_string()),
            ..ElementPatch::position(1.0, 2.0)
        });
        assert_eq!(el.transform, before);
        assert!(matches!(el.kind, ElementKind::Shape { ref fill, .. } if fill == "#000000"));

        // Unlocking in the same patch lets the move through
        el.apply_patch(&ElementPatch {
            locked: Some(false),
            ..ElementPatch::position(1.0, 2.0)
        });
        assert!((el.transform.x - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_patch_deserializes_partially() {
        let patch: ElementPatch =
            serde_json::from_str(r##"{"x": 10.0, "color": "#fff"}"##).expect("valid patch");
        assert_eq!(patch.x, Some(10.0));
        assert_eq!(patch.color.as_deref(), Some("#fff"));
        assert!(patch.y.is_none());
    }
}
