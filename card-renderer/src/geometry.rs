//! 2D geometry and coordinate transforms.
//!
//! Three coordinate spaces are in play:
//!
//! ```text
//!   millimetres          surface px             frame px              screen px
//!   (card trim,   x PX_PER_MM   (drawable   + bleed offset  (trim +    affine    (container,
//!    top-left)   ──────────────> surface)  ──────────────> bleed)  ─────────────> zoomed,
//!                                                                                rotated)
//! ```
//!
//! The first two steps are fixed. Only the final affine step depends on the
//! viewport, so element positions stored in surface pixels stay valid at any
//! zoom.

use serde::{Deserialize, Serialize};

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Component-wise sum.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise difference.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Scale both components.
    #[must_use]
    pub fn scale(&self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        let d = self.sub(other);
        (d.x * d.x + d.y * d.y).sqrt()
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Scale both dimensions.
    #[must_use]
    pub fn scale(&self, s: f64) -> Self {
        Self::new(self.width * s, self.height * s)
    }

    /// Width over height.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Whether both dimensions are finite and positive.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    /// Extent.
    pub size: Size,
}

impl Rect {
    /// Create a rectangle from position and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.origin.x + self.size.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Shrink by `d` on every side (grow when negative).
    #[must_use]
    pub fn inset(&self, d: f64) -> Self {
        Self::new(
            self.origin.x + d,
            self.origin.y + d,
            (self.size.width - 2.0 * d).max(0.0),
            (self.size.height - 2.0 * d).max(0.0),
        )
    }

    /// Whether the point lies inside or on the edge.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.origin.x && p.x <= self.right() && p.y >= self.origin.y && p.y <= self.bottom()
    }

    /// Whether `other` lies entirely within this rectangle.
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.origin.x >= self.origin.x
            && other.origin.y >= self.origin.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// A 2D affine transform.
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    /// Coefficients `[a, b, c, d, e, f]`.
    pub coeffs: [f64; 6],
}

impl Affine {
    /// The identity transform.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            coeffs: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        }
    }

    /// A translation.
    #[must_use]
    pub const fn translate(dx: f64, dy: f64) -> Self {
        Self {
            coeffs: [1.0, 0.0, 0.0, 1.0, dx, dy],
        }
    }

    /// A uniform scale about the origin.
    #[must_use]
    pub const fn scale(s: f64) -> Self {
        Self {
            coeffs: [s, 0.0, 0.0, s, 0.0, 0.0],
        }
    }

    /// A clockwise rotation (in screen space, y down) about the origin.
    #[must_use]
    pub fn rotate_degrees(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            coeffs: [cos, sin, -sin, cos, 0.0, 0.0],
        }
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    #[must_use]
    pub fn then_after(&self, other: &Self) -> Self {
        let [a1, b1, c1, d1, e1, f1] = self.coeffs;
        let [a2, b2, c2, d2, e2, f2] = other.coeffs;
        Self {
            coeffs: [
                a1 * a2 + c1 * b2,
                b1 * a2 + d1 * b2,
                a1 * c2 + c1 * d2,
                b1 * c2 + d1 * d2,
                a1 * e2 + c1 * f2 + e1,
                b1 * e2 + d1 * f2 + f1,
            ],
        }
    }

    /// Transform a point.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        let [a, b, c, d, e, f] = self.coeffs;
        Point::new(a * p.x + c * p.y + e, b * p.x + d * p.y + f)
    }

    /// Determinant of the linear part.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        let [a, b, c, d, _, _] = self.coeffs;
        a * d - b * c
    }

    /// The inverse transform, or `None` when the transform is singular.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < f64::EPSILON || !det.is_finite() {
            return None;
        }
        let [a, b, c, d, e, f] = self.coeffs;
        let inv = 1.0 / det;
        Some(Self {
            coeffs: [
                d * inv,
                -b * inv,
                -c * inv,
                a * inv,
                (c * f - d * e) * inv,
                (b * e - a * f) * inv,
            ],
        })
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(&b) < 1e-9
    }

    #[test]
    fn test_compose_order() {
        // Scale first, then translate
        let t = Affine::translate(10.0, 0.0).then_after(&Affine::scale(2.0));
        assert!(close(t.apply(Point::new(1.0, 1.0)), Point::new(12.0, 2.0)));
    }

    #[test]
    fn test_rotation_is_clockwise_on_screen() {
        let r = Affine::rotate_degrees(90.0);
        // +x axis turns into +y (downwards on screen)
        assert!(close(r.apply(Point::new(1.0, 0.0)), Point::new(0.0, 1.0)));
    }

    #[test]
    fn test_inverse_round_trip() {
        let t = Affine::translate(5.0, -3.0)
            .then_after(&Affine::rotate_degrees(33.0))
            .then_after(&Affine::scale(1.7));
        let inv = t.inverse().expect("invertible");
        let p = Point::new(12.5, -7.25);
        assert!(close(inv.apply(t.apply(p)), p));
    }

    #[test]
    fn test_singular_has_no_inverse() {
        assert!(Affine::scale(0.0).inverse().is_none());
    }

    #[test]
    fn test_rect_inset_and_contains() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        let inner = r.inset(10.0);
        assert_eq!(inner, Rect::new(10.0, 10.0, 80.0, 30.0));
        assert!(r.contains_rect(&inner));
        assert!(!inner.contains_rect(&r));
        assert!(r.contains(Point::new(100.0, 50.0)));
        assert!(!inner.contains(Point::new(5.0, 5.0)));
    }
}
