//! Drawable surfaces and the factory that acquires them.
//!
//! A surface is whatever the platform draws into: a canvas element, an
//! offscreen texture, or, in tests and headless runs, [`HeadlessSurface`].
//! Acquisition is asynchronous because platform contexts often are.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use card_core::{DesignElement, ElementKind, FaceId};

use crate::geometry::Size;
use crate::{RenderError, RenderResult};

/// Parameters for acquiring one face's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRequest {
    /// Face the surface will draw.
    pub face: FaceId,
    /// Surface size in pixels.
    pub size: Size,
}

/// A live drawable surface for one face.
pub trait DrawSurface: Send + std::fmt::Debug {
    /// Face this surface draws.
    fn face(&self) -> FaceId;

    /// Surface size in pixels.
    fn size(&self) -> Size;

    /// Draw the face's elements, bottom first.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface has been disposed or drawing fails.
    fn render(&mut self, elements: &[DesignElement]) -> RenderResult<()>;

    /// Release the underlying context. Idempotent.
    fn dispose(&mut self);

    /// Whether [`DrawSurface::dispose`] has run.
    fn is_disposed(&self) -> bool;
}

/// Creates surfaces on demand.
#[async_trait]
pub trait SurfaceFactory: Send + Sync + 'static {
    /// Acquire a surface for one face.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::SurfaceUnavailable`] if the platform cannot
    /// provide a rendering context.
    async fn acquire(&self, request: SurfaceRequest) -> RenderResult<Box<dyn DrawSurface>>;
}

/// Counters shared by every surface a [`HeadlessFactory`] hands out.
#[derive(Debug, Default)]
pub struct SurfaceStats {
    acquired: AtomicUsize,
    disposed: AtomicUsize,
    frames: AtomicUsize,
}

impl SurfaceStats {
    /// Surfaces handed out so far.
    #[must_use]
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    /// Surfaces disposed so far.
    #[must_use]
    pub fn disposed(&self) -> usize {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Surfaces acquired and not yet disposed.
    #[must_use]
    pub fn live(&self) -> usize {
        self.acquired().saturating_sub(self.disposed())
    }

    /// Frames drawn across all surfaces.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames.load(Ordering::SeqCst)
    }
}

/// Surface that records draws instead of rasterising them.
#[derive(Debug)]
pub struct HeadlessSurface {
    face: FaceId,
    size: Size,
    disposed: bool,
    last_frame: usize,
    stats: Arc<SurfaceStats>,
}

impl HeadlessSurface {
    /// Create a standalone surface.
    #[must_use]
    pub fn new(face: FaceId, size: Size) -> Self {
        Self::with_stats(face, size, Arc::default())
    }

    fn with_stats(face: FaceId, size: Size, stats: Arc<SurfaceStats>) -> Self {
        stats.acquired.fetch_add(1, Ordering::SeqCst);
        Self {
            face,
            size,
            disposed: false,
            last_frame: 0,
            stats,
        }
    }

    /// Number of elements drawn by the last frame.
    #[must_use]
    pub fn last_frame_len(&self) -> usize {
        self.last_frame
    }

    fn describe(kind: &ElementKind) -> String {
        match kind {
            ElementKind::Text {
                content,
                font_size,
                color,
                ..
            } => format!("text '{content}' font={font_size} color={color}"),
            ElementKind::Shape { shape, fill, .. } => format!("shape {shape:?} fill={fill}"),
            ElementKind::Image { src } => format!("image src={src}"),
            ElementKind::Code { symbology, .. } => format!("code {symbology:?}"),
            ElementKind::Line { stroke, .. } => format!("line stroke={stroke}"),
        }
    }
}

impl DrawSurface for HeadlessSurface {
    fn face(&self) -> FaceId {
        self.face
    }

    fn size(&self) -> Size {
        self.size
    }

    fn render(&mut self, elements: &[DesignElement]) -> RenderResult<()> {
        if self.disposed {
            return Err(RenderError::Frame(format!(
                "{} face surface already disposed",
                self.face
            )));
        }
        let mut drawn = 0;
        for element in elements.iter().filter(|e| e.visible) {
            let t = &element.transform;
            tracing::trace!(
                "Render {} at ({}, {}) size {}x{} on {} face",
                Self::describe(&element.kind),
                t.x,
                t.y,
                t.width,
                t.height,
                self.face
            );
            drawn += 1;
        }
        self.last_frame = drawn;
        self.stats.frames.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.stats.disposed.fetch_add(1, Ordering::SeqCst);
            tracing::trace!("Disposed headless surface for {} face", self.face);
        }
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// Factory for [`HeadlessSurface`]s. Individual faces can be marked as
/// unavailable to exercise the failure path.
#[derive(Debug, Default, Clone)]
pub struct HeadlessFactory {
    unavailable: HashSet<FaceId>,
    stats: Arc<SurfaceStats>,
}

impl HeadlessFactory {
    /// Factory that always succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make acquisition fail for `face`.
    #[must_use]
    pub fn without_context(mut self, face: FaceId) -> Self {
        self.unavailable.insert(face);
        self
    }

    /// Shared counters for surfaces from this factory.
    #[must_use]
    pub fn stats(&self) -> Arc<SurfaceStats> {
        Arc::clone(&self.stats)
    }
}

#[async_trait]
impl SurfaceFactory for HeadlessFactory {
    async fn acquire(&self, request: SurfaceRequest) -> RenderResult<Box<dyn DrawSurface>> {
        if self.unavailable.contains(&request.face) {
            return Err(RenderError::SurfaceUnavailable(format!(
                "no 2d context for {} face",
                request.face
            )));
        }
        Ok(Box::new(HeadlessSurface::with_stats(
            request.face,
            request.size,
            Arc::clone(&self.stats),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_core::ElementVariant;

    #[test]
    fn test_render_skips_hidden_elements() {
        let mut surface = HeadlessSurface::new(FaceId::Front, Size::new(856.0, 539.8));
        let shown = DesignElement::with_defaults(ElementVariant::Text, "a");
        let mut hidden = DesignElement::with_defaults(ElementVariant::Shape, "b");
        hidden.visible = false;
        surface.render(&[shown, hidden]).expect("render");
        assert_eq!(surface.last_frame_len(), 1);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let factory = HeadlessFactory::new();
        let stats = factory.stats();
        let mut surface = HeadlessSurface::with_stats(FaceId::Back, Size::new(10.0, 10.0), stats);
        surface.dispose();
        surface.dispose();
        assert!(surface.is_disposed());
        assert_eq!(factory.stats().disposed(), 1);
        assert_eq!(factory.stats().live(), 0);
        assert!(surface.render(&[]).is_err());
    }

    #[tokio::test]
    async fn test_factory_failure_per_face() {
        let factory = HeadlessFactory::new().without_context(FaceId::Back);
        let size = Size::new(10.0, 10.0);
        let front = factory
            .acquire(SurfaceRequest {
                face: FaceId::Front,
                size,
            })
            .await;
        assert!(front.is_ok());
        let back = factory
            .acquire(SurfaceRequest {
                face: FaceId::Back,
                size,
            })
            .await;
        assert!(matches!(back, Err(RenderError::SurfaceUnavailable(_))));
        assert_eq!(factory.stats().acquired(), 1);
    }
}
