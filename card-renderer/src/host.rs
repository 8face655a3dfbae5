//! Canvas host: owns the drawable surfaces for both faces.
//!
//! Each face goes through `Uninitialized → Initializing → Ready → Disposed`.
//! Mounting starts two independent acquisition tasks. Each attempt carries its
//! own [`CancelToken`]; teardown flips the token, and a completion that finds
//! its token flipped disposes whatever it produced instead of registering it.
//!
//! Surfaces live in a side table keyed by [`SurfaceId`]. The store only ever
//! sees the key and a ready flag.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use card_core::{
    CanvasBinding, DesignElement, DesignError, DesignStore, ElementVariant, FaceId, FaceMap,
    SurfaceId,
};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::frame::FrameConfig;
use crate::geometry::Size;
use crate::surface::{DrawSurface, SurfaceFactory, SurfaceRequest};
use crate::{RenderError, RenderResult};

/// Host settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Add a text element naming the face when a face comes up empty.
    pub seed_placeholder: bool,
    /// Size requested for each surface, in surface pixels.
    pub surface_size: Size,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            seed_placeholder: true,
            surface_size: FrameConfig::default().surface_size(),
        }
    }
}

/// Lifecycle phase of one face's surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfacePhase {
    /// Never mounted.
    Uninitialized,
    /// Acquisition in flight.
    Initializing,
    /// Surface acquired and registered.
    Ready,
    /// Torn down, cancelled or failed.
    Disposed,
}

/// Cancellation flag for one acquisition attempt.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Flag the attempt as superseded.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the attempt was superseded.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn same_attempt(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug)]
struct FaceSlot {
    phase: SurfacePhase,
    token: Option<CancelToken>,
    surface: Option<SurfaceId>,
    failure: Option<RenderError>,
}

impl Default for FaceSlot {
    fn default() -> Self {
        Self {
            phase: SurfacePhase::Uninitialized,
            token: None,
            surface: None,
            failure: None,
        }
    }
}

#[derive(Debug, Default)]
struct HostInner {
    slots: FaceMap<FaceSlot>,
    surfaces: HashMap<SurfaceId, Box<dyn DrawSurface>>,
    next_id: u64,
}

fn lock(inner: &Mutex<HostInner>) -> MutexGuard<'_, HostInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Pending acquisitions started by [`CanvasHost::mount`].
#[derive(Debug)]
pub struct MountHandle {
    tasks: FaceMap<JoinHandle<SurfacePhase>>,
    tokens: FaceMap<CancelToken>,
    inner: Arc<Mutex<HostInner>>,
}

impl MountHandle {
    /// Wait for both attempts to finish, returning the phase each attempt
    /// ended in. A cancelled attempt ends in [`SurfacePhase::Disposed`].
    ///
    /// An attempt whose task panicked or was aborted also ends in
    /// [`SurfacePhase::Disposed`], and its face is left disposed with a
    /// recorded failure unless a newer attempt has taken the slot.
    pub async fn settled(self) -> FaceMap<SurfacePhase> {
        let FaceMap { front, back } = self.tasks;
        let (front, back) = tokio::join!(front, back);
        FaceMap {
            front: settle(&self.inner, FaceId::Front, &self.tokens.front, front),
            back: settle(&self.inner, FaceId::Back, &self.tokens.back, back),
        }
    }
}

fn settle(
    inner: &Mutex<HostInner>,
    face: FaceId,
    token: &CancelToken,
    joined: Result<SurfacePhase, tokio::task::JoinError>,
) -> SurfacePhase {
    let err = match joined {
        Ok(phase) => return phase,
        Err(err) => err,
    };
    tracing::error!("Surface task for {face} face aborted: {err}");
    let mut inner = lock(inner);
    let slot = &mut inner.slots[face];
    if slot.token.as_ref().is_some_and(|t| t.same_attempt(token)) {
        slot.token = None;
        slot.phase = SurfacePhase::Disposed;
        slot.failure = Some(RenderError::SurfaceUnavailable(format!(
            "acquisition task aborted: {err}"
        )));
    }
    SurfacePhase::Disposed
}

/// One in-flight acquisition.
struct Attempt {
    face: FaceId,
    token: CancelToken,
    size: Size,
    seed_placeholder: bool,
    factory: Arc<dyn SurfaceFactory>,
    inner: Arc<Mutex<HostInner>>,
    store: DesignStore,
}

impl Attempt {
    async fn run(self) -> SurfacePhase {
        tracing::debug!("Acquiring surface for {} face", self.face);
        let result = self
            .factory
            .acquire(SurfaceRequest {
                face: self.face,
                size: self.size,
            })
            .await;
        self.complete(result)
    }

    fn complete(self, result: RenderResult<Box<dyn DrawSurface>>) -> SurfacePhase {
        let face = self.face;
        let mut guard = lock(&self.inner);
        let inner = &mut *guard;

        if self.token.is_cancelled() {
            if let Ok(mut surface) = result {
                surface.dispose();
            }
            tracing::debug!("{}", RenderError::Cancelled(face));
            return SurfacePhase::Disposed;
        }

        let slot = &mut inner.slots[face];
        slot.token = None;
        match result {
            Err(err) => {
                let failure = DesignError::InitializationFailure {
                    face,
                    reason: err.to_string(),
                };
                tracing::error!("{failure}");
                slot.phase = SurfacePhase::Disposed;
                slot.failure = Some(err);
                SurfacePhase::Disposed
            }
            Ok(surface) => {
                inner.next_id += 1;
                let id = SurfaceId::new(inner.next_id);
                inner.surfaces.insert(id, surface);
                slot.phase = SurfacePhase::Ready;
                slot.surface = Some(id);
                slot.failure = None;

                // Registered under the host lock so a concurrent unmount
                // cannot release the binding before it exists.
                self.store
                    .register_canvas_binding(face, Some(CanvasBinding::ready(id)));
                if self.seed_placeholder && self.store.read(|s| s.face(face).is_empty()) {
                    let placeholder =
                        DesignElement::with_defaults(ElementVariant::Text, placeholder_label(face));
                    self.store.insert_element(face, placeholder);
                }
                tracing::info!("{face} face ready on {id}");
                SurfacePhase::Ready
            }
        }
    }
}

fn placeholder_label(face: FaceId) -> &'static str {
    match face {
        FaceId::Front => "Front",
        FaceId::Back => "Back",
    }
}

/// Owns the surfaces for both faces and keeps the store's bindings in step
/// with them.
///
/// Dropping the host tears it down.
pub struct CanvasHost {
    store: DesignStore,
    factory: Arc<dyn SurfaceFactory>,
    config: HostConfig,
    inner: Arc<Mutex<HostInner>>,
}

impl std::fmt::Debug for CanvasHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasHost")
            .field("config", &self.config)
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl CanvasHost {
    /// Create an unmounted host.
    #[must_use]
    pub fn new(store: DesignStore, factory: Arc<dyn SurfaceFactory>, config: HostConfig) -> Self {
        Self {
            store,
            factory,
            config,
            inner: Arc::default(),
        }
    }

    /// Store this host registers bindings with.
    #[must_use]
    pub fn store(&self) -> &DesignStore {
        &self.store
    }

    /// Start acquiring surfaces for both faces. Any previous mount is torn
    /// down first, cancelling its in-flight attempts.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use = "await `settled` to observe the outcome; dropping the handle detaches the tasks"]
    pub fn mount(&self) -> MountHandle {
        self.unmount();
        tracing::info!("Mounting canvas host");
        let tokens = FaceMap::from_fn(|_| CancelToken::default());
        let tasks = FaceMap::from_fn(|face| {
            let token = tokens[face].clone();
            {
                let mut inner = lock(&self.inner);
                let slot = &mut inner.slots[face];
                slot.phase = SurfacePhase::Initializing;
                slot.token = Some(token.clone());
                slot.failure = None;
            }
            let attempt = Attempt {
                face,
                token,
                size: self.config.surface_size,
                seed_placeholder: self.config.seed_placeholder,
                factory: Arc::clone(&self.factory),
                inner: Arc::clone(&self.inner),
                store: self.store.clone(),
            };
            tokio::spawn(attempt.run())
        });
        MountHandle {
            tasks,
            tokens,
            inner: Arc::clone(&self.inner),
        }
    }

    /// Cancel in-flight attempts, dispose live surfaces and release both
    /// bindings.
    pub fn unmount(&self) {
        let mut guard = lock(&self.inner);
        let inner = &mut *guard;
        for face in FaceId::ALL {
            let slot = &mut inner.slots[face];
            if let Some(token) = slot.token.take() {
                token.cancel();
            }
            if slot.phase != SurfacePhase::Uninitialized {
                slot.phase = SurfacePhase::Disposed;
            }
            if let Some(id) = slot.surface.take() {
                if let Some(mut surface) = inner.surfaces.remove(&id) {
                    surface.dispose();
                }
                tracing::debug!("Tore down {id} for {face} face");
            }
            if self.store.read(|s| s.binding(face).is_some()) {
                self.store.register_canvas_binding(face, None);
            }
        }
    }

    /// Current phase of a face.
    #[must_use]
    pub fn phase(&self, face: FaceId) -> SurfacePhase {
        lock(&self.inner).slots[face].phase
    }

    /// Why the last acquisition for a face failed, if it did.
    #[must_use]
    pub fn failure(&self, face: FaceId) -> Option<RenderError> {
        lock(&self.inner).slots[face].failure.clone()
    }

    /// Number of surfaces currently held.
    #[must_use]
    pub fn live_surfaces(&self) -> usize {
        lock(&self.inner).surfaces.len()
    }

    /// Lend a face's surface to `f`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NotReady`] if the face has no live surface.
    pub fn with_surface<R>(
        &self,
        face: FaceId,
        f: impl FnOnce(&mut dyn DrawSurface) -> R,
    ) -> RenderResult<R> {
        let mut guard = lock(&self.inner);
        let inner = &mut *guard;
        let surface = inner.slots[face]
            .surface
            .and_then(|id| inner.surfaces.get_mut(&id))
            .ok_or(RenderError::NotReady(face))?;
        Ok(f(surface.as_mut()))
    }

    /// Draw a face's current elements onto its surface.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NotReady`] if the face has no live surface, or
    /// the surface's own error if drawing fails.
    pub fn render_face(&self, face: FaceId) -> RenderResult<()> {
        let elements = self.store.read(|s| s.face(face).elements().to_vec());
        self.with_surface(face, |surface| surface.render(&elements))?
    }

    /// Draw the active face.
    ///
    /// # Errors
    ///
    /// See [`CanvasHost::render_face`].
    pub fn render_active(&self) -> RenderResult<FaceId> {
        let face = self.store.read(card_core::DesignState::active_face);
        self.render_face(face)?;
        Ok(face)
    }

    /// The visible face and its surface, for a preview or export
    /// collaborator. `None` while that face is not ready.
    #[must_use]
    pub fn preview_target(&self) -> Option<(FaceId, SurfaceId)> {
        self.store.read(|s| {
            let face = s.active_face();
            s.binding(face)
                .filter(|b| b.ready)
                .map(|b| (face, b.surface))
        })
    }
}

impl Drop for CanvasHost {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessFactory;
    use card_core::CardProject;

    fn host(factory: HeadlessFactory) -> CanvasHost {
        CanvasHost::new(
            DesignStore::new(CardProject::new("host")),
            Arc::new(factory),
            HostConfig::default(),
        )
    }

    #[test]
    fn test_fresh_host_is_uninitialized() {
        let host = host(HeadlessFactory::new());
        assert_eq!(host.phase(FaceId::Front), SurfacePhase::Uninitialized);
        assert_eq!(host.live_surfaces(), 0);
        assert!(host.preview_target().is_none());
        assert_eq!(
            host.render_face(FaceId::Front),
            Err(RenderError::NotReady(FaceId::Front))
        );
    }

    #[tokio::test]
    async fn test_mount_readies_both_faces() {
        let host = host(HeadlessFactory::new());
        let phases = host.mount().settled().await;
        assert_eq!(phases.front, SurfacePhase::Ready);
        assert_eq!(phases.back, SurfacePhase::Ready);
        assert!(host.store().read(card_core::DesignState::editor_ready));
        assert_eq!(host.live_surfaces(), 2);

        // Each face got its own placeholder
        host.store().read(|s| {
            assert_eq!(s.face(FaceId::Front).len(), 1);
            assert_eq!(s.face(FaceId::Back).len(), 1);
        });
        let (face, _) = host.preview_target().expect("front ready");
        assert_eq!(face, FaceId::Front);
        assert_eq!(host.render_active(), Ok(FaceId::Front));
    }

    #[tokio::test]
    async fn test_unmount_releases_bindings() {
        let factory = HeadlessFactory::new();
        let stats = factory.stats();
        let host = host(factory);
        host.mount().settled().await;
        host.unmount();
        assert_eq!(host.phase(FaceId::Back), SurfacePhase::Disposed);
        assert_eq!(host.live_surfaces(), 0);
        assert_eq!(stats.live(), 0);
        host.store().read(|s| {
            assert!(s.binding(FaceId::Front).is_none());
            assert!(s.binding(FaceId::Back).is_none());
        });
    }

    #[tokio::test]
    async fn test_no_placeholder_when_disabled() {
        let host = CanvasHost::new(
            DesignStore::new(CardProject::new("plain")),
            Arc::new(HeadlessFactory::new()),
            HostConfig {
                seed_placeholder: false,
                ..HostConfig::default()
            },
        );
        host.mount().settled().await;
        assert_eq!(host.store().snapshot().element_count(), 0);
    }

    #[tokio::test]
    async fn test_drop_disposes_surfaces() {
        let factory = HeadlessFactory::new();
        let stats = factory.stats();
        let store = {
            let host = host(factory);
            host.mount().settled().await;
            host.store().clone()
        };
        assert_eq!(stats.live(), 0);
        assert!(!store.read(card_core::DesignState::editor_ready));
    }
}
