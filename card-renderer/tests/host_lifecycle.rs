//! Lifecycle tests for the canvas host.
//!
//! Acquisition is gated per face with oneshot channels so tests control
//! exactly when a surface resolves relative to teardown and remount.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use card_core::{
    CardProject, ControlOutcome, ControlSurface, DesignError, DesignState, DesignStore, FaceId,
};
use card_renderer::{
    CanvasHost, DrawSurface, HeadlessFactory, HostConfig, RenderError, RenderResult,
    SurfaceFactory, SurfacePhase, SurfaceRequest, SurfaceStats,
};
use tokio::sync::{mpsc, oneshot};

/// Wraps a headless factory; the next acquisition of a gated face waits
/// until its gate is opened.
struct GatedFactory {
    gates: Mutex<HashMap<FaceId, oneshot::Receiver<()>>>,
    started: mpsc::UnboundedSender<FaceId>,
    inner: HeadlessFactory,
}

impl GatedFactory {
    fn new(inner: HeadlessFactory) -> (Self, mpsc::UnboundedReceiver<FaceId>) {
        let (started, rx) = mpsc::unbounded_channel();
        (
            Self {
                gates: Mutex::new(HashMap::new()),
                started,
                inner,
            },
            rx,
        )
    }

    fn gate(&self, face: FaceId) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(face, rx);
        tx
    }
}

#[async_trait]
impl SurfaceFactory for GatedFactory {
    async fn acquire(&self, request: SurfaceRequest) -> RenderResult<Box<dyn DrawSurface>> {
        let gate = self.gates.lock().unwrap().remove(&request.face);
        let _ = self.started.send(request.face);
        if let Some(gate) = gate {
            gate.await
                .map_err(|_| RenderError::SurfaceUnavailable("gate dropped".into()))?;
        }
        self.inner.acquire(request).await
    }
}

struct Harness {
    host: CanvasHost,
    store: DesignStore,
    stats: Arc<SurfaceStats>,
}

fn harness(factory: Arc<dyn SurfaceFactory>, stats: Arc<SurfaceStats>) -> Harness {
    let store = DesignStore::new(CardProject::new("lifecycle"));
    let host = CanvasHost::new(store.clone(), factory, HostConfig::default());
    Harness { host, store, stats }
}

async fn wait_started(rx: &mut mpsc::UnboundedReceiver<FaceId>, n: usize) {
    for _ in 0..n {
        rx.recv().await.expect("factory alive");
    }
}

#[tokio::test]
async fn teardown_before_resolution_disposes_and_never_registers() {
    let headless = HeadlessFactory::new();
    let stats = headless.stats();
    let (factory, mut started) = GatedFactory::new(headless);
    let front_gate = factory.gate(FaceId::Front);
    let back_gate = factory.gate(FaceId::Back);
    let h = harness(Arc::new(factory), stats);

    let pending = h.host.mount();
    assert_eq!(h.host.phase(FaceId::Front), SurfacePhase::Initializing);
    assert_eq!(h.host.phase(FaceId::Back), SurfacePhase::Initializing);
    wait_started(&mut started, 2).await;

    h.host.unmount();
    front_gate.send(()).unwrap();
    back_gate.send(()).unwrap();
    let phases = pending.settled().await;

    assert_eq!(phases.front, SurfacePhase::Disposed);
    assert_eq!(phases.back, SurfacePhase::Disposed);
    assert_eq!(h.host.phase(FaceId::Front), SurfacePhase::Disposed);

    // Both surfaces were produced, then disposed rather than registered
    assert_eq!(h.stats.acquired(), 2);
    assert_eq!(h.stats.disposed(), 2);
    assert_eq!(h.host.live_surfaces(), 0);
    h.store.read(|s| {
        assert!(s.binding(FaceId::Front).is_none());
        assert!(s.binding(FaceId::Back).is_none());
        assert!(!s.editor_ready());
    });
    // No placeholder for a discarded surface
    assert_eq!(h.store.snapshot().element_count(), 0);
}

#[tokio::test]
async fn remount_supersedes_inflight_attempt() {
    let headless = HeadlessFactory::new();
    let stats = headless.stats();
    let (factory, mut started) = GatedFactory::new(headless);
    let front_gate = factory.gate(FaceId::Front);
    let back_gate = factory.gate(FaceId::Back);
    let h = harness(Arc::new(factory), stats);

    let first = h.host.mount();
    wait_started(&mut started, 2).await;

    // Second mount is ungated and resolves while the first is still blocked
    let second = h.host.mount();
    let phases = second.settled().await;
    assert_eq!(phases.front, SurfacePhase::Ready);
    assert_eq!(phases.back, SurfacePhase::Ready);
    let bound = h.store.read(|s| s.binding(FaceId::Front)).expect("bound");

    front_gate.send(()).unwrap();
    back_gate.send(()).unwrap();
    let stale = first.settled().await;
    assert_eq!(stale.front, SurfacePhase::Disposed);
    assert_eq!(stale.back, SurfacePhase::Disposed);

    // The late result did not replace the live binding
    assert_eq!(h.store.read(|s| s.binding(FaceId::Front)), Some(bound));
    assert_eq!(h.host.phase(FaceId::Front), SurfacePhase::Ready);
    assert_eq!(h.host.live_surfaces(), 2);
    assert_eq!(h.stats.acquired(), 4);
    assert_eq!(h.stats.live(), 2);

    // One placeholder per face, not one per attempt
    assert_eq!(h.store.snapshot().element_count(), 2);
}

#[tokio::test]
async fn one_face_failing_leaves_the_other_usable() {
    let headless = HeadlessFactory::new().without_context(FaceId::Back);
    let stats = headless.stats();
    let h = harness(Arc::new(headless), stats);

    let phases = h.host.mount().settled().await;
    assert_eq!(phases.front, SurfacePhase::Ready);
    assert_eq!(phases.back, SurfacePhase::Disposed);
    assert!(matches!(
        h.host.failure(FaceId::Back),
        Some(RenderError::SurfaceUnavailable(_))
    ));
    assert!(h.host.failure(FaceId::Front).is_none());

    assert!(h.store.read(|s| s.is_face_ready(FaceId::Front)));
    assert!(!h.store.read(|s| s.is_face_ready(FaceId::Back)));
    assert!(!h.store.read(DesignState::editor_ready));

    let controls = ControlSurface::new(h.store.clone());
    assert!(controls.insert_text().is_applied());
    assert!(h.host.render_face(FaceId::Front).is_ok());
    assert_eq!(
        h.host.render_face(FaceId::Back),
        Err(RenderError::NotReady(FaceId::Back))
    );

    assert!(controls.flip().is_applied());
    assert_eq!(
        controls.insert_text(),
        ControlOutcome::Dropped(DesignError::BindingNotReady(FaceId::Back))
    );
    assert!(h.host.preview_target().is_none());
    assert_eq!(h.store.read(|s| s.face(FaceId::Back).len()), 0);
}

#[tokio::test]
async fn remount_after_teardown_reaches_ready_again() {
    let headless = HeadlessFactory::new();
    let stats = headless.stats();
    let h = harness(Arc::new(headless), stats);

    h.host.mount().settled().await;
    h.host.unmount();
    assert_eq!(h.host.phase(FaceId::Front), SurfacePhase::Disposed);

    let phases = h.host.mount().settled().await;
    assert_eq!(phases.front, SurfacePhase::Ready);
    assert!(h.store.read(DesignState::editor_ready));
    assert_eq!(h.stats.live(), 2);

    // Placeholders are only seeded into empty faces
    assert_eq!(h.store.snapshot().element_count(), 2);
}

#[tokio::test]
async fn with_surface_lends_the_live_surface() {
    let headless = HeadlessFactory::new();
    let stats = headless.stats();
    let h = harness(Arc::new(headless), stats);
    h.host.mount().settled().await;

    let face = h
        .host
        .with_surface(FaceId::Back, |surface| surface.face())
        .expect("ready");
    assert_eq!(face, FaceId::Back);

    h.store.flip_face();
    let (active, surface) = h.host.preview_target().expect("back ready");
    assert_eq!(active, FaceId::Back);
    assert_eq!(
        h.store.read(|s| s.binding(FaceId::Back).map(|b| b.surface)),
        Some(surface)
    );
    assert_eq!(h.host.render_active(), Ok(FaceId::Back));
    assert_eq!(h.stats.frames(), 1);
}

/// Panics while acquiring the front face; the back face resolves normally.
struct PanickingFactory {
    inner: HeadlessFactory,
}

#[async_trait]
impl SurfaceFactory for PanickingFactory {
    async fn acquire(&self, request: SurfaceRequest) -> RenderResult<Box<dyn DrawSurface>> {
        if request.face == FaceId::Front {
            panic!("context creation crashed");
        }
        self.inner.acquire(request).await
    }
}

#[tokio::test]
async fn panicked_acquisition_leaves_face_disposed() {
    let headless = HeadlessFactory::new();
    let stats = headless.stats();
    let h = harness(Arc::new(PanickingFactory { inner: headless }), stats);

    let phases = h.host.mount().settled().await;
    assert_eq!(phases.front, SurfacePhase::Disposed);
    assert_eq!(phases.back, SurfacePhase::Ready);

    assert_eq!(h.host.phase(FaceId::Front), SurfacePhase::Disposed);
    assert!(matches!(
        h.host.failure(FaceId::Front),
        Some(RenderError::SurfaceUnavailable(_))
    ));
    assert!(h.store.read(|s| s.binding(FaceId::Front).is_none()));
    assert_eq!(h.host.phase(FaceId::Back), SurfacePhase::Ready);
    assert_eq!(h.stats.live(), 1);
}
