//! A running designer: one store, one host, one frame renderer.

use std::sync::Arc;

use card_core::{
    CardProject, ControlCommand, ControlOutcome, ControlSurface, DesignState, DesignStore,
    FaceMap, PanelIntent, ProjectDocument,
};
use card_renderer::{
    CanvasHost, Frame, FrameRenderer, MountHandle, Point, RenderError, Size, SurfaceFactory,
    SurfacePhase, Tilt,
};

use crate::{AppResult, DesignerConfig};

/// Editor session.
///
/// Panels and the toolbar talk to the session; the session funnels every
/// change through the store.
#[derive(Debug)]
pub struct DesignerSession {
    config: DesignerConfig,
    store: DesignStore,
    controls: ControlSurface,
    host: CanvasHost,
    renderer: FrameRenderer,
    pending: Option<MountHandle>,
}

impl DesignerSession {
    /// Create a fresh project and start acquiring surfaces for both faces.
    ///
    /// The session is usable immediately; controls drop until the active
    /// face is ready. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AppError::Config`] if `config` fails validation.
    pub fn open(config: DesignerConfig, factory: Arc<dyn SurfaceFactory>) -> AppResult<Self> {
        config.validate()?;
        let store = DesignStore::new(CardProject::new(config.project_name.clone()));
        let host = CanvasHost::new(store.clone(), factory, config.host_config());
        let pending = Some(host.mount());
        tracing::info!("Opened designer session '{}'", config.project_name);
        Ok(Self {
            controls: ControlSurface::new(store.clone()),
            renderer: FrameRenderer::new(config.frame_config()),
            config,
            store,
            host,
            pending,
        })
    }

    /// Wait for the current mount to settle. Returns the phase of each face.
    pub async fn wait_ready(&mut self) -> FaceMap<SurfacePhase> {
        match self.pending.take() {
            Some(handle) => handle.settled().await,
            None => FaceMap::from_fn(|face| self.host.phase(face)),
        }
    }

    /// Tear the surfaces down and acquire new ones. The design is kept.
    pub fn remount(&mut self) {
        self.pending = Some(self.host.mount());
    }

    /// Shared store handle.
    #[must_use]
    pub fn store(&self) -> &DesignStore {
        &self.store
    }

    /// Toolbar.
    #[must_use]
    pub fn controls(&self) -> &ControlSurface {
        &self.controls
    }

    /// Surface host.
    #[must_use]
    pub fn host(&self) -> &CanvasHost {
        &self.host
    }

    /// Settings the session was opened with.
    #[must_use]
    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    /// Run a toolbar command.
    pub fn control(&self, command: ControlCommand) -> ControlOutcome {
        self.controls.invoke(command)
    }

    /// Apply a panel intent to the active face.
    pub fn apply_intent(&self, intent: PanelIntent) {
        self.store.apply_intent(intent);
    }

    /// Apply a JSON-encoded panel intent.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AppError::Json`] if the payload does not parse; the
    /// store is untouched in that case.
    pub fn apply_intent_json(&self, payload: &str) -> AppResult<()> {
        let intent: PanelIntent = serde_json::from_str(payload)?;
        self.apply_intent(intent);
        Ok(())
    }

    /// Compose the frame for the current viewport and draw the active face.
    ///
    /// Uses the configured container when `container` is `None`. A face that
    /// is not ready is skipped, leaving the overlays without content.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AppError::Render`] if drawing a ready surface fails.
    pub fn render(&self, container: Option<Size>) -> AppResult<Frame> {
        let viewport = self.store.read(|s| *s.viewport());
        let frame = self
            .renderer
            .compose(&viewport, container.unwrap_or(self.config.container));
        match self.host.render_face(viewport.active_face) {
            Ok(()) => {}
            Err(RenderError::NotReady(face)) => {
                tracing::debug!("Skipped drawing {face} face: not ready");
            }
            Err(err) => return Err(err.into()),
        }
        Ok(frame)
    }

    /// Pointer tilt for the configured container.
    #[must_use]
    pub fn tilt(&self, pointer: Point) -> Tilt {
        Tilt::from_pointer(pointer, self.config.container)
    }

    /// Whether both faces are ready.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.store.read(DesignState::editor_ready)
    }

    /// Timestamped snapshot for the persistence collaborator.
    #[must_use]
    pub fn document(&self) -> ProjectDocument {
        self.store.document()
    }

    /// Snapshot encoded as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AppError::Json`] if encoding fails.
    pub fn document_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&self.document())?)
    }

    /// Tear the host down and hand back the final design.
    #[must_use]
    pub fn close(self) -> CardProject {
        self.host.unmount();
        let project = self.store.snapshot();
        tracing::info!(
            "Closed designer session '{}' ({} elements)",
            project.name,
            project.element_count()
        );
        project
    }
}
