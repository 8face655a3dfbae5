//! The design store - the single writer of designer state.
//!
//! State changes are expressed as [`Action`] values and applied by
//! [`DesignState::reduce`], a pure function from `(state, action)` to the next
//! state. [`DesignStore`] is the shared handle the rest of the editor holds;
//! it serialises dispatches so every reader observes actions in call order.
//!
//! Every action is total. Out-of-range numbers are clamped and edits that
//! target a missing element are dropped, so nothing here returns an error.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ZOOM, GRID_SIZE_PX};
use crate::error::{DesignError, DesignResult};
use crate::viewport::{normalize_degrees, snap_to_grid};
use crate::{
    CardProject, DesignElement, ElementId, ElementPatch, Face, FaceId, FaceMap, LayerMove,
    PanelIntent, ProjectDocument, SecurityFeature, SecurityProfile, ViewportState,
};

/// Identifier of a drawable surface owned by the canvas host.
///
/// The store never holds the surface itself, only this key into the host's
/// side table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(u64);

impl SurfaceId {
    /// Wrap a raw key.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw key.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Connects a face to its live drawable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasBinding {
    /// Key of the surface in the host's side table.
    pub surface: SurfaceId,
    /// Whether the surface can be drawn to.
    pub ready: bool,
}

impl CanvasBinding {
    /// A binding that is ready for drawing.
    #[must_use]
    pub const fn ready(surface: SurfaceId) -> Self {
        Self {
            surface,
            ready: true,
        }
    }
}

/// The closed set of state transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Show the given face.
    SetActiveFace(FaceId),
    /// Show the other face.
    FlipFace,
    /// Replace (or with `None`, release) the binding of a face.
    RegisterCanvasBinding {
        /// Face to bind.
        face: FaceId,
        /// New binding.
        binding: Option<CanvasBinding>,
    },
    /// Set the readiness of one face's binding.
    SetCanvasReady {
        /// Face to update.
        face: FaceId,
        /// New readiness.
        ready: bool,
    },
    /// Zoom one step in.
    ZoomIn,
    /// Zoom one step out.
    ZoomOut,
    /// Zoom back to 100%.
    ResetZoom,
    /// Set an explicit zoom factor.
    SetZoom(f64),
    /// Set the view rotation in degrees.
    SetRotation(f64),
    /// Rotate the view by a delta in degrees.
    RotateView(f64),
    /// Show or hide grid lines.
    ToggleGrid,
    /// Show or hide bleed and safe-zone guides.
    ToggleSafeZones,
    /// Append an element to a face.
    InsertElement {
        /// Target face.
        face: FaceId,
        /// Element to add.
        element: DesignElement,
    },
    /// Apply a partial update to an element.
    UpdateElement {
        /// Face holding the element.
        face: FaceId,
        /// Element to edit.
        id: ElementId,
        /// Fields to change.
        patch: ElementPatch,
    },
    /// Delete an element.
    RemoveElement {
        /// Face holding the element.
        face: FaceId,
        /// Element to delete.
        id: ElementId,
    },
    /// Insert a copy of an element, offset by one grid step.
    DuplicateElement {
        /// Face holding the element.
        face: FaceId,
        /// Element to copy.
        id: ElementId,
    },
    /// Move an element in its face's stacking order.
    ReorderElement {
        /// Face holding the element.
        face: FaceId,
        /// Element to move.
        id: ElementId,
        /// Direction.
        to: LayerMove,
    },
    /// Select an element on the active face, or clear the selection.
    SelectElement(Option<ElementId>),
    /// Flip one security feature.
    ToggleSecurityFeature(SecurityFeature),
    /// Apply a panel intent against the active face.
    ApplyIntent(PanelIntent),
}

/// Complete designer state.
///
/// Fields are private; the only way to change them is [`DesignState::reduce`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesignState {
    project: CardProject,
    viewport: ViewportState,
    bindings: FaceMap<Option<CanvasBinding>>,
    selection: Option<ElementId>,
}

impl DesignState {
    /// Fresh state for a project: front face active, nothing bound.
    #[must_use]
    pub fn new(project: CardProject) -> Self {
        Self {
            project,
            ..Self::default()
        }
    }

    /// Apply one action and return the resulting state.
    #[must_use]
    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::SetActiveFace(face) => self.set_active_face(face),
            Action::FlipFace => {
                let next = self.viewport.active_face.other();
                self.set_active_face(next);
            }
            Action::RegisterCanvasBinding { face, binding } => {
                // Release first; a face never holds two bindings.
                if let Some(old) = self.bindings[face].take() {
                    tracing::debug!("Released {} from {face} face", old.surface);
                }
                if let Some(new) = binding {
                    tracing::debug!("Bound {} to {face} face (ready={})", new.surface, new.ready);
                }
                self.bindings[face] = binding;
            }
            Action::SetCanvasReady { face, ready } => match self.bindings[face].as_mut() {
                Some(binding) => binding.ready = ready,
                None if ready => {
                    tracing::debug!("Ignoring ready flag for unbound {face} face");
                }
                None => {}
            },
            Action::ZoomIn => self.viewport = self.viewport.zoomed_in(),
            Action::ZoomOut => self.viewport = self.viewport.zoomed_out(),
            Action::ResetZoom => self.viewport.zoom = DEFAULT_ZOOM,
            Action::SetZoom(zoom) => self.viewport = self.viewport.with_zoom(zoom),
            Action::SetRotation(degrees) => self.viewport.rotation = normalize_degrees(degrees),
            Action::RotateView(delta) => {
                let delta = if delta.is_finite() { delta } else { 0.0 };
                self.viewport.rotation = normalize_degrees(self.viewport.rotation + delta);
            }
            Action::ToggleGrid => self.viewport.show_grid = !self.viewport.show_grid,
            Action::ToggleSafeZones => {
                self.viewport.show_safe_zones = !self.viewport.show_safe_zones;
            }
            Action::InsertElement { face, element } => self.insert(face, element),
            Action::UpdateElement { face, id, patch } => self.update(face, id, &patch),
            Action::RemoveElement { face, id } => {
                if self.project.faces[face].remove(id).is_some() {
                    if self.selection == Some(id) {
                        self.selection = None;
                    }
                } else {
                    stale(face, id);
                }
            }
            Action::DuplicateElement { face, id } => {
                if let Some(original) = self.project.faces[face].get(id) {
                    let mut copy = original.clone();
                    copy.id = ElementId::new();
                    copy.transform.x += GRID_SIZE_PX;
                    copy.transform.y += GRID_SIZE_PX;
                    self.insert(face, copy);
                } else {
                    stale(face, id);
                }
            }
            Action::ReorderElement { face, id, to } => {
                if !self.project.faces[face].reorder(id, to) {
                    stale(face, id);
                }
            }
            Action::SelectElement(None) => self.selection = None,
            Action::SelectElement(Some(id)) => {
                let face = self.viewport.active_face;
                if self.project.faces[face].get(id).is_some() {
                    self.selection = Some(id);
                } else {
                    stale(face, id);
                }
            }
            Action::ToggleSecurityFeature(feature) => {
                self.project.security = self.project.security.toggled(feature);
            }
            Action::ApplyIntent(intent) => {
                let face = self.viewport.active_face;
                return self.reduce(intent.into_action(face));
            }
        }
        self
    }

    fn set_active_face(&mut self, face: FaceId) {
        if self.viewport.active_face != face {
            self.viewport.active_face = face;
            self.selection = None;
        }
    }

    fn insert(&mut self, face: FaceId, element: DesignElement) {
        let mut element = element.normalized();
        let taken = FaceId::ALL
            .iter()
            .any(|f| self.project.faces[*f].get(element.id).is_some());
        if taken {
            let fresh = ElementId::new();
            tracing::debug!("Element id {} already in use, reassigned to {fresh}", element.id);
            element.id = fresh;
        }
        self.project.faces[face].push(element);
    }

    fn update(&mut self, face: FaceId, id: ElementId, patch: &ElementPatch) {
        let snap = self.viewport.show_grid;
        let Some(element) = self.project.faces[face].get_mut(id) else {
            stale(face, id);
            return;
        };
        if snap {
            let snapped = ElementPatch {
                x: patch.x.map(snap_to_grid),
                y: patch.y.map(snap_to_grid),
                ..patch.clone()
            };
            element.apply_patch(&snapped);
        } else {
            element.apply_patch(patch);
        }
    }

    // -----------------------------------------------------------------------
    // Readers
    // -----------------------------------------------------------------------

    /// The design being edited.
    #[must_use]
    pub fn project(&self) -> &CardProject {
        &self.project
    }

    /// One face of the design.
    #[must_use]
    pub fn face(&self, face: FaceId) -> &Face {
        &self.project.faces[face]
    }

    /// Current view settings.
    #[must_use]
    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// Face currently shown.
    #[must_use]
    pub fn active_face(&self) -> FaceId {
        self.viewport.active_face
    }

    /// Current security profile.
    #[must_use]
    pub fn security(&self) -> &SecurityProfile {
        &self.project.security
    }

    /// Binding registered for a face, if any.
    #[must_use]
    pub fn binding(&self, face: FaceId) -> Option<CanvasBinding> {
        self.bindings[face]
    }

    /// Whether a face has a binding that is ready. An absent binding is not ready.
    #[must_use]
    pub fn is_face_ready(&self, face: FaceId) -> bool {
        self.bindings[face].is_some_and(|b| b.ready)
    }

    /// Both faces ready.
    #[must_use]
    pub fn editor_ready(&self) -> bool {
        self.bindings
            .iter()
            .all(|(_, binding)| binding.is_some_and(|b| b.ready))
    }

    /// Selected element on the active face.
    #[must_use]
    pub fn selection(&self) -> Option<&DesignElement> {
        self.selection
            .and_then(|id| self.project.faces[self.viewport.active_face].get(id))
    }
}

fn stale(face: FaceId, id: ElementId) {
    let err = DesignError::StaleReference { face, id };
    tracing::debug!("Ignoring edit: {err}");
}

/// Shared handle to the designer state.
///
/// Cloning the handle shares the same state. Dispatch holds the write lock
/// for the duration of one reduction, so actions apply one at a time, in the
/// order they were issued.
#[derive(Debug, Clone, Default)]
pub struct DesignStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Debug, Default)]
struct StoreInner {
    state: DesignState,
    revision: u64,
}

impl DesignStore {
    /// Create a store for a new project.
    #[must_use]
    pub fn new(project: CardProject) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                state: DesignState::new(project),
                revision: 0,
            })),
        }
    }

    /// Apply an action.
    pub fn dispatch(&self, action: Action) {
        self.dispatch_then(action, |_| ());
    }

    /// Apply an action and read the resulting state before any other
    /// dispatch can run.
    pub fn dispatch_then<R>(&self, action: Action, f: impl FnOnce(&DesignState) -> R) -> R {
        tracing::trace!(?action, "dispatch");
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let state = std::mem::take(&mut inner.state);
        inner.state = state.reduce(action);
        inner.revision += 1;
        f(&inner.state)
    }

    /// Compute an action from the current state and apply it, all under one
    /// lock. When `f` refuses, nothing is dispatched and its error is returned.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    pub fn try_dispatch(
        &self,
        f: impl FnOnce(&DesignState) -> DesignResult<Action>,
    ) -> DesignResult<()> {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let action = f(&inner.state)?;
        tracing::trace!(?action, "dispatch");
        let state = std::mem::take(&mut inner.state);
        inner.state = state.reduce(action);
        inner.revision += 1;
        Ok(())
    }

    /// Read the current state.
    pub fn read<R>(&self, f: impl FnOnce(&DesignState) -> R) -> R {
        let inner = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&inner.state)
    }

    /// Number of actions dispatched so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.read_inner(|inner| inner.revision)
    }

    fn read_inner<R>(&self, f: impl FnOnce(&StoreInner) -> R) -> R {
        let inner = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&inner)
    }

    /// Clone of the current state.
    #[must_use]
    pub fn state(&self) -> DesignState {
        self.read(Clone::clone)
    }

    /// Clone of the design, for the persistence collaborator.
    #[must_use]
    pub fn snapshot(&self) -> CardProject {
        self.read(|s| s.project().clone())
    }

    /// Timestamped snapshot document.
    #[must_use]
    pub fn document(&self) -> ProjectDocument {
        self.read(|s| ProjectDocument::new(s.project().clone(), s.active_face()))
    }

    // -----------------------------------------------------------------------
    // Named actions
    // -----------------------------------------------------------------------

    /// Show the given face.
    pub fn set_active_face(&self, face: FaceId) {
        self.dispatch(Action::SetActiveFace(face));
    }

    /// Show the other face.
    pub fn flip_face(&self) {
        self.dispatch(Action::FlipFace);
    }

    /// Replace or release the binding of a face.
    pub fn register_canvas_binding(&self, face: FaceId, binding: Option<CanvasBinding>) {
        self.dispatch(Action::RegisterCanvasBinding { face, binding });
    }

    /// Set the readiness of one face's binding.
    pub fn set_canvas_ready(&self, face: FaceId, ready: bool) {
        self.dispatch(Action::SetCanvasReady { face, ready });
    }

    /// Zoom one step in.
    pub fn zoom_in(&self) {
        self.dispatch(Action::ZoomIn);
    }

    /// Zoom one step out.
    pub fn zoom_out(&self) {
        self.dispatch(Action::ZoomOut);
    }

    /// Zoom back to 100%.
    pub fn reset_zoom(&self) {
        self.dispatch(Action::ResetZoom);
    }

    /// Set an explicit zoom factor (clamped).
    pub fn set_zoom(&self, zoom: f64) {
        self.dispatch(Action::SetZoom(zoom));
    }

    /// Show or hide the grid.
    pub fn toggle_grid(&self) {
        self.dispatch(Action::ToggleGrid);
    }

    /// Show or hide bleed and safe-zone guides.
    pub fn toggle_safe_zones(&self) {
        self.dispatch(Action::ToggleSafeZones);
    }

    /// Append an element to a face, returning the id it was stored under.
    pub fn insert_element(&self, face: FaceId, element: DesignElement) -> ElementId {
        let requested = element.id;
        // A colliding id is reassigned; the new element is always last.
        self.dispatch_then(Action::InsertElement { face, element }, |s| {
            s.face(face).elements().last().map_or(requested, |e| e.id)
        })
    }

    /// Apply a partial update. A missing id is ignored.
    pub fn update_element(&self, face: FaceId, id: ElementId, patch: ElementPatch) {
        self.dispatch(Action::UpdateElement { face, id, patch });
    }

    /// Delete an element. A missing id is ignored.
    pub fn remove_element(&self, face: FaceId, id: ElementId) {
        self.dispatch(Action::RemoveElement { face, id });
    }

    /// Apply a panel intent against the active face.
    pub fn apply_intent(&self, intent: PanelIntent) {
        self.dispatch(Action::ApplyIntent(intent));
    }
}
