//! The designer toolbar: a fixed palette of view and insert commands.
//!
//! The control surface holds no state of its own. Every command reads the
//! active face, refuses if that face's surface is not ready, and otherwise
//! turns into exactly one store action. Refused commands are logged and
//! dropped; nothing is retried.

use crate::error::DesignError;
use crate::store::{Action, DesignStore};
use crate::{DesignElement, ElementVariant, FaceId};

/// Label of the text element inserted from the toolbar.
pub const DEFAULT_TEXT_LABEL: &str = "New text";

/// A toolbar command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCommand {
    /// Zoom one step in.
    ZoomIn,
    /// Zoom one step out.
    ZoomOut,
    /// Zoom back to 100%.
    ResetZoom,
    /// Show the other face.
    FlipFace,
    /// Show or hide the grid.
    ToggleGrid,
    /// Show or hide bleed and safe-zone guides.
    ToggleSafeZones,
    /// Insert a default text element on the active face.
    InsertText,
}

impl ControlCommand {
    /// Every command, in toolbar order.
    pub const ALL: [ControlCommand; 7] = [
        ControlCommand::ZoomOut,
        ControlCommand::ResetZoom,
        ControlCommand::ZoomIn,
        ControlCommand::FlipFace,
        ControlCommand::ToggleGrid,
        ControlCommand::ToggleSafeZones,
        ControlCommand::InsertText,
    ];

    /// Tooltip label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ZoomIn => "Zoom in",
            Self::ZoomOut => "Zoom out",
            Self::ResetZoom => "Reset zoom",
            Self::FlipFace => "Flip card",
            Self::ToggleGrid => "Toggle grid",
            Self::ToggleSafeZones => "Toggle safe zones",
            Self::InsertText => "Add text",
        }
    }

    fn action(self, face: FaceId) -> Action {
        match self {
            Self::ZoomIn => Action::ZoomIn,
            Self::ZoomOut => Action::ZoomOut,
            Self::ResetZoom => Action::ResetZoom,
            Self::FlipFace => Action::FlipFace,
            Self::ToggleGrid => Action::ToggleGrid,
            Self::ToggleSafeZones => Action::ToggleSafeZones,
            Self::InsertText => Action::InsertElement {
                face,
                element: DesignElement::with_defaults(ElementVariant::Text, DEFAULT_TEXT_LABEL),
            },
        }
    }
}

/// What happened to a command.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlOutcome {
    /// The command reached the store.
    Applied,
    /// The command was refused.
    Dropped(DesignError),
}

impl ControlOutcome {
    /// Whether the command reached the store.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Toolbar bound to a store.
#[derive(Debug, Clone)]
pub struct ControlSurface {
    store: DesignStore,
}

impl ControlSurface {
    /// Create a control surface issuing actions to `store`.
    #[must_use]
    pub fn new(store: DesignStore) -> Self {
        Self { store }
    }

    /// Run one command.
    ///
    /// Commands are dropped while the active face is not ready, except
    /// [`ControlCommand::FlipFace`], which always lets the user reach the
    /// other face.
    pub fn invoke(&self, command: ControlCommand) -> ControlOutcome {
        let result = self.store.try_dispatch(|state| {
            let face = state.active_face();
            if command == ControlCommand::FlipFace || state.is_face_ready(face) {
                Ok(command.action(face))
            } else {
                Err(DesignError::BindingNotReady(face))
            }
        });
        match result {
            Ok(()) => ControlOutcome::Applied,
            Err(err) => {
                tracing::warn!("Dropping '{}': {err}", command.label());
                ControlOutcome::Dropped(err)
            }
        }
    }

    /// Zoom one step in.
    pub fn zoom_in(&self) -> ControlOutcome {
        self.invoke(ControlCommand::ZoomIn)
    }

    /// Zoom one step out.
    pub fn zoom_out(&self) -> ControlOutcome {
        self.invoke(ControlCommand::ZoomOut)
    }

    /// Zoom back to 100%.
    pub fn reset_zoom(&self) -> ControlOutcome {
        self.invoke(ControlCommand::ResetZoom)
    }

    /// Show the other face.
    pub fn flip(&self) -> ControlOutcome {
        self.invoke(ControlCommand::FlipFace)
    }

    /// Show or hide the grid.
    pub fn toggle_grid(&self) -> ControlOutcome {
        self.invoke(ControlCommand::ToggleGrid)
    }

    /// Show or hide bleed and safe-zone guides.
    pub fn toggle_safe_zones(&self) -> ControlOutcome {
        self.invoke(ControlCommand::ToggleSafeZones)
    }

    /// Insert a default text element on the active face.
    pub fn insert_text(&self) -> ControlOutcome {
        self.invoke(ControlCommand::InsertText)
    }
}
