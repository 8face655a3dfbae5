//! # Card Designer Core
//!
//! State and data model for a dual-face card/badge designer.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  card-core                   │
//! ├──────────────────────────────────────────────┤
//! │  Control Surface   │  Panel Intents          │
//! │  - zoom / flip     │  - insert / edit        │
//! │  - grid / zones    │  - layers / security    │
//! ├──────────────────────────────────────────────┤
//! │  Design Store (Action -> reduce -> state)    │
//! │  - CardProject (front + back faces)          │
//! │  - ViewportState (shared by both faces)      │
//! │  - CanvasBinding per face (surface key only) │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The store is the only writer. Everything else reads state or hands the
//! store an [`Action`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod constants;
pub mod control;
pub mod element;
pub mod error;
pub mod face;
pub mod intent;
pub mod project;
pub mod security;
pub mod store;
pub mod viewport;

pub use control::{ControlCommand, ControlOutcome, ControlSurface};
pub use element::{
    CodeSymbology, DesignElement, ElementId, ElementKind, ElementPatch, ElementVariant, ShapeKind,
    Transform,
};
pub use error::{DesignError, DesignResult};
pub use face::{Face, FaceId, FaceMap, LayerMove};
pub use intent::{InsertIntent, PanelIntent, PropertyEdit, SecurityToggle};
pub use project::{CardProject, ProjectDocument};
pub use security::{CostTier, SecurityFeature, SecurityProfile};
pub use store::{Action, CanvasBinding, DesignState, DesignStore, SurfaceId};
pub use viewport::ViewportState;

/// Card core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
