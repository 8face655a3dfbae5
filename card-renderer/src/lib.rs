//! # Card Designer Renderer
//!
//! Frame geometry, print-guide overlays and surface lifecycle for the card
//! designer.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  CanvasHost (async acquisition per face)    │
//! ├──────────────────────┬──────────────────────┤
//! │  FrameRenderer       │  SurfaceFactory      │
//! │  (overlays, zoom)    │  (platform / headless)│
//! ├──────────────────────┴──────────────────────┤
//! │  geometry: mm → surface px → screen         │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod frame;
pub mod geometry;
pub mod host;
pub mod surface;

pub use error::{RenderError, RenderResult};
pub use frame::{Frame, FrameConfig, FrameLayout, FrameRenderer, GridLine, OverlayLayer, Tilt};
pub use geometry::{Affine, Point, Rect, Size};
pub use host::{CancelToken, CanvasHost, HostConfig, MountHandle, SurfacePhase};
pub use surface::{
    DrawSurface, HeadlessFactory, HeadlessSurface, SurfaceFactory, SurfaceRequest, SurfaceStats,
};
