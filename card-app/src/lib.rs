//! # Card Designer Application
//!
//! Wires the design store, canvas host and frame renderer into one editor
//! session, and carries the ambient setup around it: configuration and
//! tracing.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use card_app::{init_tracing, DesignerConfig, DesignerSession};
//! use card_core::ControlCommand;
//! use card_renderer::HeadlessFactory;
//!
//! # async fn run() -> card_app::AppResult<()> {
//! let config = DesignerConfig::default();
//! init_tracing(config.log_format);
//!
//! let mut session = DesignerSession::open(config, Arc::new(HeadlessFactory::new()))?;
//! session.wait_ready().await;
//! session.control(ControlCommand::InsertText);
//! let frame = session.render(None)?;
//! # let _ = frame;
//! let project = session.close();
//! # let _ = project;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use config::{DesignerConfig, LogFormat};
pub use error::{AppError, AppResult};
pub use logging::init_tracing;
pub use session::DesignerSession;
