#![forbid(unsafe_code)]

//! Browser host adapters for the cobot block editor.
//!
//! The embedding page pushes DOM lifecycle signals into these adapters and
//! applies the commands they return:
//! - [`SequenceDragAdapter`]: HTML5 drag-and-drop on the block track,
//! - [`WindowPointerAdapter`]: pointer drags and resizes of the floating
//!   configuration popover.
//!
//! Every dispatch also carries a structured log entry, and is emitted as a
//! `tracing` event under the `cobot.web` target. The crate installs no
//! subscriber.

#[cfg(feature = "config")]
pub mod config;
pub mod sequence_drag;
pub mod window_pointer;

#[cfg(feature = "config")]
pub use config::{ConfigError, EditorConfig};
pub use sequence_drag::{
    HostCommand, SequenceDispatch, SequenceDragAdapter, SequenceDragConfig,
    SequenceIgnoredReason, SequenceLogEntry, SequenceLogOutcome, SequencePhase,
};
pub use window_pointer::{
    WindowCommand, WindowDispatch, WindowLogEntry, WindowLogOutcome, WindowPhase,
    WindowPointerAdapter, WindowPointerIgnoredReason,
};
