#![forbid(unsafe_code)]

//! Core: pixel geometry and pointer primitives for the cobot block editor.
//!
//! # Role in the workspace
//! `cobot-core` is the shared vocabulary. The sequence editor
//! (`cobot-editor`) and the bounded window (`cobot-window`) are independent
//! of each other and of any DOM; both speak in the CSS-pixel types defined
//! here, and the host adapters in `cobot-web` translate browser events into
//! them.

pub mod geometry;
pub mod input;

pub use geometry::{Point, Rect, Size, Span};
pub use input::{Key, PointerButton};
