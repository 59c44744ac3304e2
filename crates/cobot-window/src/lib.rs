#![forbid(unsafe_code)]

//! Bounded draggable floating panels.
//!
//! A [`BoundedWindow`] turns pointer gestures on a panel's handle into
//! clamped, pixel-rounded positions inside a reference region (a positioned
//! ancestor or the viewport) and keeps the panel inside that region when it
//! is resized. The host answers layout queries through [`PanelGeometry`] and
//! writes the returned [`Position`]s back to the panel.

pub mod bounds;
pub mod frame;
pub mod notifier;
pub mod placement;
pub mod window;

pub use bounds::{AxisRange, BoundMargin, DragBounds, Position};
pub use frame::{AncestorBox, FrameKind, PanelGeometry, ReferenceFrame};
pub use notifier::{
    AncestorResizeObserver, ResizeSignal, ResizeSubscription, SizeChangeNotifier,
    ViewportResizeListener, select_notifier,
};
pub use placement::{DEFAULT_POPOVER_PAD, place_near_pointer};
pub use window::{
    Attachment, BoundedWindow, HandleRegion, PressTarget, WindowConfig, WindowIgnoredReason,
    WindowUpdate,
};
