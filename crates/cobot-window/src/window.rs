//! Bounded draggable window.
//!
//! [`BoundedWindow`] keeps a floating panel inside its reference region
//! while the user drags it by a handle, and pulls it back in when the region
//! shrinks.
//!
//! # Invariants
//!
//! 1. Every written position is the rounded result of clamping against the
//!    frame the position is measured in.
//! 2. At most one gesture is active; gesture state lives from `press` to
//!    `release` and nothing carries over to the next drag.
//! 3. The reference frame is resolved on `press` and stays fixed until
//!    `release`, even if the host geometry changes mid-gesture.
//! 4. A re-clamp preserves the current position unless it violates bounds.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Panel or handle missing at attach | `attach` returns `None` |
//! | Non-primary button | Ignored: `ButtonNotAllowed` |
//! | Press on a nested control or outside the handle | Ignored |
//! | Move without press | Ignored: `NoActiveGesture` |
//! | Panel detached mid-gesture | Gesture ends, `PanelDetached` |
//! | Signal the notifier does not watch | Ignored: `NotObserved` |

use std::fmt;

use cobot_core::{Point, PointerButton};
use serde::{Deserialize, Serialize};

use crate::bounds::{DragBounds, Position};
use crate::frame::{PanelGeometry, ReferenceFrame};
use crate::notifier::{ResizeSignal, ResizeSubscription, SizeChangeNotifier, select_notifier};

/// Region of the panel that starts a drag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleRegion {
    /// The whole panel.
    #[default]
    Panel,
    /// A named descendant region, resolved by the host.
    Named(String),
}

/// Window configuration.
///
/// Margins deserialize from numbers or `null`; TOML documents can write
/// `inf` for an unbounded side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub handle: HandleRegion,
    pub bounds: DragBounds,
    /// Re-clamp when the reference region changes size.
    pub observe_resize: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            handle: HandleRegion::Panel,
            bounds: DragBounds::default(),
            observe_resize: true,
        }
    }
}

impl WindowConfig {
    #[must_use]
    pub fn with_handle(mut self, handle: HandleRegion) -> Self {
        self.handle = handle;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: DragBounds) -> Self {
        self.bounds = bounds;
        self
    }
}

/// Where a press landed, as classified by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    /// Inside the drag handle.
    Handle,
    /// On a nested button, input or close control inside the handle.
    InteractiveControl,
    /// Inside the panel but outside the handle.
    Outside,
}

/// Why a window event produced no movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowIgnoredReason {
    ButtonNotAllowed,
    InteractiveControl,
    OutsideHandle,
    GestureAlreadyActive,
    NoActiveGesture,
    PanelDetached,
    NotObserved,
}

impl WindowIgnoredReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ButtonNotAllowed => "button_not_allowed",
            Self::InteractiveControl => "interactive_control",
            Self::OutsideHandle => "outside_handle",
            Self::GestureAlreadyActive => "gesture_already_active",
            Self::NoActiveGesture => "no_active_gesture",
            Self::PanelDetached => "panel_detached",
            Self::NotObserved => "not_observed",
        }
    }
}

impl fmt::Display for WindowIgnoredReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a window operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowUpdate {
    /// Write this position to the panel.
    Positioned(Position),
    Ignored(WindowIgnoredReason),
}

impl WindowUpdate {
    #[must_use]
    pub const fn position(self) -> Option<Position> {
        match self {
            Self::Positioned(position) => Some(position),
            Self::Ignored(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct WindowDrag {
    pointer_origin: Point,
    panel_origin: Point,
    frame: ReferenceFrame,
}

/// A panel made draggable within bounds.
#[derive(Debug)]
pub struct BoundedWindow {
    config: WindowConfig,
    notifier: Option<Box<dyn SizeChangeNotifier>>,
    position: Position,
    drag: Option<WindowDrag>,
}

/// Result of a successful [`BoundedWindow::attach`].
#[derive(Debug)]
pub struct Attachment {
    pub window: BoundedWindow,
    /// Initial clamped position to write.
    pub position: Position,
    /// Subscription the host must open, if resize observation is on.
    pub subscription: Option<ResizeSubscription>,
}

impl BoundedWindow {
    /// Attach to a panel and clamp it once.
    ///
    /// Returns `None` when the panel or its handle region is missing.
    #[must_use]
    pub fn attach<G: PanelGeometry + ?Sized>(
        geometry: &G,
        config: WindowConfig,
    ) -> Option<Attachment> {
        let Some(panel) = geometry.panel_rect() else {
            tracing::debug!(target: "cobot.window", "attach skipped: panel missing");
            return None;
        };
        if !geometry.has_handle(&config.handle) {
            tracing::debug!(
                target: "cobot.window",
                handle = ?config.handle,
                "attach skipped: handle missing"
            );
            return None;
        }

        let frame = ReferenceFrame::resolve(geometry);
        let notifier = config
            .observe_resize
            .then(|| select_notifier(frame.kind, geometry.resize_observer_available()));
        let subscription = notifier.as_ref().map(|notifier| notifier.subscription());
        let position =
            config
                .bounds
                .clamp(frame.to_local(panel.origin()), frame.size, panel.size());

        tracing::debug!(
            target: "cobot.window",
            frame = ?frame.kind,
            subscription = ?subscription,
            left = position.left,
            top = position.top,
            "window attached"
        );

        Some(Attachment {
            window: Self {
                config,
                notifier,
                position,
                drag: None,
            },
            position,
            subscription,
        })
    }

    #[must_use]
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Last position written.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Start a drag gesture.
    ///
    /// The panel's current offset becomes its explicit position; it is not
    /// clamped until the first move.
    pub fn press<G: PanelGeometry + ?Sized>(
        &mut self,
        button: PointerButton,
        pointer: Point,
        target: PressTarget,
        geometry: &G,
    ) -> WindowUpdate {
        let rejected = if button != PointerButton::Primary {
            Some(WindowIgnoredReason::ButtonNotAllowed)
        } else {
            match target {
                PressTarget::Handle => None,
                PressTarget::InteractiveControl => Some(WindowIgnoredReason::InteractiveControl),
                PressTarget::Outside => Some(WindowIgnoredReason::OutsideHandle),
            }
        };
        if let Some(reason) = rejected.or_else(|| {
            self.drag
                .is_some()
                .then_some(WindowIgnoredReason::GestureAlreadyActive)
        }) {
            return self.ignored(reason);
        }
        let Some(panel) = geometry.panel_rect() else {
            return self.ignored(WindowIgnoredReason::PanelDetached);
        };

        let frame = ReferenceFrame::resolve(geometry);
        let panel_origin = frame.to_local(panel.origin());
        self.drag = Some(WindowDrag {
            pointer_origin: pointer,
            panel_origin,
            frame,
        });
        self.position = Position::round(panel_origin.x, panel_origin.y);
        tracing::debug!(
            target: "cobot.window",
            frame = ?frame.kind,
            left = self.position.left,
            top = self.position.top,
            "window drag started"
        );
        WindowUpdate::Positioned(self.position)
    }

    /// Move the active gesture to a new pointer position.
    pub fn drag_to<G: PanelGeometry + ?Sized>(
        &mut self,
        pointer: Point,
        geometry: &G,
    ) -> WindowUpdate {
        let Some(drag) = self.drag else {
            return self.ignored(WindowIgnoredReason::NoActiveGesture);
        };
        let Some(panel) = geometry.panel_rect() else {
            self.drag = None;
            return self.ignored(WindowIgnoredReason::PanelDetached);
        };
        let desired = drag
            .panel_origin
            .offset(pointer.delta_from(drag.pointer_origin));
        self.position = self.config.bounds.clamp(desired, drag.frame.size, panel.size());
        WindowUpdate::Positioned(self.position)
    }

    /// End the active gesture. Returns whether one was active.
    pub fn release(&mut self) -> bool {
        let ended = self.drag.take().is_some();
        if ended {
            tracing::debug!(
                target: "cobot.window",
                left = self.position.left,
                top = self.position.top,
                "window drag ended"
            );
        }
        ended
    }

    /// React to a host size-change signal.
    pub fn on_resize<G: PanelGeometry + ?Sized>(
        &mut self,
        signal: ResizeSignal,
        geometry: &G,
    ) -> WindowUpdate {
        let observed = self
            .notifier
            .as_ref()
            .is_some_and(|notifier| notifier.accepts(signal));
        if !observed {
            return self.ignored(WindowIgnoredReason::NotObserved);
        }
        self.reclamp(geometry)
    }

    /// Clamp the current position against the current frame.
    pub fn reclamp<G: PanelGeometry + ?Sized>(&mut self, geometry: &G) -> WindowUpdate {
        let Some(panel) = geometry.panel_rect() else {
            return self.ignored(WindowIgnoredReason::PanelDetached);
        };
        let frame = self
            .drag
            .map_or_else(|| ReferenceFrame::resolve(geometry), |drag| drag.frame);
        let previous = self.position;
        self.position = self
            .config
            .bounds
            .clamp(frame.to_local(panel.origin()), frame.size, panel.size());
        if self.position != previous {
            tracing::debug!(
                target: "cobot.window",
                from_left = previous.left,
                from_top = previous.top,
                left = self.position.left,
                top = self.position.top,
                "window re-clamped"
            );
        }
        WindowUpdate::Positioned(self.position)
    }

    /// Detach, returning the subscription the host must close.
    #[must_use]
    pub fn detach(self) -> Option<ResizeSubscription> {
        let subscription = self.notifier.as_ref().map(|notifier| notifier.subscription());
        tracing::debug!(
            target: "cobot.window",
            subscription = ?subscription,
            "window detached"
        );
        subscription
    }

    fn ignored(&self, reason: WindowIgnoredReason) -> WindowUpdate {
        tracing::debug!(
            target: "cobot.window",
            reason = reason.as_str(),
            "window event ignored"
        );
        WindowUpdate::Ignored(reason)
    }
}
