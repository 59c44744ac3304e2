//! Size-change notification strategies.
//!
//! A window re-clamps whenever its reference region may have changed size.
//! Hosts that can observe element boxes watch the positioned ancestor;
//! everything else falls back to viewport resize events. The strategy is
//! chosen once at attach time and decides which host subscription to open
//! and which incoming signals are relevant.

use std::fmt;

use crate::frame::FrameKind;

/// Host notification that something may have changed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeSignal {
    /// The observed ancestor's box changed.
    AncestorBoxChanged,
    /// The browser viewport was resized.
    ViewportResized,
}

/// Host subscription a window needs while attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeSubscription {
    ObserveAncestor,
    ListenViewport,
}

/// Strategy deciding how a window learns about region size changes.
pub trait SizeChangeNotifier: fmt::Debug + Send + Sync {
    /// Subscription to open on attach and close on detach.
    fn subscription(&self) -> ResizeSubscription;

    /// Whether a signal should trigger a re-clamp.
    fn accepts(&self, signal: ResizeSignal) -> bool;
}

/// Watches the positioned ancestor's box.
#[derive(Debug, Clone, Copy, Default)]
pub struct AncestorResizeObserver;

impl SizeChangeNotifier for AncestorResizeObserver {
    fn subscription(&self) -> ResizeSubscription {
        ResizeSubscription::ObserveAncestor
    }

    fn accepts(&self, signal: ResizeSignal) -> bool {
        matches!(signal, ResizeSignal::AncestorBoxChanged)
    }
}

/// Listens for viewport resizes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportResizeListener;

impl SizeChangeNotifier for ViewportResizeListener {
    fn subscription(&self) -> ResizeSubscription {
        ResizeSubscription::ListenViewport
    }

    fn accepts(&self, signal: ResizeSignal) -> bool {
        matches!(signal, ResizeSignal::ViewportResized)
    }
}

/// Pick the notifier for a frame.
///
/// Observing only makes sense for an ancestor frame on a host that supports
/// it; the viewport listener covers every other case.
#[must_use]
pub fn select_notifier(
    frame: FrameKind,
    observer_available: bool,
) -> Box<dyn SizeChangeNotifier> {
    match frame {
        FrameKind::Ancestor if observer_available => Box::new(AncestorResizeObserver),
        _ => Box::new(ViewportResizeListener),
    }
}
