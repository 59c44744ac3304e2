//! Reference frame resolution.
//!
//! A panel is positioned relative to its nearest positioned ancestor when it
//! has one, else relative to the viewport. The frame records the ancestor's
//! border-box origin (viewport coordinates) and its inner client size, which
//! is the region the bounds are measured against.

use cobot_core::{Point, Rect, Size};

use crate::window::HandleRegion;

/// Which box the panel's offsets are measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Ancestor,
    Viewport,
}

/// Measured box of the nearest positioned ancestor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AncestorBox {
    /// Border box in viewport coordinates.
    pub border_box: Rect,
    /// Inner size excluding borders and scrollbars.
    pub client_size: Size,
}

/// Live layout queries the host answers for one panel.
pub trait PanelGeometry {
    /// Panel border box in viewport coordinates, `None` once detached.
    fn panel_rect(&self) -> Option<Rect>;

    fn positioned_ancestor(&self) -> Option<AncestorBox>;

    fn viewport_size(&self) -> Size;

    /// Whether the configured drag handle exists inside the panel.
    fn has_handle(&self, handle: &HandleRegion) -> bool {
        matches!(handle, HandleRegion::Panel)
    }

    /// Whether the host can observe element box changes.
    fn resize_observer_available(&self) -> bool {
        true
    }
}

/// Origin and size of the region the panel is clamped into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFrame {
    pub kind: FrameKind,
    pub origin: Point,
    pub size: Size,
}

impl ReferenceFrame {
    #[must_use]
    pub fn resolve<G: PanelGeometry + ?Sized>(geometry: &G) -> Self {
        match geometry.positioned_ancestor() {
            Some(ancestor) => Self {
                kind: FrameKind::Ancestor,
                origin: ancestor.border_box.origin(),
                size: ancestor.client_size,
            },
            None => Self {
                kind: FrameKind::Viewport,
                origin: Point::new(0.0, 0.0),
                size: geometry.viewport_size(),
            },
        }
    }

    /// Convert a viewport point into frame-relative coordinates.
    #[must_use]
    pub fn to_local(&self, point: Point) -> Point {
        point.delta_from(self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::{AncestorBox, FrameKind, PanelGeometry, ReferenceFrame};
    use cobot_core::{Point, Rect, Size};

    struct Fixed {
        ancestor: Option<AncestorBox>,
    }

    impl PanelGeometry for Fixed {
        fn panel_rect(&self) -> Option<Rect> {
            Some(Rect::new(130.0, 90.0, 200.0, 100.0))
        }

        fn positioned_ancestor(&self) -> Option<AncestorBox> {
            self.ancestor
        }

        fn viewport_size(&self) -> Size {
            Size::new(1280.0, 720.0)
        }
    }

    #[test]
    fn ancestor_frame_uses_border_origin_and_client_size() {
        let geometry = Fixed {
            ancestor: Some(AncestorBox {
                border_box: Rect::new(100.0, 50.0, 502.0, 402.0),
                client_size: Size::new(500.0, 400.0),
            }),
        };
        let frame = ReferenceFrame::resolve(&geometry);
        assert_eq!(frame.kind, FrameKind::Ancestor);
        assert_eq!(frame.size, Size::new(500.0, 400.0));
        assert_eq!(frame.to_local(Point::new(130.0, 90.0)), Point::new(30.0, 40.0));
    }

    #[test]
    fn viewport_frame_without_positioned_ancestor() {
        let frame = ReferenceFrame::resolve(&Fixed { ancestor: None });
        assert_eq!(frame.kind, FrameKind::Viewport);
        assert_eq!(frame.origin, Point::new(0.0, 0.0));
        assert_eq!(frame.size, Size::new(1280.0, 720.0));
    }
}
