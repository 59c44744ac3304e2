//! Popover placement next to the pointer.

use cobot_core::{Point, Size};

use crate::bounds::Position;

/// Gap kept between the pointer, the popover and the viewport edges.
pub const DEFAULT_POPOVER_PAD: f64 = 20.0;

/// Place a popover to the right of and slightly above the pointer.
///
/// A box that would overflow the viewport is pulled back so its far edge
/// sits `pad` from the viewport edge; the result never goes above or left of
/// `pad`.
#[must_use]
pub fn place_near_pointer(pointer: Point, panel: Size, viewport: Size, pad: f64) -> Position {
    let pad = if pad.is_finite() { pad.max(0.0) } else { 0.0 };
    let left = fit(pointer.x + pad, panel.width, viewport.width, pad);
    let top = fit(pointer.y - pad, panel.height, viewport.height, pad);
    Position::round(left, top)
}

fn fit(start: f64, extent: f64, available: f64, pad: f64) -> f64 {
    let start = if start + extent + pad > available {
        available - extent - pad
    } else {
        start
    };
    if start.is_finite() { start.max(pad) } else { pad }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_POPOVER_PAD, place_near_pointer};
    use crate::bounds::Position;
    use cobot_core::{Point, Size};

    const VIEWPORT: Size = Size::new(1280.0, 720.0);
    const POPOVER: Size = Size::new(300.0, 200.0);

    #[test]
    fn opens_right_of_and_above_pointer() {
        let position = place_near_pointer(
            Point::new(400.0, 300.0),
            POPOVER,
            VIEWPORT,
            DEFAULT_POPOVER_PAD,
        );
        assert_eq!(position, Position::new(420, 280));
    }

    #[test]
    fn overflow_is_pulled_back_inside_viewport() {
        let position = place_near_pointer(
            Point::new(1200.0, 650.0),
            POPOVER,
            VIEWPORT,
            DEFAULT_POPOVER_PAD,
        );
        assert_eq!(position, Position::new(960, 500));
    }

    #[test]
    fn never_closer_than_pad_to_top_left() {
        let position = place_near_pointer(
            Point::new(-50.0, 5.0),
            POPOVER,
            Size::new(200.0, 100.0),
            DEFAULT_POPOVER_PAD,
        );
        assert_eq!(position, Position::new(20, 20));
    }
}
