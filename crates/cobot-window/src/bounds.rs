//! Bound margins and per-axis clamping.
//!
//! Margins are measured from the edges of the reference region:
//!
//! - `Px(0.0)` keeps the panel flush with that edge,
//! - `Px(m)` with `m > 0` keeps it inset by `m`,
//! - `Px(m)` with `m < 0` lets it cross the edge by `|m|`,
//! - `Unbounded` places no constraint on that side.
//!
//! Independently of the margins, a minimum visible extent keeps part of the
//! panel inside the region so it can always be grabbed again.
//!
//! # Degenerate input
//!
//! Clamping never panics and never yields `NaN`. An inverted range (lower
//! bound above upper bound, e.g. a panel wider than its region) resolves to
//! `min(position, upper)`. Non-finite sizes count as zero.

use cobot_core::{Point, Size};
use serde::{Deserialize, Serialize};

/// Signed distance constraint for one side of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoundMargin {
    Px(f64),
    /// Serialized as `null`.
    Unbounded,
}

impl BoundMargin {
    /// Flush with the reference edge.
    pub const FLUSH: Self = Self::Px(0.0);

    /// Finite pixel margin, or `None` when the side is unconstrained.
    #[must_use]
    pub fn px(self) -> Option<f64> {
        match self {
            Self::Px(value) if value.is_finite() => Some(value),
            _ => None,
        }
    }
}

impl From<f64> for BoundMargin {
    /// Infinite or `NaN` values mean "no limit".
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Self::Px(value)
        } else {
            Self::Unbounded
        }
    }
}

/// Margins for all four sides plus the minimum visible extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragBounds {
    pub top: BoundMargin,
    pub right: BoundMargin,
    pub bottom: BoundMargin,
    pub left: BoundMargin,
    /// Pixels of the panel that must stay inside the region on each axis.
    /// `None` keeps the whole panel inside across unbounded sides only.
    pub min_visible: Option<f64>,
}

impl Default for DragBounds {
    fn default() -> Self {
        Self {
            top: BoundMargin::FLUSH,
            right: BoundMargin::Unbounded,
            bottom: BoundMargin::Unbounded,
            left: BoundMargin::Unbounded,
            min_visible: None,
        }
    }
}

impl DragBounds {
    /// Flush with all four edges.
    #[must_use]
    pub fn flush() -> Self {
        Self {
            top: BoundMargin::FLUSH,
            right: BoundMargin::FLUSH,
            bottom: BoundMargin::FLUSH,
            left: BoundMargin::FLUSH,
            min_visible: None,
        }
    }

    #[must_use]
    pub fn with_min_visible(mut self, pixels: f64) -> Self {
        self.min_visible = Some(pixels);
        self
    }

    /// Allowed horizontal range for the panel's left edge.
    #[must_use]
    pub fn horizontal(&self, region: Size, panel: Size) -> AxisRange {
        AxisRange::compute(
            self.left,
            self.right,
            self.min_visible,
            region.width,
            panel.width,
        )
    }

    /// Allowed vertical range for the panel's top edge.
    #[must_use]
    pub fn vertical(&self, region: Size, panel: Size) -> AxisRange {
        AxisRange::compute(
            self.top,
            self.bottom,
            self.min_visible,
            region.height,
            panel.height,
        )
    }

    /// Clamp a desired top-left (region-relative) and round to pixels.
    #[must_use]
    pub fn clamp(&self, desired: Point, region: Size, panel: Size) -> Position {
        let left = self.horizontal(region, panel).clamp(desired.x);
        let top = self.vertical(region, panel).clamp(desired.y);
        Position::round(left, top)
    }
}

/// Allowed range for one coordinate of the panel's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub lo: f64,
    pub hi: f64,
}

impl AxisRange {
    /// Intersect the margin-derived range with the min-visible range.
    ///
    /// An explicit `min_visible` applies to both sides. Without one, a side
    /// with a finite margin is limited by that margin alone.
    #[must_use]
    pub fn compute(
        leading: BoundMargin,
        trailing: BoundMargin,
        min_visible: Option<f64>,
        region: f64,
        extent: f64,
    ) -> Self {
        let region = finite_or_zero(region);
        let extent = finite_or_zero(extent).max(0.0);
        let visible = min_visible
            .filter(|value| value.is_finite())
            .map(|value| value.clamp(0.0, extent));
        // Without an explicit minimum only unbounded sides keep the whole panel in.
        let keep = |margin: BoundMargin| visible.or(margin.px().is_none().then_some(extent));

        let margin_lo = leading.px().unwrap_or(f64::NEG_INFINITY);
        let margin_hi = trailing
            .px()
            .map_or(f64::INFINITY, |margin| region - extent - margin);
        let visible_lo = keep(leading).map_or(f64::NEG_INFINITY, |inside| inside - extent);
        let visible_hi = keep(trailing).map_or(f64::INFINITY, |inside| region - inside);

        Self {
            lo: margin_lo.max(visible_lo),
            hi: margin_hi.min(visible_hi),
        }
    }

    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.lo > self.hi
    }

    /// Clamp one coordinate into the range.
    #[must_use]
    pub fn clamp(&self, position: f64) -> f64 {
        let position = if position.is_finite() {
            position
        } else if self.lo.is_finite() {
            self.lo
        } else if self.hi.is_finite() {
            self.hi
        } else {
            0.0
        };
        if self.is_inverted() {
            position.min(self.hi)
        } else {
            position.max(self.lo).min(self.hi)
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Written panel offset in whole pixels, relative to the reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Position {
    pub left: i32,
    pub top: i32,
}

impl Position {
    #[must_use]
    pub const fn new(left: i32, top: i32) -> Self {
        Self { left, top }
    }

    /// Round to the nearest pixel; out-of-range values saturate.
    #[must_use]
    pub fn round(left: f64, top: f64) -> Self {
        Self {
            left: round_px(left),
            top: round_px(top),
        }
    }

    #[must_use]
    pub fn to_point(self) -> Point {
        Point::new(f64::from(self.left), f64::from(self.top))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn round_px(value: f64) -> i32 {
    // `as` saturates and maps NaN to 0.
    value.round() as i32
}

#[cfg(test)]
mod tests {
    use super::{AxisRange, BoundMargin, DragBounds, Position};
    use cobot_core::{Point, Size};

    #[test]
    fn infinite_margin_is_unbounded() {
        assert_eq!(BoundMargin::from(f64::INFINITY), BoundMargin::Unbounded);
        assert_eq!(BoundMargin::from(f64::NAN), BoundMargin::Unbounded);
        assert_eq!(BoundMargin::from(-12.0), BoundMargin::Px(-12.0));
        assert_eq!(BoundMargin::Px(f64::NEG_INFINITY).px(), None);
    }

    #[test]
    fn defaults_are_flush_top_only() {
        let bounds = DragBounds::default();
        assert_eq!(bounds.top, BoundMargin::FLUSH);
        assert_eq!(bounds.left, BoundMargin::Unbounded);
        assert_eq!(bounds.right, BoundMargin::Unbounded);
        assert_eq!(bounds.bottom, BoundMargin::Unbounded);
        assert_eq!(bounds.min_visible, None);
    }

    #[test]
    fn far_drag_clamps_to_right_and_bottom() {
        let bounds = DragBounds {
            left: BoundMargin::FLUSH,
            right: BoundMargin::FLUSH,
            top: BoundMargin::FLUSH,
            bottom: BoundMargin::Unbounded,
            min_visible: None,
        };
        let position = bounds.clamp(
            Point::new(1000.0, 1000.0),
            Size::new(500.0, 400.0),
            Size::new(200.0, 100.0),
        );
        assert_eq!(position, Position::new(300, 300));
    }

    #[test]
    fn positive_margin_insets_and_negative_margin_outsets() {
        let region = Size::new(500.0, 400.0);
        let panel = Size::new(100.0, 50.0);
        let mut inset = DragBounds::flush().with_min_visible(0.0);
        inset.left = BoundMargin::Px(10.0);
        inset.right = BoundMargin::Px(10.0);
        let range = inset.horizontal(region, panel);
        assert_eq!((range.lo, range.hi), (10.0, 390.0));

        let mut outset = DragBounds::flush().with_min_visible(0.0);
        outset.left = BoundMargin::Px(-30.0);
        outset.right = BoundMargin::Px(-30.0);
        let range = outset.horizontal(region, panel);
        assert_eq!((range.lo, range.hi), (-30.0, 430.0));
    }

    #[test]
    fn negative_margin_outsets_without_explicit_min_visible() {
        let bounds = DragBounds {
            left: BoundMargin::Px(-30.0),
            right: BoundMargin::Px(-30.0),
            ..DragBounds::flush()
        };
        let region = Size::new(500.0, 400.0);
        let panel = Size::new(200.0, 100.0);
        assert_eq!(
            bounds.clamp(Point::new(-1000.0, 0.0), region, panel),
            Position::new(-30, 0)
        );
        assert_eq!(
            bounds.clamp(Point::new(1000.0, 0.0), region, panel),
            Position::new(330, 0)
        );
    }

    #[test]
    fn explicit_min_visible_caps_negative_margin() {
        let bounds = DragBounds {
            left: BoundMargin::Px(-500.0),
            ..DragBounds::flush()
        }
        .with_min_visible(40.0);
        let range = bounds.horizontal(Size::new(500.0, 400.0), Size::new(200.0, 100.0));
        assert_eq!((range.lo, range.hi), (-160.0, 300.0));
    }

    #[test]
    fn min_visible_limits_unbounded_sides() {
        let bounds = DragBounds {
            left: BoundMargin::Unbounded,
            right: BoundMargin::Unbounded,
            ..DragBounds::default()
        }
        .with_min_visible(40.0);
        let range = bounds.horizontal(Size::new(500.0, 400.0), Size::new(200.0, 100.0));
        assert_eq!((range.lo, range.hi), (-160.0, 460.0));
        assert_eq!(range.clamp(-10_000.0), -160.0);
        assert_eq!(range.clamp(10_000.0), 460.0);
    }

    #[test]
    fn inverted_range_clamps_to_upper_bound_only() {
        let range = AxisRange::compute(
            BoundMargin::FLUSH,
            BoundMargin::FLUSH,
            None,
            100.0,
            250.0,
        );
        assert!(range.is_inverted());
        assert_eq!(range.clamp(40.0), -150.0);
        assert_eq!(range.clamp(-400.0), -400.0);
    }

    #[test]
    fn degenerate_inputs_never_produce_nan() {
        let range = AxisRange::compute(
            BoundMargin::Unbounded,
            BoundMargin::Unbounded,
            Some(f64::NAN),
            f64::NAN,
            f64::INFINITY,
        );
        let clamped = range.clamp(f64::NAN);
        assert!(clamped.is_finite());

        let zero = DragBounds::flush().clamp(
            Point::new(f64::INFINITY, -5.0),
            Size::new(0.0, -20.0),
            Size::new(0.0, 0.0),
        );
        assert_eq!(zero, Position::new(0, -20));
    }

    #[test]
    fn positions_round_to_nearest_pixel() {
        assert_eq!(Position::round(10.4, 10.6), Position::new(10, 11));
        assert_eq!(Position::round(-0.6, f64::NAN), Position::new(-1, 0));
        assert_eq!(Position::round(1e20, -1e20), Position::new(i32::MAX, i32::MIN));
    }

    #[test]
    fn margins_deserialize_from_numbers_and_null() {
        let bounds: DragBounds =
            serde_json::from_str(r#"{"left": -20, "bottom": null, "min_visible": 32}"#)
                .expect("bounds parse");
        assert_eq!(bounds.left, BoundMargin::Px(-20.0));
        assert_eq!(bounds.bottom, BoundMargin::Unbounded);
        assert_eq!(bounds.top, BoundMargin::FLUSH);
        assert_eq!(bounds.min_visible, Some(32.0));
    }
}
