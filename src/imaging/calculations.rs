//! Pure placement math for annotations.
//!
//! All functions here are pure and testable without any pixels.

use super::params::Point;
use super::raster::Dimensions;

/// Rectangle in the coordinate space of a target image.
///
/// `x`/`y` are signed: an overlay larger than its target starts off-canvas
/// and is clipped when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Whether pixel `(px, py)` falls inside the rectangle.
    #[cfg(test)]
    pub(crate) fn contains(&self, px: i64, py: i64) -> bool {
        px >= self.x
            && py >= self.y
            && px < self.x + i64::from(self.width)
            && py < self.y + i64::from(self.height)
    }

    /// The part of the rectangle that lands on a `target`-sized canvas, as
    /// `(x, y, width, height)`. `None` when nothing is visible.
    pub fn visible_in(&self, target: Dimensions) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (self.x + i64::from(self.width)).min(i64::from(target.width));
        let y1 = (self.y + i64::from(self.height)).min(i64::from(target.height));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }
}

/// Place a fixed `box_size` square logo on a target image.
///
/// Centered horizontally (rounded toward the left when the slack is odd),
/// with its bottom edge `bottom_margin` above the target's bottom edge. The
/// box never shrinks to fit the target.
///
/// # Examples
/// ```
/// # use markmaker::imaging::{Dimensions, logo_placement};
/// let p = logo_placement(Dimensions { width: 1000, height: 1000 }, 250, 50);
/// assert_eq!((p.x, p.y, p.width, p.height), (375, 700, 250, 250));
/// ```
pub fn logo_placement(target: Dimensions, box_size: u32, bottom_margin: u32) -> Placement {
    let slack = i64::from(target.width) - i64::from(box_size);
    Placement {
        x: slack.div_euclid(2),
        y: i64::from(target.height) - i64::from(box_size) - i64::from(bottom_margin),
        width: box_size,
        height: box_size,
    }
}

/// Top-left origin that centers a `content_width × content_height` box over
/// the target. Negative when the content is larger than the target.
pub fn centered_origin(target: Dimensions, content_width: f32, content_height: f32) -> Point {
    Point {
        x: (target.width as f32 - content_width) / 2.0,
        y: (target.height as f32 - content_height) / 2.0,
    }
}

/// Endpoints of the horizontal marker line: at half height, spanning the
/// `start..end` fraction of the width.
pub fn marker_segment(target: Dimensions, start: f32, end: f32) -> (Point, Point) {
    let y = target.height as f32 * 0.5;
    (
        Point::new(target.width as f32 * start, y),
        Point::new(target.width as f32 * end, y),
    )
}
