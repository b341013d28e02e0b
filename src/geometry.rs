use serde::{Deserialize, Serialize};

/// Rectangle in screen coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> i64 {
        i64::from(self.x)
    }

    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    pub fn top(&self) -> i64 {
        i64::from(self.y)
    }

    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Area shared by both rectangles (0 when disjoint)
    pub fn intersection_area(&self, other: &Rect) -> u64 {
        let w = self.right().min(other.right()) - self.left().max(other.left());
        let h = self.bottom().min(other.bottom()) - self.top().max(other.top());
        if w <= 0 || h <= 0 {
            return 0;
        }
        (w as u64) * (h as u64)
    }

    /// Squared distance from this rectangle's center to the closest point of `other`
    fn distance_sq_to(&self, other: &Rect) -> i64 {
        let cx = self.left() + i64::from(self.width) / 2;
        let cy = self.top() + i64::from(self.height) / 2;
        let dx = (other.left() - cx).max(0).max(cx - other.right());
        let dy = (other.top() - cy).max(0).max(cy - other.bottom());
        dx * dx + dy * dy
    }
}

/// Pick the display a rectangle belongs to
///
/// The display with the largest overlap wins. If the rectangle is entirely
/// off-screen, the nearest display is used instead.
pub fn display_matching(displays: &[Rect], rect: &Rect) -> Option<Rect> {
    let overlapping = displays
        .iter()
        .map(|d| (d, rect.intersection_area(d)))
        .filter(|(_, area)| *area > 0)
        .max_by_key(|(_, area)| *area)
        .map(|(d, _)| *d);

    overlapping.or_else(|| displays.iter().min_by_key(|d| rect.distance_sq_to(d)).copied())
}
