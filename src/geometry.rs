//! # Geometry
//!
//! Points and rectangles in page coordinates (points, 1/72 inch), with the
//! y axis growing downward from the paper's top edge.

use serde::Serialize;

/// A layout cursor: where the next piece of content starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub x_left: f64,
    pub y_top: f64,
}

impl Point {
    pub fn new(x_left: f64, y_top: f64) -> Self {
        Self { x_left, y_top }
    }
}

/// An axis-aligned rectangle. `x_left <= x_right` and `y_top <= y_bot`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub x_left: f64,
    pub x_right: f64,
    pub y_top: f64,
    pub y_bot: f64,
}

impl Rect {
    pub fn new(x_left: f64, x_right: f64, y_top: f64, y_bot: f64) -> Self {
        Self {
            x_left,
            x_right,
            y_top,
            y_bot,
        }
    }

    /// A rectangle anchored at `point` with the given size.
    pub fn at(point: Point, width: f64, height: f64) -> Self {
        Self::new(
            point.x_left,
            point.x_left + width.max(0.0),
            point.y_top,
            point.y_top + height.max(0.0),
        )
    }

    /// A zero-size rectangle sitting on `point`.
    pub fn empty_at(point: Point) -> Self {
        Self::at(point, 0.0, 0.0)
    }

    pub fn width(&self) -> f64 {
        self.x_right - self.x_left
    }

    pub fn height(&self) -> f64 {
        self.y_bot - self.y_top
    }

    /// Smallest rectangle enclosing both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x_left: self.x_left.min(other.x_left),
            x_right: self.x_right.max(other.x_right),
            y_top: self.y_top.min(other.y_top),
            y_bot: self.y_bot.max(other.y_bot),
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            x_left: self.x_left + dx,
            x_right: self.x_right + dx,
            y_top: self.y_top + dy,
            y_bot: self.y_bot + dy,
        }
    }

    /// The point directly below the rectangle's left edge.
    pub fn bottom_left(&self) -> Point {
        Point::new(self.x_left, self.y_bot)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x_left, self.y_top)
    }
}

/// Union of all rectangles, or `None` for an empty input.
pub fn merge_rects<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
    rects.into_iter().fold(None, |acc: Option<Rect>, r| match acc {
        Some(a) => Some(a.union(r)),
        None => Some(*r),
    })
}

/// A rectangle tagged with the physical page it was placed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub rect: Rect,
    pub page: usize,
}

impl Fragment {
    pub fn new(rect: Rect, page: usize) -> Self {
        Self { rect, page }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_encloses_both() {
        let a = Rect::new(10.0, 20.0, 5.0, 15.0);
        let b = Rect::new(0.0, 12.0, 10.0, 30.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 20.0, 5.0, 30.0));
    }

    #[test]
    fn merge_of_nothing_is_none() {
        assert!(merge_rects(std::iter::empty()).is_none());
        let rects = [Rect::new(1.0, 2.0, 3.0, 4.0), Rect::new(0.0, 1.0, 5.0, 9.0)];
        assert_eq!(merge_rects(&rects), Some(Rect::new(0.0, 2.0, 3.0, 9.0)));
    }

    #[test]
    fn negative_sizes_clamp_to_zero() {
        let r = Rect::at(Point::new(4.0, 4.0), -3.0, 2.0);
        assert_eq!(r.width(), 0.0);
        assert_eq!(r.height(), 2.0);
    }
}
