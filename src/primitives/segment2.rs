//! 2D line segment type.

use super::{Point2, Vec2};
use num_traits::Float;

/// A 2D line segment defined by two endpoints.
///
/// Grid lines are infinite in principle; they are carried around as segments
/// long enough to cross the whole view window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2<F> {
    pub start: Point2<F>,
    pub end: Point2<F>,
}

impl<F: Float> Segment2<F> {
    /// Creates a new segment from two points.
    #[inline]
    pub fn new(start: Point2<F>, end: Point2<F>) -> Self {
        Self { start, end }
    }

    /// Creates a segment from coordinate pairs.
    #[inline]
    pub fn from_coords(x1: F, y1: F, x2: F, y2: F) -> Self {
        Self {
            start: Point2::new(x1, y1),
            end: Point2::new(x2, y2),
        }
    }

    /// Returns the direction vector from start to end.
    #[inline]
    pub fn direction(self) -> Vec2<F> {
        self.end - self.start
    }

    /// Returns the segment shifted by `offset`.
    #[inline]
    pub fn translated(self, offset: Vec2<F>) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}
