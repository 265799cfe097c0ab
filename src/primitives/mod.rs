//! Floating-point geometric primitives.

mod matrix2;
mod point2;
mod segment2;
mod vec2;

pub use matrix2::Matrix2;
pub use point2::Point2;
pub use segment2::Segment2;
pub use vec2::Vec2;
