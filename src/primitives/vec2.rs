//! 2D vector type for directions, offsets and basis images.

use crate::error::VisualError;
use num_traits::Float;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

/// A 2D vector representing a direction or offset.
///
/// Generic over floating-point types (`f32` or `f64`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2<F> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    /// Creates a new vector.
    #[inline]
    pub fn new(x: F, y: F) -> Self {
        Self { x, y }
    }

    /// Creates a zero vector.
    #[inline]
    pub fn zero() -> Self {
        Self {
            x: F::zero(),
            y: F::zero(),
        }
    }

    /// The first standard basis vector, `i = (1, 0)`.
    #[inline]
    pub fn unit_x() -> Self {
        Self {
            x: F::one(),
            y: F::zero(),
        }
    }

    /// The second standard basis vector, `j = (0, 1)`.
    #[inline]
    pub fn unit_y() -> Self {
        Self {
            x: F::zero(),
            y: F::one(),
        }
    }

    /// Returns `true` when both components are exactly zero.
    ///
    /// No tolerance is applied: a vector with a component of `1e-300` is not zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == F::zero() && self.y == F::zero()
    }

    /// Returns `true` when both components are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Computes the dot product with another vector.
    #[inline]
    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y
    }

    /// Computes the 2D cross product (perpendicular dot product).
    ///
    /// Zero when the two vectors are collinear.
    #[inline]
    pub fn cross(self, other: Self) -> F {
        self.x * other.y - self.y * other.x
    }

    /// Returns the squared magnitude (length squared).
    #[inline]
    pub fn magnitude_squared(self) -> F {
        self.dot(self)
    }

    /// Returns the magnitude (length) of the vector.
    #[inline]
    pub fn magnitude(self) -> F {
        self.magnitude_squared().sqrt()
    }

    /// Returns a normalized (unit length) vector.
    ///
    /// Returns `None` if the vector is zero or too small to normalize reliably.
    #[inline]
    pub fn normalize(self) -> Option<Self> {
        let mag = self.magnitude();
        if mag > F::epsilon() {
            Some(self / mag)
        } else {
            None
        }
    }
}

impl<F: Float + FromStr> Vec2<F> {
    /// Parses two comma- or whitespace-separated components.
    ///
    /// ```
    /// use lintrans::primitives::Vec2;
    ///
    /// assert_eq!(Vec2::<f64>::parse("1.5, -2").unwrap(), Vec2::new(1.5, -2.0));
    /// assert!(Vec2::<f64>::parse("1").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, VisualError> {
        let components = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<F>()
                    .map_err(|_| VisualError::InvalidNumber(t.to_string()))
            })
            .collect::<Result<Vec<F>, _>>()?;

        match components.as_slice() {
            [x, y] => Ok(Self::new(*x, *y)),
            _ => Err(VisualError::InvalidVector(format!(
                "expected 2 components in '{s}', got {}",
                components.len()
            ))),
        }
    }
}

impl<F: Float> From<[F; 2]> for Vec2<F> {
    fn from([x, y]: [F; 2]) -> Self {
        Self::new(x, y)
    }
}

impl<F: Float> From<(F, F)> for Vec2<F> {
    fn from((x, y): (F, F)) -> Self {
        Self::new(x, y)
    }
}

impl<F: Float> Add for Vec2<F> {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl<F: Float> Sub for Vec2<F> {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl<F: Float> Mul<F> for Vec2<F> {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: F) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl<F: Float> Div<F> for Vec2<F> {
    type Output = Self;

    #[inline]
    fn div(self, scalar: F) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl<F: Float> Neg for Vec2<F> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl<F: Float> Default for Vec2<F> {
    fn default() -> Self {
        Self::zero()
    }
}
