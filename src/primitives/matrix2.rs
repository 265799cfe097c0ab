//! 2×2 linear map type.

use super::Vec2;
use crate::error::VisualError;
use num_traits::Float;
use std::ops::Mul;
use std::str::FromStr;

/// A linear map on the plane.
///
/// Stored in row-major order:
/// ```text
/// | a  b |
/// | c  d |
/// ```
///
/// The columns are the images of the standard basis: `(a, c)` is where
/// `i = (1, 0)` lands and `(b, d)` is where `j = (0, 1)` lands.
///
/// # Example
///
/// ```
/// use lintrans::primitives::{Matrix2, Vec2};
///
/// let shear: Matrix2<f64> = Matrix2::new(1.0, 1.0, 0.0, 1.0);
/// assert_eq!(shear.apply(Vec2::new(0.0, 1.0)), Vec2::new(1.0, 1.0));
/// assert_eq!(shear.determinant(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix2<F> {
    /// Row 0, column 0
    pub a: F,
    /// Row 0, column 1
    pub b: F,
    /// Row 1, column 0
    pub c: F,
    /// Row 1, column 1
    pub d: F,
}

impl<F: Float> Matrix2<F> {
    /// Creates a matrix from its entries in row-major order.
    #[inline]
    pub fn new(a: F, b: F, c: F, d: F) -> Self {
        Self { a, b, c, d }
    }

    /// The identity map.
    #[inline]
    pub fn identity() -> Self {
        Self::new(F::one(), F::zero(), F::zero(), F::one())
    }

    /// The map sending everything to the origin.
    #[inline]
    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero(), F::zero(), F::zero())
    }

    /// Creates a matrix from two rows.
    #[inline]
    pub fn from_rows(rows: [[F; 2]; 2]) -> Self {
        let [[a, b], [c, d]] = rows;
        Self::new(a, b, c, d)
    }

    /// Creates a matrix whose columns are the given basis images.
    #[inline]
    pub fn from_columns(i_image: Vec2<F>, j_image: Vec2<F>) -> Self {
        Self::new(i_image.x, j_image.x, i_image.y, j_image.y)
    }

    /// Creates a matrix from rows of arbitrary length, checking the shape.
    ///
    /// Fails with [`VisualError::InvalidMatrixShape`] unless there are exactly
    /// two rows of exactly two entries each, and with
    /// [`VisualError::NonFiniteMatrix`] if any entry is NaN or infinite.
    pub fn try_from_rows<R: AsRef<[F]>>(rows: &[R]) -> Result<Self, VisualError> {
        if rows.len() != 2 {
            let cols = rows.first().map_or(0, |r| r.as_ref().len());
            return Err(VisualError::InvalidMatrixShape {
                rows: rows.len(),
                cols,
            });
        }
        for row in rows {
            let row = row.as_ref();
            if row.len() != 2 {
                return Err(VisualError::InvalidMatrixShape {
                    rows: rows.len(),
                    cols: row.len(),
                });
            }
        }
        let (r0, r1) = (rows[0].as_ref(), rows[1].as_ref());
        Self::new(r0[0], r0[1], r1[0], r1[1]).checked_finite()
    }

    /// Returns the determinant `a·d − b·c`.
    ///
    /// - Positive: preserves orientation
    /// - Negative: flips orientation
    /// - Zero: collapses the plane onto a line (or onto the origin)
    #[inline]
    pub fn determinant(&self) -> F {
        self.a * self.d - self.b * self.c
    }

    /// Returns `true` when the determinant is exactly zero.
    #[inline]
    pub fn is_singular(&self) -> bool {
        self.determinant() == F::zero()
    }

    /// Returns `true` when every entry is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite() && self.d.is_finite()
    }

    fn checked_finite(self) -> Result<Self, VisualError> {
        if self.is_finite() {
            Ok(self)
        } else {
            Err(VisualError::NonFiniteMatrix)
        }
    }

    /// Applies the map to a vector.
    #[inline]
    pub fn apply(&self, v: Vec2<F>) -> Vec2<F> {
        Vec2::new(self.a * v.x + self.b * v.y, self.c * v.x + self.d * v.y)
    }

    /// Image of `i = (1, 0)`: the first column.
    #[inline]
    pub fn column_i(&self) -> Vec2<F> {
        Vec2::new(self.a, self.c)
    }

    /// Image of `j = (0, 1)`: the second column.
    #[inline]
    pub fn column_j(&self) -> Vec2<F> {
        Vec2::new(self.b, self.d)
    }

    /// Rows as nested arrays.
    #[inline]
    pub fn to_rows(&self) -> [[F; 2]; 2] {
        [[self.a, self.b], [self.c, self.d]]
    }
}

impl<F: Float + FromStr> Matrix2<F> {
    /// Parses four comma- or whitespace-separated entries in row-major order.
    ///
    /// ```
    /// use lintrans::primitives::Matrix2;
    ///
    /// let m: Matrix2<f64> = Matrix2::parse("2, 0, 0, 1").unwrap();
    /// assert_eq!(m, Matrix2::new(2.0, 0.0, 0.0, 1.0));
    /// assert!(Matrix2::<f64>::parse("1 2 3").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, VisualError> {
        let entries = s
            .split(|c: char| c == ',' || c.is_whitespace() || c == ';')
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<F>()
                    .map_err(|_| VisualError::InvalidNumber(t.to_string()))
            })
            .collect::<Result<Vec<F>, _>>()?;

        if entries.len() != 4 {
            return Err(VisualError::InvalidMatrixShape {
                rows: 1,
                cols: entries.len(),
            });
        }
        Self::new(entries[0], entries[1], entries[2], entries[3]).checked_finite()
    }
}

impl<F: Float> Default for Matrix2<F> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<F: Float> Mul<Vec2<F>> for Matrix2<F> {
    type Output = Vec2<F>;

    fn mul(self, rhs: Vec2<F>) -> Vec2<F> {
        self.apply(rhs)
    }
}

impl<F: Float> Mul for Matrix2<F> {
    type Output = Self;

    /// Composition: the result applies `rhs` first, then `self`.
    fn mul(self, rhs: Self) -> Self {
        Self::from_columns(self.apply(rhs.column_i()), self.apply(rhs.column_j()))
    }
}
