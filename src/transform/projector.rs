//! Images of the unit grid under a 2×2 matrix.
//!
//! The vertical grid lines `x = k` are all parallel to `j`, so their images are
//! parallel to `M·j`; likewise the horizontal lines `y = k` map to lines
//! parallel to `M·i`. Each family is described by one reference line through
//! the origin plus a spacing between neighbours, and is replicated until it
//! leaves the view window `[-size, size]²`.
//!
//! # Parametrization
//!
//! A family is drawn either as `y = slope·x` (spaced vertically) or as
//! `x = slope·y` (spaced horizontally), whichever keeps `|slope| <= 1`. This
//! avoids infinite slopes for steep image vectors and keeps the reference
//! segment inside a window of half-width `size` along its dominant axis.
//!
//! # Example
//!
//! ```
//! use lintrans::primitives::Matrix2;
//! use lintrans::transform::GridLineProjector;
//!
//! let projector = GridLineProjector::new(5.0).unwrap();
//! let grid = projector.project(&Matrix2::new(2.0, 0.0, 0.0, 1.0));
//!
//! let i_family = grid.first.unwrap();
//! assert_eq!(i_family.spacing, 1.0);
//! assert_eq!(i_family.repeats, 5);
//!
//! let j_family = grid.second.unwrap();
//! assert_eq!(j_family.spacing, 2.0);
//! assert_eq!(j_family.repeats, 2);
//! ```

use super::basis::Basis;
use crate::error::VisualError;
use crate::primitives::{Matrix2, Point2, Segment2, Vec2};
use num_traits::Float;

/// Upper bound on the number of parallel copies drawn on each side of a
/// reference line.
///
/// For nearly singular matrices the spacing can be tiny but non-zero; the cap
/// keeps generation finite at the cost of not always covering the window.
pub const MAX_REPEATS: usize = 50;

/// The coordinate a line family is parametrized by, and along which its
/// copies are spaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `y = slope·x`; copies are offset vertically.
    X,
    /// `x = slope·y`; copies are offset horizontally.
    Y,
}

/// How one image basis vector's line family is parametrized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parametrization<F> {
    /// `y = slope·x`, neighbouring lines `intercept` apart along y.
    ByX { slope: F, intercept: F },
    /// `x = slope·y`, neighbouring lines `intercept` apart along x.
    ByY { slope: F, intercept: F },
    /// The image vector is zero; no family is drawn.
    Absent,
}

impl<F: Float> Parametrization<F> {
    /// The axis the family is parametrized by, or `None` when absent.
    pub fn axis(&self) -> Option<Axis> {
        match self {
            Parametrization::ByX { .. } => Some(Axis::X),
            Parametrization::ByY { .. } => Some(Axis::Y),
            Parametrization::Absent => None,
        }
    }

    /// Returns `true` for [`Parametrization::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Parametrization::Absent)
    }
}

/// Chooses the parametrization for the line family through `image`.
///
/// `complement` is the image of the other basis vector: stepping one grid unit
/// along it moves from one line of the family to the next, so the family's
/// spacing is where `complement` lands on the spacing axis after sliding along
/// the reference line. That works out to `|det| / |dominant component|`.
///
/// `native` is the axis the original basis vector lies on. When `|x| == |y|`
/// the image keeps its native parametrization (`i` prefers [`Axis::X`], `j`
/// prefers [`Axis::Y`]).
pub fn parametrize<F: Float>(image: Vec2<F>, complement: Vec2<F>, native: Axis) -> Parametrization<F> {
    if image.is_zero() {
        return Parametrization::Absent;
    }

    let (ax, ay) = (image.x.abs(), image.y.abs());
    let by_x = match native {
        Axis::X => ax >= ay,
        Axis::Y => ax > ay,
    };

    if by_x {
        let slope = image.y / image.x;
        Parametrization::ByX {
            slope,
            intercept: (complement.y - complement.x * slope).abs(),
        }
    } else {
        let slope = image.x / image.y;
        Parametrization::ByY {
            slope,
            intercept: (complement.x - complement.y * slope).abs(),
        }
    }
}

/// Counts how many copies fit on each side of a reference line.
///
/// Copies are added while the lower end of the shifted reference segment
/// stays within `size`, up to [`MAX_REPEATS`]. A zero spacing means the
/// image is one-dimensional and nothing is repeated.
fn repeat_count<F: Float>(slope: F, spacing: F, size: F) -> usize {
    if spacing == F::zero() {
        return 0;
    }

    let low = -(slope.abs() * size);
    let mut offset = spacing;
    let mut count = 0;
    while count < MAX_REPEATS && low + offset <= size {
        count += 1;
        offset = offset + spacing;
    }
    count
}

/// One family of parallel transformed grid lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFamily<F> {
    /// Basis vector whose image the lines are parallel to.
    pub basis: Basis,
    /// Point the reference line passes through (always the origin).
    pub anchor: Point2<F>,
    /// Direction of every line in the family: the image basis vector.
    pub direction: Vec2<F>,
    /// Axis the family is parametrized by.
    pub axis: Axis,
    /// Slope relative to `axis` (`dy/dx` for [`Axis::X`], `dx/dy` for [`Axis::Y`]).
    pub slope: F,
    /// Distance between neighbouring lines, measured along the other axis.
    pub spacing: F,
    /// Copies on each side of the reference line.
    pub repeats: usize,
    /// View half-size the family was generated for.
    pub size: F,
}

impl<F: Float> LineFamily<F> {
    /// The reference line through the anchor, spanning `[-size, size]` along `axis`.
    pub fn reference(&self) -> Segment2<F> {
        let s = self.size;
        let along = self.slope * s;
        match self.axis {
            Axis::X => Segment2::new(
                self.anchor + Vec2::new(-s, -along),
                self.anchor + Vec2::new(s, along),
            ),
            Axis::Y => Segment2::new(
                self.anchor + Vec2::new(-along, -s),
                self.anchor + Vec2::new(along, s),
            ),
        }
    }

    /// Offset of the `k`-th copy (negative `k` for the other side).
    pub fn offset(&self, k: F) -> Vec2<F> {
        match self.axis {
            Axis::X => Vec2::new(F::zero(), k * self.spacing),
            Axis::Y => Vec2::new(k * self.spacing, F::zero()),
        }
    }

    /// The reference line followed by each copy pair `+k`, `-k`.
    pub fn segments(&self) -> Vec<Segment2<F>> {
        let reference = self.reference();
        let mut segments = Vec::with_capacity(1 + 2 * self.repeats);
        segments.push(reference);

        let mut k = F::zero();
        for _ in 0..self.repeats {
            k = k + F::one();
            segments.push(reference.translated(self.offset(k)));
            segments.push(reference.translated(self.offset(-k)));
        }
        segments
    }

    /// Total number of lines, reference included.
    pub fn line_count(&self) -> usize {
        1 + 2 * self.repeats
    }
}

/// Both transformed grid line families for one matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridProjection<F> {
    /// Lines parallel to the image of `i`, if that image is non-zero.
    pub first: Option<LineFamily<F>>,
    /// Lines parallel to the image of `j`, if that image is non-zero and not
    /// collinear with the first.
    pub second: Option<LineFamily<F>>,
    /// Determinant of the projected matrix.
    pub determinant: F,
    /// View half-size.
    pub size: F,
}

impl<F: Float> GridProjection<F> {
    /// Iterates over the families that are present.
    pub fn families(&self) -> impl Iterator<Item = &LineFamily<F>> {
        self.first.iter().chain(self.second.iter())
    }

    /// Number of families present (0, 1 or 2).
    pub fn family_count(&self) -> usize {
        self.families().count()
    }

    /// Returns `true` when the image of the plane is a line or a point.
    pub fn is_degenerate(&self) -> bool {
        self.determinant == F::zero()
    }
}

/// Computes transformed grid line families for a fixed view window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLineProjector<F> {
    size: F,
}

impl<F: Float> GridLineProjector<F> {
    /// Creates a projector for the window `[-size, size]²`.
    ///
    /// Fails with [`VisualError::InvalidViewSize`] unless `size` is positive
    /// and finite.
    pub fn new(size: F) -> Result<Self, VisualError> {
        if !(size.is_finite() && size > F::zero()) {
            return Err(VisualError::InvalidViewSize(
                size.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(Self { size })
    }

    /// View half-size.
    pub fn size(&self) -> F {
        self.size
    }

    /// Projects the unit grid through `matrix`.
    ///
    /// A zero column suppresses its family. For a singular matrix every
    /// spacing is zero and, when both images are non-zero, they span the
    /// same line, so only the first family is kept.
    pub fn project(&self, matrix: &Matrix2<F>) -> GridProjection<F> {
        let i_image = matrix.column_i();
        let j_image = matrix.column_j();
        let determinant = matrix.determinant();
        let singular = determinant == F::zero();

        let first = self.family(Basis::I, i_image, j_image, singular);
        let mut second = self.family(Basis::J, j_image, i_image, singular);

        if singular && first.is_some() && second.is_some() {
            log::trace!("collinear basis images, merging line families");
            second = None;
        }

        GridProjection {
            first,
            second,
            determinant,
            size: self.size,
        }
    }

    fn family(
        &self,
        basis: Basis,
        image: Vec2<F>,
        complement: Vec2<F>,
        singular: bool,
    ) -> Option<LineFamily<F>> {
        let (axis, slope, intercept) = match parametrize(image, complement, basis.axis()) {
            Parametrization::ByX { slope, intercept } => (Axis::X, slope, intercept),
            Parametrization::ByY { slope, intercept } => (Axis::Y, slope, intercept),
            Parametrization::Absent => {
                log::trace!("image of {} is zero, no line family", basis.name());
                return None;
            }
        };

        // Rounding can leave a tiny residue when the determinant is exactly zero.
        let spacing = if singular { F::zero() } else { intercept };
        let repeats = repeat_count(slope, spacing, self.size);

        log::trace!(
            "family {}: axis {:?}, {} repeat(s) each side",
            basis.name(),
            axis,
            repeats
        );

        Some(LineFamily {
            basis,
            anchor: Point2::origin(),
            direction: image,
            axis,
            slope,
            spacing,
            repeats,
            size: self.size,
        })
    }
}

/// Offsets of the untransformed unit grid lines inside `[-size, size]`,
/// excluding the axes themselves: `-n, …, -1, 1, …, n` with
/// `n = min(floor(size), MAX_REPEATS)`.
///
/// The background grid is capped like the transformed families, so a huge
/// view only shows the lines nearest the origin.
pub fn standard_grid_positions<F: Float>(size: F) -> Vec<F> {
    if !(size >= F::one()) {
        return Vec::new();
    }
    let n = size
        .floor()
        .to_usize()
        .map_or(MAX_REPEATS, |n| n.min(MAX_REPEATS));
    let mut positions = Vec::with_capacity(2 * n);
    for k in (1..=n).rev() {
        positions.push(-F::from(k).unwrap_or_else(F::zero));
    }
    for k in 1..=n {
        positions.push(F::from(k).unwrap_or_else(F::zero));
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn project(m: Matrix2<f64>, size: f64) -> GridProjection<f64> {
        GridLineProjector::new(size).unwrap().project(&m)
    }

    #[test]
    fn test_parametrize_zero_image() {
        let p = parametrize(Vec2::zero(), Vec2::new(1.0, 1.0), Axis::X);
        assert!(p.is_absent());
        assert_eq!(p.axis(), None);
    }

    #[test]
    fn test_parametrize_shallow_uses_x() {
        let p = parametrize(Vec2::new(2.0, 1.0), Vec2::new(0.0, 1.0), Axis::X);
        assert_eq!(
            p,
            Parametrization::ByX {
                slope: 0.5,
                intercept: 1.0
            }
        );
    }

    #[test]
    fn test_parametrize_steep_uses_y() {
        // i lands at (1, 3): steeper than 45°, parametrized by y.
        let p = parametrize(Vec2::new(1.0, 3.0), Vec2::new(1.0, 0.0), Axis::X);
        match p {
            Parametrization::ByY { slope, intercept } => {
                assert_relative_eq!(slope, 1.0 / 3.0, epsilon = 1e-12);
                // |det| / |3| with det = 1·0 − 1·3
                assert_relative_eq!(intercept, 1.0, epsilon = 1e-12);
            }
            other => panic!("expected ByY, got {other:?}"),
        }
    }

    #[test]
    fn test_parametrize_tie_prefers_native_axis() {
        let diag = Vec2::new(1.0, 1.0);
        let other = Vec2::new(-1.0, 1.0);
        assert_eq!(parametrize(diag, other, Axis::X).axis(), Some(Axis::X));
        assert_eq!(parametrize(diag, other, Axis::Y).axis(), Some(Axis::Y));
    }

    #[test]
    fn test_parametrize_vertical_image() {
        // Exactly vertical: x = 0·y, no infinite slope.
        let p = parametrize(Vec2::new(0.0, 2.0), Vec2::new(3.0, 0.0), Axis::X);
        assert_eq!(
            p,
            Parametrization::ByY {
                slope: 0.0,
                intercept: 3.0
            }
        );
    }

    #[test]
    fn test_near_vertical_stays_bounded() {
        let p = parametrize(Vec2::new(1e-12, 1.0), Vec2::new(1.0, 0.0), Axis::X);
        match p {
            Parametrization::ByY { slope, intercept } => {
                assert!(slope.abs() < 1e-11);
                assert_relative_eq!(intercept, 1.0, epsilon = 1e-9);
            }
            other => panic!("expected ByY, got {other:?}"),
        }
    }

    #[test]
    fn test_intercept_equals_det_over_dominant() {
        let m = Matrix2::new(3.0, 1.0, 1.0, 2.0);
        let det: f64 = m.determinant();
        let grid = project(m, 5.0);
        let first = grid.first.unwrap();
        let second = grid.second.unwrap();
        assert_relative_eq!(first.spacing, det.abs() / 3.0, epsilon = 1e-12);
        assert_relative_eq!(second.spacing, det.abs() / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_identity() {
        let grid = project(Matrix2::identity(), 5.0);
        assert_eq!(grid.family_count(), 2);

        let first = grid.first.unwrap();
        assert_eq!(first.axis, Axis::X);
        assert_eq!(first.slope, 0.0);
        assert_eq!(first.spacing, 1.0);
        assert_eq!(first.repeats, 5);
        assert_eq!(first.basis, Basis::I);

        let second = grid.second.unwrap();
        assert_eq!(second.axis, Axis::Y);
        assert_eq!(second.slope, 0.0);
        assert_eq!(second.spacing, 1.0);
        assert_eq!(second.repeats, 5);
        assert_eq!(second.basis, Basis::J);
    }

    #[test]
    fn test_identity_repeats_follow_floor_of_size() {
        for (size, expected) in [(1.0, 1), (2.5, 2), (7.0, 7), (0.5, 0)] {
            let grid = project(Matrix2::identity(), size);
            assert_eq!(grid.first.unwrap().repeats, expected, "size {size}");
            assert_eq!(grid.second.unwrap().repeats, expected, "size {size}");
        }
    }

    #[test]
    fn test_horizontal_stretch() {
        let grid = project(Matrix2::new(2.0, 0.0, 0.0, 1.0), 5.0);
        let first = grid.first.unwrap();
        assert_eq!(first.spacing, 1.0);
        assert!(first.repeats >= 4);
        let second = grid.second.unwrap();
        assert_eq!(second.spacing, 2.0);
        assert!(second.repeats >= 2);
    }

    #[test]
    fn test_zero_matrix_has_no_families() {
        let grid = project(Matrix2::zero(), 5.0);
        assert!(grid.first.is_none());
        assert!(grid.second.is_none());
        assert!(grid.is_degenerate());
    }

    #[test]
    fn test_one_zero_column_suppresses_only_that_family() {
        let grid = project(Matrix2::new(0.0, 1.0, 0.0, 1.0), 5.0);
        assert!(grid.first.is_none());
        let second = grid.second.unwrap();
        assert_eq!(second.repeats, 0);
        assert_eq!(second.line_count(), 1);
    }

    #[test]
    fn test_singular_merges_families() {
        let grid = project(Matrix2::new(1.0, 1.0, 0.0, 0.0), 5.0);
        assert!(grid.is_degenerate());
        assert_eq!(grid.family_count(), 1);

        let only = grid.first.unwrap();
        assert_eq!(only.spacing, 0.0);
        assert_eq!(only.repeats, 0);
        assert_eq!(only.segments().len(), 1);
    }

    #[test]
    fn test_singular_diagonal() {
        let grid = project(Matrix2::new(1.0, 2.0, 1.0, 2.0), 5.0);
        assert_eq!(grid.family_count(), 1);
        assert_eq!(grid.first.unwrap().repeats, 0);
    }

    #[test]
    fn test_near_singular_is_capped() {
        let grid = project(Matrix2::new(1.0, 1.0, 0.0, 1e-9), 5.0);
        for family in grid.families() {
            assert!(family.repeats <= MAX_REPEATS);
        }
        assert_eq!(grid.first.unwrap().repeats, MAX_REPEATS);
    }

    #[test]
    fn test_segments_span_window() {
        let family = project(Matrix2::identity(), 3.0).first.unwrap();
        let segments = family.segments();
        assert_eq!(segments.len(), 7);
        assert_eq!(segments[0], Segment2::from_coords(-3.0, 0.0, 3.0, 0.0));
        assert_eq!(segments[1], Segment2::from_coords(-3.0, 1.0, 3.0, 1.0));
        assert_eq!(segments[2], Segment2::from_coords(-3.0, -1.0, 3.0, -1.0));
        assert_eq!(segments[5], Segment2::from_coords(-3.0, 3.0, 3.0, 3.0));
    }

    #[test]
    fn test_sheared_copies_stop_outside_window() {
        // i -> (1, 1): lines y = x + k, lower end at -size.
        let grid = project(Matrix2::new(1.0, 0.0, 1.0, 1.0), 5.0);
        let family = grid.first.unwrap();
        assert_eq!(family.axis, Axis::X);
        assert_eq!(family.slope, 1.0);
        assert_eq!(family.spacing, 1.0);
        assert_eq!(family.repeats, 10);

        let last = family.reference().translated(family.offset(10.0));
        assert!(last.start.y.min(last.end.y) <= 5.0);
    }

    #[test]
    fn test_reference_follows_direction() {
        let family = project(Matrix2::new(1.0, 0.0, 3.0, 1.0), 2.0).first.unwrap();
        assert_eq!(family.axis, Axis::Y);
        let reference = family.reference();
        assert_relative_eq!(reference.direction().cross(family.direction), 0.0, epsilon = 1e-12);
        assert_eq!(reference.start.y, -2.0);
        assert_eq!(reference.end.y, 2.0);
    }

    #[test]
    fn test_deterministic() {
        let m = Matrix2::new(0.3, -1.7, 2.2, 0.9);
        assert_eq!(project(m, 4.0), project(m, 4.0));
    }

    #[test]
    fn test_invalid_size() {
        assert!(matches!(
            GridLineProjector::new(0.0),
            Err(VisualError::InvalidViewSize(_))
        ));
        assert!(GridLineProjector::new(-1.0).is_err());
        assert!(GridLineProjector::new(f64::NAN).is_err());
        assert!(GridLineProjector::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_standard_grid_positions() {
        assert_eq!(
            standard_grid_positions(3.0),
            vec![-3.0, -2.0, -1.0, 1.0, 2.0, 3.0]
        );
        assert_eq!(standard_grid_positions(2.5), vec![-2.0, -1.0, 1.0, 2.0]);
        assert!(standard_grid_positions(0.5).is_empty());
        assert!(standard_grid_positions(f64::NAN).is_empty());
    }

    #[test]
    fn test_standard_grid_positions_are_capped() {
        for size in [60.0, 1e8, 1e18, 1e300, f64::MAX] {
            let positions = standard_grid_positions(size);
            assert_eq!(positions.len(), 2 * MAX_REPEATS, "size {size}");
            assert_eq!(positions[0], -(MAX_REPEATS as f64));
            assert_eq!(positions[positions.len() - 1], MAX_REPEATS as f64);
        }
    }

    #[test]
    fn test_huge_view_projects() {
        let grid = project(Matrix2::new(1.0, 1.0, 0.0, 1.0), 1e18);
        assert_eq!(grid.family_count(), 2);
        for family in grid.families() {
            assert!(family.repeats <= MAX_REPEATS);
        }
    }
}
