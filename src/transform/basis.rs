//! Images of the standard basis and of user vectors.

use super::projector::Axis;
use crate::primitives::{Matrix2, Vec2};
use num_traits::Float;

/// One of the two standard basis vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Basis {
    /// `i = (1, 0)`
    I,
    /// `j = (0, 1)`
    J,
}

impl Basis {
    /// Both basis vectors, `i` first.
    pub const ALL: [Basis; 2] = [Basis::I, Basis::J];

    /// Short label drawn next to the vector.
    pub fn name(self) -> &'static str {
        match self {
            Basis::I => "i",
            Basis::J => "j",
        }
    }

    /// The axis the untransformed vector lies on.
    pub fn axis(self) -> Axis {
        match self {
            Basis::I => Axis::X,
            Basis::J => Axis::Y,
        }
    }

    /// The untransformed unit vector.
    pub fn unit<F: Float>(self) -> Vec2<F> {
        match self {
            Basis::I => Vec2::unit_x(),
            Basis::J => Vec2::unit_y(),
        }
    }
}

/// How a mapped vector should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorKind {
    /// Both coordinates are exactly zero; drawn as a dot.
    Zero,
    /// Anything else; drawn as an arrow.
    General,
}

/// A vector together with its drawing classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorDescriptor<F> {
    pub coords: Vec2<F>,
    pub kind: VectorKind,
}

impl<F: Float> VectorDescriptor<F> {
    /// Classifies `coords`.
    pub fn new(coords: Vec2<F>) -> Self {
        let kind = if coords.is_zero() {
            VectorKind::Zero
        } else {
            VectorKind::General
        };
        Self { coords, kind }
    }

    /// Returns `true` for [`VectorKind::Zero`].
    pub fn is_zero(&self) -> bool {
        self.kind == VectorKind::Zero
    }

    /// Coordinate label such as `(2, 0.5)`.
    pub fn label(&self) -> String {
        format_label(self.coords)
    }
}

/// Images of `i` and `j`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasisImages<F> {
    pub i: VectorDescriptor<F>,
    pub j: VectorDescriptor<F>,
}

impl<F: Float> BasisImages<F> {
    /// The image of `basis`.
    pub fn get(&self, basis: Basis) -> &VectorDescriptor<F> {
        match basis {
            Basis::I => &self.i,
            Basis::J => &self.j,
        }
    }

    /// Returns `true` when the two images lie on a common line through the
    /// origin, i.e. `|i × j| <= tolerance`.
    pub fn are_collinear(&self, tolerance: F) -> bool {
        self.i.coords.cross(self.j.coords).abs() <= tolerance
    }
}

/// One or more vectors to push through a matrix.
///
/// A single vector is treated as a one-element sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorInput<F> {
    Single(Vec2<F>),
    Many(Vec<Vec2<F>>),
}

impl<F: Float> VectorInput<F> {
    /// The vectors in order.
    pub fn into_vec(self) -> Vec<Vec2<F>> {
        match self {
            VectorInput::Single(v) => vec![v],
            VectorInput::Many(vs) => vs,
        }
    }

    /// Number of vectors.
    pub fn len(&self) -> usize {
        match self {
            VectorInput::Single(_) => 1,
            VectorInput::Many(vs) => vs.len(),
        }
    }

    /// Returns `true` if there are no vectors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<F: Float> From<Vec2<F>> for VectorInput<F> {
    fn from(v: Vec2<F>) -> Self {
        VectorInput::Single(v)
    }
}

impl<F: Float> From<[F; 2]> for VectorInput<F> {
    fn from(v: [F; 2]) -> Self {
        VectorInput::Single(v.into())
    }
}

impl<F: Float> From<(F, F)> for VectorInput<F> {
    fn from(v: (F, F)) -> Self {
        VectorInput::Single(v.into())
    }
}

impl<F: Float> From<Vec<Vec2<F>>> for VectorInput<F> {
    fn from(vs: Vec<Vec2<F>>) -> Self {
        VectorInput::Many(vs)
    }
}

impl<F: Float> From<&[Vec2<F>]> for VectorInput<F> {
    fn from(vs: &[Vec2<F>]) -> Self {
        VectorInput::Many(vs.to_vec())
    }
}

impl<F: Float> From<Vec<[F; 2]>> for VectorInput<F> {
    fn from(vs: Vec<[F; 2]>) -> Self {
        VectorInput::Many(vs.into_iter().map(Vec2::from).collect())
    }
}

impl<F: Float> From<&[[F; 2]]> for VectorInput<F> {
    fn from(vs: &[[F; 2]]) -> Self {
        VectorInput::Many(vs.iter().copied().map(Vec2::from).collect())
    }
}

/// Maps `i` and `j` through `matrix`.
///
/// ```
/// use lintrans::primitives::Matrix2;
/// use lintrans::transform::{map_basis, VectorKind};
///
/// let images = map_basis(&Matrix2::new(1.0, 1.0, 0.0, 0.0));
/// assert_eq!(images.i.label(), "(1, 0)");
/// assert_eq!(images.j.label(), "(1, 0)");
/// assert_eq!(images.j.kind, VectorKind::General);
/// assert!(images.are_collinear(1e-12));
/// ```
pub fn map_basis<F: Float>(matrix: &Matrix2<F>) -> BasisImages<F> {
    BasisImages {
        i: VectorDescriptor::new(matrix.apply(Basis::I.unit())),
        j: VectorDescriptor::new(matrix.apply(Basis::J.unit())),
    }
}

/// Maps caller-supplied vectors through `matrix`, preserving order.
pub fn map_user<F: Float>(
    matrix: &Matrix2<F>,
    vectors: impl Into<VectorInput<F>>,
) -> Vec<VectorDescriptor<F>> {
    vectors
        .into()
        .into_vec()
        .into_iter()
        .map(|v| VectorDescriptor::new(matrix.apply(v)))
        .collect()
}

/// Formats one coordinate for a label.
///
/// Integral values print without a fractional part; anything else is rounded
/// to two decimals, with exact ties going to the even digit (`0.125` prints
/// as `0.12`). A value that only becomes integral through rounding keeps
/// one decimal (`1.001` prints as `1.0`).
pub fn format_coordinate(x: f64) -> String {
    if x == 0.0 {
        return "0".to_string();
    }
    if x.fract() == 0.0 {
        return format!("{x:.0}");
    }
    let rounded = (x * 100.0).round_ties_even() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        format!("{rounded}")
    }
}

/// Formats a vector as `(x, y)` using [`format_coordinate`].
pub fn format_label<F: Float>(v: Vec2<F>) -> String {
    let x = v.x.to_f64().unwrap_or(f64::NAN);
    let y = v.y.to_f64().unwrap_or(f64::NAN);
    format!("({}, {})", format_coordinate(x), format_coordinate(y))
}
