//! Drawing collaborator interface.
//!
//! The session never draws pixels itself; it hands lines and vectors to a
//! [`Renderer`] and keeps the returned [`ArtistHandle`]s so it can take them
//! back off the figure later. [`SvgRenderer`] is the bundled backend.

mod svg;

pub use svg::{Artist, SvgRenderer};

use crate::primitives::{Point2, Vec2};

/// Identifies a figure created by [`Renderer::new_figure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FigureHandle(pub u64);

/// Identifies one drawn element so it can be removed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtistHandle(pub u64);

/// The two side-by-side panels of a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Left: the untransformed plane.
    Original,
    /// Right: the plane after the matrix is applied.
    Transformed,
}

impl Panel {
    /// Both panels, left to right.
    pub const ALL: [Panel; 2] = [Panel::Original, Panel::Transformed];

    /// Position from the left.
    pub fn index(self) -> usize {
        match self {
            Panel::Original => 0,
            Panel::Transformed => 1,
        }
    }
}

/// Stroke for a straight line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Gray level, `0.0` black to `1.0` white.
    pub gray: f64,
    /// Stroke width in pixels.
    pub width: f64,
}

impl LineStyle {
    /// Coordinate axes on the left panel.
    pub const BASE_AXIS: LineStyle = LineStyle { gray: 0.4, width: 1.5 };
    /// Unit grid on the left panel.
    pub const BASE_GRID: LineStyle = LineStyle { gray: 0.7, width: 1.0 };
    /// Coordinate axes behind the transformed grid.
    pub const FAINT_AXIS: LineStyle = LineStyle { gray: 0.8, width: 1.5 };
    /// Unit grid behind the transformed grid.
    pub const FAINT_GRID: LineStyle = LineStyle { gray: 0.9, width: 1.0 };
    /// Transformed line through the origin.
    pub const REFERENCE: LineStyle = LineStyle { gray: 0.4, width: 1.5 };
    /// Transformed copies of the reference line.
    pub const REPEAT: LineStyle = LineStyle { gray: 0.7, width: 1.0 };
}

/// How a vector's label is placed and emphasized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// Basis name (`i`, `j`): bold italic, in the vector's color.
    Basis,
    /// Coordinates such as `(1, 2)`: plain text.
    Coordinates,
}

/// Appearance of a vector arrow and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorStyle {
    /// Any SVG/CSS color.
    pub color: String,
    pub label: String,
    pub label_kind: LabelKind,
}

/// A drawing backend.
///
/// Handles are only meaningful to the renderer that issued them. Removing a
/// handle that is no longer drawn must be a no-op.
pub trait Renderer {
    /// Starts a new figure with `panels` panels, each showing `[-extent, extent]²`.
    ///
    /// Elements of the previous figure are discarded.
    fn new_figure(&mut self, panels: usize, extent: f64) -> FigureHandle;

    /// Draws the segment from `anchor` to `anchor + direction`.
    fn draw_line(
        &mut self,
        panel: Panel,
        anchor: Point2<f64>,
        direction: Vec2<f64>,
        style: &LineStyle,
    ) -> ArtistHandle;

    /// Draws an arrow from `origin` to `origin + vector` with a label at its tip.
    ///
    /// A zero `vector` is drawn as a dot.
    fn draw_vector(
        &mut self,
        panel: Panel,
        origin: Point2<f64>,
        vector: Vec2<f64>,
        style: &VectorStyle,
    ) -> ArtistHandle;

    /// Takes a previously drawn element off the figure.
    fn remove_drawn(&mut self, handle: ArtistHandle);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn new_figure(&mut self, panels: usize, extent: f64) -> FigureHandle {
        (**self).new_figure(panels, extent)
    }

    fn draw_line(
        &mut self,
        panel: Panel,
        anchor: Point2<f64>,
        direction: Vec2<f64>,
        style: &LineStyle,
    ) -> ArtistHandle {
        (**self).draw_line(panel, anchor, direction, style)
    }

    fn draw_vector(
        &mut self,
        panel: Panel,
        origin: Point2<f64>,
        vector: Vec2<f64>,
        style: &VectorStyle,
    ) -> ArtistHandle {
        (**self).draw_vector(panel, origin, vector, style)
    }

    fn remove_drawn(&mut self, handle: ArtistHandle) {
        (**self).remove_drawn(handle)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn new_figure(&mut self, panels: usize, extent: f64) -> FigureHandle {
        (**self).new_figure(panels, extent)
    }

    fn draw_line(
        &mut self,
        panel: Panel,
        anchor: Point2<f64>,
        direction: Vec2<f64>,
        style: &LineStyle,
    ) -> ArtistHandle {
        (**self).draw_line(panel, anchor, direction, style)
    }

    fn draw_vector(
        &mut self,
        panel: Panel,
        origin: Point2<f64>,
        vector: Vec2<f64>,
        style: &VectorStyle,
    ) -> ArtistHandle {
        (**self).draw_vector(panel, origin, vector, style)
    }

    fn remove_drawn(&mut self, handle: ArtistHandle) {
        (**self).remove_drawn(handle)
    }
}
