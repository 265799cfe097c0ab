//! Stateful driver tying the geometry to a renderer.
//!
//! A [`TransformationSession`] owns the current matrix and the handles of
//! everything it has drawn that may need to come off the figure again: the
//! basis markers and the user vectors. Grid lines live as long as the figure
//! and are replaced wholesale by the next [`fit`](TransformationSession::fit).
//!
//! # Example
//!
//! ```
//! use lintrans::primitives::{Matrix2, Vec2};
//! use lintrans::render::SvgRenderer;
//! use lintrans::session::TransformationSession;
//!
//! let mut session = TransformationSession::new(SvgRenderer::new());
//! session.fit(Matrix2::new(2.0, 0.0, 0.0, 1.0), 5.0).unwrap();
//!
//! let images = session.transform(Vec2::new(1.0, 2.0)).unwrap();
//! assert_eq!(images[0].coords, Vec2::new(2.0, 2.0));
//! assert_eq!(session.vector_marker_count(), 2);
//!
//! session.clear_vectors();
//! assert_eq!(session.vector_marker_count(), 0);
//! assert_eq!(session.basis_marker_count(), 4);
//! ```

use crate::config::VisualizerConfig;
use crate::error::VisualError;
use crate::primitives::{Matrix2, Point2, Vec2};
use crate::render::{ArtistHandle, LabelKind, LineStyle, Panel, Renderer, VectorStyle};
use crate::transform::{
    format_label, map_basis, map_user, standard_grid_positions, Basis, BasisImages,
    GridLineProjector, GridProjection, VectorDescriptor, VectorInput,
};

/// Everything derived from one `fit` call.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fitted {
    matrix: Matrix2<f64>,
    projection: GridProjection<f64>,
    basis: BasisImages<f64>,
}

/// Before/after view of one matrix, drawn through a [`Renderer`].
///
/// Not meant for concurrent use; calls must be serialized by the owner.
#[derive(Debug)]
pub struct TransformationSession<R> {
    renderer: R,
    config: VisualizerConfig,
    fitted: Option<Fitted>,
    basis_markers: Vec<ArtistHandle>,
    vector_markers: Vec<ArtistHandle>,
}

impl<R: Renderer> TransformationSession<R> {
    /// Creates an unfitted session with default settings.
    pub fn new(renderer: R) -> Self {
        Self::with_config(renderer, VisualizerConfig::default())
    }

    /// Creates an unfitted session with the given settings.
    pub fn with_config(renderer: R, config: VisualizerConfig) -> Self {
        Self {
            renderer,
            config,
            fitted: None,
            basis_markers: Vec::new(),
            vector_markers: Vec::new(),
        }
    }

    /// Fits `matrix` with the configured default view size.
    pub fn fit_default(&mut self, matrix: Matrix2<f64>) -> Result<(), VisualError> {
        self.fit(matrix, self.config.default_size)
    }

    /// Replaces the matrix and view, then redraws everything.
    ///
    /// The new figure shows the unit grid on both panels, the transformed grid
    /// on the right and fresh basis markers. User vectors from earlier calls
    /// are removed. On error the session is left exactly as it was.
    pub fn fit(&mut self, matrix: Matrix2<f64>, size: f64) -> Result<(), VisualError> {
        if !matrix.is_finite() {
            return Err(VisualError::NonFiniteMatrix);
        }
        let projection = GridLineProjector::new(size)?.project(&matrix);
        let basis = map_basis(&matrix);

        log::debug!(
            "fit {:?} (det {}), size {}, {} line families",
            matrix.to_rows(),
            projection.determinant,
            size,
            projection.family_count()
        );

        self.remove_basis();
        self.clear_vectors();

        self.renderer.new_figure(Panel::ALL.len(), size);
        self.draw_unit_grid(size);
        self.draw_projection(&projection);

        self.fitted = Some(Fitted {
            matrix,
            projection,
            basis,
        });
        self.plot_basis()
    }

    /// Maps `vectors` through the current matrix and draws them.
    ///
    /// Originals go on the left panel, images on the right, in matching
    /// colors. Earlier vectors stay on the figure. Returns the images.
    pub fn transform(
        &mut self,
        vectors: impl Into<VectorInput<f64>>,
    ) -> Result<Vec<VectorDescriptor<f64>>, VisualError> {
        let matrix = self
            .fitted
            .as_ref()
            .ok_or(VisualError::InvalidState("transform called before fit"))?
            .matrix;

        let originals = vectors.into().into_vec();
        if let Some(bad) = originals.iter().find(|v| !v.is_finite()) {
            return Err(VisualError::InvalidVector(format!(
                "non-finite coordinates ({}, {})",
                bad.x, bad.y
            )));
        }

        let images = map_user(&matrix, originals.as_slice());
        log::debug!("transform {} vector(s)", images.len());

        let originals: Vec<VectorDescriptor<f64>> =
            originals.into_iter().map(VectorDescriptor::new).collect();
        self.draw_user_vectors(Panel::Original, &originals);
        self.draw_user_vectors(Panel::Transformed, &images);

        Ok(images)
    }

    /// Removes every user vector drawn so far. Basis markers stay.
    pub fn clear_vectors(&mut self) {
        for handle in self.vector_markers.drain(..) {
            self.renderer.remove_drawn(handle);
        }
    }

    /// Draws `i`, `j` and their images, unless they are already drawn.
    pub fn plot_basis(&mut self) -> Result<(), VisualError> {
        let basis = self
            .fitted
            .as_ref()
            .ok_or(VisualError::InvalidState("plot_basis called before fit"))?
            .basis;

        if !self.basis_markers.is_empty() {
            return Ok(());
        }

        for b in Basis::ALL {
            let style = self.basis_style(b);
            let handle =
                self.renderer
                    .draw_vector(Panel::Original, Point2::origin(), b.unit(), &style);
            self.basis_markers.push(handle);
        }
        for b in Basis::ALL {
            let style = self.basis_style(b);
            let handle = self.renderer.draw_vector(
                Panel::Transformed,
                Point2::origin(),
                basis.get(b).coords,
                &style,
            );
            self.basis_markers.push(handle);
        }
        Ok(())
    }

    /// Removes the basis markers, if any.
    pub fn remove_basis(&mut self) {
        for handle in self.basis_markers.drain(..) {
            self.renderer.remove_drawn(handle);
        }
    }

    /// Returns `true` once `fit` has succeeded.
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// The current matrix.
    pub fn matrix(&self) -> Option<&Matrix2<f64>> {
        self.fitted.as_ref().map(|f| &f.matrix)
    }

    /// The current view half-size.
    pub fn size(&self) -> Option<f64> {
        self.fitted.as_ref().map(|f| f.projection.size)
    }

    /// Grid line families of the current matrix.
    pub fn projection(&self) -> Option<&GridProjection<f64>> {
        self.fitted.as_ref().map(|f| &f.projection)
    }

    /// Images of the basis under the current matrix.
    pub fn basis_images(&self) -> Option<&BasisImages<f64>> {
        self.fitted.as_ref().map(|f| &f.basis)
    }

    /// Number of live basis markers (four when drawn: two per panel).
    pub fn basis_marker_count(&self) -> usize {
        self.basis_markers.len()
    }

    /// Number of live user-vector markers (two per transformed vector).
    pub fn vector_marker_count(&self) -> usize {
        self.vector_markers.len()
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn basis_style(&self, basis: Basis) -> VectorStyle {
        let color = match basis {
            Basis::I => &self.config.basis_colors[0],
            Basis::J => &self.config.basis_colors[1],
        };
        VectorStyle {
            color: color.clone(),
            label: basis.name().to_string(),
            label_kind: LabelKind::Basis,
        }
    }

    fn draw_unit_grid(&mut self, size: f64) {
        let positions = standard_grid_positions(size);
        let across = 2.0 * size;

        for panel in Panel::ALL {
            let (grid, axis) = match panel {
                Panel::Original => (LineStyle::BASE_GRID, LineStyle::BASE_AXIS),
                Panel::Transformed => (LineStyle::FAINT_GRID, LineStyle::FAINT_AXIS),
            };
            for &p in &positions {
                self.renderer
                    .draw_line(panel, Point2::new(-size, p), Vec2::new(across, 0.0), &grid);
                self.renderer
                    .draw_line(panel, Point2::new(p, -size), Vec2::new(0.0, across), &grid);
            }
            self.renderer
                .draw_line(panel, Point2::new(-size, 0.0), Vec2::new(across, 0.0), &axis);
            self.renderer
                .draw_line(panel, Point2::new(0.0, -size), Vec2::new(0.0, across), &axis);
        }
    }

    fn draw_projection(&mut self, projection: &GridProjection<f64>) {
        for family in projection.families() {
            for (n, segment) in family.segments().into_iter().enumerate() {
                let style = if n == 0 {
                    LineStyle::REFERENCE
                } else {
                    LineStyle::REPEAT
                };
                self.renderer.draw_line(
                    Panel::Transformed,
                    segment.start,
                    segment.direction(),
                    &style,
                );
            }
        }
    }

    fn draw_user_vectors(&mut self, panel: Panel, vectors: &[VectorDescriptor<f64>]) {
        for (n, v) in vectors.iter().enumerate() {
            let style = VectorStyle {
                color: self.config.palette_color(n).to_string(),
                label: format_label(v.coords),
                label_kind: LabelKind::Coordinates,
            };
            let handle = self
                .renderer
                .draw_vector(panel, Point2::origin(), v.coords, &style);
            self.vector_markers.push(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Artist, SvgRenderer};

    fn session() -> TransformationSession<SvgRenderer> {
        TransformationSession::new(SvgRenderer::new())
    }

    fn vector_artists(session: &TransformationSession<SvgRenderer>, panel: Panel) -> Vec<Artist> {
        session
            .renderer()
            .artists_on(panel)
            .into_iter()
            .filter(|a| a.is_vector())
            .cloned()
            .collect()
    }

    #[test]
    fn test_unfitted() {
        let mut s = session();
        assert!(!s.is_fitted());
        assert!(s.matrix().is_none());
        assert!(matches!(
            s.transform(Vec2::new(1.0, 1.0)),
            Err(VisualError::InvalidState(_))
        ));
        assert!(matches!(s.plot_basis(), Err(VisualError::InvalidState(_))));
        s.remove_basis();
        s.clear_vectors();
        assert_eq!(s.renderer().live_count(), 0);
    }

    #[test]
    fn test_fit_draws_grid_and_basis() {
        let mut s = session();
        s.fit(Matrix2::identity(), 5.0).unwrap();
        assert!(s.is_fitted());
        assert_eq!(s.size(), Some(5.0));
        assert_eq!(s.basis_marker_count(), 4);

        // Per panel: 10 positions × 2 directions + 2 axes.
        let base = 2 * (10 * 2 + 2);
        // Two families of 1 + 2·5 lines.
        let families = 2 * 11;
        assert_eq!(s.renderer().live_count(), base + families + 4);
    }

    #[test]
    fn test_basis_markers_style() {
        let mut s = session();
        s.fit(Matrix2::new(0.0, 0.0, 0.0, 0.0), 5.0).unwrap();
        let right = vector_artists(&s, Panel::Transformed);
        assert_eq!(right.len(), 2);
        match &right[0] {
            Artist::Vector { vector, style, .. } => {
                assert!(vector.is_zero());
                assert_eq!(style.label, "i");
                assert_eq!(style.color, "red");
                assert_eq!(style.label_kind, LabelKind::Basis);
            }
            other => panic!("unexpected {other:?}"),
        }
        // Fully degenerate: only the unit grid and axes remain on the right.
        let lines = s
            .renderer()
            .artists_on(Panel::Transformed)
            .into_iter()
            .filter(|a| !a.is_vector())
            .count();
        assert_eq!(lines, 10 * 2 + 2);
    }

    #[test]
    fn test_plot_basis_is_idempotent() {
        let mut s = session();
        s.fit(Matrix2::identity(), 2.0).unwrap();
        let before = s.renderer().live_count();
        s.plot_basis().unwrap();
        s.plot_basis().unwrap();
        assert_eq!(s.basis_marker_count(), 4);
        assert_eq!(s.renderer().live_count(), before);
    }

    #[test]
    fn test_remove_then_plot_basis() {
        let mut s = session();
        s.fit(Matrix2::identity(), 2.0).unwrap();
        s.remove_basis();
        s.remove_basis();
        assert_eq!(s.basis_marker_count(), 0);
        assert!(vector_artists(&s, Panel::Original).is_empty());
        s.plot_basis().unwrap();
        assert_eq!(s.basis_marker_count(), 4);
    }

    #[test]
    fn test_transform_is_additive() {
        let mut s = session();
        s.fit(Matrix2::new(0.0, -1.0, 1.0, 0.0), 5.0).unwrap();
        s.transform(vec![Vec2::new(1.0, 0.0), Vec2::new(0.0, 2.0)])
            .unwrap();
        let images = s.transform([3.0, 1.0]).unwrap();
        assert_eq!(images[0].coords, Vec2::new(-1.0, 3.0));
        assert_eq!(s.vector_marker_count(), 6);
        assert_eq!(s.basis_marker_count(), 4);
    }

    #[test]
    fn test_transform_colors_and_labels() {
        let mut s = session();
        s.fit(Matrix2::new(2.0, 0.0, 0.0, 0.5), 5.0).unwrap();
        s.clear_vectors();
        s.transform(vec![Vec2::new(1.0, 1.0), Vec2::new(0.0, 0.0)])
            .unwrap();

        let left = vector_artists(&s, Panel::Original);
        let right = vector_artists(&s, Panel::Transformed);
        // Two basis markers per panel, then the user vectors.
        let (Artist::Vector { style: l, .. }, Artist::Vector { style: r, .. }) =
            (&left[2], &right[2])
        else {
            panic!("expected vectors");
        };
        assert_eq!(l.color, r.color);
        assert_eq!(l.color, "#1f77b4");
        assert_eq!(l.label, "(1, 1)");
        assert_eq!(r.label, "(2, 0.5)");

        let Artist::Vector { style, vector, .. } = &right[3] else {
            panic!("expected vector");
        };
        assert!(vector.is_zero());
        assert_eq!(style.label, "(0, 0)");
        assert_eq!(style.color, "#ff7f0e");

        // Colors restart with each call.
        s.transform(Vec2::new(5.0, 5.0)).unwrap();
        let right = vector_artists(&s, Panel::Transformed);
        let Artist::Vector { style, .. } = right.last().unwrap() else {
            panic!("expected vector");
        };
        assert_eq!(style.color, "#1f77b4");
    }

    #[test]
    fn test_clear_vectors() {
        let mut s = session();
        s.fit(Matrix2::identity(), 5.0).unwrap();
        s.transform(vec![Vec2::new(1.0, 2.0), Vec2::new(-1.0, 0.5)])
            .unwrap();
        assert_eq!(s.vector_marker_count(), 4);
        s.clear_vectors();
        s.clear_vectors();
        assert_eq!(s.vector_marker_count(), 0);
        assert_eq!(vector_artists(&s, Panel::Original).len(), 2);

        s.transform(Vec::<Vec2<f64>>::new()).unwrap();
        assert_eq!(s.vector_marker_count(), 0);
    }

    #[test]
    fn test_refit_replaces_everything() {
        let mut s = session();
        s.fit(Matrix2::identity(), 5.0).unwrap();
        s.transform(Vec2::new(1.0, 1.0)).unwrap();
        s.fit(Matrix2::new(1.0, 1.0, 0.0, 0.0), 3.0).unwrap();

        assert_eq!(s.vector_marker_count(), 0);
        assert_eq!(s.basis_marker_count(), 4);
        assert_eq!(s.renderer().extent(), Some(3.0));
        assert_eq!(s.projection().unwrap().family_count(), 1);
        assert_eq!(vector_artists(&s, Panel::Transformed).len(), 2);
    }

    #[test]
    fn test_failed_fit_keeps_state() {
        let mut s = session();
        s.fit(Matrix2::new(2.0, 0.0, 0.0, 1.0), 5.0).unwrap();
        s.transform(Vec2::new(1.0, 1.0)).unwrap();
        let live = s.renderer().live_count();

        assert!(matches!(
            s.fit(Matrix2::identity(), -1.0),
            Err(VisualError::InvalidViewSize(_))
        ));
        assert!(matches!(
            s.fit(Matrix2::new(f64::NAN, 0.0, 0.0, 1.0), 5.0),
            Err(VisualError::NonFiniteMatrix)
        ));

        assert_eq!(s.matrix(), Some(&Matrix2::new(2.0, 0.0, 0.0, 1.0)));
        assert_eq!(s.vector_marker_count(), 2);
        assert_eq!(s.renderer().live_count(), live);
    }

    #[test]
    fn test_non_finite_vector_rejected() {
        let mut s = session();
        s.fit(Matrix2::identity(), 5.0).unwrap();
        let err = s.transform(vec![Vec2::new(1.0, 0.0), Vec2::new(f64::INFINITY, 0.0)]);
        assert!(matches!(err, Err(VisualError::InvalidVector(_))));
        assert_eq!(s.vector_marker_count(), 0);
    }

    #[test]
    fn test_fit_default_uses_config() {
        let config = VisualizerConfig {
            default_size: 2.0,
            ..VisualizerConfig::default()
        };
        let mut s = TransformationSession::with_config(SvgRenderer::new(), config);
        s.fit_default(Matrix2::identity()).unwrap();
        assert_eq!(s.size(), Some(2.0));
        assert_eq!(s.projection().unwrap().first.unwrap().repeats, 2);
    }

    #[test]
    fn test_renderer_by_reference() {
        let mut svg = SvgRenderer::new();
        {
            let mut s = TransformationSession::new(&mut svg);
            s.fit(Matrix2::identity(), 1.0).unwrap();
        }
        assert!(svg.live_count() > 0);
    }
}
