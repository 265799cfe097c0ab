//! SVG backend.
//!
//! Keeps the live elements of the current figure in insertion order and
//! serializes them on demand, one square panel per column:
//!
//! ```text
//! +-------+ gap +-------+
//! | panel |     | panel |
//! +-------+     +-------+
//! ```
//!
//! Data coordinates `[-extent, extent]` map onto each panel with y pointing up.
//! Lines and arrows are clipped to their panel; labels are not.
//!
//! # Example
//!
//! ```
//! use lintrans::primitives::{Point2, Vec2};
//! use lintrans::render::{LineStyle, Panel, Renderer, SvgRenderer};
//!
//! let mut svg = SvgRenderer::new();
//! svg.new_figure(2, 5.0);
//! let h = svg.draw_line(Panel::Original, Point2::new(-5.0, 0.0), Vec2::new(10.0, 0.0), &LineStyle::BASE_AXIS);
//! assert_eq!(svg.live_count(), 1);
//! svg.remove_drawn(h);
//! assert_eq!(svg.live_count(), 0);
//! assert!(svg.to_svg().starts_with("<?xml"));
//! ```

use super::{ArtistHandle, FigureHandle, LabelKind, LineStyle, Panel, Renderer, VectorStyle};
use crate::error::VisualError;
use crate::primitives::{Point2, Vec2};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

const DEFAULT_PANEL_PIXELS: f64 = 500.0;
const DEFAULT_GAP: f64 = 40.0;
const DEFAULT_EXTENT: f64 = 5.0;

/// A drawn element as recorded by [`SvgRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum Artist {
    Line {
        panel: Panel,
        anchor: Point2<f64>,
        direction: Vec2<f64>,
        style: LineStyle,
    },
    Vector {
        panel: Panel,
        origin: Point2<f64>,
        vector: Vec2<f64>,
        style: VectorStyle,
    },
}

impl Artist {
    /// Panel the element was drawn on.
    pub fn panel(&self) -> Panel {
        match self {
            Artist::Line { panel, .. } | Artist::Vector { panel, .. } => *panel,
        }
    }

    /// Returns `true` for arrows and dots.
    pub fn is_vector(&self) -> bool {
        matches!(self, Artist::Vector { .. })
    }
}

#[derive(Debug, Clone)]
struct Figure {
    handle: FigureHandle,
    panels: usize,
    extent: f64,
    artists: BTreeMap<ArtistHandle, Artist>,
}

/// Pixel placement of one panel.
#[derive(Debug, Clone, Copy)]
struct Frame {
    left: f64,
    top: f64,
    side: f64,
    extent: f64,
}

impl Frame {
    fn scale(&self) -> f64 {
        self.side / (2.0 * self.extent)
    }

    fn to_px(&self, p: Point2<f64>) -> (f64, f64) {
        (
            self.left + (p.x + self.extent) * self.scale(),
            self.top + (self.extent - p.y) * self.scale(),
        )
    }
}

/// Renders figures to SVG documents.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    panel_pixels: f64,
    gap: f64,
    next_id: u64,
    figure: Option<Figure>,
}

impl SvgRenderer {
    /// Creates a renderer with 500 px panels and 40 px gaps.
    pub fn new() -> Self {
        Self::with_layout(DEFAULT_PANEL_PIXELS, DEFAULT_GAP)
    }

    /// Creates a renderer with the given panel side and gap, in pixels.
    pub fn with_layout(panel_pixels: f64, gap: f64) -> Self {
        Self {
            panel_pixels,
            gap,
            next_id: 0,
            figure: None,
        }
    }

    /// The current figure, if one was created.
    pub fn figure(&self) -> Option<FigureHandle> {
        self.figure.as_ref().map(|f| f.handle)
    }

    /// Half-size of the data window of the current figure.
    pub fn extent(&self) -> Option<f64> {
        self.figure.as_ref().map(|f| f.extent)
    }

    /// Live elements of the current figure in drawing order.
    pub fn artists(&self) -> impl Iterator<Item = (ArtistHandle, &Artist)> {
        self.figure
            .iter()
            .flat_map(|f| f.artists.iter().map(|(h, a)| (*h, a)))
    }

    /// Live elements on one panel, in drawing order.
    pub fn artists_on(&self, panel: Panel) -> Vec<&Artist> {
        self.artists()
            .map(|(_, a)| a)
            .filter(|a| a.panel() == panel)
            .collect()
    }

    /// Number of live elements.
    pub fn live_count(&self) -> usize {
        self.figure.as_ref().map_or(0, |f| f.artists.len())
    }

    /// Returns `true` if `handle` is still drawn.
    pub fn contains(&self, handle: ArtistHandle) -> bool {
        self.figure
            .as_ref()
            .is_some_and(|f| f.artists.contains_key(&handle))
    }

    fn next_handle(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert(&mut self, artist: Artist) -> ArtistHandle {
        let handle = ArtistHandle(self.next_handle());
        if self.figure.is_none() {
            log::warn!("drawing without a figure, creating a default one");
            self.new_figure(2, DEFAULT_EXTENT);
        }
        if let Some(figure) = self.figure.as_mut() {
            figure.artists.insert(handle, artist);
        }
        handle
    }

    fn frame(&self, figure: &Figure, panel: usize) -> Frame {
        Frame {
            left: self.gap + panel as f64 * (self.panel_pixels + self.gap),
            top: self.gap,
            side: self.panel_pixels,
            extent: figure.extent,
        }
    }

    /// Serializes the current figure.
    ///
    /// Without a figure this yields an empty document.
    pub fn to_svg(&self) -> String {
        let panels = self.figure.as_ref().map_or(0, |f| f.panels);
        let width = panels as f64 * self.panel_pixels + (panels as f64 + 1.0) * self.gap;
        let height = self.panel_pixels + 2.0 * self.gap;

        let mut out = String::new();
        let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" font-family="serif">"#
        );
        let _ = writeln!(out, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##);

        if let Some(figure) = &self.figure {
            let frames: Vec<Frame> = (0..figure.panels).map(|k| self.frame(figure, k)).collect();

            out.push_str("<defs>\n");
            for (k, frame) in frames.iter().enumerate() {
                let _ = writeln!(
                    out,
                    r#"<clipPath id="panel-{k}"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"/></clipPath>"#,
                    frame.left, frame.top, frame.side, frame.side
                );
            }
            out.push_str("</defs>\n");

            for (k, frame) in frames.iter().enumerate() {
                let on_panel = || figure.artists.values().filter(move |a| a.panel().index() == k);

                let _ = writeln!(out, r#"<g clip-path="url(#panel-{k})">"#);
                for artist in on_panel() {
                    write_shape(&mut out, frame, artist);
                }
                out.push_str("</g>\n");

                for artist in on_panel() {
                    write_label(&mut out, frame, artist);
                }

                let _ = writeln!(
                    out,
                    r##"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="#000000" stroke-width="1"/>"##,
                    frame.left, frame.top, frame.side, frame.side
                );
            }
        }

        out.push_str("</svg>\n");
        out
    }

    /// Writes the current figure as SVG.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.to_svg().as_bytes())
    }

    /// Writes the current figure to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), VisualError> {
        let path = path.as_ref();
        let mut writer = io::BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for SvgRenderer {
    fn new_figure(&mut self, panels: usize, extent: f64) -> FigureHandle {
        let handle = FigureHandle(self.next_handle());
        self.figure = Some(Figure {
            handle,
            panels,
            extent,
            artists: BTreeMap::new(),
        });
        handle
    }

    fn draw_line(
        &mut self,
        panel: Panel,
        anchor: Point2<f64>,
        direction: Vec2<f64>,
        style: &LineStyle,
    ) -> ArtistHandle {
        self.insert(Artist::Line {
            panel,
            anchor,
            direction,
            style: *style,
        })
    }

    fn draw_vector(
        &mut self,
        panel: Panel,
        origin: Point2<f64>,
        vector: Vec2<f64>,
        style: &VectorStyle,
    ) -> ArtistHandle {
        self.insert(Artist::Vector {
            panel,
            origin,
            vector,
            style: style.clone(),
        })
    }

    fn remove_drawn(&mut self, handle: ArtistHandle) {
        let removed = self
            .figure
            .as_mut()
            .and_then(|f| f.artists.remove(&handle));
        if removed.is_none() {
            log::warn!("artist {} is not drawn, nothing to remove", handle.0);
        }
    }
}

fn gray_hex(gray: f64) -> String {
    let v = (gray.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{v:02x}{v:02x}{v:02x}")
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn write_shape(out: &mut String, frame: &Frame, artist: &Artist) {
    match artist {
        Artist::Line {
            anchor,
            direction,
            style,
            ..
        } => {
            let (x1, y1) = frame.to_px(*anchor);
            let (x2, y2) = frame.to_px(*anchor + *direction);
            let _ = writeln!(
                out,
                r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{}" stroke-width="{}"/>"#,
                gray_hex(style.gray),
                style.width
            );
        }
        Artist::Vector {
            origin,
            vector,
            style,
            ..
        } => {
            let (x1, y1) = frame.to_px(*origin);
            let (x2, y2) = frame.to_px(*origin + *vector);
            let (dx, dy) = (x2 - x1, y2 - y1);
            let len = dx.hypot(dy);
            let color = escape_text(&style.color);

            if vector.is_zero() || len <= f64::EPSILON {
                let _ = writeln!(
                    out,
                    r#"<circle cx="{x1:.2}" cy="{y1:.2}" r="3" fill="{color}"/>"#
                );
                return;
            }

            let head = (len * 0.4).min(12.0);
            let half = head * 0.45;
            let (ux, uy) = (dx / len, dy / len);
            let (bx, by) = (x2 - ux * head, y2 - uy * head);
            let (nx, ny) = (-uy * half, ux * half);
            let _ = writeln!(
                out,
                r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{bx:.2}" y2="{by:.2}" stroke="{color}" stroke-width="2"/>"#
            );
            let _ = writeln!(
                out,
                r#"<polygon points="{x2:.2},{y2:.2} {:.2},{:.2} {:.2},{:.2}" fill="{color}"/>"#,
                bx + nx,
                by + ny,
                bx - nx,
                by - ny
            );
        }
    }
}

fn write_label(out: &mut String, frame: &Frame, artist: &Artist) {
    let Artist::Vector {
        origin,
        vector,
        style,
        ..
    } = artist
    else {
        return;
    };

    let (x, y) = match vector.normalize() {
        Some(unit) => {
            let (tip_x, tip_y) = frame.to_px(*origin + *vector);
            // Offsets in points, y up, relative to the tip.
            let (tx, ty) = match style.label_kind {
                LabelKind::Basis => (-2.0 + 4.0 * unit.x, -4.0 + 10.0 * unit.y),
                LabelKind::Coordinates => {
                    let n = style.label.chars().count() as f64;
                    (-2.3 * n + 3.5 * n * unit.x, -3.0 + 6.0 * unit.y)
                }
            };
            (tip_x + tx, tip_y - ty)
        }
        None => frame.to_px(*origin + Vec2::new(0.2, -0.2)),
    };

    let text = escape_text(&style.label);
    match style.label_kind {
        LabelKind::Basis => {
            let _ = writeln!(
                out,
                r#"<text x="{x:.2}" y="{y:.2}" font-size="14" font-weight="bold" font-style="italic" fill="{}">{text}</text>"#,
                escape_text(&style.color)
            );
        }
        LabelKind::Coordinates => {
            let _ = writeln!(
                out,
                r##"<text x="{x:.2}" y="{y:.2}" font-size="10" fill="#000000">{text}</text>"##
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrow(label: &str, kind: LabelKind) -> VectorStyle {
        VectorStyle {
            color: "red".to_string(),
            label: label.to_string(),
            label_kind: kind,
        }
    }

    #[test]
    fn test_new_figure_discards_previous() {
        let mut svg = SvgRenderer::new();
        let first = svg.new_figure(2, 5.0);
        svg.draw_line(
            Panel::Original,
            Point2::origin(),
            Vec2::new(1.0, 0.0),
            &LineStyle::BASE_GRID,
        );
        assert_eq!(svg.live_count(), 1);

        let second = svg.new_figure(2, 3.0);
        assert_ne!(first, second);
        assert_eq!(svg.figure(), Some(second));
        assert_eq!(svg.extent(), Some(3.0));
        assert_eq!(svg.live_count(), 0);
    }

    #[test]
    fn test_handles_are_unique() {
        let mut svg = SvgRenderer::new();
        svg.new_figure(2, 5.0);
        let a = svg.draw_vector(
            Panel::Original,
            Point2::origin(),
            Vec2::new(1.0, 0.0),
            &arrow("i", LabelKind::Basis),
        );
        let b = svg.draw_vector(
            Panel::Transformed,
            Point2::origin(),
            Vec2::new(1.0, 0.0),
            &arrow("i", LabelKind::Basis),
        );
        assert_ne!(a, b);
        assert!(svg.contains(a));
        assert_eq!(svg.artists_on(Panel::Transformed).len(), 1);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut svg = SvgRenderer::new();
        svg.new_figure(2, 5.0);
        let h = svg.draw_line(
            Panel::Original,
            Point2::origin(),
            Vec2::new(0.0, 1.0),
            &LineStyle::BASE_AXIS,
        );
        svg.remove_drawn(h);
        svg.remove_drawn(h);
        svg.remove_drawn(ArtistHandle(9999));
        assert_eq!(svg.live_count(), 0);
    }

    #[test]
    fn test_draw_without_figure_creates_one() {
        let mut svg = SvgRenderer::new();
        svg.draw_line(
            Panel::Original,
            Point2::origin(),
            Vec2::new(0.0, 1.0),
            &LineStyle::BASE_AXIS,
        );
        assert!(svg.figure().is_some());
        assert_eq!(svg.live_count(), 1);
    }

    #[test]
    fn test_svg_document() {
        let mut svg = SvgRenderer::with_layout(100.0, 10.0);
        svg.new_figure(2, 5.0);
        svg.draw_line(
            Panel::Original,
            Point2::new(-5.0, 0.0),
            Vec2::new(10.0, 0.0),
            &LineStyle::BASE_AXIS,
        );
        svg.draw_vector(
            Panel::Transformed,
            Point2::origin(),
            Vec2::new(2.0, 0.0),
            &arrow("i", LabelKind::Basis),
        );
        svg.draw_vector(
            Panel::Transformed,
            Point2::origin(),
            Vec2::zero(),
            &arrow("(0, 0)", LabelKind::Coordinates),
        );

        let doc = svg.to_svg();
        assert!(doc.contains(r#"viewBox="0 0 230 120""#));
        assert!(doc.contains(r#"<clipPath id="panel-1">"#));
        // Left panel axis: data x in [-5, 5] maps to pixels [10, 110] at y = 60.
        assert!(doc.contains(
            r##"<line x1="10.00" y1="60.00" x2="110.00" y2="60.00" stroke="#666666" stroke-width="1.5"/>"##
        ));
        assert!(doc.contains("<polygon"));
        assert!(doc.contains("<circle"));
        assert!(doc.contains(">i</text>"));
        assert!(doc.contains(">(0, 0)</text>"));
        assert!(doc.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_empty_document() {
        let doc = SvgRenderer::new().to_svg();
        assert!(doc.contains("<svg"));
        assert!(!doc.contains("<clipPath"));
    }

    #[test]
    fn test_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.svg");
        let mut svg = SvgRenderer::new();
        svg.new_figure(2, 5.0);
        svg.save(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, svg.to_svg());
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a<b & c>"), "a&lt;b &amp; c&gt;");
        assert_eq!(gray_hex(0.4), "#666666");
        assert_eq!(gray_hex(1.5), "#ffffff");
    }
}
