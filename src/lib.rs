//! lintrans - Pictures of 2D linear transformations
//!
//! Turns a 2×2 matrix into a before/after figure: the unit grid and basis
//! vectors on the left, their images under the matrix on the right. The
//! geometry lives in [`transform`] and is pure; [`session`] drives a
//! [`render::Renderer`] and keeps track of what it has drawn.
//!
//! ```
//! use lintrans::{Matrix2, SvgRenderer, TransformationSession, Vec2};
//!
//! let mut session = TransformationSession::new(SvgRenderer::new());
//! session.fit(Matrix2::new(1.0, 1.0, 0.0, 1.0), 4.0)?;
//! session.transform(vec![Vec2::new(1.0, 2.0), Vec2::new(-2.0, 1.0)])?;
//!
//! let svg = session.renderer().to_svg();
//! assert!(svg.contains("(3, 2)"));
//! # Ok::<(), lintrans::VisualError>(())
//! ```

pub mod config;
pub mod error;
pub mod primitives;
pub mod render;
pub mod session;
pub mod transform;

pub use config::VisualizerConfig;
pub use error::VisualError;
pub use primitives::{Matrix2, Point2, Segment2, Vec2};
pub use render::{Renderer, SvgRenderer};
pub use session::TransformationSession;
pub use transform::{
    map_basis, map_user, GridLineProjector, GridProjection, LineFamily, VectorDescriptor,
    VectorKind,
};
