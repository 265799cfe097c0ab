//! The geometric core: where grid lines and basis vectors go under a matrix.
//!
//! Everything in this module is pure; drawing happens in [`crate::render`]
//! and is sequenced by [`crate::session`].

mod basis;
mod projector;

pub use basis::{
    format_coordinate, format_label, map_basis, map_user, Basis, BasisImages, VectorDescriptor,
    VectorInput, VectorKind,
};
pub use projector::{
    parametrize, standard_grid_positions, Axis, GridLineProjector, GridProjection, LineFamily,
    Parametrization, MAX_REPEATS,
};
