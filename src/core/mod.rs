//! Shared cell-grid primitives: geometry and styling.

pub mod geom;
pub mod style;
