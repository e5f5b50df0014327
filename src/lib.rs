//! tabreel - navigable reel-of-tablets terminal widget.
//!
//! Module structure:
//! - core: cell-grid primitives (geometry, styling)
//! - surface: retained compositing surface (crossterm and headless backends)
//! - reel: the widget itself (tablet collection, layout, borders, navigation)
//! - logging: tracing setup for host applications

pub mod core;
pub mod logging;
pub mod reel;
pub mod surface;

pub use reel::border::Edges;
pub use reel::error::ReelError;
pub use reel::layout::Placement;
pub use reel::tablet::{
    Clip, Direction, RenderRequest, TabletContent, TabletFrame, TabletId,
};
pub use reel::{Reel, ReelOptions};
pub use surface::{RegionId, Surface, SurfaceError};
