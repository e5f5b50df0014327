use crate::surface::SurfaceError;
use std::fmt;

#[derive(Debug)]
pub enum ReelError {
    /// Rejected at creation: inconsistent flags or an out-of-domain mask.
    InvalidOptions(&'static str),
    /// The derived viewport has no usable area.
    InsufficientArea,
    /// The referenced tablet is not in the collection (or its handle is stale).
    NotFound,
    /// The operation needs a focused tablet and the reel is empty.
    Empty,
    /// Structurally invalid insertion (non-adjacent anchors).
    Rejected,
    /// An underlying surface operation failed.
    Surface(SurfaceError),
}

impl fmt::Display for ReelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReelError::InvalidOptions(why) => write!(f, "invalid reel options: {why}"),
            ReelError::InsufficientArea => write!(f, "viewport has no usable area"),
            ReelError::NotFound => write!(f, "tablet not found in this reel"),
            ReelError::Empty => write!(f, "reel has no focused tablet"),
            ReelError::Rejected => write!(f, "insertion anchors are not adjacent"),
            ReelError::Surface(e) => write!(f, "surface failure: {e}"),
        }
    }
}

impl std::error::Error for ReelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReelError::Surface(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SurfaceError> for ReelError {
    fn from(e: SurfaceError) -> Self {
        ReelError::Surface(e)
    }
}
