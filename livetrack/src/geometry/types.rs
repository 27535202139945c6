//! Core geometric types for the track map.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point in track coordinate units.
///
/// Raw circuit traces and live car telemetry both use this unit space;
/// whether a value is in the raw or the rotated (display) frame is a
/// property of where it came from, not of the type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackPosition {
    pub x: f64,
    pub y: f64,
}

impl TrackPosition {
    /// Create a new track position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for TrackPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Errors from geometric queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// A nearest-point query ran against an empty point set.
    ///
    /// This is a configuration error (a map with no trace points); callers
    /// must surface it, never substitute a sentinel index.
    #[error("Nearest-point query over an empty point set")]
    EmptyPointSet,
}
