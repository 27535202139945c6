//! Circuit map model and validation.
//!
//! [`RawMap`] is the deserialized circuit definition as fetched from the map
//! provider: the closed coordinate trace, the display rotation hint, and the
//! marshal-sector landmarks that bound each sector. Validation is strict;
//! a malformed map is refused outright rather than guessed at, since every
//! downstream computation (segmentation, bounds, live positions) trusts the
//! trace.

mod segmenter;

pub use segmenter::{segment, Sector};

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::TrackPosition;

/// A marshal landmark: a fixed reference point denoting a sector boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarshalSector {
    pub track_position: TrackPosition,
}

/// A numbered corner marker, carried through for labelling.
///
/// Corners play no role in segmentation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corner {
    pub number: u32,
    pub track_position: TrackPosition,
}

/// A raw circuit definition in unrotated track coordinates.
///
/// `x` and `y` are index-aligned and form a closed loop.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMap {
    #[serde(default)]
    pub circuit_key: u32,
    #[serde(default)]
    pub circuit_name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Display orientation hint in degrees.
    pub rotation: f64,
    pub marshal_sectors: Vec<MarshalSector>,
    #[serde(default)]
    pub corners: Vec<Corner>,
}

impl RawMap {
    /// Checks the structural invariants of the map.
    ///
    /// # Errors
    ///
    /// * [`MapError::MismatchedAxes`] - `x` and `y` differ in length
    /// * [`MapError::DegenerateTrace`] - fewer than 2 trace points
    /// * [`MapError::NoMarshalSectors`] - no landmarks to segment by
    pub fn validate(&self) -> Result<(), MapError> {
        if self.x.len() != self.y.len() {
            return Err(MapError::MismatchedAxes {
                x_len: self.x.len(),
                y_len: self.y.len(),
            });
        }
        if self.x.len() < 2 {
            return Err(MapError::DegenerateTrace { len: self.x.len() });
        }
        if self.marshal_sectors.is_empty() {
            return Err(MapError::NoMarshalSectors);
        }
        Ok(())
    }

    /// The trace as positions, in loop order.
    pub fn trace(&self) -> Vec<TrackPosition> {
        self.x
            .iter()
            .zip(self.y.iter())
            .map(|(&x, &y)| TrackPosition::new(x, y))
            .collect()
    }
}

/// Errors raised by map validation and segmentation.
///
/// All variants are fatal for the session that tried to load the map; the
/// previously published geometry, if any, stays in effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// Coordinate arrays are not index-aligned.
    #[error("Mismatched coordinate arrays: {x_len} x values vs {y_len} y values")]
    MismatchedAxes { x_len: usize, y_len: usize },

    /// The trace is too short to form a loop.
    #[error("Degenerate trace: {len} points (need at least 2)")]
    DegenerateTrace { len: usize },

    /// No marshal landmarks were supplied.
    #[error("Map has no marshal sectors")]
    NoMarshalSectors,

    /// A nearest-point query failed during segmentation.
    #[error("Segmentation failed: {0}")]
    Geometry(#[from] crate::geometry::GeometryError),
}
