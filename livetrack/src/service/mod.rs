//! Track map service: load, derive, publish.
//!
//! Owns the once-per-track lifecycle. A circuit load fetches the raw map,
//! validates and segments it, rotates everything into the display frame and
//! publishes the result as one immutable [`MapGeometry`] bundle over a
//! `tokio::sync::watch` channel. Subscribers never observe a torn frame
//! (fresh sectors with a stale rotation, say): either the previous bundle is
//! still in place or the new one is, wholesale.
//!
//! Flag resolution and position mapping run on their own cadences and only
//! read the published bundle; this module never recomputes on their behalf.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::geometry::{self, TrackPosition};
use crate::map::{segment, MapError, RawMap, Sector};
use crate::position::DisplayFrame;
use crate::provider::{MapProvider, ProviderError};

/// Orientation correction applied on top of the map's own rotation hint so
/// circuits draw the way broadcast graphics orient them.
pub const ROTATION_FIX: f64 = 90.0;

/// Padding added around the rotated trace on every side, in track units.
pub const BOUNDS_PADDING: f64 = 1000.0;

/// Axis-aligned view bounds of the rotated track, padded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Everything derived from one raw map, in the rotated display frame.
///
/// Built off the critical path and published as a single atomic swap; all
/// fields were computed from the same fetch and always agree with each
/// other.
#[derive(Debug, Clone)]
pub struct MapGeometry {
    pub circuit_key: u32,
    pub circuit_name: String,
    /// Display rotation in degrees (map hint plus [`ROTATION_FIX`]).
    pub rotation_deg: f64,
    /// Rotation pivot shared by sectors, outline and live positions.
    pub center: TrackPosition,
    pub bounds: MapBounds,
    /// Full rotated trace, for the background track outline.
    pub outline: Vec<TrackPosition>,
    /// Rotated sectors in ascending number order.
    pub sectors: Vec<Sector>,
    /// Rotated corner markers (number, position).
    pub corners: Vec<(u32, TrackPosition)>,
}

impl MapGeometry {
    /// Derives the full display-frame bundle from a raw map.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] when the raw map fails validation; nothing is
    /// derived from a map the segmenter refuses.
    pub fn build(raw: &RawMap) -> Result<Self, MapError> {
        let sectors = segment(raw)?;

        // Half the coordinate extent on each axis; the historical pivot all
        // frames (sectors, outline, live cars) share.
        let center = TrackPosition::new(
            (fold_max(&raw.x) - fold_min(&raw.x)) / 2.0,
            (fold_max(&raw.y) - fold_min(&raw.y)) / 2.0,
        );
        let rotation_deg = raw.rotation + ROTATION_FIX;

        let outline: Vec<TrackPosition> = raw
            .trace()
            .into_iter()
            .map(|p| geometry::rotate(p, rotation_deg, center))
            .collect();

        let xs: Vec<f64> = outline.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = outline.iter().map(|p| p.y).collect();
        let min_x = fold_min(&xs) - BOUNDS_PADDING;
        let min_y = fold_min(&ys) - BOUNDS_PADDING;
        let bounds = MapBounds {
            min_x,
            min_y,
            width: fold_max(&xs) - min_x + BOUNDS_PADDING,
            height: fold_max(&ys) - min_y + BOUNDS_PADDING,
        };

        Ok(Self {
            circuit_key: raw.circuit_key,
            circuit_name: raw.circuit_name.clone(),
            rotation_deg,
            center,
            bounds,
            outline,
            sectors: sectors
                .iter()
                .map(|s| s.rotated(rotation_deg, center))
                .collect(),
            corners: raw
                .corners
                .iter()
                .map(|c| (c.number, geometry::rotate(c.track_position, rotation_deg, center)))
                .collect(),
        })
    }

    /// The display frame live positions should be mapped into.
    pub fn frame(&self) -> DisplayFrame {
        DisplayFrame {
            rotation_deg: self.rotation_deg,
            center: self.center,
        }
    }
}

fn fold_min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn fold_max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Errors from a circuit load.
///
/// All of these are recoverable: the previously published geometry, if any,
/// stays in effect and the caller may retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Map(#[from] MapError),
}

/// Result of a completed circuit load.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// The bundle was published to subscribers.
    Published(Arc<MapGeometry>),
    /// A newer load started while this one was in flight; its result was
    /// discarded and subscribers were not touched.
    Superseded,
}

/// Loads circuit maps and publishes derived geometry to subscribers.
pub struct TrackMapService {
    provider: Arc<dyn MapProvider>,
    tx: watch::Sender<Option<Arc<MapGeometry>>>,
    load_seq: AtomicU64,
}

impl TrackMapService {
    /// Creates a service with no geometry published yet; subscribers see
    /// `None` until the first successful load.
    pub fn new(provider: Arc<dyn MapProvider>) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            provider,
            tx,
            load_seq: AtomicU64::new(0),
        }
    }

    /// Subscribes to published geometry.
    ///
    /// The receiver's current value is `None` before the first load; every
    /// later change is a complete bundle.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<MapGeometry>>> {
        self.tx.subscribe()
    }

    /// The currently published geometry, if any.
    pub fn current(&self) -> Option<Arc<MapGeometry>> {
        self.tx.borrow().clone()
    }

    /// Fetches, derives and publishes the geometry for a circuit.
    ///
    /// While the fetch is pending, subscribers keep seeing the previous
    /// bundle. If a newer load starts before this one resolves, this one's
    /// result is discarded ([`LoadOutcome::Superseded`]); last trigger wins,
    /// not last arrival.
    ///
    /// # Errors
    ///
    /// Fetch or validation failures are returned to the caller and leave
    /// the published geometry untouched.
    pub async fn load_circuit(&self, circuit_key: u32) -> Result<LoadOutcome, LoadError> {
        let seq = self.load_seq.fetch_add(1, Ordering::SeqCst) + 1;
        info!(circuit_key, "Loading circuit map");

        let raw = match self.provider.fetch_map(circuit_key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(circuit_key, error = %e, "Circuit map fetch failed; keeping previous geometry");
                return Err(e.into());
            }
        };

        let geometry = Arc::new(MapGeometry::build(&raw)?);

        if self.load_seq.load(Ordering::SeqCst) != seq {
            debug!(circuit_key, "Discarding superseded map load");
            return Ok(LoadOutcome::Superseded);
        }

        info!(
            circuit_key,
            sectors = geometry.sectors.len(),
            rotation = geometry.rotation_deg,
            "Publishing circuit geometry"
        );
        self.tx.send_replace(Some(Arc::clone(&geometry)));
        Ok(LoadOutcome::Published(geometry))
    }
}
