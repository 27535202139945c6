//! Live car position mapping.
//!
//! Keeps an arena of per-driver records keyed by racing number and derives
//! display-frame positions on read. Updates are strictly per-entity: one
//! car's telemetry tick touches only that car's record, never its siblings
//! and never the sector geometry. Telemetry arrives at sub-second cadence,
//! so reads rotate lazily instead of recomputing the whole grid per tick.

use dashmap::DashMap;
use parking_lot::RwLock;

use crate::geometry::{self, TrackPosition};

/// The rotated display frame positions are mapped into.
///
/// Swapped wholesale when a new map publishes; the same rotation and pivot
/// the sector geometry was built with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayFrame {
    /// Display rotation in degrees.
    pub rotation_deg: f64,
    /// Pivot of the rotation.
    pub center: TrackPosition,
}

/// Externally supplied per-driver timing status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStatus {
    pub knocked_out: bool,
    pub stopped: bool,
    pub retired: bool,
    pub in_pit: bool,
}

/// A driver ready to draw: rotated position plus visibility flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedDriver {
    /// Position in the rotated display frame.
    pub position: TrackPosition,
    /// Out of the session (knocked out, stopped or retired).
    pub hidden: bool,
    /// In the pit lane; drawn at reduced opacity.
    pub dimmed: bool,
}

#[derive(Debug, Default, Clone, Copy)]
struct DriverEntry {
    position: Option<TrackPosition>,
    status: Option<DriverStatus>,
}

/// The telemetry feed encodes "no position fix" as a zero coordinate.
fn has_fix(p: TrackPosition) -> bool {
    p.x != 0.0 && p.y != 0.0
}

/// Maps live telemetry positions into the rotated display frame.
#[derive(Debug, Default)]
pub struct LivePositionMapper {
    frame: RwLock<Option<DisplayFrame>>,
    entries: DashMap<String, DriverEntry>,
}

impl LivePositionMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the display frame of a freshly published map.
    ///
    /// Raw samples are kept as-is; subsequent reads rotate into the new
    /// frame, so a frame change never tears an individual driver's state.
    pub fn set_frame(&self, frame: DisplayFrame) {
        *self.frame.write() = Some(frame);
    }

    /// Records the latest raw position sample for one driver.
    pub fn update_position(&self, driver: &str, x: f64, y: f64) {
        self.entries
            .entry(driver.to_string())
            .or_default()
            .position = Some(TrackPosition::new(x, y));
    }

    /// Records the latest timing status for one driver.
    pub fn update_status(&self, driver: &str, status: DriverStatus) {
        self.entries.entry(driver.to_string()).or_default().status = Some(status);
    }

    /// Applies a whole position snapshot, entity by entity.
    ///
    /// Only the mentioned drivers are touched; history is not buffered, each
    /// sample simply replaces the previous one.
    pub fn apply_positions<'a, I>(&self, snapshot: I)
    where
        I: IntoIterator<Item = (&'a str, f64, f64)>,
    {
        for (driver, x, y) in snapshot {
            self.update_position(driver, x, y);
        }
    }

    /// Applies a whole status snapshot, entity by entity.
    pub fn apply_statuses<'a, I>(&self, snapshot: I)
    where
        I: IntoIterator<Item = (&'a str, DriverStatus)>,
    {
        for (driver, status) in snapshot {
            self.update_status(driver, status);
        }
    }

    /// Drops a driver from the arena.
    pub fn remove(&self, driver: &str) {
        self.entries.remove(driver);
    }

    /// Drops all drivers (e.g. on session change).
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of tracked drivers, including those without a position fix.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Derives the rendered state of one driver.
    ///
    /// Returns `None` when no display frame is installed yet, the driver is
    /// unknown, or the driver has no valid position fix. A driver without
    /// status data renders visible and undimmed.
    pub fn rendered(&self, driver: &str) -> Option<RenderedDriver> {
        let frame = (*self.frame.read())?;
        let entry = self.entries.get(driver)?;
        Self::render_entry(&entry, frame)
    }

    /// Derives the rendered state of every driver with a position fix.
    ///
    /// Returns an empty list until a display frame is installed.
    pub fn rendered_all(&self) -> Vec<(String, RenderedDriver)> {
        let Some(frame) = *self.frame.read() else {
            return Vec::new();
        };

        self.entries
            .iter()
            .filter_map(|item| {
                Self::render_entry(item.value(), frame).map(|r| (item.key().clone(), r))
            })
            .collect()
    }

    fn render_entry(entry: &DriverEntry, frame: DisplayFrame) -> Option<RenderedDriver> {
        let raw = entry.position.filter(|&p| has_fix(p))?;
        let position = geometry::rotate(raw, frame.rotation_deg, frame.center);

        let status = entry.status.unwrap_or_default();
        Some(RenderedDriver {
            position,
            hidden: status.knocked_out || status.stopped || status.retired,
            dimmed: status.in_pit,
        })
    }
}
