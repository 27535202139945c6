//! Sector render projection.
//!
//! Combines the static sector geometry, the resolved flag state and the
//! injected status style into an ordered list of path descriptors. The
//! output is rebuilt in full on every status or message change and never
//! mutated in place; callers diff or redraw as they see fit.

use std::collections::BTreeSet;

use crate::geometry::TrackPosition;
use crate::map::Sector;
use crate::status::StatusStyle;

/// Stroke width for a neutral sector, in track units.
pub const BASE_STROKE_WIDTH: u32 = 60;

/// Flagged sectors draw at double width for emphasis.
pub const FLAGGED_STROKE_WIDTH: u32 = BASE_STROKE_WIDTH * 2;

/// Visual state of a rendered sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorColor {
    /// Default track color.
    Neutral,
    /// Takes the active status color.
    Flagged,
}

/// A drawable sector path in the rotated display frame.
///
/// The path is an open polyline ("move to first point, line to each
/// subsequent point"); closure across the lap happens through adjacency of
/// consecutive sectors. An empty path is legal (collapsed sector) and must
/// be skipped by the renderer, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSector {
    pub number: u32,
    pub path: Vec<TrackPosition>,
    pub color: SectorColor,
    pub stroke_width: u32,
    pub pulse: Option<f32>,
}

/// Projects sectors into ordered, colored path descriptors.
///
/// Coloring rules:
///
/// * Status with `by_sector`: a sector is flagged iff its number is in
///   `affected` and the status carries a color; everything else is neutral.
/// * Status without `by_sector`: every sector takes the status color when
///   one exists, otherwise all are neutral.
/// * No status at all: all neutral.
///
/// The result is sorted so every neutral sector precedes every flagged one
/// (flagged strokes paint last, on top), ascending by sector number within
/// each group.
pub fn project(
    sectors: &[Sector],
    affected: &BTreeSet<u32>,
    status: Option<&StatusStyle>,
) -> Vec<RenderedSector> {
    let status_has_color = status.is_some_and(|s| s.track_color.is_some());
    let by_sector = status.is_some_and(|s| s.by_sector);
    let pulse = status.and_then(|s| s.pulse);

    let mut rendered: Vec<RenderedSector> = sectors
        .iter()
        .map(|sector| {
            let flagged = if by_sector {
                status_has_color && affected.contains(&sector.number)
            } else {
                status_has_color
            };

            let (color, stroke_width) = if flagged {
                (SectorColor::Flagged, FLAGGED_STROKE_WIDTH)
            } else {
                (SectorColor::Neutral, BASE_STROKE_WIDTH)
            };

            RenderedSector {
                number: sector.number,
                path: sector.points.clone(),
                color,
                stroke_width,
                pulse,
            }
        })
        .collect();

    rendered.sort_by_key(|s| (s.color == SectorColor::Flagged, s.number));
    rendered
}
