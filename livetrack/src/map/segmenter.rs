//! Marshal-sector segmentation of the circuit trace.
//!
//! Splits the closed trace into contiguous sectors. Each sector boundary is
//! the trace point nearest to that sector's start landmark, so the partition
//! follows the marshal posts even when landmark coordinates sit slightly off
//! the polyline.
//!
//! # Invariant
//!
//! Slices are half-open: sector k owns `trace[divider[k]..divider[k + 1])`
//! (wrapping past the end of the array for the final sector). Concatenating
//! all sectors in number order therefore reproduces the closed loop exactly
//! once, starting from the first sector's divider.

use crate::geometry::{self, TrackPosition};

use super::{MapError, RawMap};

/// A contiguous arc of the track bounded by two marshal landmarks.
///
/// Built once per map load and immutable afterwards. `number` is 1-based and
/// stable, assigned in marshal-sector order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    pub number: u32,
    pub start: TrackPosition,
    pub end: TrackPosition,
    pub points: Vec<TrackPosition>,
}

impl Sector {
    /// This sector with every coordinate rotated into the display frame.
    pub fn rotated(&self, angle_deg: f64, pivot: TrackPosition) -> Sector {
        Sector {
            number: self.number,
            start: geometry::rotate(self.start, angle_deg, pivot),
            end: geometry::rotate(self.end, angle_deg, pivot),
            points: self
                .points
                .iter()
                .map(|&p| geometry::rotate(p, angle_deg, pivot))
                .collect(),
        }
    }
}

/// Partitions the map's trace into marshal sectors.
///
/// Landmark k starts sector k; its end landmark is landmark k + 1, wrapping
/// to the first landmark for the final sector. Two landmarks that resolve to
/// the same trace index yield an empty sector, which is kept in the output
/// (renderers skip it) so sector numbering stays stable.
///
/// # Errors
///
/// Returns [`MapError`] when the map fails validation. The map is validated
/// here so segmentation is safe to call directly on freshly fetched data.
pub fn segment(map: &RawMap) -> Result<Vec<Sector>, MapError> {
    map.validate()?;

    let trace = map.trace();
    let landmarks = &map.marshal_sectors;

    let dividers: Vec<usize> = landmarks
        .iter()
        .map(|m| geometry::nearest_index(m.track_position, &trace))
        .collect::<Result<_, _>>()?;

    let mut sectors = Vec::with_capacity(landmarks.len());
    for (k, landmark) in landmarks.iter().enumerate() {
        let next = (k + 1) % landmarks.len();
        let start_idx = dividers[k];
        let end_idx = dividers[next];

        let points = if landmarks.len() == 1 {
            // A lone landmark owns the whole loop, rotated to its divider.
            let mut run = trace[start_idx..].to_vec();
            run.extend_from_slice(&trace[..start_idx]);
            run
        } else {
            match start_idx.cmp(&end_idx) {
                std::cmp::Ordering::Less => trace[start_idx..end_idx].to_vec(),
                // Wrap past the end of the trace array.
                std::cmp::Ordering::Greater => {
                    let mut run = trace[start_idx..].to_vec();
                    run.extend_from_slice(&trace[..end_idx]);
                    run
                }
                // Adjacent landmarks collapsed onto one trace point.
                std::cmp::Ordering::Equal => Vec::new(),
            }
        };

        sectors.push(Sector {
            number: (k + 1) as u32,
            start: landmark.track_position,
            end: landmarks[next].track_position,
            points,
        });
    }

    Ok(sectors)
}
