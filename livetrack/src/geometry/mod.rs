//! Geometry kernel for the track map.
//!
//! Provides the three primitives the rest of the pipeline is built on:
//! rotating points into the display frame, Euclidean distance, and
//! nearest-point search over the raw circuit trace.
//!
//! All functions are pure and deterministic; the same inputs always produce
//! the same outputs, with no hidden state.

mod types;

pub use types::{GeometryError, TrackPosition};

/// Rotates a point around a pivot by an angle in degrees.
///
/// The point is translated so the pivot sits at the origin, rotated by the
/// standard 2D rotation matrix, then translated back. A zero angle returns
/// the input unchanged.
///
/// # Arguments
///
/// * `point` - The point to rotate
/// * `angle_deg` - Rotation angle in degrees (counter-clockwise)
/// * `pivot` - The center of rotation
#[inline]
pub fn rotate(point: TrackPosition, angle_deg: f64, pivot: TrackPosition) -> TrackPosition {
    let rad = angle_deg.to_radians();
    let (sin, cos) = rad.sin_cos();

    let x = point.x - pivot.x;
    let y = point.y - pivot.y;

    TrackPosition {
        x: x * cos - y * sin + pivot.x,
        y: x * sin + y * cos + pivot.y,
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: TrackPosition, b: TrackPosition) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Returns the index of the point in `points` closest to `target`.
///
/// Ties keep the lowest index: the scan only replaces the current best on a
/// strictly smaller distance.
///
/// # Errors
///
/// Returns [`GeometryError::EmptyPointSet`] when `points` is empty. A map
/// with no trace points cannot be segmented; callers must treat this as a
/// fatal configuration error.
pub fn nearest_index(
    target: TrackPosition,
    points: &[TrackPosition],
) -> Result<usize, GeometryError> {
    let mut best = f64::INFINITY;
    let mut best_index = None;

    for (i, point) in points.iter().enumerate() {
        let d = distance(target, *point);
        if d < best {
            best = d;
            best_index = Some(i);
        }
    }

    best_index.ok_or(GeometryError::EmptyPointSet)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: TrackPosition, b: TrackPosition) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
    }

    #[test]
    fn test_rotate_zero_angle_is_identity() {
        let p = TrackPosition::new(123.4, -567.8);
        let pivot = TrackPosition::new(50.0, 50.0);

        let rotated = rotate(p, 0.0, pivot);
        assert!(approx_eq(rotated, p), "Expected {}, got {}", p, rotated);
    }

    #[test]
    fn test_rotate_quarter_turn_around_origin() {
        let p = TrackPosition::new(1.0, 0.0);
        let rotated = rotate(p, 90.0, TrackPosition::default());

        assert!((rotated.x - 0.0).abs() < EPSILON);
        assert!((rotated.y - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_rotate_half_turn_around_pivot() {
        let pivot = TrackPosition::new(10.0, 10.0);
        let p = TrackPosition::new(12.0, 10.0);

        let rotated = rotate(p, 180.0, pivot);
        assert!(approx_eq(rotated, TrackPosition::new(8.0, 10.0)));
    }

    #[test]
    fn test_rotate_preserves_distance_to_pivot() {
        let pivot = TrackPosition::new(-3.0, 7.5);
        let p = TrackPosition::new(42.0, -13.0);

        let rotated = rotate(p, 37.3, pivot);
        assert!((distance(p, pivot) - distance(rotated, pivot)).abs() < 1e-6);
    }

    #[test]
    fn test_distance_axis_aligned() {
        let a = TrackPosition::new(0.0, 0.0);
        let b = TrackPosition::new(3.0, 4.0);
        assert!((distance(a, b) - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = TrackPosition::new(-2.5, 9.0);
        let b = TrackPosition::new(4.0, -1.0);
        assert!((distance(a, b) - distance(b, a)).abs() < EPSILON);
    }

    #[test]
    fn test_nearest_index_picks_closest() {
        let points = vec![
            TrackPosition::new(0.0, 0.0),
            TrackPosition::new(10.0, 0.0),
            TrackPosition::new(20.0, 0.0),
        ];

        let idx = nearest_index(TrackPosition::new(11.0, 1.0), &points).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn test_nearest_index_tie_keeps_lowest() {
        // Target is equidistant from indices 0 and 2.
        let points = vec![
            TrackPosition::new(-1.0, 0.0),
            TrackPosition::new(5.0, 5.0),
            TrackPosition::new(1.0, 0.0),
        ];

        let idx = nearest_index(TrackPosition::new(0.0, 0.0), &points).unwrap();
        assert_eq!(idx, 0, "Tie must keep the first occurrence");
    }

    #[test]
    fn test_nearest_index_empty_is_error() {
        let result = nearest_index(TrackPosition::new(0.0, 0.0), &[]);
        assert_eq!(result.unwrap_err(), GeometryError::EmptyPointSet);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_rotate_identity_at_zero(
                x in -1e6..1e6_f64,
                y in -1e6..1e6_f64,
                px in -1e6..1e6_f64,
                py in -1e6..1e6_f64,
            ) {
                let p = TrackPosition::new(x, y);
                let rotated = rotate(p, 0.0, TrackPosition::new(px, py));

                prop_assert!((rotated.x - x).abs() < 1e-6);
                prop_assert!((rotated.y - y).abs() < 1e-6);
            }

            #[test]
            fn test_rotate_roundtrip(
                x in -1e5..1e5_f64,
                y in -1e5..1e5_f64,
                angle in -720.0..720.0_f64,
                px in -1e5..1e5_f64,
                py in -1e5..1e5_f64,
            ) {
                let pivot = TrackPosition::new(px, py);
                let p = TrackPosition::new(x, y);

                let there = rotate(p, angle, pivot);
                let back = rotate(there, -angle, pivot);

                prop_assert!(
                    (back.x - x).abs() < 1e-5 && (back.y - y).abs() < 1e-5,
                    "Round trip drifted: {} -> {} -> {}",
                    p, there, back
                );
            }

            #[test]
            fn test_rotate_preserves_pivot_distance(
                x in -1e5..1e5_f64,
                y in -1e5..1e5_f64,
                angle in -360.0..360.0_f64,
            ) {
                let pivot = TrackPosition::new(7.0, -3.0);
                let p = TrackPosition::new(x, y);
                let rotated = rotate(p, angle, pivot);

                let before = distance(p, pivot);
                let after = distance(rotated, pivot);
                prop_assert!((before - after).abs() < 1e-5);
            }

            #[test]
            fn test_nearest_index_in_bounds(
                points in prop::collection::vec((-1e4..1e4_f64, -1e4..1e4_f64), 1..64),
                tx in -1e4..1e4_f64,
                ty in -1e4..1e4_f64,
            ) {
                let points: Vec<TrackPosition> = points
                    .into_iter()
                    .map(|(x, y)| TrackPosition::new(x, y))
                    .collect();

                let idx = nearest_index(TrackPosition::new(tx, ty), &points).unwrap();
                prop_assert!(idx < points.len());
            }

            #[test]
            fn test_nearest_index_is_minimal(
                points in prop::collection::vec((-1e4..1e4_f64, -1e4..1e4_f64), 1..64),
                tx in -1e4..1e4_f64,
                ty in -1e4..1e4_f64,
            ) {
                let points: Vec<TrackPosition> = points
                    .into_iter()
                    .map(|(x, y)| TrackPosition::new(x, y))
                    .collect();
                let target = TrackPosition::new(tx, ty);

                let idx = nearest_index(target, &points).unwrap();
                let chosen = distance(target, points[idx]);
                for p in &points {
                    prop_assert!(chosen <= distance(target, *p) + 1e-12);
                }
            }
        }
    }
}
