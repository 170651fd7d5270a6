use crate::error::{GeometryError, Result};
use crate::geometry::kernel::{intersection, largest, square_offset};
use crate::geometry::{Profile, Skeleton};
use crate::math::intersect_2d::chord_through;
use crate::math::polygon_2d::{centroid, loop_edges, segment_direction};

/// Single bar along the longest chord through the centroid.
///
/// Candidate chords run parallel to each boundary edge; the first longest
/// one wins.
pub(super) fn bar(boundary: &Profile, half_width: f64) -> Result<(Profile, Skeleton)> {
    let center = centroid(&boundary.perimeter);
    let mut best = None;
    let mut best_len = 0.0;
    for (a, b) in loop_edges(&boundary.perimeter) {
        let Ok(dir) = segment_direction(&a, &b) else {
            continue;
        };
        let Some((back, front)) = chord_through(&center, &dir, &boundary.perimeter) else {
            continue;
        };
        let len = (front - back).norm();
        if len > best_len {
            best_len = len;
            best = Some((back, front));
        }
    }
    let (back, front) = best.ok_or_else(|| {
        GeometryError::Degenerate("no chord through the centroid".to_owned())
    })?;

    let band = square_offset(&[back, front], half_width)?;
    let profile = largest(intersection(&band, boundary))
        .ok_or(GeometryError::EmptyResult { operation: "bar clip" })?;
    Ok((profile, Skeleton::from_segments(&[(back, front)])))
}
