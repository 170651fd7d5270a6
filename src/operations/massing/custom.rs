use crate::error::{GeometryError, Result};
use crate::geometry::kernel::{band, intersection_all, largest, union_all};
use crate::geometry::{Profile, Skeleton};
use crate::math::distance_2d::points_coincide;
use crate::math::{Point2, MATCH_TOLERANCE};

/// Upper bound on successive merges of one incoming polyline while joining
/// skeleton polylines.
pub const MAX_JOIN_PASSES: usize = 50;

/// Joins polylines whose endpoints coincide (within `tolerance`) into longer
/// polylines.
///
/// Each incoming polyline keeps absorbing joined polylines it touches, at
/// most [`MAX_JOIN_PASSES`] times; a chain that reaches the cap is kept as
/// it stands.
#[must_use]
pub fn join_polylines(polylines: &[Vec<Point2>], tolerance: f64) -> Vec<Vec<Point2>> {
    join_with_limit(polylines, tolerance, MAX_JOIN_PASSES)
}

fn join_with_limit(
    polylines: &[Vec<Point2>],
    tolerance: f64,
    max_merges: usize,
) -> Vec<Vec<Point2>> {
    let mut joined: Vec<Vec<Point2>> = Vec::new();
    for polyline in polylines.iter().filter(|pl| pl.len() >= 2) {
        let mut chain = polyline.clone();
        let mut merges = 0;
        while let Some(merged) = merge_into(&mut joined, &chain, tolerance) {
            chain = merged;
            merges += 1;
            if merges >= max_merges {
                tracing::debug!(
                    points = chain.len(),
                    "skeleton join stopped at the pass limit"
                );
                break;
            }
        }
        joined.push(chain);
    }
    joined
}

/// Removes the first polyline in `joined` that shares an endpoint with
/// `incoming` and returns the two merged.
///
/// Matches are tried start-to-start, then an existing end onto the incoming
/// start, an existing start onto the incoming end, and finally end-to-end.
fn merge_into(
    joined: &mut Vec<Vec<Point2>>,
    incoming: &[Point2],
    tolerance: f64,
) -> Option<Vec<Point2>> {
    let (start, end) = (incoming.first()?, incoming.last()?);
    let near = |a: Option<&Point2>, b: &Point2| a.is_some_and(|a| points_coincide(a, b, tolerance));
    let head = &incoming[..incoming.len() - 1];
    let tail = &incoming[1..];

    if let Some(i) = joined.iter().position(|pl| near(pl.first(), start)) {
        let existing = joined.remove(i);
        return Some(tail.iter().rev().chain(&existing).copied().collect());
    }
    if let Some(i) = joined.iter().position(|pl| near(pl.last(), start)) {
        let existing = joined.remove(i);
        return Some(existing.iter().chain(tail).copied().collect());
    }
    if let Some(i) = joined.iter().position(|pl| near(pl.first(), end)) {
        let existing = joined.remove(i);
        return Some(head.iter().chain(&existing).copied().collect());
    }
    if let Some(i) = joined.iter().position(|pl| near(pl.last(), end)) {
        let existing = joined.remove(i);
        return Some(existing.iter().chain(head.iter().rev()).copied().collect());
    }
    None
}

/// Band of `2 * half_width` around a caller-supplied skeleton, clipped to
/// the boundary when there is one.
pub(super) fn custom(
    boundary: Option<&Profile>,
    skeleton: &Skeleton,
    half_width: f64,
) -> Result<Profile> {
    let segments: Vec<Vec<Point2>> = skeleton.segments().map(|(a, b)| vec![a, b]).collect();
    let bands: Vec<Profile> = join_polylines(&segments, MATCH_TOLERANCE)
        .iter()
        .filter_map(|pl| band(pl, half_width).ok())
        .collect();
    let merged = union_all(bands);
    let pieces = match boundary.filter(|b| b.is_valid()) {
        Some(boundary) => intersection_all(&merged, &boundary.normalized()),
        None => merged,
    };
    largest(pieces).ok_or_else(|| {
        GeometryError::EmptyResult {
            operation: "custom band",
        }
        .into()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2> {
        vec![Point2::new(x0, y0), Point2::new(x1, y1)]
    }

    #[test]
    fn shuffled_segments_join_into_one_polyline() {
        let parts = vec![
            seg(10.0, 0.0, 10.0, 10.0),
            seg(0.0, 0.0, 10.0, 0.0),
            seg(0.0, 10.0, 10.0, 10.0),
        ];
        let joined = join_polylines(&parts, MATCH_TOLERANCE);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].len(), 4);
        let length: f64 = joined[0].windows(2).map(|w| (w[1] - w[0]).norm()).sum();
        assert_relative_eq!(length, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn nearly_touching_endpoints_join() {
        let parts = vec![seg(0.0, 0.0, 5.0, 0.0), seg(5.005, 0.0, 9.0, 0.0)];
        assert_eq!(join_polylines(&parts, MATCH_TOLERANCE).len(), 1);
    }

    #[test]
    fn disjoint_segments_stay_apart() {
        let parts = vec![seg(0.0, 0.0, 5.0, 0.0), seg(0.0, 10.0, 5.0, 10.0)];
        assert_eq!(join_polylines(&parts, MATCH_TOLERANCE).len(), 2);
    }

    #[test]
    fn long_ordered_chain_joins_fully() {
        let parts: Vec<_> = (0..80)
            .map(|i| seg(f64::from(i), 0.0, f64::from(i + 1), 0.0))
            .collect();
        let joined = join_polylines(&parts, MATCH_TOLERANCE);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].len(), 81);
    }

    #[test]
    fn long_reversed_zigzag_joins_fully() {
        let parts: Vec<_> = (0..60)
            .rev()
            .map(|i| {
                let (x0, x1) = (f64::from(i) * 5.0, f64::from(i + 1) * 5.0);
                let (y0, y1) = (f64::from(i % 2) * 5.0, f64::from((i + 1) % 2) * 5.0);
                seg(x0, y0, x1, y1)
            })
            .collect();
        let joined = join_polylines(&parts, MATCH_TOLERANCE);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].len(), 61);
    }

    #[test]
    fn merges_per_chain_are_capped() {
        // The middle segment bridges the other two: two merges for one chain.
        let parts = vec![
            seg(0.0, 0.0, 1.0, 0.0),
            seg(2.0, 0.0, 3.0, 0.0),
            seg(1.0, 0.0, 2.0, 0.0),
        ];
        assert_eq!(join_with_limit(&parts, MATCH_TOLERANCE, 1).len(), 2);
        let joined = join_with_limit(&parts, MATCH_TOLERANCE, 2);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].len(), 4);
    }

    #[test]
    fn band_is_clipped_to_boundary() {
        let boundary = Profile::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(100.0, 100.0),
            Point2::new(0.0, 100.0),
        ]);
        let skeleton = Skeleton::from_segments(&[(Point2::new(-20.0, 50.0), Point2::new(120.0, 50.0))]);
        let profile = custom(Some(&boundary), &skeleton, 5.0).unwrap();
        assert_relative_eq!(profile.area(), 1000.0, epsilon = 1e-6);
    }

    #[test]
    fn free_floating_band_without_boundary() {
        let skeleton = Skeleton::from_segments(&[(Point2::new(0.0, 0.0), Point2::new(30.0, 0.0))]);
        let profile = custom(None, &skeleton, 2.0).unwrap();
        // Square ends add half a width at each end.
        assert_relative_eq!(profile.area(), 34.0 * 4.0, epsilon = 1e-6);
    }
}
