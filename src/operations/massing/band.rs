use crate::error::{GeometryError, Result};
use crate::geometry::kernel::{intersection, largest, offset_open, square_offset};
use crate::geometry::{Profile, Skeleton};
use crate::math::polygon_2d::polyline_length;
use crate::math::Point2;

/// Windows whose endpoints are closer than this many band widths are penalized.
const END_PROXIMITY_FACTOR: f64 = 4.0;

/// Score lost per unit of missing endpoint separation.
const END_PROXIMITY_WEIGHT: f64 = 3.0;

/// Band along the best run of `n` consecutive boundary edges (L: 2, U: 3).
///
/// Windows are scored by length, penalized when the run nearly closes on
/// itself. The winning run is thickened by `band_width` to both sides and
/// clipped to the boundary, so the kept band is `band_width` deep; the
/// skeleton is the run offset inward by half the band width.
///
/// `boundary` must be wound counter-clockwise.
pub(super) fn contiguous_edge_band(
    boundary: &Profile,
    band_width: f64,
    n: usize,
) -> Result<(Profile, Skeleton)> {
    let run = best_edge_run(&boundary.perimeter, band_width, n)
        .ok_or(GeometryError::TooFewVertices(boundary.perimeter.len()))?;

    let band = square_offset(&run, band_width)?;
    let profile = largest(intersection(&band, boundary)).ok_or(GeometryError::EmptyResult {
        operation: "edge band intersection",
    })?;
    let centerline = offset_open(&run, band_width * 0.5, false)?;
    Ok((profile, Skeleton::new(vec![centerline])))
}

/// Returns the `n + 1` vertices of the highest-scoring window of `n`
/// consecutive edges. The first window wins ties.
fn best_edge_run(vertices: &[Point2], band_width: f64, n: usize) -> Option<Vec<Point2>> {
    let count = vertices.len();
    if count < n + 1 {
        return None;
    }
    let min_span = band_width * END_PROXIMITY_FACTOR;
    let mut best: Option<(f64, Vec<Point2>)> = None;
    for i in 0..count {
        let run: Vec<Point2> = (0..=n).map(|j| vertices[(i + j) % count]).collect();
        let mut score = polyline_length(&run);
        let span = (run[n] - run[0]).norm();
        if span < min_span {
            score -= (min_span - span) * END_PROXIMITY_WEIGHT;
        }
        if best.as_ref().is_none_or(|(best_score, _)| score > *best_score) {
            best = Some((score, run));
        }
    }
    best.map(|(_, run)| run)
}
