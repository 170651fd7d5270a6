//! Polygon kernel facade.
//!
//! Offsets and booleans are delegated to `cavalier_contours`; this module
//! only adapts loops in and out and applies the result-selection rules the
//! massing strategies share (greatest area wins, negative loops become voids).

use cavalier_contours::polyline::{BooleanOp, PlineSource};

use super::pline::{closed_pline, pline_to_loop};
use super::profile::Profile;
use crate::error::{GeometryError, Result};
use crate::math::intersect_2d::infinite_line_intersection;
use crate::math::polygon_2d::{
    interior_point, left_normal, point_strictly_inside, signed_area, to_ccw,
};
use crate::math::{Point2, Vector2, MATCH_TOLERANCE, TOLERANCE};

/// Maximum miter distance as a multiple of the offset distance. Sharper
/// joins are beveled with two points.
const MITER_LIMIT: f64 = 4.0;

/// Loops smaller than this are discarded from kernel output.
const MIN_LOOP_AREA: f64 = 1e-6;

fn is_usable(points: &[Point2]) -> bool {
    points.len() >= 3 && signed_area(points).abs() > MIN_LOOP_AREA
}

/// Offsets a closed loop toward its interior by `distance`.
///
/// Returns every resulting loop (an inward offset can split a shape), each
/// wound counter-clockwise. An empty vector means the loop collapsed.
#[must_use]
pub fn offset_inward(points: &[Point2], distance: f64) -> Vec<Vec<Point2>> {
    if !is_usable(points) {
        return Vec::new();
    }
    if distance.abs() < TOLERANCE {
        return vec![to_ccw(points)];
    }
    // Positive kernel offsets go to the left, which is inward for CCW loops.
    closed_pline(&to_ccw(points))
        .parallel_offset(distance)
        .iter()
        .map(|pline| to_ccw(&pline_to_loop(pline)))
        .filter(|pts| is_usable(pts))
        .collect()
}

/// Runs a kernel boolean between two outer loops and assembles profiles:
/// each positive loop is a perimeter, each negative loop a void of the
/// positive loop that contains it.
fn boolean_loops(a: &[Point2], b: &[Point2], op: BooleanOp) -> Vec<Profile> {
    let a_ok = is_usable(a);
    let b_ok = is_usable(b);
    match (a_ok, b_ok, op) {
        (false, false, _) | (false, _, BooleanOp::And | BooleanOp::Not) => return Vec::new(),
        (true, false, BooleanOp::And) => return Vec::new(),
        (true, false, _) => return vec![Profile::new(to_ccw(a))],
        (false, true, _) => return vec![Profile::new(to_ccw(b))],
        (true, true, _) => {}
    }

    let result = closed_pline(&to_ccw(a)).boolean(&closed_pline(&to_ccw(b)), op);
    let mut profiles: Vec<Profile> = result
        .pos_plines
        .iter()
        .map(|r| to_ccw(&pline_to_loop(&r.pline)))
        .filter(|pts| is_usable(pts))
        .map(Profile::new)
        .collect();
    for neg in &result.neg_plines {
        let hole = pline_to_loop(&neg.pline);
        if is_usable(&hole) {
            attach_void(&mut profiles, hole);
        }
    }
    profiles
}

/// Adds `hole` (any winding) as a clockwise void of the first profile whose
/// perimeter contains it. Holes with no container are dropped.
fn attach_void(profiles: &mut [Profile], hole: Vec<Point2>) {
    let Some(probe) = interior_point(&hole) else {
        return;
    };
    if let Some(owner) = profiles
        .iter_mut()
        .find(|p| point_strictly_inside(&probe, &p.perimeter, TOLERANCE))
    {
        owner.voids.push(to_ccw(&hole).into_iter().rev().collect());
    }
}

/// Subtracts `cutter` from `profile`, carrying the profile's existing voids
/// over to whichever piece still contains them.
#[must_use]
pub fn difference(profile: &Profile, cutter: &[Point2]) -> Vec<Profile> {
    let mut pieces = boolean_loops(&profile.perimeter, cutter, BooleanOp::Not);
    for void in &profile.voids {
        attach_void(&mut pieces, void.clone());
    }
    pieces
}

/// Intersects `shape` (an outer loop) with `clip`, honoring the clip's voids.
#[must_use]
pub fn intersection(shape: &[Point2], clip: &Profile) -> Vec<Profile> {
    let mut pieces = boolean_loops(shape, &clip.perimeter, BooleanOp::And);
    for void in &clip.voids {
        pieces = pieces.iter().flat_map(|p| difference(p, void)).collect();
    }
    pieces
}

/// Intersects every profile in `shapes` with `clip`.
#[must_use]
pub fn intersection_all(shapes: &[Profile], clip: &Profile) -> Vec<Profile> {
    let mut out = Vec::new();
    for shape in shapes {
        let mut pieces = intersection(&shape.perimeter, clip);
        for void in &shape.voids {
            pieces = pieces.iter().flat_map(|p| difference(p, void)).collect();
        }
        out.extend(pieces);
    }
    out
}

/// Unions a set of profiles into disjoint profiles.
///
/// Each incoming shape is merged into every accumulated profile it overlaps;
/// shapes that touch nothing are kept as separate profiles. A void survives a
/// merge unless the other shape fills it.
#[must_use]
pub fn union_all(shapes: Vec<Profile>) -> Vec<Profile> {
    let mut merged: Vec<Profile> = Vec::new();
    for shape in shapes.into_iter().filter(|s| is_usable(&s.perimeter)) {
        let mut current = shape.normalized();
        let mut i = 0;
        while i < merged.len() {
            let combined = boolean_loops(&merged[i].perimeter, &current.perimeter, BooleanOp::Or);
            if let [single] = combined.as_slice() {
                let mut joined = single.clone();
                let previous = merged.remove(i);
                let kept_previous: Vec<_> = previous
                    .voids
                    .iter()
                    .filter(|v| !fills(&current, v))
                    .cloned()
                    .collect();
                let kept_current: Vec<_> = current
                    .voids
                    .iter()
                    .filter(|v| !fills(&previous, v))
                    .cloned()
                    .collect();
                joined.voids.extend(kept_previous);
                joined.voids.extend(kept_current);
                current = joined;
                // Restart: the grown profile may now reach earlier ones.
                i = 0;
            } else {
                i += 1;
            }
        }
        merged.push(current);
    }
    merged
}

/// Returns `true` if `profile`'s filled area covers the inside of `hole`.
fn fills(profile: &Profile, hole: &[Point2]) -> bool {
    interior_point(hole).is_some_and(|p| {
        point_strictly_inside(&p, &profile.perimeter, TOLERANCE)
            && !profile
                .voids
                .iter()
                .any(|v| point_strictly_inside(&p, v, TOLERANCE))
    })
}

/// Picks the profile with the greatest net area. Ties keep the later one.
#[must_use]
pub fn largest(profiles: Vec<Profile>) -> Option<Profile> {
    profiles
        .into_iter()
        .filter(|p| p.area() > MIN_LOOP_AREA)
        .max_by(|a, b| a.area().total_cmp(&b.area()))
}

/// Picks the loop with the greatest absolute area.
#[must_use]
pub fn largest_loop(loops: Vec<Vec<Point2>>) -> Option<Vec<Point2>> {
    loops
        .into_iter()
        .max_by(|a, b| signed_area(a).abs().total_cmp(&signed_area(b).abs()))
}

/// Offsets an open polyline to one side by `distance` (positive = left of
/// the walking direction) with mitered joins.
///
/// Joins on the outside of a turn whose miter exceeds `MITER_LIMIT` are
/// beveled; joins on the inside always meet at the miter point.
///
/// When `extend` is set, the first and last points are pushed outward along
/// their segment by `|distance|` (square end caps).
///
/// # Errors
///
/// Returns `GeometryError::TooFewVertices` if fewer than 2 distinct points
/// remain after merging duplicates.
pub fn offset_open(points: &[Point2], distance: f64, extend: bool) -> Result<Vec<Point2>> {
    let pts = dedup_points(points);
    if pts.len() < 2 {
        return Err(GeometryError::TooFewVertices(pts.len()).into());
    }
    let dirs: Vec<Vector2> = pts
        .windows(2)
        .map(|w| (w[1] - w[0]).normalize())
        .collect();
    let normals: Vec<Vector2> = dirs.iter().map(|d| left_normal(*d)).collect();
    let cap = if extend { distance.abs() } else { 0.0 };

    let mut out = Vec::with_capacity(pts.len() + 2);
    out.push(pts[0] - dirs[0] * cap + normals[0] * distance);

    for i in 1..pts.len() - 1 {
        let prev_a = pts[i - 1] + normals[i - 1] * distance;
        let prev_b = pts[i] + normals[i - 1] * distance;
        let next_a = pts[i] + normals[i] * distance;
        let next_b = pts[i + 1] + normals[i] * distance;
        // The offset side lies inside the turn when it turns toward that side.
        let inner = dirs[i - 1].perp(&dirs[i]) * distance > 0.0;
        match infinite_line_intersection(&prev_a, &prev_b, &next_a, &next_b) {
            Some(miter) if inner || (miter - pts[i]).norm() <= MITER_LIMIT * distance.abs() => {
                out.push(miter);
            }
            Some(_) => {
                out.push(prev_b);
                out.push(next_a);
            }
            None => out.push(next_a),
        }
    }

    let last = pts.len() - 1;
    let last_dir = dirs[last - 1];
    out.push(pts[last] + last_dir * cap + normals[last - 1] * distance);
    Ok(out)
}

/// Builds the closed band around an open polyline: `half_width` to each side,
/// mitered joins, ends squared off and extended by `half_width`.
///
/// # Errors
///
/// Returns an error if the polyline has fewer than 2 distinct points or the
/// half width is not positive.
pub fn square_offset(points: &[Point2], half_width: f64) -> Result<Vec<Point2>> {
    if half_width <= TOLERANCE {
        return Err(GeometryError::Degenerate(format!("band half width {half_width}")).into());
    }
    let left = offset_open(points, half_width, true)?;
    let right = offset_open(points, -half_width, true)?;
    let mut band = left;
    band.extend(right.into_iter().rev());
    if signed_area(&band).abs() < MIN_LOOP_AREA {
        return Err(GeometryError::EmptyResult {
            operation: "square offset",
        }
        .into());
    }
    Ok(to_ccw(&band))
}

/// Builds the occupied band around a skeleton polyline.
///
/// Open polylines get a [`square_offset`] band. A polyline that ends on its
/// own start is a ring: its band is the outward offset with the inward
/// offset as a void.
///
/// # Errors
///
/// Returns an error if the band cannot be built.
pub fn band(points: &[Point2], half_width: f64) -> Result<Profile> {
    let closed = points.len() >= 4
        && points
            .first()
            .zip(points.last())
            .is_some_and(|(a, b)| (a - b).norm() < MATCH_TOLERANCE);
    if !closed {
        return Ok(Profile::new(square_offset(points, half_width)?));
    }
    let ring = &points[..points.len() - 1];
    let outer = largest_loop(offset_inward(ring, -half_width)).ok_or(
        GeometryError::EmptyResult {
            operation: "ring outward offset",
        },
    )?;
    let voids = offset_inward(ring, half_width)
        .into_iter()
        .map(|v| v.into_iter().rev().collect())
        .collect();
    Ok(Profile::with_voids(outer, voids))
}

fn dedup_points(points: &[Point2]) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_none_or(|last| (last - p).norm() > TOLERANCE) {
            out.push(*p);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::intersect_2d::segments_cross;
    use crate::math::polygon_2d::loop_edges;
    use approx::assert_relative_eq;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ]
    }

    #[test]
    fn inward_offset_of_square() {
        let loops = offset_inward(&rect(0.0, 0.0, 100.0, 100.0), 10.0);
        assert_eq!(loops.len(), 1);
        assert_relative_eq!(signed_area(&loops[0]), 6400.0, epsilon = 1e-6);
    }

    #[test]
    fn inward_offset_of_clockwise_square() {
        let cw: Vec<Point2> = rect(0.0, 0.0, 100.0, 100.0).into_iter().rev().collect();
        let loops = offset_inward(&cw, 10.0);
        assert_eq!(loops.len(), 1);
        assert_relative_eq!(signed_area(&loops[0]), 6400.0, epsilon = 1e-6);
    }

    #[test]
    fn inward_offset_collapses() {
        assert!(offset_inward(&rect(0.0, 0.0, 10.0, 10.0), 6.0).is_empty());
    }

    #[test]
    fn difference_with_inner_loop_creates_void() {
        let outer = Profile::new(rect(0.0, 0.0, 100.0, 100.0));
        let pieces = difference(&outer, &rect(10.0, 10.0, 90.0, 90.0));
        let donut = largest(pieces).unwrap();
        assert_eq!(donut.voids.len(), 1);
        assert_relative_eq!(donut.area(), 3600.0, epsilon = 1e-6);
    }

    #[test]
    fn intersection_of_crossing_rectangles() {
        let clip = Profile::new(rect(0.0, 0.0, 10.0, 10.0));
        let pieces = intersection(&rect(5.0, -5.0, 15.0, 5.0), &clip);
        assert_eq!(pieces.len(), 1);
        assert_relative_eq!(pieces[0].area(), 25.0, epsilon = 1e-6);
    }

    #[test]
    fn intersection_of_disjoint_is_empty() {
        let clip = Profile::new(rect(0.0, 0.0, 10.0, 10.0));
        assert!(intersection(&rect(20.0, 20.0, 30.0, 30.0), &clip).is_empty());
    }

    #[test]
    fn union_merges_overlapping_and_keeps_disjoint() {
        let shapes = vec![
            Profile::new(rect(0.0, 0.0, 10.0, 2.0)),
            Profile::new(rect(50.0, 50.0, 60.0, 60.0)),
            Profile::new(rect(4.0, -5.0, 6.0, 5.0)),
        ];
        let merged = union_all(shapes);
        assert_eq!(merged.len(), 2);
        let cross = merged.iter().find(|p| p.centroid().x < 20.0).unwrap();
        // 10x2 bar + 2x10 bar - 2x2 overlap.
        assert_relative_eq!(cross.area(), 36.0, epsilon = 1e-6);
    }

    #[test]
    fn square_offset_of_segment() {
        let band =
            square_offset(&[Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)], 1.0).unwrap();
        assert_eq!(band.len(), 4);
        // (10 + 2) x 2
        assert_relative_eq!(signed_area(&band), 24.0, epsilon = 1e-9);
    }

    #[test]
    fn square_offset_of_corner_is_mitered() {
        let band = square_offset(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
            ],
            1.0,
        )
        .unwrap();
        assert_eq!(band.len(), 6);
        // Two 12x2 arms overlapping in a 2x2 corner square.
        assert_relative_eq!(signed_area(&band), 44.0, epsilon = 1e-9);
    }

    #[test]
    fn acute_turn_band_is_simple() {
        let band = square_offset(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(100.0, 0.0),
                Point2::new(0.0, 25.0),
            ],
            5.0,
        )
        .unwrap();
        let edges: Vec<_> = loop_edges(&band).collect();
        for (i, (a0, a1)) in edges.iter().enumerate() {
            for (b0, b1) in &edges[i + 1..] {
                assert!(!segments_cross(a0, a1, b0, b1), "band crosses itself: {band:?}");
            }
        }
        // Inside the turn the two offsets meet at their intersection.
        let miter = Point2::new(80.0 - 5.0 * 17.0_f64.sqrt(), 5.0);
        assert!(band.iter().any(|p| (p - miter).norm() < 1e-9));
        // Outside the turn the long miter is beveled at the corner.
        assert!(band.iter().any(|p| (p - Point2::new(100.0, -5.0)).norm() < 1e-9));
    }

    #[test]
    fn open_offset_without_extension() {
        let side = offset_open(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
            ],
            2.0,
            false,
        )
        .unwrap();
        assert_eq!(
            side,
            vec![
                Point2::new(0.0, 2.0),
                Point2::new(8.0, 2.0),
                Point2::new(8.0, 10.0)
            ]
        );
    }

    #[test]
    fn closed_skeleton_gives_ring_band() {
        let ring = vec![
            Point2::new(0.0, 0.0),
            Point2::new(20.0, 0.0),
            Point2::new(20.0, 20.0),
            Point2::new(0.0, 20.0),
            Point2::new(0.0, 0.0),
        ];
        let profile = band(&ring, 2.0).unwrap();
        assert_eq!(profile.voids.len(), 1);
        // Outer offset has rounded corners: 24x24 minus the four corner cutoffs.
        let expected = 24.0 * 24.0 - 4.0 * (4.0 - std::f64::consts::PI) - 16.0 * 16.0;
        assert!((profile.area() - expected).abs() < 0.5, "area={}", profile.area());
    }

    #[test]
    fn square_offset_rejects_single_point() {
        assert!(square_offset(&[Point2::new(1.0, 1.0), Point2::new(1.0, 1.0)], 1.0).is_err());
    }

    #[test]
    fn largest_prefers_area() {
        let small = Profile::new(rect(0.0, 0.0, 1.0, 1.0));
        let big = Profile::new(rect(0.0, 0.0, 5.0, 5.0));
        assert_eq!(largest(vec![small, big.clone()]), Some(big));
        assert!(largest(Vec::new()).is_none());
    }
}
