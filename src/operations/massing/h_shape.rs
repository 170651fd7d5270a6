use crate::error::{GeometryError, Result};
use crate::geometry::kernel::{intersection_all, largest, square_offset, union_all};
use crate::geometry::skeleton::Segment;
use crate::geometry::{Profile, Skeleton};
use crate::math::intersect_2d::{infinite_line_intersection, ray_cast_loop};
use crate::math::polygon_2d::{centroid, left_normal, loop_edges, remove_collinear, segment_direction};
use crate::math::Point2;

/// H plan: two end bars along opposite edges joined by a center bar.
///
/// Every edge is tried as the first end bar. The opposite edge is the one
/// hit by a ray cast inward from halfway between the edge midpoint and the
/// plan centroid. The candidate with the longest skeleton wins; ties keep
/// the earlier edge.
pub(super) fn h_shape(boundary: &Profile, half_width: f64) -> Result<(Profile, Skeleton)> {
    let vertices = remove_collinear(&boundary.perimeter);
    let center = centroid(&vertices);
    let edges: Vec<Segment> = loop_edges(&vertices).collect();

    let mut best: Option<(f64, [Segment; 3])> = None;
    for index in 0..edges.len() {
        let Some(candidate) = h_candidate(&vertices, &edges, index, &center, half_width) else {
            continue;
        };
        let length: f64 = candidate.iter().map(|(a, b)| (b - a).norm()).sum();
        if best.as_ref().is_none_or(|(best_len, _)| length > *best_len) {
            best = Some((length, candidate));
        }
    }
    let (_, segments) = best.ok_or_else(|| {
        GeometryError::Degenerate("no edge pair supports an H plan".to_owned())
    })?;

    let bands = segments
        .iter()
        .map(|(a, b)| square_offset(&[*a, *b], half_width).map(Profile::new))
        .collect::<Result<Vec<_>>>()?;
    let merged = union_all(bands);
    let profile = largest(intersection_all(&merged, boundary))
        .ok_or(GeometryError::EmptyResult { operation: "H clip" })?;
    Ok((profile, Skeleton::from_segments(&segments)))
}

/// Center bar, far end bar and near end bar for the edge at `index`.
fn h_candidate(
    vertices: &[Point2],
    edges: &[Segment],
    index: usize,
    center: &Point2,
    half_width: f64,
) -> Option<[Segment; 3]> {
    let (a, b) = edges[index];
    let inward = left_normal(segment_direction(&a, &b).ok()?);
    let start = Point2::from(((a.coords + b.coords) * 0.5 + center.coords) * 0.5);

    let hit = ray_cast_loop(&start, &inward, vertices)?;
    if hit.edge == index {
        return None;
    }
    let (c, d) = edges[hit.edge];
    let far = shifted(&c, &d, half_width)?;
    let near = shifted(&a, &b, half_width)?;

    let ahead = start + inward;
    let bar_far = infinite_line_intersection(&start, &ahead, &far.0, &far.1)?;
    let bar_near = infinite_line_intersection(&start, &ahead, &near.0, &near.1)?;
    Some([(bar_far, bar_near), far, near])
}

/// The segment moved `distance` to its left (inward for a CCW loop).
fn shifted(a: &Point2, b: &Point2, distance: f64) -> Option<Segment> {
    let offset = left_normal(segment_direction(a, b).ok()?) * distance;
    Some((a + offset, b + offset))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Profile {
        Profile::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(size, 0.0),
            Point2::new(size, size),
            Point2::new(0.0, size),
        ])
    }

    #[test]
    fn square_h() {
        let (profile, skeleton) = h_shape(&square(100.0), 5.0).unwrap();
        assert_eq!(skeleton.segments().count(), 3);
        // First edge wins: center bar from the top end bar down to the bottom one.
        let (top, bottom) = skeleton.segments().next().unwrap();
        assert_relative_eq!(top, Point2::new(50.0, 95.0), epsilon = 1e-9);
        assert_relative_eq!(bottom, Point2::new(50.0, 5.0), epsilon = 1e-9);
        assert_relative_eq!(skeleton.length(), 290.0, epsilon = 1e-9);
        // Two 100 x 10 end bars plus the 80 x 10 center bar between them.
        assert!((profile.area() - 2800.0).abs() < 1.0, "area={}", profile.area());
    }

    #[test]
    fn collinear_vertices_do_not_add_edges() {
        let boundary = Profile::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(50.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(100.0, 100.0),
            Point2::new(0.0, 100.0),
        ]);
        let (_, skeleton) = h_shape(&boundary, 5.0).unwrap();
        assert_relative_eq!(skeleton.length(), 290.0, epsilon = 1e-9);
    }
}
