use super::distance_2d::point_to_segment_dist;
use super::{Point2, Vector2, TOLERANCE};
use crate::error::{GeometryError, Result};

/// Computes the signed area of a closed loop (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns `true` if the loop winds counter-clockwise.
#[must_use]
pub fn is_ccw(points: &[Point2]) -> bool {
    signed_area(points) > 0.0
}

/// Returns the loop wound counter-clockwise, reversing it if needed.
#[must_use]
pub fn to_ccw(points: &[Point2]) -> Vec<Point2> {
    if signed_area(points) < 0.0 {
        points.iter().rev().copied().collect()
    } else {
        points.to_vec()
    }
}

/// Area-weighted centroid of a closed loop.
///
/// Falls back to the vertex average for loops with (near) zero area.
#[must_use]
pub fn centroid(points: &[Point2]) -> Point2 {
    if points.is_empty() {
        return Point2::origin();
    }
    let area = signed_area(points);
    if area.abs() < TOLERANCE {
        return vertex_average(points);
    }
    // Accumulate relative to the first vertex to keep far-from-origin sites exact.
    let origin = points[0].coords;
    let n = points.len();
    let (mut cx, mut cy) = (0.0, 0.0);
    for i in 0..n {
        let a = points[i] - origin;
        let b = points[(i + 1) % n] - origin;
        let cross = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    let k = 1.0 / (6.0 * area);
    Point2::new(origin.x + cx * k, origin.y + cy * k)
}

/// Arithmetic mean of a set of points.
#[must_use]
pub fn vertex_average(points: &[Point2]) -> Point2 {
    if points.is_empty() {
        return Point2::origin();
    }
    #[allow(clippy::cast_precision_loss)]
    let inv = 1.0 / points.len() as f64;
    let sum = points
        .iter()
        .fold(Vector2::zeros(), |acc, p| acc + p.coords);
    Point2::from(sum * inv)
}

/// Total length of an open polyline.
#[must_use]
pub fn polyline_length(points: &[Point2]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}

/// Edges of a closed loop as `(start, end)` pairs, including the closing edge.
pub fn loop_edges(points: &[Point2]) -> impl Iterator<Item = (Point2, Point2)> + '_ {
    let n = points.len();
    (0..n).map(move |i| (points[i], points[(i + 1) % n]))
}

/// Removes vertices that lie on the straight line between their neighbors.
#[must_use]
pub fn remove_collinear(points: &[Point2]) -> Vec<Point2> {
    let n = points.len();
    if n < 4 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let cur = points[i];
        let next = points[(i + 1) % n];
        let a = cur - prev;
        let b = next - cur;
        let cross = a.x * b.y - a.y * b.x;
        let scale = a.norm() * b.norm();
        if scale < TOLERANCE || (cross / scale).abs() > 1e-9 {
            out.push(cur);
        }
    }
    if out.len() < 3 {
        return points.to_vec();
    }
    out
}

/// Computes the normalized direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns `GeometryError::ZeroVector` if the segment has zero length.
pub fn segment_direction(a: &Point2, b: &Point2) -> Result<Vector2> {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return Err(GeometryError::ZeroVector.into());
    }
    Ok(d / len)
}

/// Returns the left-pointing normal of a direction vector.
///
/// For a counter-clockwise loop this points into the interior.
#[must_use]
pub fn left_normal(dir: Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

/// Even-odd point containment that treats points within `tolerance` of the
/// boundary as outside.
#[must_use]
pub fn point_strictly_inside(point: &Point2, points: &[Point2], tolerance: f64) -> bool {
    if points.len() < 3 {
        return false;
    }
    if loop_edges(points)
        .any(|(a, b)| point_to_segment_dist(point.x, point.y, a.x, a.y, b.x, b.y) < tolerance)
    {
        return false;
    }
    let mut inside = false;
    for (a, b) in loop_edges(points) {
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Finds a point strictly inside a simple loop.
///
/// Casts a horizontal scanline through the middle of the bounding box and
/// returns the midpoint of the first interior span.
#[must_use]
pub fn interior_point(points: &[Point2]) -> Option<Point2> {
    if points.len() < 3 {
        return None;
    }
    let (min_y, max_y) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    if max_y - min_y < TOLERANCE {
        return None;
    }
    // Nudge off the exact middle so the scanline rarely passes through a vertex.
    let y = min_y + (max_y - min_y) * 0.500_123_7;
    let mut xs: Vec<f64> = loop_edges(points)
        .filter(|(a, b)| (a.y > y) != (b.y > y))
        .map(|(a, b)| a.x + (y - a.y) / (b.y - a.y) * (b.x - a.x))
        .collect();
    xs.sort_by(f64::total_cmp);
    xs.chunks_exact(2)
        .find(|pair| pair[1] - pair[0] > TOLERANCE)
        .map(|pair| Point2::new((pair[0] + pair[1]) * 0.5, y))
}
