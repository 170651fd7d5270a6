use super::polygon_2d::loop_edges;
use super::{Point2, Vector2, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.x * d2.y - d1.y * d2.x;
    let scale = d1.norm() * d2.norm();
    if scale < TOLERANCE || (cross / scale).abs() < 1e-12 {
        return None;
    }
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let t = (dx * d2.y - dy * d2.x) / cross;
    let u = (dx * d1.y - dy * d1.x) / cross;
    Some((t, u))
}

/// Intersection point of the infinite lines through `a0`-`a1` and `b0`-`b1`.
///
/// Returns `None` for parallel (or degenerate) lines.
#[must_use]
pub fn infinite_line_intersection(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<Point2> {
    let da = a1 - a0;
    let db = b1 - b0;
    line_line_intersect_2d(a0, &da, b0, &db).map(|(t, _)| point_at(a0, &da, t))
}

/// Returns `true` if the two segments cross at a single point interior to both.
///
/// Touching at endpoints and collinear overlap do not count as a crossing.
#[must_use]
pub fn segments_cross(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let da = a1 - a0;
    let db = b1 - b0;
    let Some((t, u)) = line_line_intersect_2d(a0, &da, b0, &db) else {
        return false;
    };
    let eps = 1e-9;
    t > eps && t < 1.0 - eps && u > eps && u < 1.0 - eps
}

/// Linear interpolation: `origin + dir * t`.
#[must_use]
pub fn point_at(origin: &Point2, dir: &Vector2, t: f64) -> Point2 {
    origin + dir * t
}

/// A ray hit against a loop edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Hit location.
    pub point: Point2,
    /// Ray parameter (distance along a unit direction).
    pub t: f64,
    /// Index of the struck edge (edge `i` runs from vertex `i` to `i + 1`).
    pub edge: usize,
}

/// Casts a ray from `origin` along `dir` and returns the nearest edge hit
/// strictly in front of the origin.
#[must_use]
pub fn ray_cast_loop(origin: &Point2, dir: &Vector2, points: &[Point2]) -> Option<RayHit> {
    let len = dir.norm();
    if len < TOLERANCE {
        return None;
    }
    let unit = dir / len;
    let mut best: Option<RayHit> = None;
    for (i, (a, b)) in loop_edges(points).enumerate() {
        let edge = b - a;
        let Some((t, u)) = line_line_intersect_2d(origin, &unit, &a, &edge) else {
            continue;
        };
        if t <= 1e-9 || !(-1e-9..=1.0 + 1e-9).contains(&u) {
            continue;
        }
        if best.is_none_or(|hit| t < hit.t) {
            best = Some(RayHit {
                point: point_at(origin, &unit, t),
                t,
                edge: i,
            });
        }
    }
    best
}

/// Extends a line through `origin` with direction `dir` both ways until it
/// meets the loop, returning the chord endpoints `(back, front)`.
#[must_use]
pub fn chord_through(origin: &Point2, dir: &Vector2, points: &[Point2]) -> Option<(Point2, Point2)> {
    let front = ray_cast_loop(origin, dir, points)?;
    let back = ray_cast_loop(origin, &-dir, points)?;
    Some((back.point, front.point))
}
