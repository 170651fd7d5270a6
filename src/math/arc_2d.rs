/// Bulge arc math used to flatten kernel output.
///
/// The polygon kernel rounds convex corners of outward offsets with circular
/// arcs encoded as `bulge = tan(sweep_angle / 4)` on the arc's start vertex.
/// Plan profiles in this crate are straight-edged, so arcs are tessellated
/// into chords at a fixed sagitta tolerance.
use std::f64::consts::PI;

use super::Point2;

/// Arc in center-radius-angle form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc2 {
    pub center: Point2,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl Arc2 {
    /// Converts a bulge-defined arc segment from `p0` to `p1`.
    ///
    /// Returns `None` for zero-length chords or a zero bulge.
    #[must_use]
    pub fn from_bulge(p0: &Point2, p1: &Point2, bulge: f64) -> Option<Self> {
        let chord = p1 - p0;
        let chord_len = chord.norm();
        if chord_len < 1e-12 || bulge.abs() < 1e-12 {
            return None;
        }

        // Distance from chord midpoint to center, as a multiple of the half chord.
        let sagitta_ratio = (1.0 - bulge * bulge) / (2.0 * bulge);
        let mid = p0 + chord * 0.5;
        // Normal pointing toward the center for a positive bulge.
        let normal = nalgebra::Vector2::new(-chord.y, chord.x) / chord_len;
        let center = mid + normal * (sagitta_ratio * chord_len * 0.5);

        // r = d*(1+b²)/(4*|b|)
        let radius = (chord_len * 0.5) * (1.0 + bulge * bulge) / (2.0 * bulge.abs());
        let start_angle = (p0.y - center.y).atan2(p0.x - center.x);
        let sweep = (4.0 * bulge.atan()).clamp(-2.0 * PI, 2.0 * PI);

        Some(Self {
            center,
            radius,
            start_angle,
            sweep,
        })
    }

    /// Evaluates the arc at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let angle = self.start_angle + self.sweep * t;
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// Interior points approximating the arc within `tolerance`, excluding
    /// both endpoints.
    #[must_use]
    pub fn interior_points(&self, tolerance: f64) -> Vec<Point2> {
        let n = subdivision_count(self.radius, self.sweep.abs(), tolerance);
        (1..n)
            .map(|j| self.point_at(f64::from(j) / f64::from(n)))
            .collect()
    }
}

/// Computes the number of line segments needed to approximate an arc
/// within the given tolerance.
fn subdivision_count(radius: f64, abs_sweep: f64, tolerance: f64) -> u32 {
    if radius < 1e-12 || abs_sweep < 1e-12 || tolerance <= 0.0 {
        return 1;
    }
    // From the sagitta formula: sagitta = r * (1 - cos(θ/2))
    let max_angle = if tolerance >= radius {
        PI
    } else {
        2.0 * (1.0 - tolerance / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep / max_angle).ceil() as u32;
    n.clamp(1, 256)
}
