use crate::math::polygon_2d::polyline_length;
use crate::math::Point2;

/// A straight segment of a skeleton.
pub type Segment = (Point2, Point2);

/// Centerline of a band-shaped footprint: one or more open polylines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    pub polylines: Vec<Vec<Point2>>,
}

impl Skeleton {
    /// Creates a skeleton from open polylines.
    #[must_use]
    pub fn new(polylines: Vec<Vec<Point2>>) -> Self {
        Self { polylines }
    }

    /// Creates a skeleton where every segment is its own two-point polyline.
    #[must_use]
    pub fn from_segments(segments: &[Segment]) -> Self {
        Self {
            polylines: segments.iter().map(|(a, b)| vec![*a, *b]).collect(),
        }
    }

    /// Closed rings become polylines that end on their start vertex.
    #[must_use]
    pub fn from_rings(rings: &[Vec<Point2>]) -> Self {
        Self {
            polylines: rings
                .iter()
                .filter(|r| !r.is_empty())
                .map(|r| {
                    let mut closed = r.clone();
                    closed.push(r[0]);
                    closed
                })
                .collect(),
        }
    }

    /// All straight segments, in polyline order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.polylines
            .iter()
            .flat_map(|pl| pl.windows(2).map(|w| (w[0], w[1])))
    }

    /// Sum of all polyline lengths.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.polylines.iter().map(|pl| polyline_length(pl)).sum()
    }

    /// Returns `true` if there is no segment to follow.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polylines.iter().all(|pl| pl.len() < 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_follow_polylines() {
        let sk = Skeleton::new(vec![vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 4.0),
        ]]);
        assert_eq!(sk.segments().count(), 2);
        assert!((sk.length() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn rings_are_closed() {
        let sk = Skeleton::from_rings(&[vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
        ]]);
        assert_eq!(sk.segments().count(), 3);
    }

    #[test]
    fn single_points_are_empty() {
        assert!(Skeleton::new(vec![vec![Point2::new(0.0, 0.0)]]).is_empty());
        assert!(Skeleton::default().is_empty());
    }
}
