//! Walkable region classification.
//!
//! A patch is walkable when at least one user-placed sample point lies inside
//! one of its triangles. Points are tested against the infinite prism over each
//! triangle, so a marker hovering slightly above the surface still counts.

use nalgebra::Point3;

use super::group::Patch;

/// Returns true if `p` lies strictly inside triangle `(a, b, c)`.
///
/// The face normal is taken from two edge vectors, and `p` must be on the same
/// rotational side of all three edges with respect to it. The result does not
/// depend on winding, and points on an edge or corner are outside. A
/// degenerate triangle has a zero normal and contains nothing.
///
/// # Example
/// ```
/// use navclean::algo::classify::point_in_triangle;
/// use nalgebra::Point3;
///
/// let a = Point3::new(0.0, 0.0, 0.0);
/// let b = Point3::new(1.0, 0.0, 0.0);
/// let c = Point3::new(0.0, 0.0, 1.0);
/// assert!(point_in_triangle(&a, &b, &c, &Point3::new(0.25, 0.5, 0.25)));
/// assert!(!point_in_triangle(&a, &b, &c, &Point3::new(1.0, 0.0, 1.0)));
/// ```
pub fn point_in_triangle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>, p: &Point3<f64>) -> bool {
    let normal = (c - a).cross(&(b - a));
    let side = |from: &Point3<f64>, to: &Point3<f64>| (p - from).cross(&(to - from)).dot(&normal);
    side(a, b) > 0.0 && side(b, c) > 0.0 && side(c, a) > 0.0
}

/// Returns true if any of `points` lies inside any non-degenerate triangle.
pub fn contains_any(positions: &[Point3<f64>], triangles: &[[usize; 3]], points: &[Point3<f64>]) -> bool {
    points.iter().any(|p| {
        triangles.iter().any(|&[a, b, c]| {
            if a == b || b == c || a == c {
                return false;
            }
            point_in_triangle(&positions[a], &positions[b], &positions[c], p)
        })
    })
}

impl Patch {
    /// Returns true if any sample point falls inside this patch.
    pub fn contains_any(&self, points: &[Point3<f64>]) -> bool {
        contains_any(self.positions(), self.triangles(), points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::GroupId;

    fn square() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        (
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 1.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            vec![[0, 2, 1], [0, 3, 2]],
        )
    }

    #[test]
    fn test_centroid_is_inside() {
        let a = Point3::new(0.0, 2.0, 0.0);
        let b = Point3::new(4.0, 2.0, 1.0);
        let c = Point3::new(1.0, 2.0, 3.0);
        let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);
        assert!(point_in_triangle(&a, &b, &c, &centroid));
        assert!(point_in_triangle(&a, &c, &b, &centroid));
    }

    #[test]
    fn test_far_point_is_outside() {
        let (positions, triangles) = square();
        assert!(!contains_any(&positions, &triangles, &[Point3::new(10.0, 0.0, 10.0)]));
        assert!(!contains_any(&positions, &triangles, &[Point3::new(-0.5, 0.0, 0.5)]));
    }

    #[test]
    fn test_point_above_surface_counts() {
        let (positions, triangles) = square();
        assert!(contains_any(&positions, &triangles, &[Point3::new(0.3, 0.8, 0.6)]));
    }

    #[test]
    fn test_sloped_triangle() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 1.0, 0.0);
        let c = Point3::new(0.0, 1.0, 2.0);
        let inside = Point3::new(0.5, 0.5, 0.5);
        assert!(point_in_triangle(&a, &b, &c, &inside));
        assert!(!point_in_triangle(&a, &b, &c, &Point3::new(2.0, 1.0, 2.0)));
    }

    #[test]
    fn test_degenerate_never_contains() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let p = [Point3::new(0.2, 0.0, 0.2)];
        assert!(!contains_any(&positions, &[[0, 0, 2]], &p));
        assert!(!contains_any(&positions, &[[1, 2, 2]], &p));
        assert!(contains_any(&positions, &[[0, 0, 2], [0, 2, 1]], &p));

        // Collinear corners with distinct indices.
        let line = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert!(!contains_any(&line, &[[0, 1, 2]], &[Point3::new(1.0, 0.0, 0.0)]));
    }

    #[test]
    fn test_no_points() {
        let (positions, triangles) = square();
        assert!(!contains_any(&positions, &triangles, &[]));
    }

    #[test]
    fn test_patch_contains() {
        let (positions, triangles) = square();
        let patch = Patch::from_parts(GroupId::new(0), positions, triangles);
        assert!(patch.contains_any(&[Point3::new(5.0, 0.0, 5.0), Point3::new(0.5, 0.0, 0.4)]));
        assert!(!patch.contains_any(&[Point3::new(5.0, 0.0, 5.0)]));
    }
}
