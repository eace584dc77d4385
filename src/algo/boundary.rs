//! Open-edge detection and wall quads.
//!
//! Every triangle contributes three directed edges. Inside a consistently
//! wound patch an interior edge is claimed once in each direction; an edge
//! whose reverse is missing lies on the patch's rim and gets a wall.

use std::collections::HashSet;

use nalgebra::{Point3, Vector3};

/// A directed edge between two patch-local vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Start vertex.
    pub from: usize,
    /// End vertex.
    pub to: usize,
}

impl Edge {
    /// Create a directed edge.
    #[inline]
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// The same edge walked the other way.
    #[inline]
    pub fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

/// Directed edges of a triangle in emission order: `c→a`, `a→b`, `b→c`.
#[inline]
pub fn triangle_edges([a, b, c]: [usize; 3]) -> [Edge; 3] {
    [Edge::new(c, a), Edge::new(a, b), Edge::new(b, c)]
}

/// Edges of `triangles` whose reverse is not used by any triangle.
///
/// Edges are returned in triangle order. A degenerate edge `v→v` is its own
/// reverse and never counts as open.
///
/// # Example
/// ```
/// use navclean::algo::boundary::{boundary_edges, Edge};
///
/// // Two triangles sharing the diagonal 0-2.
/// let open = boundary_edges(&[[0, 2, 1], [0, 3, 2]]);
/// assert_eq!(open.len(), 4);
/// assert!(!open.contains(&Edge::new(0, 2)));
/// assert!(!open.contains(&Edge::new(2, 0)));
/// ```
pub fn boundary_edges(triangles: &[[usize; 3]]) -> Vec<Edge> {
    let directed: HashSet<Edge> = triangles.iter().flat_map(|&t| triangle_edges(t)).collect();

    triangles
        .iter()
        .flat_map(|&t| triangle_edges(t))
        .filter(|e| !directed.contains(&e.reversed()))
        .collect()
}

/// Which side of the wall quad faces the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallFacing {
    /// Blocking walls, seen from outside the patch.
    Outward,
    /// Baked walls hanging below a walkable patch, wound the other way.
    Inward,
}

impl WallFacing {
    /// The opposite winding.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            WallFacing::Outward => WallFacing::Inward,
            WallFacing::Inward => WallFacing::Outward,
        }
    }
}

/// One wall quad along a boundary edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    /// Base of the edge's start vertex.
    pub start: Point3<f64>,
    /// Base of the edge's end vertex.
    pub end: Point3<f64>,
    /// Displacement from base to top.
    pub extrusion: Vector3<f64>,
    /// Winding of the quad.
    pub facing: WallFacing,
}

impl Wall {
    /// The four corners: `start`, `end`, `start + h`, `end + h`.
    pub fn corners(&self) -> [Point3<f64>; 4] {
        [
            self.start,
            self.end,
            self.start + self.extrusion,
            self.end + self.extrusion,
        ]
    }

    /// Two triangles over [`corners`](Self::corners), relative to the first corner.
    pub fn triangles(&self) -> [[u32; 3]; 2] {
        match self.facing {
            WallFacing::Outward => [[0, 1, 3], [0, 3, 2]],
            WallFacing::Inward => [[0, 3, 1], [0, 2, 3]],
        }
    }
}

/// Walls for every open edge of a patch.
///
/// `positions` are the base positions of the patch's vertices. A zero
/// extrusion produces no walls at all.
pub fn build_walls(
    positions: &[Point3<f64>],
    triangles: &[[usize; 3]],
    extrusion: Vector3<f64>,
    facing: WallFacing,
) -> Vec<Wall> {
    if extrusion == Vector3::zeros() {
        return Vec::new();
    }
    boundary_edges(triangles)
        .into_iter()
        .map(|e| Wall {
            start: positions[e.from],
            end: positions[e.to],
            extrusion,
            facing,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Closed tetrahedron with outward winding.
    const TETRA: [[usize; 3]; 4] = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];

    #[test]
    fn test_closed_patch_has_no_boundary() {
        assert!(boundary_edges(&TETRA).is_empty());
    }

    #[test]
    fn test_open_patch_boundary_is_reverse_free() {
        // Tetrahedron with the bottom removed.
        let open = &TETRA[1..];
        let edges = boundary_edges(open);
        assert_eq!(edges.len(), 3);

        let all: HashSet<Edge> = open.iter().flat_map(|&t| triangle_edges(t)).collect();
        for e in &edges {
            assert!(all.contains(e));
            assert!(!all.contains(&e.reversed()));
        }
    }

    #[test]
    fn test_single_triangle_order() {
        let edges = boundary_edges(&[[4, 5, 6]]);
        assert_eq!(edges, vec![Edge::new(6, 4), Edge::new(4, 5), Edge::new(5, 6)]);
    }

    #[test]
    fn test_flipped_facing_reverses_triangles() {
        let wall = Wall {
            start: Point3::origin(),
            end: Point3::new(1.0, 0.0, 0.0),
            extrusion: Vector3::y(),
            facing: WallFacing::Outward,
        };
        let flipped = Wall {
            facing: wall.facing.flipped(),
            ..wall
        };
        assert_eq!(flipped.facing, WallFacing::Inward);
        assert_eq!(flipped.facing.flipped(), WallFacing::Outward);
        for (a, b) in wall.triangles().iter().zip(flipped.triangles().iter()) {
            let mut rev = *b;
            rev.swap(1, 2);
            assert_eq!(*a, rev);
        }
    }

    #[test]
    fn test_degenerate_triangle_adds_no_edges() {
        let edges = boundary_edges(&[[0, 0, 1]]);
        assert!(edges.is_empty());

        let with_real = boundary_edges(&[[0, 0, 1], [2, 3, 4]]);
        assert_eq!(with_real.len(), 3);
    }

    #[test]
    fn test_inconsistent_winding_leaves_edge_open() {
        // Shared edge 0-1 used in the same direction twice.
        let edges = boundary_edges(&[[0, 1, 2], [0, 1, 3]]);
        assert!(edges.contains(&Edge::new(0, 1)));
    }

    #[test]
    fn test_walls() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let up = Vector3::new(0.0, 2.0, 0.0);
        let walls = build_walls(&positions, &[[0, 2, 1]], up, WallFacing::Outward);
        assert_eq!(walls.len(), 3);

        let corners = walls[0].corners();
        assert_eq!(corners[0], positions[1]);
        assert_eq!(corners[1], positions[0]);
        assert_eq!(corners[2], Point3::new(1.0, 2.0, 0.0));
        assert_eq!(corners[3], Point3::new(0.0, 2.0, 0.0));

        assert!(build_walls(&positions, &[[0, 2, 1]], Vector3::zeros(), WallFacing::Outward).is_empty());
    }

    #[test]
    fn test_wall_facing_flips_normal() {
        let wall = |facing| Wall {
            start: Point3::new(0.0, 0.0, 0.0),
            end: Point3::new(1.0, 0.0, 0.0),
            extrusion: Vector3::new(0.0, 1.0, 0.0),
            facing,
        };
        let normal = |w: Wall| {
            let c = w.corners();
            let [a, b, d] = w.triangles()[0].map(|i| c[i as usize]);
            (b - a).cross(&(d - a))
        };
        let outward = normal(wall(WallFacing::Outward));
        let inward = normal(wall(WallFacing::Inward));
        assert!(outward.dot(&inward) < 0.0);
    }
}
