//! Vertex welding.
//!
//! Navigation mesh triangulations repeat vertices along every polygon and tile
//! border, and the copies are only approximately equal. Welding maps every
//! input vertex to a canonical representative so that adjacency can be
//! decided on indices alone.
//!
//! Vertices are first sorted by x, then z, then y. Canonical indices address
//! that sorted array. Any two vertices within tolerance of each other end up
//! in the same cluster, so chains of close vertices collapse to one vertex.
//! A cluster is represented by its smallest sorted index. Vertices are stored
//! in a hash grid with cells as wide as the tolerance, so finding the
//! neighbours of a vertex only has to search the 27 surrounding cells.

use std::cmp::Ordering;
use std::collections::HashMap;

use nalgebra::Point3;

use super::group::UnionFind;

/// Default weld distance, in source units.
pub const DEFAULT_WELD_TOLERANCE: f64 = 0.01;

type Cell = (i64, i64, i64);

/// Mapping from original vertex indices to canonical (welded) indices.
#[derive(Debug, Clone)]
pub struct WeldTable {
    /// Input positions sorted by x, z, y.
    positions: Vec<Point3<f64>>,
    /// Canonical index for every original vertex.
    canonical: Vec<usize>,
    /// Number of distinct representatives.
    unique: usize,
}

impl WeldTable {
    /// Weld `vertices` that lie within `tolerance` of each other.
    ///
    /// `tolerance` must be positive and finite.
    ///
    /// # Example
    /// ```
    /// use navclean::algo::weld::WeldTable;
    /// use nalgebra::Point3;
    ///
    /// let table = WeldTable::build(
    ///     &[
    ///         Point3::new(1.0, 0.0, 0.0),
    ///         Point3::new(0.0, 0.0, 0.0),
    ///         Point3::new(1.004, 0.0, 0.0),
    ///     ],
    ///     0.01,
    /// );
    /// assert_eq!(table.canonical(0), table.canonical(2));
    /// assert_ne!(table.canonical(0), table.canonical(1));
    /// assert_eq!(table.num_unique(), 2);
    /// ```
    pub fn build(vertices: &[Point3<f64>], tolerance: f64) -> Self {
        debug_assert!(tolerance > 0.0 && tolerance.is_finite());

        let mut order: Vec<usize> = (0..vertices.len()).collect();
        order.sort_by(|&a, &b| compare_xzy(&vertices[a], &vertices[b]));

        let positions: Vec<Point3<f64>> = order.iter().map(|&i| vertices[i]).collect();

        let mut grid: HashMap<Cell, Vec<usize>> = HashMap::new();
        let mut clusters = UnionFind::new(positions.len());

        for (sorted, p) in positions.iter().enumerate() {
            let cell = cell_of(p, tolerance);
            for_each_neighbour(&grid, &positions, p, cell, tolerance, |other| {
                clusters.union(sorted, other);
            });
            grid.entry(cell).or_default().push(sorted);
        }

        // Ascending scan: the first member seen of each cluster is its smallest.
        let mut smallest: Vec<Option<usize>> = vec![None; positions.len()];
        let mut unique = 0;
        let mut representative = vec![0usize; positions.len()];
        for (sorted, rep) in representative.iter_mut().enumerate() {
            let root = clusters.find(sorted);
            *rep = *smallest[root].get_or_insert_with(|| {
                unique += 1;
                sorted
            });
        }

        let mut canonical = vec![0usize; vertices.len()];
        for (sorted, &original) in order.iter().enumerate() {
            canonical[original] = representative[sorted];
        }

        Self {
            positions,
            canonical,
            unique,
        }
    }

    /// Canonical index of original vertex `original`.
    #[inline]
    pub fn canonical(&self, original: usize) -> usize {
        self.canonical[original]
    }

    /// Canonical index for every original vertex.
    #[inline]
    pub fn canonical_indices(&self) -> &[usize] {
        &self.canonical
    }

    /// Sorted positions; canonical indices point into this array.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Position of a canonical vertex.
    #[inline]
    pub fn position(&self, canonical: usize) -> Point3<f64> {
        self.positions[canonical]
    }

    /// Number of distinct vertices after welding.
    #[inline]
    pub fn num_unique(&self) -> usize {
        self.unique
    }

    /// Number of original vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    /// Returns true if the table holds no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

fn compare_xzy(a: &Point3<f64>, b: &Point3<f64>) -> Ordering {
    a.x.total_cmp(&b.x)
        .then_with(|| a.z.total_cmp(&b.z))
        .then_with(|| a.y.total_cmp(&b.y))
}

#[inline]
fn cell_of(p: &Point3<f64>, size: f64) -> Cell {
    (
        (p.x / size).floor() as i64,
        (p.y / size).floor() as i64,
        (p.z / size).floor() as i64,
    )
}

/// Call `visit` for every registered vertex within `tolerance` of `p`.
fn for_each_neighbour<F: FnMut(usize)>(
    grid: &HashMap<Cell, Vec<usize>>,
    positions: &[Point3<f64>],
    p: &Point3<f64>,
    (cx, cy, cz): Cell,
    tolerance: f64,
    mut visit: F,
) {
    for dx in -1..=1 {
        for dy in -1..=1 {
            for dz in -1..=1 {
                let Some(bucket) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                    continue;
                };
                for &candidate in bucket {
                    if (positions[candidate] - p).norm() <= tolerance {
                        visit(candidate);
                    }
                }
            }
        }
    }
}
