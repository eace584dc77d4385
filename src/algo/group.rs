//! Connectivity grouping.
//!
//! Two triangles belong to the same group when a chain of triangles, each
//! sharing at least one welded vertex with the next, connects them. Sharing an
//! edge is not required: patches that only touch at a corner are one group.
//!
//! The scan walks triangles in sorted order and compares each one against the
//! earlier triangles of every bucket whose index range overlaps its own. Hits
//! are merged in a disjoint-set forest.

use std::collections::HashMap;

use nalgebra::Point3;

use crate::mesh::{GroupId, TriangleId};

use super::progress::{Progress, Stage};
use super::triangles::{IndexedTriangles, BUCKET_SIZE};
use super::weld::WeldTable;

/// Array-backed disjoint-set forest with path compression and union by rank.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    /// Create `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Representative of the set containing `x`.
    pub fn find(&mut self, mut x: usize) -> usize {
        // Path halving.
        while self.parent[x] != x {
            let grandparent = self.parent[self.parent[x]];
            self.parent[x] = grandparent;
            x = grandparent;
        }
        x
    }

    /// Merge the sets of `a` and `b`. Returns false if they were already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns true if the forest has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}

/// Final group assignment for every sorted triangle.
#[derive(Debug, Clone)]
pub struct Grouping {
    /// Root id for every sorted triangle.
    group: Vec<GroupId>,
    /// Triangle count per root id; zero for ids that are not roots.
    counts: Vec<usize>,
}

impl Grouping {
    /// Group of a sorted triangle.
    #[inline]
    pub fn group_of(&self, triangle: TriangleId) -> GroupId {
        self.group[triangle.index()]
    }

    /// Number of triangles in `group`. Zero for merged-away ids.
    #[inline]
    pub fn count(&self, group: GroupId) -> usize {
        self.counts.get(group.index()).copied().unwrap_or(0)
    }

    /// Non-empty groups in ascending id order.
    pub fn groups(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &n)| n > 0)
            .map(|(g, _)| GroupId::new(g))
    }

    /// Number of non-empty groups.
    pub fn num_groups(&self) -> usize {
        self.counts.iter().filter(|&&n| n > 0).count()
    }

    /// Number of triangles grouped.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.group.len()
    }

    /// Split the triangles into one [`Patch`] per non-empty group.
    ///
    /// Patches come out in ascending group order. Inside a patch, triangles
    /// keep their sorted order and vertices are numbered by first use.
    pub fn patches(&self, triangles: &IndexedTriangles, weld: &WeldTable) -> Vec<Patch> {
        let mut slot: HashMap<GroupId, usize> = HashMap::new();
        let mut patches: Vec<Patch> = Vec::new();
        for group in self.groups() {
            slot.insert(group, patches.len());
            patches.push(Patch::new(group, self.count(group)));
        }

        for (t, tri) in triangles.triangles().iter().enumerate() {
            let patch = &mut patches[slot[&self.group_of(TriangleId::new(t))]];
            patch.push_triangle(tri.vertices, weld);
        }

        for patch in &mut patches {
            patch.local.clear();
            patch.local.shrink_to_fit();
        }
        patches
    }
}

/// One connected group, re-indexed to its own compact vertex array.
#[derive(Debug, Clone)]
pub struct Patch {
    group: GroupId,
    positions: Vec<Point3<f64>>,
    triangles: Vec<[usize; 3]>,
    /// Canonical index to local index, only used while building.
    local: HashMap<usize, usize>,
}

impl Patch {
    fn new(group: GroupId, triangle_count: usize) -> Self {
        Self {
            group,
            positions: Vec::new(),
            triangles: Vec::with_capacity(triangle_count),
            local: HashMap::new(),
        }
    }

    /// Build a patch directly from local positions and triangles.
    pub fn from_parts(group: GroupId, positions: Vec<Point3<f64>>, triangles: Vec<[usize; 3]>) -> Self {
        Self {
            group,
            positions,
            triangles,
            local: HashMap::new(),
        }
    }

    fn push_triangle(&mut self, canonical: [usize; 3], weld: &WeldTable) {
        let mut local = [0usize; 3];
        for (k, &v) in canonical.iter().enumerate() {
            let next = self.positions.len();
            local[k] = *self.local.entry(v).or_insert(next);
            if local[k] == next {
                self.positions.push(weld.position(v));
            }
        }
        self.triangles.push(local);
    }

    /// Group this patch was built from.
    #[inline]
    pub fn group(&self) -> GroupId {
        self.group
    }

    /// Patch-local vertex positions in source space.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Triangles as patch-local vertex indices.
    #[inline]
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }
}

/// Assign every triangle to its connected group.
pub fn group_triangles(triangles: &IndexedTriangles) -> Grouping {
    group_triangles_with_progress(triangles, &Progress::none())
}

/// Assign every triangle to its connected group, reporting progress.
pub fn group_triangles_with_progress(triangles: &IndexedTriangles, progress: &Progress) -> Grouping {
    let tris = triangles.triangles();
    let buckets = triangles.buckets();
    let n = tris.len();
    let mut sets = UnionFind::new(n);

    for i in 0..n {
        let current = &tris[i];

        for (c, bucket) in buckets.iter().enumerate() {
            let start = c * BUCKET_SIZE;
            if start >= i || bucket.min > current.max {
                // Buckets are sorted by min, so nothing further can overlap.
                break;
            }
            if !bucket.overlaps(current.min, current.max) {
                continue;
            }

            let end = (start + BUCKET_SIZE).min(i);
            for j in start..end {
                let other = &tris[j];
                if other.min > current.max {
                    break;
                }
                if !other.range_overlaps(current.min, current.max) {
                    continue;
                }
                if sets.find(i) == sets.find(j) {
                    continue;
                }
                if current.shares_vertex(other) {
                    sets.union(i, j);
                }
            }
        }

        progress.tick(Stage::Group, i, n, 100);
    }

    let mut group = Vec::with_capacity(n);
    let mut counts = vec![0usize; n];
    for i in 0..n {
        let root = sets.find(i);
        counts[root] += 1;
        group.push(GroupId::new(root));
    }

    progress.finish(Stage::Group);
    Grouping { group, counts }
}
