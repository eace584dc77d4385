//! Welded, sorted triangles with a coarse range index.
//!
//! After welding, triangles are sorted by their smallest vertex index and cut
//! into fixed-size buckets. Each bucket remembers the vertex index range it
//! spans, which lets the grouping pass skip whole buckets that cannot share a
//! vertex with the triangle being processed.

use crate::mesh::Triangulation;

use super::weld::WeldTable;

/// Number of sorted triangles per bucket.
pub const BUCKET_SIZE: usize = 128;

/// A triangle expressed in canonical vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    /// Canonical vertex indices, in source winding order.
    pub vertices: [usize; 3],
    /// Smallest of `vertices`.
    pub min: usize,
    /// Largest of `vertices`.
    pub max: usize,
    /// Position of this triangle in the input triangulation.
    pub source: usize,
}

impl Triangle {
    /// Create a triangle from canonical indices.
    pub fn new(vertices: [usize; 3], source: usize) -> Self {
        let [a, b, c] = vertices;
        Self {
            vertices,
            min: a.min(b).min(c),
            max: a.max(b).max(c),
            source,
        }
    }

    /// Returns true if two corners welded to the same vertex.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.vertices;
        a == b || b == c || a == c
    }

    /// Returns true if `v` is one of the corners.
    #[inline]
    pub fn contains(&self, v: usize) -> bool {
        self.vertices.contains(&v)
    }

    /// Returns true if the two triangles have a corner in common.
    #[inline]
    pub fn shares_vertex(&self, other: &Triangle) -> bool {
        other.vertices.iter().any(|&v| self.contains(v))
    }

    /// Returns true if the index ranges of the two triangles intersect.
    #[inline]
    pub fn range_overlaps(&self, min: usize, max: usize) -> bool {
        self.min <= max && self.max >= min
    }
}

/// Vertex index range covered by one bucket of sorted triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// Smallest vertex index referenced by the bucket.
    pub min: usize,
    /// Largest vertex index referenced by the bucket.
    pub max: usize,
}

impl Bucket {
    /// Returns true if a triangle spanning `[min, max]` may share a vertex
    /// with this bucket.
    #[inline]
    pub fn overlaps(&self, min: usize, max: usize) -> bool {
        self.min <= max && self.max >= min
    }
}

/// Triangles remapped through a [`WeldTable`], sorted by minimum index.
#[derive(Debug, Clone)]
pub struct IndexedTriangles {
    triangles: Vec<Triangle>,
    buckets: Vec<Bucket>,
}

impl IndexedTriangles {
    /// Remap, sort and bucket the triangles of `triangulation`.
    pub fn new(triangulation: &Triangulation, weld: &WeldTable) -> Self {
        let mut triangles: Vec<Triangle> = triangulation
            .triangles()
            .enumerate()
            .map(|(source, [a, b, c])| {
                Triangle::new(
                    [weld.canonical(a), weld.canonical(b), weld.canonical(c)],
                    source,
                )
            })
            .collect();

        // Stable, so equal minima keep input order.
        triangles.sort_by_key(|t| t.min);

        let buckets = triangles
            .chunks(BUCKET_SIZE)
            .map(|chunk| Bucket {
                min: chunk.iter().map(|t| t.min).min().unwrap_or(0),
                max: chunk.iter().map(|t| t.max).max().unwrap_or(0),
            })
            .collect();

        Self { triangles, buckets }
    }

    /// Sorted triangles.
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Bucket ranges; bucket `c` covers sorted triangles `c * BUCKET_SIZE ..`.
    #[inline]
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Number of triangles.
    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if there are no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Number of triangles whose corners collapsed during welding.
    pub fn num_degenerate(&self) -> usize {
        self.triangles.iter().filter(|t| t.is_degenerate()).count()
    }
}
