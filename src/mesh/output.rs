//! Generated mesh buffers.

use nalgebra::{Point3, Vector3};

/// Largest vertex count addressable by a 16-bit index buffer.
pub const MAX_VERTICES_PER_MESH: usize = 65536;

/// Vertex count past which a fresh buffer is preferred for the next patch.
pub const SOFT_VERTEX_LIMIT: usize = 32768;

/// One generated mesh: a vertex buffer plus a flat triangle index buffer.
///
/// Every index is below [`num_vertices`](Self::num_vertices); triangles never
/// reference vertices of another `OutputMesh`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputMesh {
    pub(crate) vertices: Vec<Point3<f64>>,
    pub(crate) indices: Vec<u32>,
}

impl OutputMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertex positions.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Flat triangle index buffer.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns true if the mesh holds no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over triangles as vertex index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    /// Unit normal of a triangle, or zero for a degenerate one.
    pub fn triangle_normal(&self, [a, b, c]: [usize; 3]) -> Vector3<f64> {
        let p0 = self.vertices[a];
        let n = (self.vertices[b] - p0).cross(&(self.vertices[c] - p0));
        n.try_normalize(1e-12).unwrap_or_else(Vector3::zeros)
    }

    /// Axis-aligned bounding box, or `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        }))
    }

    #[inline]
    pub(crate) fn push_vertex(&mut self, p: Point3<f64>) -> u32 {
        let i = self.vertices.len() as u32;
        self.vertices.push(p);
        i
    }

    #[inline]
    pub(crate) fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_query() {
        let mut m = OutputMesh::new();
        assert!(m.is_empty());
        assert!(m.bounding_box().is_none());

        let a = m.push_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = m.push_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = m.push_vertex(Point3::new(0.0, 2.0, 0.0));
        m.push_triangle(a, b, c);

        assert_eq!(m.num_vertices(), 3);
        assert_eq!(m.num_triangles(), 1);
        assert_eq!(m.triangles().next(), Some([0, 1, 2]));

        let n = m.triangle_normal([0, 1, 2]);
        assert!((n - Vector3::z()).norm() < 1e-12);

        let (lo, hi) = m.bounding_box().unwrap();
        assert_eq!(lo, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(hi, Point3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_degenerate_normal_is_zero() {
        let mut m = OutputMesh::new();
        m.push_vertex(Point3::origin());
        m.push_vertex(Point3::origin());
        m.push_vertex(Point3::new(1.0, 0.0, 0.0));
        assert_eq!(m.triangle_normal([0, 1, 2]), Vector3::zeros());
    }
}
