//! Validated input snapshot.

use nalgebra::Point3;

use crate::error::{MeshError, Result};

/// A triangulated surface as handed over by a navigation mesh provider.
///
/// Every three consecutive indices form one triangle. Vertices are typically
/// duplicated along tile or polygon borders; welding them is the pipeline's
/// job, not the provider's.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triangulation {
    vertices: Vec<Point3<f64>>,
    indices: Vec<u32>,
}

impl Triangulation {
    /// Validate and wrap a vertex array and a flat index array.
    ///
    /// # Errors
    /// - [`MeshError::IndexCountNotMultipleOfThree`] if `indices.len() % 3 != 0`
    /// - [`MeshError::InvalidVertexIndex`] if an index is out of range
    /// - [`MeshError::NonFiniteVertex`] if a vertex has a NaN or infinite coordinate
    ///
    /// # Example
    /// ```
    /// use navclean::mesh::Triangulation;
    /// use nalgebra::Point3;
    ///
    /// let tri = Triangulation::new(
    ///     vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 0.0, 1.0)],
    ///     vec![0, 1, 2],
    /// ).unwrap();
    /// assert_eq!(tri.num_triangles(), 1);
    ///
    /// assert!(Triangulation::new(vec![Point3::origin()], vec![0, 1, 2]).is_err());
    /// ```
    pub fn new(vertices: Vec<Point3<f64>>, indices: Vec<u32>) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotMultipleOfThree { len: indices.len() });
        }

        if let Some(vertex) = vertices
            .iter()
            .position(|p| !p.coords.iter().all(|c| c.is_finite()))
        {
            return Err(MeshError::NonFiniteVertex { vertex });
        }

        for (i, &vi) in indices.iter().enumerate() {
            if vi as usize >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex {
                    triangle: i / 3,
                    vertex: vi as usize,
                    vertex_count: vertices.len(),
                });
            }
        }

        Ok(Self { vertices, indices })
    }

    /// Build from triangle triples instead of a flat index array.
    pub fn from_triangles(vertices: Vec<Point3<f64>>, triangles: &[[u32; 3]]) -> Result<Self> {
        let indices = triangles.iter().flatten().copied().collect();
        Self::new(vertices, indices)
    }

    /// Vertex positions.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Flat triangle index array.
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

    /// Returns true if there are no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over triangles as vertex index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri_vertices() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn test_valid() {
        let t = Triangulation::new(tri_vertices(), vec![0, 2, 1]).unwrap();
        assert_eq!(t.num_vertices(), 3);
        assert_eq!(t.num_triangles(), 1);
        assert_eq!(t.triangles().next(), Some([0, 2, 1]));
    }

    #[test]
    fn test_empty_is_valid() {
        let t = Triangulation::new(Vec::new(), Vec::new()).unwrap();
        assert!(t.is_empty());
    }

    #[test]
    fn test_bad_index_count() {
        let err = Triangulation::new(tri_vertices(), vec![0, 1]).unwrap_err();
        assert!(matches!(err, MeshError::IndexCountNotMultipleOfThree { len: 2 }));
    }

    #[test]
    fn test_out_of_range() {
        let err = Triangulation::new(tri_vertices(), vec![0, 1, 2, 0, 1, 5]).unwrap_err();
        assert!(matches!(
            err,
            MeshError::InvalidVertexIndex {
                triangle: 1,
                vertex: 5,
                vertex_count: 3
            }
        ));
    }

    #[test]
    fn test_non_finite() {
        let mut v = tri_vertices();
        v[1].y = f64::NAN;
        let err = Triangulation::new(v, vec![0, 1, 2]).unwrap_err();
        assert!(matches!(err, MeshError::NonFiniteVertex { vertex: 1 }));
    }

    #[test]
    fn test_from_triangles() {
        let t = Triangulation::from_triangles(tri_vertices(), &[[0, 1, 2]]).unwrap();
        assert_eq!(t.indices(), &[0, 1, 2]);
    }
}
