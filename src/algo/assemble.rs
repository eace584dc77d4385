//! Output buffer assembly.
//!
//! Geometry is appended in self-contained units: one source triangle with all
//! of its cap layers, or one wall quad. Before each unit the assembler checks
//! whether its new vertices still fit under the ceiling and starts a fresh
//! [`OutputMesh`] if not, so a triangle never references another buffer.

use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{OutputMesh, MAX_VERTICES_PER_MESH, SOFT_VERTEX_LIMIT};

use super::boundary::Wall;

/// Vertex budget of one output mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLimits {
    /// A patch starts a new buffer once the current one holds more than this.
    pub soft: usize,
    /// Hard upper bound on vertices per buffer.
    pub ceiling: usize,
}

impl Default for VertexLimits {
    fn default() -> Self {
        Self {
            soft: SOFT_VERTEX_LIMIT,
            ceiling: MAX_VERTICES_PER_MESH,
        }
    }
}

impl VertexLimits {
    /// Check the limits against the largest unit that will be appended.
    pub fn validate(&self, largest_unit: usize) -> Result<()> {
        if self.ceiling > MAX_VERTICES_PER_MESH {
            return Err(MeshError::invalid_param(
                "vertex_ceiling",
                self.ceiling,
                "must not exceed 65536",
            ));
        }
        if self.ceiling < largest_unit {
            return Err(MeshError::invalid_param(
                "vertex_ceiling",
                self.ceiling,
                "too small to hold one cap triangle or wall quad",
            ));
        }
        if self.soft > self.ceiling {
            return Err(MeshError::invalid_param(
                "soft_vertex_limit",
                self.soft,
                "must not exceed vertex_ceiling",
            ));
        }
        Ok(())
    }
}

/// Cap layer displacements from ground to `extrusion`, evenly spaced.
///
/// `count` is clamped to at least 2.
pub fn even_layers(extrusion: Vector3<f64>, count: usize) -> Vec<Vector3<f64>> {
    let count = count.max(2);
    (0..count)
        .map(|j| extrusion * (j as f64 / (count - 1) as f64))
        .collect()
}

/// Accumulates caps and walls into size-limited output meshes.
#[derive(Debug)]
pub struct MeshAssembler {
    limits: VertexLimits,
    current: OutputMesh,
    finished: Vec<OutputMesh>,
}

impl MeshAssembler {
    /// Create an assembler with the given limits.
    pub fn new(limits: VertexLimits) -> Self {
        Self {
            limits,
            current: OutputMesh::new(),
            finished: Vec::new(),
        }
    }

    /// Vertices in the buffer under construction.
    #[inline]
    pub fn current_len(&self) -> usize {
        self.current.num_vertices()
    }

    /// Number of buffers already closed.
    #[inline]
    pub fn num_finished(&self) -> usize {
        self.finished.len()
    }

    /// Close the current buffer. Returns false if it was empty.
    pub fn flush(&mut self) -> bool {
        if self.current.is_empty() {
            return false;
        }
        let done = std::mem::take(&mut self.current);
        log::trace!(
            "closing mesh {} with {} vertices, {} triangles",
            self.finished.len(),
            done.num_vertices(),
            done.num_triangles()
        );
        self.finished.push(done);
        true
    }

    /// Make room for `vertices` more vertices. Returns true if a new buffer was started.
    pub fn reserve(&mut self, vertices: usize) -> bool {
        debug_assert!(vertices <= self.limits.ceiling);
        if self.current_len() + vertices <= self.limits.ceiling {
            return false;
        }
        self.flush()
    }

    /// Start a new buffer before a patch when the current one is past the
    /// soft limit, or when `projected` more vertices would not fit.
    pub fn begin_patch(&mut self, projected: usize) {
        let len = self.current_len();
        if len > self.limits.soft || len + projected > self.limits.ceiling {
            self.flush();
        }
    }

    /// Append a layered cap.
    ///
    /// Each vertex of `positions` is emitted once per entry of `layers`,
    /// displaced by that entry, with its layers stored contiguously. Layer 0
    /// is wound reversed so that it faces the other way from the rest.
    /// Degenerate triangles are skipped.
    pub fn push_cap(&mut self, positions: &[Point3<f64>], triangles: &[[usize; 3]], layers: &[Vector3<f64>]) {
        if layers.is_empty() {
            return;
        }
        let per_vertex = layers.len();
        // Base index of each vertex's layer block in the current buffer.
        let mut slots: Vec<Option<u32>> = vec![None; positions.len()];

        for &corners in triangles {
            let [a, b, c] = corners;
            if a == b || b == c || a == c {
                continue;
            }

            let missing = corners.iter().filter(|&&v| slots[v].is_none()).count();
            if self.reserve(missing * per_vertex) {
                slots.fill(None);
            }

            let mut base = [0u32; 3];
            for (k, &v) in corners.iter().enumerate() {
                base[k] = match slots[v] {
                    Some(b) => b,
                    None => {
                        let b = self.current_len() as u32;
                        for offset in layers {
                            self.current.push_vertex(positions[v] + offset);
                        }
                        slots[v] = Some(b);
                        b
                    }
                };
            }

            for j in 0..per_vertex as u32 {
                let [ia, ib, ic] = base.map(|b| b + j);
                if j == 0 {
                    self.current.push_triangle(ia, ic, ib);
                } else {
                    self.current.push_triangle(ia, ib, ic);
                }
            }
        }
    }

    /// Append one wall quad.
    pub fn push_wall(&mut self, wall: &Wall) {
        self.reserve(4);
        let first = self.current_len() as u32;
        for corner in wall.corners() {
            self.current.push_vertex(corner);
        }
        for [a, b, c] in wall.triangles() {
            self.current.push_triangle(first + a, first + b, first + c);
        }
    }

    /// Close the last buffer and return every non-empty mesh in order.
    pub fn finish(mut self) -> Vec<OutputMesh> {
        self.flush();
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::boundary::WallFacing;

    fn grid(n: usize) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let mut positions = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                positions.push(Point3::new(i as f64, 0.0, j as f64));
            }
        }
        let mut triangles = Vec::new();
        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + n + 1;
                let v11 = v01 + 1;
                triangles.push([v00, v11, v10]);
                triangles.push([v00, v01, v11]);
            }
        }
        (positions, triangles)
    }

    fn assert_well_formed(meshes: &[OutputMesh], ceiling: usize) {
        for m in meshes {
            assert!(!m.is_empty());
            assert!(m.num_vertices() <= ceiling);
            assert_eq!(m.indices().len() % 3, 0);
            assert!(m.indices().iter().all(|&i| (i as usize) < m.num_vertices()));
        }
    }

    #[test]
    fn test_even_layers() {
        let layers = even_layers(Vector3::new(0.0, 4.0, 0.0), 5);
        assert_eq!(layers.len(), 5);
        assert_eq!(layers[0], Vector3::zeros());
        assert_eq!(layers[2], Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(layers[4], Vector3::new(0.0, 4.0, 0.0));
        assert_eq!(even_layers(Vector3::y(), 0).len(), 2);
    }

    #[test]
    fn test_cap_layout_and_winding() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let layers = even_layers(Vector3::new(0.0, 1.0, 0.0), 2);
        let mut asm = MeshAssembler::new(VertexLimits::default());
        asm.push_cap(&positions, &[[0, 2, 1]], &layers);
        let meshes = asm.finish();

        assert_eq!(meshes.len(), 1);
        let m = &meshes[0];
        assert_eq!(m.num_vertices(), 6);
        assert_eq!(m.vertices()[0], positions[0]);
        assert_eq!(m.vertices()[1], Point3::new(0.0, 1.0, 0.0));
        assert_eq!(m.indices(), &[0, 4, 2, 1, 3, 5]);

        // Floor faces down, roof faces up.
        let floor = m.triangle_normal([0, 4, 2]);
        let roof = m.triangle_normal([1, 3, 5]);
        assert!(floor.y < 0.0 && roof.y > 0.0);
    }

    #[test]
    fn test_cap_shares_vertices_within_buffer() {
        let (positions, triangles) = grid(4);
        let layers = even_layers(Vector3::y(), 3);
        let mut asm = MeshAssembler::new(VertexLimits::default());
        asm.push_cap(&positions, &triangles, &layers);
        let meshes = asm.finish();
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].num_vertices(), positions.len() * 3);
        assert_eq!(meshes[0].num_triangles(), triangles.len() * 3);
    }

    #[test]
    fn test_cap_rolls_over_mid_patch() {
        let (positions, triangles) = grid(10);
        let layers = even_layers(Vector3::y(), 2);
        let limits = VertexLimits { soft: 40, ceiling: 50 };
        let mut asm = MeshAssembler::new(limits);
        asm.push_cap(&positions, &triangles, &layers);
        let meshes = asm.finish();

        assert!(meshes.len() > 1);
        assert_well_formed(&meshes, 50);
        let total: usize = meshes.iter().map(OutputMesh::num_triangles).sum();
        assert_eq!(total, triangles.len() * 2);
    }

    #[test]
    fn test_degenerate_cap_triangles_skipped() {
        let positions = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 0.0, 1.0)];
        let mut asm = MeshAssembler::new(VertexLimits::default());
        asm.push_cap(&positions, &[[0, 0, 1], [1, 2, 2]], &even_layers(Vector3::y(), 2));
        assert!(asm.finish().is_empty());
    }

    #[test]
    fn test_walls_roll_over_whole() {
        let wall = Wall {
            start: Point3::origin(),
            end: Point3::new(1.0, 0.0, 0.0),
            extrusion: Vector3::y(),
            facing: WallFacing::Outward,
        };
        let mut asm = MeshAssembler::new(VertexLimits { soft: 8, ceiling: 10 });
        for _ in 0..5 {
            asm.push_wall(&wall);
        }
        let meshes = asm.finish();
        assert_eq!(meshes.iter().map(OutputMesh::num_vertices).collect::<Vec<_>>(), vec![8, 8, 4]);
        assert_well_formed(&meshes, 10);
    }

    #[test]
    fn test_begin_patch_flushes_proactively() {
        let wall = Wall {
            start: Point3::origin(),
            end: Point3::new(1.0, 0.0, 0.0),
            extrusion: Vector3::y(),
            facing: WallFacing::Inward,
        };
        let mut asm = MeshAssembler::new(VertexLimits { soft: 6, ceiling: 100 });
        asm.push_wall(&wall);
        asm.begin_patch(10);
        assert_eq!(asm.num_finished(), 0);
        asm.push_wall(&wall);
        asm.begin_patch(10);
        assert_eq!(asm.num_finished(), 1);
        assert_eq!(asm.current_len(), 0);

        asm.push_wall(&wall);
        asm.begin_patch(97);
        assert_eq!(asm.num_finished(), 2);
    }

    #[test]
    fn test_flush_empty_is_noop() {
        let mut asm = MeshAssembler::new(VertexLimits::default());
        assert!(!asm.flush());
        assert!(asm.finish().is_empty());
    }

    #[test]
    fn test_limits_validation() {
        assert!(VertexLimits::default().validate(15).is_ok());
        assert!(VertexLimits { soft: 10, ceiling: 70000 }.validate(4).is_err());
        assert!(VertexLimits { soft: 10, ceiling: 12 }.validate(15).is_err());
        assert!(VertexLimits { soft: 20, ceiling: 16 }.validate(4).is_err());
    }
}
