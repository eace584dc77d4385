//! STL (stereolithography) format support.
//!
//! STL stores every triangle with its own three corners. `stl_io` merges
//! bit-identical corners while reading; near-identical ones are left for the
//! pipeline's weld stage. Saving always writes binary STL.

use std::fs::File;
use std::io::{BufWriter, Read, Seek, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{OutputMesh, Triangulation};

/// Load a triangulation from an STL file.
///
/// Automatically detects binary vs ASCII format.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Triangulation> {
    let path = path.as_ref();
    let mut file = File::open(path)?;
    read(&mut file).map_err(|e| match e {
        MeshError::LoadError { message, .. } => MeshError::load(path, message),
        other => other,
    })
}

/// Read a triangulation from STL data.
pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Triangulation> {
    let stl = stl_io::read_stl(reader).map_err(|e| MeshError::load("<stl>", e))?;

    let vertices: Vec<Point3<f64>> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    let mut indices = Vec::with_capacity(stl.faces.len() * 3);
    for face in &stl.faces {
        for &vi in &face.vertices {
            let vi = u32::try_from(vi)
                .map_err(|_| MeshError::load("<stl>", "too many vertices"))?;
            indices.push(vi);
        }
    }

    Triangulation::new(vertices, indices)
}

/// Save an output mesh to a binary STL file.
pub fn save<P: AsRef<Path>>(mesh: &OutputMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer).map_err(|e| match e {
        MeshError::Io(io) => MeshError::SaveError {
            path: path.to_path_buf(),
            message: io.to_string(),
        },
        other => other,
    })?;
    writer.flush()?;
    Ok(())
}

/// Write an output mesh as binary STL.
pub fn write<W: Write>(mesh: &OutputMesh, writer: &mut W) -> Result<()> {
    let to_f32 = |p: &Point3<f64>| [p.x as f32, p.y as f32, p.z as f32];

    let triangles: Vec<stl_io::Triangle> = mesh
        .triangles()
        .map(|t| {
            let n = mesh.triangle_normal(t);
            let [a, b, c] = t.map(|i| &mesh.vertices()[i]);
            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    stl_io::Vertex::new(to_f32(a)),
                    stl_io::Vertex::new(to_f32(b)),
                    stl_io::Vertex::new(to_f32(c)),
                ],
            }
        })
        .collect();

    stl_io::write_stl(writer, triangles.iter())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn quad() -> OutputMesh {
        let mut mesh = OutputMesh::new();
        for p in [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
        ] {
            mesh.push_vertex(p);
        }
        mesh.push_triangle(0, 2, 1);
        mesh.push_triangle(0, 3, 2);
        mesh
    }

    #[test]
    fn test_binary_write_then_read() {
        let mut buffer = Vec::new();
        write(&quad(), &mut buffer).unwrap();
        // 80-byte header, count, 50 bytes per triangle.
        assert_eq!(buffer.len(), 84 + 2 * 50);

        let t = read(&mut Cursor::new(buffer)).unwrap();
        assert_eq!(t.num_triangles(), 2);
        // Identical corners are shared by the reader.
        assert_eq!(t.num_vertices(), 4);
    }

    #[test]
    fn test_ascii_read() {
        let text = "solid s
facet normal 0 1 0
outer loop
vertex 0 0 0
vertex 0 0 1
vertex 1 0 0
endloop
endfacet
endsolid s
";
        let t = read(&mut Cursor::new(text.as_bytes())).unwrap();
        assert_eq!(t.num_triangles(), 1);
        assert!(t.vertices().contains(&Point3::new(0.0, 0.0, 1.0)));
    }
}
