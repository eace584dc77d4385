//! Wavefront OBJ support.
//!
//! Only geometry is read: `v` records and `f` records. Texture and normal
//! references in faces (`f 1/2/3`) are ignored, negative (relative) indices
//! are resolved, and polygons with more than three corners are split into a
//! fan.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{OutputMesh, Triangulation};

/// Load a triangulation from an OBJ file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Triangulation> {
    let path = path.as_ref();
    let file = File::open(path)?;
    read(BufReader::new(file)).map_err(|e| match e {
        MeshError::LoadError { message, .. } => MeshError::load(path, message),
        other => other,
    })
}

/// Read a triangulation from OBJ text.
///
/// # Example
/// ```
/// use navclean::io::obj;
///
/// let text = "v 0 0 0\nv 1 0 0\nv 1 0 1\nv 0 0 1\nf 1 3 2\nf -4 -1 -2\n";
/// let t = obj::read(text.as_bytes()).unwrap();
/// assert_eq!(t.num_vertices(), 4);
/// assert_eq!(t.indices(), &[0, 2, 1, 0, 3, 2]);
/// ```
pub fn read<R: BufRead>(reader: R) -> Result<Triangulation> {
    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_no + 1;
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("v") => {
                let mut coords = [0.0f64; 3];
                for c in &mut coords {
                    let field = parts
                        .next()
                        .ok_or_else(|| parse_error(line_no, "vertex needs 3 coordinates"))?;
                    *c = field
                        .parse()
                        .map_err(|_| parse_error(line_no, format!("bad coordinate '{}'", field)))?;
                }
                vertices.push(Point3::from(coords));
            }
            Some("f") => {
                let corners = parts
                    .map(|field| resolve_index(field, vertices.len(), line_no))
                    .collect::<Result<Vec<u32>>>()?;
                if corners.len() < 3 {
                    return Err(parse_error(line_no, "face needs at least 3 corners"));
                }
                for k in 1..corners.len() - 1 {
                    indices.extend_from_slice(&[corners[0], corners[k], corners[k + 1]]);
                }
            }
            _ => {}
        }
    }

    Triangulation::new(vertices, indices)
}

fn parse_error<M: std::fmt::Display>(line: usize, message: M) -> MeshError {
    MeshError::load("<obj>", format!("line {}: {}", line, message))
}

/// Resolve a face corner such as `7`, `7/1/3` or `-2` to a zero-based index.
fn resolve_index(field: &str, vertex_count: usize, line: usize) -> Result<u32> {
    let head = field.split('/').next().unwrap_or(field);
    let raw: i64 = head
        .parse()
        .map_err(|_| parse_error(line, format!("bad face index '{}'", field)))?;

    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r - 1),
        r => Some(vertex_count as i64 + r),
    };
    match resolved {
        Some(i) if i >= 0 && (i as usize) < vertex_count => Ok(i as u32),
        _ => Err(parse_error(line, format!("face index {} out of range", raw))),
    }
}

/// Save an output mesh as OBJ.
pub fn save<P: AsRef<Path>>(mesh: &OutputMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write an output mesh as OBJ text.
pub fn write<W: Write>(mesh: &OutputMesh, writer: &mut W) -> Result<()> {
    writeln!(
        writer,
        "# navclean: {} vertices, {} triangles",
        mesh.num_vertices(),
        mesh.num_triangles()
    )?;
    for v in mesh.vertices() {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for [a, b, c] in mesh.triangles() {
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }
    Ok(())
}
