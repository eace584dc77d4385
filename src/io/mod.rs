//! Triangulation and mesh file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load triangulation | Save mesh | Notes |
//! |--------|-----------|--------------------|-----------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | Polygons are fan-triangulated |
//! | STL | `.stl` | ✓ | ✓ | Binary and ASCII in, binary out |
//!
//! Loading never welds: duplicate vertices are left for the pipeline.
//!
//! ```no_run
//! use navclean::io::{load_triangulation, save};
//! use navclean::prelude::*;
//!
//! let triangulation = load_triangulation("navmesh.obj").unwrap();
//! let meshes = clean(&triangulation, &[], &CleanOptions::default()).unwrap();
//! for (i, mesh) in meshes.iter().enumerate() {
//!     save(mesh, format!("blocker_{}.stl", i)).unwrap();
//! }
//! ```

pub mod obj;
pub mod stl;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::{OutputMesh, Triangulation};

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// STL (stereolithography) format.
    Stl,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "stl" => Some(Format::Stl),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a triangulation with automatic format detection.
pub fn load_triangulation<P: AsRef<Path>>(path: P) -> Result<Triangulation> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::load(path),
        Format::Stl => stl::load(path),
    }
}

/// Save an output mesh with automatic format detection.
pub fn save<P: AsRef<Path>>(mesh: &OutputMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::save(mesh, path),
        Format::Stl => stl::save(mesh, path),
    }
}
