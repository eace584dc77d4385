//! Core mesh data types.
//!
//! # Overview
//!
//! - [`Triangulation`]: the validated input snapshot, a vertex array plus a
//!   flat triangle index array.
//! - [`OutputMesh`]: one generated vertex/index buffer, always small enough
//!   for a 16-bit index format.
//!
//! # Index Types
//!
//! Pipeline elements are identified by type-safe index wrappers:
//! - [`TriangleId`] - a triangle in sorted processing order
//! - [`GroupId`] - a connected patch of triangles
//!
//! # Construction
//!
//! ```
//! use navclean::mesh::Triangulation;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 0.0, 1.0),
//! ];
//! let triangulation = Triangulation::new(vertices, vec![0, 2, 1]).unwrap();
//! assert_eq!(triangulation.num_triangles(), 1);
//! ```

mod index;
mod output;
mod triangulation;

pub use index::{GroupId, TriangleId};
pub use output::{OutputMesh, MAX_VERTICES_PER_MESH, SOFT_VERTEX_LIMIT};
pub use triangulation::Triangulation;
