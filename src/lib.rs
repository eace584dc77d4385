//! # navclean
//!
//! Turns a navigation mesh triangulation into auxiliary meshes that either
//! block off the unreachable parts of the mesh or bake only the reachable ones.
//!
//! Navigation mesh generators happily produce walkable surface on rooftops,
//! inside closed rooms and on top of props. Given a few sample points that
//! mark where agents actually walk, navclean finds every connected patch of
//! the triangulation and:
//!
//! - in [`Mode::BlockNonWalkable`](algo::Mode::BlockNonWalkable) covers each
//!   patch *without* a sample point with a slab and walls, to be fed back to
//!   the navigation mesh builder as a non-walkable area;
//! - in [`Mode::BakeWalkable`](algo::Mode::BakeWalkable) emits each patch
//!   *with* a sample point as a standalone floor mesh.
//!
//! Output meshes never exceed 65536 vertices, so they fit a 16-bit index
//! buffer.
//!
//! ## Quick Start
//!
//! ```
//! use navclean::prelude::*;
//! use nalgebra::Point3;
//!
//! // Two separate islands; the provider duplicated the shared corners.
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 1.0),
//!     Point3::new(0.0, 0.0, 1.0),
//!     Point3::new(5.0, 0.0, 0.0),
//!     Point3::new(6.0, 0.0, 0.0),
//!     Point3::new(5.0, 0.0, 1.0),
//! ];
//! let indices = vec![0, 2, 1, 3, 5, 4, 6, 8, 7];
//! let triangulation = Triangulation::new(vertices, indices).unwrap();
//!
//! // The agent walks on the first island.
//! let walkable = [Point3::new(0.7, 0.0, 0.5)];
//!
//! let meshes = clean(&triangulation, &walkable, &CleanOptions::default()).unwrap();
//! assert_eq!(meshes.len(), 1);
//!
//! // Only the second island is blocked: 3 vertices x 5 layers + 3 walls x 4.
//! assert_eq!(meshes[0].num_vertices(), 27);
//! ```
//!
//! ## Progress
//!
//! Long runs can report progress through [`algo::Progress`]:
//!
//! ```
//! use navclean::prelude::*;
//!
//! let progress = Progress::new(|current, total, stage| {
//!     eprintln!("{stage}: {current}/{total}");
//! });
//! let meshes = clean_with_progress(
//!     &Triangulation::default(),
//!     &[],
//!     &CleanOptions::default(),
//!     &progress,
//! ).unwrap();
//! assert!(meshes.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use navclean::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{clean, clean_with_progress, CleanOptions, Mode, Progress};
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{OutputMesh, Triangulation};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
