//! The cleaner pipeline.
//!
//! ```text
//! Triangulation ─▶ weld ─▶ index ─▶ group ─▶ per patch: classify ─▶ caps + walls ─▶ Vec<OutputMesh>
//! ```
//!
//! Two modes share the pipeline:
//!
//! - [`Mode::BlockNonWalkable`] closes every patch that holds no sample point
//!   with a layered slab and outward walls, so that a navigation mesh rebuilt
//!   with these meshes marked non-walkable drops the unreachable islands.
//! - [`Mode::BakeWalkable`] emits only the patches that hold a sample point,
//!   as a floor hanging `height` below the surface with walls down to it.
//!
//! # Example
//!
//! ```
//! use navclean::prelude::*;
//! use nalgebra::Point3;
//!
//! let triangulation = Triangulation::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 1.0),
//!         Point3::new(0.0, 0.0, 1.0),
//!     ],
//!     vec![0, 2, 1, 0, 3, 2],
//! ).unwrap();
//!
//! let options = CleanOptions::default().with_mode(Mode::BakeWalkable);
//! let meshes = clean(&triangulation, &[Point3::new(0.5, 0.0, 0.4)], &options).unwrap();
//! assert_eq!(meshes.len(), 1);
//! assert_eq!(meshes[0].num_vertices(), 24);
//! ```

use nalgebra::{Affine3, Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{OutputMesh, Triangulation, MAX_VERTICES_PER_MESH, SOFT_VERTEX_LIMIT};

use super::assemble::{even_layers, MeshAssembler, VertexLimits};
use super::boundary::{boundary_edges, build_walls, WallFacing};
use super::group::{group_triangles_with_progress, Grouping, Patch};
use super::progress::{Progress, Stage};
use super::triangles::IndexedTriangles;
use super::weld::{WeldTable, DEFAULT_WELD_TOLERANCE};

/// What the generated meshes are for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Slabs over every patch without a sample point.
    #[default]
    BlockNonWalkable,
    /// Only the patches holding a sample point, baked as floors.
    BakeWalkable,
}

/// Options for [`clean`].
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Which patches are emitted and how.
    pub mode: Mode,

    /// Extrusion height along `up`. Zero emits caps without walls.
    pub height: f64,

    /// Distance along `up` added to every cap vertex.
    pub offset: f64,

    /// Interior cap layers between ground and top in block mode.
    pub mid_layers: usize,

    /// Vertices closer than this are welded.
    pub weld_tolerance: f64,

    /// World up direction. Normalized before use.
    pub up: Vector3<f64>,

    /// Transform from source space into the space of the output meshes.
    pub to_local: Affine3<f64>,

    /// Vertex count past which a patch starts a new mesh.
    pub soft_vertex_limit: usize,

    /// Hard vertex limit per mesh.
    pub vertex_ceiling: usize,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            mode: Mode::BlockNonWalkable,
            height: 1.0,
            offset: 0.0,
            mid_layers: 3,
            weld_tolerance: DEFAULT_WELD_TOLERANCE,
            up: Vector3::y(),
            to_local: Affine3::identity(),
            soft_vertex_limit: SOFT_VERTEX_LIMIT,
            vertex_ceiling: MAX_VERTICES_PER_MESH,
        }
    }
}

impl CleanOptions {
    /// Set the mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the extrusion height.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Set the cap offset along `up`.
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the number of interior cap layers.
    pub fn with_mid_layers(mut self, mid_layers: usize) -> Self {
        self.mid_layers = mid_layers;
        self
    }

    /// Set the weld tolerance.
    pub fn with_weld_tolerance(mut self, tolerance: f64) -> Self {
        self.weld_tolerance = tolerance;
        self
    }

    /// Set the up direction.
    pub fn with_up(mut self, up: Vector3<f64>) -> Self {
        self.up = up;
        self
    }

    /// Normalized up direction, or `None` if it has no usable length.
    pub fn up_direction(&self) -> Option<Vector3<f64>> {
        if !self.up.iter().all(|c| c.is_finite()) {
            return None;
        }
        self.up.try_normalize(1e-12)
    }

    /// Set the source-to-output transform.
    pub fn with_transform(mut self, to_local: Affine3<f64>) -> Self {
        self.to_local = to_local;
        self
    }

    /// Set the soft and hard vertex limits per mesh.
    pub fn with_vertex_limits(mut self, soft: usize, ceiling: usize) -> Self {
        self.soft_vertex_limit = soft;
        self.vertex_ceiling = ceiling;
        self
    }

    /// Number of cap layers emitted per vertex in the configured mode.
    pub fn cap_layers(&self) -> usize {
        match self.mode {
            Mode::BlockNonWalkable => 2 + self.mid_layers,
            Mode::BakeWalkable => 2,
        }
    }

    fn limits(&self) -> VertexLimits {
        VertexLimits {
            soft: self.soft_vertex_limit,
            ceiling: self.vertex_ceiling,
        }
    }

    /// Check every option for a usable value.
    pub fn validate(&self) -> Result<()> {
        if !self.height.is_finite() {
            return Err(MeshError::invalid_param("height", self.height, "must be finite"));
        }
        if !self.offset.is_finite() {
            return Err(MeshError::invalid_param("offset", self.offset, "must be finite"));
        }
        if !(self.weld_tolerance.is_finite() && self.weld_tolerance > 0.0) {
            return Err(MeshError::invalid_param(
                "weld_tolerance",
                self.weld_tolerance,
                "must be positive and finite",
            ));
        }
        if self.up_direction().is_none() {
            return Err(MeshError::invalid_param(
                "up",
                format!("[{}, {}, {}]", self.up.x, self.up.y, self.up.z),
                "must be a non-zero finite direction",
            ));
        }
        if self.mid_layers > MAX_VERTICES_PER_MESH {
            return Err(MeshError::invalid_param(
                "mid_layers",
                self.mid_layers,
                "too many layers",
            ));
        }
        let largest_unit = (3 * self.cap_layers()).max(4);
        self.limits().validate(largest_unit)
    }
}

/// Statistics of a triangulation as seen by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    /// Input vertices.
    pub vertices: usize,
    /// Vertices left after welding.
    pub unique_vertices: usize,
    /// Input triangles.
    pub triangles: usize,
    /// Triangles that collapsed during welding.
    pub degenerate_triangles: usize,
    /// Connected patches.
    pub groups: usize,
    /// Open edges over all patches.
    pub boundary_edges: usize,
}

/// Front half of the pipeline: weld, index, group.
struct Prepared {
    weld: WeldTable,
    triangles: IndexedTriangles,
    grouping: Grouping,
}

fn prepare(triangulation: &Triangulation, tolerance: f64, progress: &Progress) -> Prepared {
    progress.report(Stage::Weld, 0, triangulation.num_vertices());
    let weld = WeldTable::build(triangulation.vertices(), tolerance);
    progress.finish(Stage::Weld);
    log::debug!(
        "welded {} vertices into {}",
        triangulation.num_vertices(),
        weld.num_unique()
    );

    let triangles = IndexedTriangles::new(triangulation, &weld);
    let grouping = group_triangles_with_progress(&triangles, progress);
    log::debug!(
        "grouped {} triangles ({} degenerate) into {} patches",
        triangles.len(),
        triangles.num_degenerate(),
        grouping.num_groups()
    );

    Prepared {
        weld,
        triangles,
        grouping,
    }
}

/// Build cleaner meshes from a triangulation.
///
/// `walkable_points` mark the patches that an agent can reach. See the
/// [module documentation](self) for what each [`Mode`] emits.
///
/// # Errors
/// Only [`MeshError::InvalidParameter`] for bad options; the geometry itself
/// never fails.
pub fn clean(
    triangulation: &Triangulation,
    walkable_points: &[Point3<f64>],
    options: &CleanOptions,
) -> Result<Vec<OutputMesh>> {
    clean_with_progress(triangulation, walkable_points, options, &Progress::none())
}

/// Build cleaner meshes from a triangulation, reporting progress.
pub fn clean_with_progress(
    triangulation: &Triangulation,
    walkable_points: &[Point3<f64>],
    options: &CleanOptions,
    progress: &Progress,
) -> Result<Vec<OutputMesh>> {
    options.validate()?;

    let prepared = prepare(triangulation, options.weld_tolerance, progress);
    let patches = prepared
        .grouping
        .patches(&prepared.triangles, &prepared.weld);

    let up = options.up_direction().unwrap_or_else(Vector3::y);
    let extrusion = options.to_local.transform_vector(&(up * options.height));
    // A negative height turns every quad inside out; swap the winding back.
    let wall_facing = |facing: WallFacing| {
        if options.height < 0.0 {
            facing.flipped()
        } else {
            facing
        }
    };
    let mut assembler = MeshAssembler::new(options.limits());
    let mut emitted = 0usize;

    for (g, patch) in patches.iter().enumerate() {
        let walkable = patch.contains_any(walkable_points);
        match (options.mode, walkable) {
            (Mode::BlockNonWalkable, false) => {
                let base = output_positions(patch, up, options);
                let layers = even_layers(extrusion, options.cap_layers());
                assembler.begin_patch(base.len() * layers.len());
                assembler.push_cap(&base, patch.triangles(), &layers);
                let facing = wall_facing(WallFacing::Outward);
                for wall in build_walls(&base, patch.triangles(), extrusion, facing) {
                    assembler.push_wall(&wall);
                }
                emitted += 1;
            }
            (Mode::BakeWalkable, true) => {
                let base = output_positions(patch, up, options);
                let down = -extrusion;
                assembler.flush();
                assembler.push_cap(&base, patch.triangles(), &[down, Vector3::zeros()]);
                let facing = wall_facing(WallFacing::Inward);
                for wall in build_walls(&base, patch.triangles(), down, facing) {
                    assembler.push_wall(&wall);
                }
                assembler.flush();
                emitted += 1;
            }
            _ => {
                log::trace!("skipping patch {:?} (walkable: {})", patch.group(), walkable);
            }
        }
        progress.report(Stage::Emit, g + 1, patches.len());
    }

    let meshes = assembler.finish();
    progress.finish(Stage::Emit);
    log::info!(
        "{:?}: {} of {} patches emitted into {} meshes",
        options.mode,
        emitted,
        patches.len(),
        meshes.len()
    );
    Ok(meshes)
}

/// Patch vertices lifted by `offset` and moved into output space.
fn output_positions(patch: &Patch, up: Vector3<f64>, options: &CleanOptions) -> Vec<Point3<f64>> {
    let lift = up * options.offset;
    patch
        .positions()
        .iter()
        .map(|p| options.to_local.transform_point(&(p + lift)))
        .collect()
}

/// Run the weld and grouping stages only and report what they found.
///
/// # Example
/// ```
/// use navclean::algo::cleaner::{summarize, CleanOptions};
/// use navclean::mesh::Triangulation;
/// use nalgebra::Point3;
///
/// let t = Triangulation::new(
///     vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 0.0, 1.0)],
///     vec![0, 2, 1],
/// ).unwrap();
/// let summary = summarize(&t, &CleanOptions::default()).unwrap();
/// assert_eq!(summary.groups, 1);
/// assert_eq!(summary.boundary_edges, 3);
/// ```
pub fn summarize(triangulation: &Triangulation, options: &CleanOptions) -> Result<Summary> {
    options.validate()?;
    let prepared = prepare(triangulation, options.weld_tolerance, &Progress::none());
    let patches = prepared
        .grouping
        .patches(&prepared.triangles, &prepared.weld);

    Ok(Summary {
        vertices: triangulation.num_vertices(),
        unique_vertices: prepared.weld.num_unique(),
        triangles: triangulation.num_triangles(),
        degenerate_triangles: prepared.triangles.num_degenerate(),
        groups: patches.len(),
        boundary_edges: patches
            .iter()
            .map(|p| boundary_edges(p.triangles()).len())
            .sum(),
    })
}
