//! Progress reporting for the cleaner pipeline.
//!
//! The pipeline runs in three stages. Each stage reports its own
//! `(done, total)` counts, which are folded into a single bar so that a
//! caller sees one monotonic range from the first weld to the last wall.
//!
//! ```
//! use navclean::algo::{Progress, Stage};
//!
//! let progress = Progress::new(|current, total, message| {
//!     eprintln!("[{}/{}] {}", current, total, message);
//! });
//! progress.report(Stage::Weld, 50, 100);
//! ```
//!
//! Reporting is advisory: the callback cannot influence the pipeline.

/// A pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Merging duplicate vertices.
    Weld,
    /// Splitting triangles into connected groups.
    Group,
    /// Classifying groups and emitting caps and walls.
    Emit,
}

impl Stage {
    /// Number of stages.
    pub const COUNT: usize = 3;

    /// Zero-based position of this stage.
    pub fn index(self) -> usize {
        match self {
            Stage::Weld => 0,
            Stage::Group => 1,
            Stage::Emit => 2,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Weld => "Weld vertices (1/3)",
            Stage::Group => "Group triangles (2/3)",
            Stage::Emit => "Create meshes (3/3)",
        }
    }
}

/// A progress callback that receives updates during a pipeline run.
///
/// The callback receives:
/// - `current`: position on the overall bar
/// - `total`: length of the overall bar
/// - `message`: label of the running stage
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

/// Resolution of one stage on the overall bar.
const STAGE_SCALE: usize = 1000;

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report `done` of `total` units of work inside `stage`.
    ///
    /// Stage `k` occupies `[k, k + 1)` of [`Stage::COUNT`] equal slices.
    /// Fixed-point arithmetic keeps the mapping exact and monotonic.
    pub fn report(&self, stage: Stage, done: usize, total: usize) {
        let fraction = if total == 0 {
            STAGE_SCALE
        } else {
            (done.min(total) * STAGE_SCALE) / total
        };
        let effective = stage.index() * STAGE_SCALE + fraction;
        (self.callback)(effective, Stage::COUNT * STAGE_SCALE, stage.label());
    }

    /// Report every `stride` units; skips the callback otherwise.
    #[inline]
    pub fn tick(&self, stage: Stage, done: usize, total: usize, stride: usize) {
        if stride == 0 || done % stride == 0 {
            self.report(stage, done, total);
        }
    }

    /// Report that `stage` has finished.
    #[inline]
    pub fn finish(&self, stage: Stage) {
        self.report(stage, 1, 1);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
