//! The cleaner pipeline and its stages.
//!
//! - **Weld** ([`weld`]): merge near-duplicate vertices
//! - **Index** ([`triangles`]): remap, sort and bucket triangles
//! - **Group** ([`group`]): connected patches via union-find
//! - **Classify** ([`classify`]): does a sample point fall inside a patch
//! - **Boundary** ([`boundary`]): open edges and wall quads
//! - **Assemble** ([`assemble`]): caps and walls into size-limited meshes
//!
//! [`cleaner`] strings the stages together; most callers only need
//! [`clean`] and [`CleanOptions`].

pub mod assemble;
pub mod boundary;
pub mod classify;
pub mod cleaner;
pub mod group;
pub mod progress;
pub mod triangles;
pub mod weld;

pub use cleaner::{clean, clean_with_progress, summarize, CleanOptions, Mode, Summary};
pub use progress::{Progress, Stage};
