//! drawables - Android density drawable generator
//!
//! A library for scaling source images into the `drawable-<density>`
//! resource buckets of an Android project.

pub mod cli;
pub mod density;
pub mod discovery;
pub mod error;
pub mod generator;
pub mod output;

pub use density::{Density, DensityFilter, DENSITIES};
pub use discovery::{expand_sources, load_manifest, Manifest, MANIFEST_FILENAME};
pub use error::{DrawablesError, Result};
pub use generator::{
    create_image, probe_dimensions, target_size, Artifact, BatchReport, Dimensions, Event,
    GenerationOptions, Progress, ResizeFilter, ResourceGenerator,
};
