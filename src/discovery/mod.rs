//! Source discovery and project manifest lookup.
//!
//! A project may keep its settings in a `drawables.yaml` manifest. Sources
//! (from the manifest or the command line) can name image files or
//! directories; directories are expanded to the images they contain.

mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use crate::error::{DrawablesError, Result};

pub use manifest::Manifest;
pub use scanner::{expand_sources, is_image, scan_directory, IMAGE_EXTENSIONS};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "drawables.yaml";

/// Load the project manifest.
///
/// An explicit `path` must exist. Without one, `drawables.yaml` in `root` is
/// used when present, and defaults otherwise.
pub fn load_manifest(root: &Path, path: Option<&Path>) -> Result<(Manifest, Option<PathBuf>)> {
    if let Some(path) = path {
        if !path.is_file() {
            return Err(DrawablesError::Config {
                message: format!("Manifest {} does not exist", path.display()),
                help: Some(format!("Run `drawables init` to create a {}", MANIFEST_FILENAME)),
            });
        }
        return Ok((Manifest::load(path)?, Some(path.to_path_buf())));
    }

    let default_path = root.join(MANIFEST_FILENAME);
    if default_path.is_file() {
        Ok((Manifest::load(&default_path)?, Some(default_path)))
    } else {
        Ok((Manifest::default(), None))
    }
}

/// Resolve manifest source entries against the directory holding the manifest.
pub fn manifest_sources(manifest: &Manifest, base: &Path) -> Vec<PathBuf> {
    manifest
        .sources
        .iter()
        .map(|s| {
            let path = Path::new(s);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                base.join(path)
            }
        })
        .collect()
}
