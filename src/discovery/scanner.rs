//! File system scanner for source images.
//!
//! Directory sources are walked recursively and every raster image inside
//! them becomes a source. File sources are used as given.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::manifest::Manifest;

/// Extensions recognised as raster images (lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp", "tif", "tiff"];

/// Check whether a path looks like a raster image.
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Find every image under `root`, sorted.
///
/// Directories that resolve to `skip` (the output tree) are not entered, so
/// generated drawables never feed back in as sources.
pub fn scan_directory(root: &Path, manifest: &Manifest, skip: Option<&Path>) -> Vec<PathBuf> {
    let skip = skip.and_then(|p| p.canonicalize().ok());

    let mut images: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            if !entry.file_type().is_dir() {
                return true;
            }
            match (&skip, entry.path().canonicalize()) {
                (Some(skip), Ok(dir)) => &dir != skip,
                _ => true,
            }
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| is_image(path) && !manifest.is_excluded(path))
        .collect();

    images.sort();
    images
}

/// Expand source arguments into image paths.
///
/// Directories are scanned; anything else (including paths that do not
/// exist) is passed through so the generator can report it.
pub fn expand_sources(sources: &[PathBuf], manifest: &Manifest, skip: Option<&Path>) -> Vec<PathBuf> {
    let mut result = Vec::new();

    for source in sources {
        if source.is_dir() {
            result.extend(scan_directory(source, manifest, skip));
        } else {
            result.push(source.clone());
        }
    }

    result
}
