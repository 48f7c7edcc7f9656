//! Source image measurement.

use std::path::Path;

use image::{ImageReader, ImageResult};

use crate::error::{DrawablesError, Result};

use super::Dimensions;

/// Read the native pixel size of an image from its header.
///
/// The format is sniffed from the file contents, so the extension may be
/// missing or wrong.
pub fn probe_dimensions(path: &Path) -> Result<Dimensions> {
    let (width, height) = read_header(path).map_err(|source| DrawablesError::Probe {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Dimensions::new(width, height))
}

fn read_header(path: &Path) -> ImageResult<(u32, u32)> {
    ImageReader::open(path)?.with_guessed_format()?.into_dimensions()
}
