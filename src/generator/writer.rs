//! Resize-and-write of a single variant.
//!
//! Encoding goes to a temporary file next to the destination which is then
//! renamed into place, so a failed write never leaves a partial file behind.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use serde::Deserialize;

use crate::error::{DrawablesError, Result};

use super::Dimensions;

/// Resampling filter used when scaling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Create `dir` and any missing parents.
///
/// Succeeds when the directory already exists, including when a sibling job
/// created it a moment earlier.
pub fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

/// Scale `source` to exactly `size` and write it to `dest`.
///
/// The output format follows the extension of `dest`. When `dest` has no
/// extension the image crate can encode, the format sniffed from the
/// source's contents is used instead.
pub fn create_image(source: &Path, dest: &Path, size: Dimensions, filter: ResizeFilter) -> Result<Dimensions> {
    write_scaled(source, dest, size, filter).map_err(|source| DrawablesError::Write {
        path: dest.to_path_buf(),
        source,
    })?;

    Ok(size)
}

fn write_scaled(
    source: &Path,
    dest: &Path,
    size: Dimensions,
    filter: ResizeFilter,
) -> std::result::Result<(), ImageError> {
    let reader = ImageReader::open(source)?.with_guessed_format()?;
    let format = match ImageFormat::from_path(dest) {
        Ok(format) => format,
        Err(err) => reader.format().ok_or(err)?,
    };

    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(dir)?;

    let img = reader.decode()?;
    let resized = img.resize_exact(size.width, size.height, filter.into());
    let resized = match format {
        ImageFormat::Jpeg if resized.color().has_alpha() => DynamicImage::ImageRgb8(resized.to_rgb8()),
        _ => resized,
    };

    // Dropped (and deleted) on any early return
    let mut staged = tempfile::Builder::new()
        .prefix(".drawables-")
        .tempfile_in(dir)?;

    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        resized.write_to(&mut writer, format)?;
        writer.flush()?;
    }

    // Temp files are created owner-only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }

    staged.persist(dest).map_err(|e| ImageError::IoError(e.error))?;

    Ok(())
}
