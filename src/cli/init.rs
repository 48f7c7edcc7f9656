//! Init command implementation.
//!
//! Generates a `drawables.yaml` manifest from the images found in a project.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::density::Density;
use crate::discovery::{scan_directory, Manifest, MANIFEST_FILENAME};
use crate::error::{DrawablesError, Result};
use crate::output::{display_path, plural, Printer};

/// Conventional location of an Android app's resources.
const ANDROID_RES_DIR: &str = "app/src/main/res";

/// Initialize a drawables project by generating a drawables.yaml manifest
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Destination res directory to record [default: app/src/main/res if present, else res]
    #[arg(long, short)]
    pub dest: Option<PathBuf>,

    /// Overwrite existing drawables.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(DrawablesError::Config {
            message: format!("{} already exists", MANIFEST_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    let dest = args.dest.unwrap_or_else(|| {
        if args.path.join(ANDROID_RES_DIR).is_dir() {
            PathBuf::from(ANDROID_RES_DIR)
        } else {
            PathBuf::from("res")
        }
    });

    printer.status("Scanning", &display_path(&args.path));
    let images = scan_directory(&args.path, &Manifest::default(), Some(&args.path.join(&dest)));

    // Directories holding images, relative to the project root
    let mut source_dirs = BTreeSet::new();
    for image in &images {
        if let Some(parent) = image.parent() {
            let relative = parent.strip_prefix(&args.path).unwrap_or(parent);
            let dir = if relative == Path::new("") {
                ".".to_string()
            } else {
                format!("{}/", relative.display())
            };
            source_dirs.insert(dir);
        }
    }

    // Built by hand so the file reads like documentation
    let mut yaml = String::new();
    if source_dirs.is_empty() {
        yaml.push_str("sources: []\n");
    } else {
        yaml.push_str("sources:\n");
        for dir in &source_dirs {
            yaml.push_str(&format!("  - \"{}\"\n", dir));
        }
    }
    yaml.push_str(&format!("dest: \"{}/\"\n", dest.display()));
    yaml.push_str(&format!("source_size: {}\n", Density::XXXHDPI.name));
    yaml.push_str("# dest_sizes: [mdpi, hdpi, xhdpi, xxhdpi, xxxhdpi]\n");
    yaml.push_str("# filter: lanczos3\n");

    fs::write(&manifest_path, &yaml).map_err(|e| DrawablesError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    if !source_dirs.is_empty() {
        let dirs: Vec<&str> = source_dirs.iter().map(|s| s.as_str()).collect();
        printer.info("Discovered", &dirs.join(", "));
    }

    printer.status(
        "Created",
        &format!("{} ({} found)", MANIFEST_FILENAME, plural(images.len(), "image", "images")),
    );

    Ok(())
}
