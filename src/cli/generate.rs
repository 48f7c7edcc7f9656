//! Generate command implementation.
//!
//! Resolves settings from the command line and the project manifest, then
//! runs the generator and prints one status line per written drawable.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use crate::density::{Density, DensityFilter};
use crate::discovery::{expand_sources, load_manifest, manifest_sources, Manifest};
use crate::error::{DrawablesError, Result};
use crate::generator::{BatchReport, GenerationOptions, Progress, ResizeFilter, ResourceGenerator};
use crate::output::{display_path, plural, Printer};

/// Generate density variants of source images
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Source images or directories (default: manifest sources)
    pub sources: Vec<PathBuf>,

    /// Android res directory; drawable-<density>/ folders are created inside
    #[arg(long, short)]
    pub dest: Option<PathBuf>,

    /// Density the sources were authored at [default: xxxhdpi]
    #[arg(long, short = 's')]
    pub source_size: Option<String>,

    /// Only generate these densities (comma separated) [default: all]
    #[arg(long, value_delimiter = ',')]
    pub dest_sizes: Vec<String>,

    /// Resampling filter [default: lanczos3]
    #[arg(long, value_enum)]
    pub filter: Option<ResizeFilter>,

    /// Manifest to read settings from [default: ./drawables.yaml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the generated drawables as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug)]
struct Plan {
    sources: Vec<PathBuf>,
    options: GenerationOptions,
}

pub async fn run(args: GenerateArgs, printer: &Printer) -> Result<BatchReport> {
    let (manifest, manifest_path) = load_manifest(Path::new("."), args.config.as_deref())?;
    let base = manifest_path
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let json = args.json;
    let plan = resolve(args, &manifest, &base, printer)?;

    printer.header("Generating Android resources");

    if plan.sources.is_empty() {
        printer.warning("Warning", "No source images found");
        return Ok(BatchReport::default());
    }

    let (progress, mut events) = Progress::channel();
    let reporter_printer = *printer;
    let reporter = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            reporter_printer.event(&event);
        }
    });

    let generator = ResourceGenerator::new(plan.options).with_progress(progress);
    let result = generator.generate_resources(&plan.sources).await;
    drop(generator);
    reporter.await?;

    let report = result?;

    let sources: BTreeSet<&Path> = report.artifacts.iter().map(|a| a.source.as_path()).collect();
    printer.info(
        "Finished",
        &format!(
            "{} from {}",
            plural(report.artifacts.len(), "drawable", "drawables"),
            plural(sources.len(), "source", "sources")
        ),
    );

    if json {
        let out = serde_json::to_string_pretty(&report).map_err(|e| DrawablesError::Io {
            path: PathBuf::from("<stdout>"),
            message: format!("Failed to serialize report: {}", e),
        })?;
        println!("{}", out);
    }

    Ok(report)
}

/// Merge command line arguments over manifest settings.
fn resolve(args: GenerateArgs, manifest: &Manifest, base: &Path, printer: &Printer) -> Result<Plan> {
    let dest = match (args.dest, &manifest.dest) {
        (Some(dest), _) => dest,
        (None, Some(dest)) => base.join(dest),
        (None, None) => {
            return Err(DrawablesError::Config {
                message: "No destination directory given".to_string(),
                help: Some("Pass --dest <res dir> or set `dest` in drawables.yaml".to_string()),
            })
        }
    };

    let sources = if args.sources.is_empty() {
        manifest_sources(manifest, base)
    } else {
        args.sources
    };
    if sources.is_empty() {
        return Err(DrawablesError::Config {
            message: "No source images given".to_string(),
            help: Some("Pass image paths or set `sources` in drawables.yaml".to_string()),
        });
    }

    let source_size = args.source_size.or_else(|| manifest.source_size.clone());
    if let Some(name) = source_size.as_deref() {
        if Density::find(name).is_none() {
            debug!("unknown source density {:?}, assuming xxxhdpi", name);
            printer.warning("Warning", &format!("Unknown density '{}', using xxxhdpi", name));
        }
    }

    let dest_sizes = if args.dest_sizes.is_empty() {
        manifest.dest_sizes.clone()
    } else {
        args.dest_sizes
    };
    let filter = DensityFilter::only(dest_sizes.iter().map(String::as_str));
    for name in filter.unknown() {
        debug!("unknown destination density {:?} ignored", name);
        printer.warning("Warning", &format!("Unknown density '{}' ignored", name));
    }

    let options = GenerationOptions::new(&dest)
        .source_size(source_size.as_deref())
        .dest_sizes(dest_sizes)
        .filter(args.filter.or(manifest.filter).unwrap_or_default());

    let sources = expand_sources(&sources, manifest, Some(&dest));
    debug!(
        "{} into {}",
        plural(sources.len(), "source", "sources"),
        display_path(&dest)
    );

    Ok(Plan { sources, options })
}
