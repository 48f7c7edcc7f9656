//! Density variant generation.
//!
//! A [`ResourceGenerator`] turns source images into one scaled copy per
//! selected density bucket, laid out as Android resource directories:
//!
//! ```text
//! <dest>/drawable-mdpi/icon.png
//! <dest>/drawable-hdpi/icon.png
//! ...
//! ```
//!
//! Every source, and every density of every source, is processed
//! concurrently. Blocking image work runs on tokio's blocking pool. A failure
//! never cancels siblings: aggregates wait for every job and then report the
//! first error they observed.

mod probe;
mod progress;
mod size;
mod writer;

use std::collections::hash_map::{Entry, HashMap};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::task::{self, JoinSet};
use tracing::debug;

use crate::density::{Density, DensityFilter, DENSITIES};
use crate::error::{DrawablesError, Result};

pub use probe::probe_dimensions;
pub use progress::{Event, Progress};
pub use size::{target_size, Dimensions};
pub use writer::{create_image, ensure_dir, ResizeFilter};

/// Settings shared by every source in a run.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Resource root; `drawable-<density>/` directories are created under it.
    pub dest: PathBuf,
    /// Density the sources were authored at.
    pub source_density: &'static Density,
    /// Buckets to generate.
    pub dest_densities: DensityFilter,
    pub filter: ResizeFilter,
}

impl GenerationOptions {
    /// Options for `dest` with an `xxxhdpi` source and every bucket selected.
    pub fn new(dest: impl Into<PathBuf>) -> Self {
        Self {
            dest: dest.into(),
            source_density: &DENSITIES[4],
            dest_densities: DensityFilter::all(),
            filter: ResizeFilter::default(),
        }
    }

    /// Set the source density by name. Unknown names mean `xxxhdpi`.
    pub fn source_size(mut self, name: Option<&str>) -> Self {
        self.source_density = Density::source_or_default(name);
        self
    }

    /// Restrict output to the named buckets. An empty list means all.
    pub fn dest_sizes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dest_densities = DensityFilter::only(names);
        self
    }

    pub fn filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Where the `density` variant of `file_name` is written.
    pub fn destination(&self, density: &Density, file_name: &OsStr) -> PathBuf {
        self.dest.join(density.directory()).join(file_name)
    }
}

/// One written variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact {
    pub source: PathBuf,
    pub density: &'static str,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Artifact {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// Outcome of a successful batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// Every written variant, ordered by path.
    pub artifacts: Vec<Artifact>,
    /// Sources that did not exist and were skipped.
    pub missing: Vec<PathBuf>,
}

/// Generates density variants of source images.
#[derive(Debug, Clone)]
pub struct ResourceGenerator {
    options: GenerationOptions,
    progress: Progress,
}

impl ResourceGenerator {
    pub fn new(options: GenerationOptions) -> Self {
        Self {
            options,
            progress: Progress::silent(),
        }
    }

    /// Report progress events to `progress`.
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Generate every selected variant of one source image.
    ///
    /// Returns the written artifacts in completion order. If any variant
    /// fails, the first failure is returned once all variants have finished;
    /// variants that did succeed stay on disk.
    pub async fn generate_resource(&self, source: &Path) -> Result<Vec<Artifact>> {
        if !source_exists(source) {
            return Err(DrawablesError::NotFound {
                path: source.to_path_buf(),
            });
        }

        let file_name = source.file_name().ok_or_else(|| DrawablesError::Io {
            path: source.to_path_buf(),
            message: "Source path has no file name".to_string(),
        })?;

        let probe_path = source.to_path_buf();
        let dims = task::spawn_blocking(move || probe_dimensions(&probe_path)).await??;

        debug!(
            "{} is {} at {}",
            source.display(),
            dims,
            self.options.source_density
        );
        self.progress.emit(Event::Started {
            source: source.to_path_buf(),
            width: dims.width,
            height: dims.height,
        });

        let mut jobs = JoinSet::new();

        for density in self.options.dest_densities.selected() {
            let dest = self.options.destination(density, file_name);
            let size = target_size(dims, self.options.source_density.multiplier, density.multiplier);
            let source = source.to_path_buf();
            let filter = self.options.filter;

            debug!("Scheduling {} ({})", dest.display(), size);

            jobs.spawn_blocking(move || -> Result<Artifact> {
                let written = create_image(&source, &dest, size, filter)?;
                Ok(Artifact {
                    source,
                    density: density.name,
                    path: dest,
                    width: written.width,
                    height: written.height,
                })
            });
        }

        let mut artifacts = Vec::new();
        let mut first_error = None;

        while let Some(joined) = jobs.join_next().await {
            match joined.map_err(DrawablesError::from).and_then(|result| result) {
                Ok(artifact) => {
                    self.progress.emit(Event::Created(artifact.clone()));
                    artifacts.push(artifact);
                }
                Err(err) => {
                    debug!("{}", err);
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(artifacts),
        }
    }

    /// Generate variants for every source.
    ///
    /// Missing sources are reported and skipped. Existing sources are all
    /// processed; if any of them fails, the first failure is returned after
    /// the rest have finished.
    ///
    /// Distinct sources sharing a file name would overwrite each other's
    /// variants, so they are rejected before anything is written.
    pub async fn generate_resources(&self, sources: &[PathBuf]) -> Result<BatchReport> {
        let sources = unique_sources(sources)?;
        let mut report = BatchReport::default();
        let mut tasks = JoinSet::new();

        for source in sources {
            if !source_exists(source) {
                debug!("{} not found, skipping", source.display());
                self.progress.emit(Event::Missing {
                    source: source.clone(),
                });
                report.missing.push(source.clone());
                continue;
            }

            let generator = self.clone();
            let source = source.clone();
            tasks.spawn(async move {
                let result = generator.generate_resource(&source).await;
                (source, result)
            });
        }

        let mut first_error = None;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(artifacts))) => report.artifacts.extend(artifacts),
                Ok((source, Err(err))) => {
                    self.progress.emit(Event::Failed {
                        source,
                        message: err.to_string(),
                    });
                    first_error.get_or_insert(err);
                }
                Err(err) => {
                    first_error.get_or_insert(DrawablesError::from(err));
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        report.artifacts.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(report)
    }
}

fn source_exists(source: &Path) -> bool {
    !source.as_os_str().is_empty() && source.exists()
}

/// Drop repeated paths and reject distinct sources with the same file name.
fn unique_sources(sources: &[PathBuf]) -> Result<Vec<&PathBuf>> {
    let mut seen: HashMap<&OsStr, &PathBuf> = HashMap::new();
    let mut unique = Vec::with_capacity(sources.len());

    for source in sources {
        let name = match source.file_name() {
            Some(name) if source_exists(source) => name,
            _ => {
                unique.push(source);
                continue;
            }
        };

        match seen.entry(name) {
            Entry::Occupied(first) if *first.get() == source => {
                debug!("{} listed more than once", source.display());
            }
            Entry::Occupied(first) => {
                return Err(DrawablesError::Config {
                    message: format!(
                        "{} and {} both write {}",
                        first.get().display(),
                        source.display(),
                        Path::new(name).display()
                    ),
                    help: Some("Rename one of the sources or generate them in separate runs".to_string()),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(source);
                unique.push(source);
            }
        }
    }

    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
        });
        img.save(&path).unwrap();
        path
    }

    fn drain(mut rx: tokio::sync::mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn size_of(path: &Path) -> (u32, u32) {
        image::ImageReader::open(path)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .into_dimensions()
            .unwrap()
    }

    #[tokio::test]
    async fn test_single_density_from_xxxhdpi() {
        let dir = tempdir().unwrap();
        let source = write_png(dir.path(), "icon.png", 512, 512);
        let dest = dir.path().join("res");

        let options = GenerationOptions::new(&dest)
            .source_size(Some("xxxhdpi"))
            .dest_sizes(["mdpi"]);
        let artifacts = ResourceGenerator::new(options)
            .generate_resource(&source)
            .await
            .unwrap();

        let expected = dest.join("drawable-mdpi/icon.png");
        assert_eq!(
            artifacts,
            vec![Artifact {
                source: source.clone(),
                density: "mdpi",
                path: expected.clone(),
                width: 128,
                height: 128,
            }]
        );
        assert_eq!(size_of(&expected), (128, 128));
    }

    #[tokio::test]
    async fn test_non_square_upscale_keeps_height() {
        let dir = tempdir().unwrap();
        let source = write_png(dir.path(), "banner.png", 300, 150);
        let dest = dir.path().join("res");

        let options = GenerationOptions::new(&dest)
            .source_size(Some("hdpi"))
            .dest_sizes(["xxhdpi"]);
        let artifacts = ResourceGenerator::new(options)
            .generate_resource(&source)
            .await
            .unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].dimensions(), Dimensions::new(600, 300));
        assert_eq!(size_of(&dest.join("drawable-xxhdpi/banner.png")), (600, 300));
    }

    #[tokio::test]
    async fn test_all_densities_by_default() {
        let dir = tempdir().unwrap();
        let source = write_png(dir.path(), "logo.png", 96, 48);
        let dest = dir.path().join("res");

        let artifacts = ResourceGenerator::new(GenerationOptions::new(&dest))
            .generate_resource(&source)
            .await
            .unwrap();

        assert_eq!(artifacts.len(), 5);

        let expected = [
            ("mdpi", 24, 12),
            ("hdpi", 36, 18),
            ("xhdpi", 48, 24),
            ("xxhdpi", 72, 36),
            ("xxxhdpi", 96, 48),
        ];
        for (name, w, h) in expected {
            let path = dest.join(format!("drawable-{}", name)).join("logo.png");
            assert_eq!(size_of(&path), (w, h), "{}", name);
        }
    }

    #[tokio::test]
    async fn test_filter_limits_outputs() {
        let dir = tempdir().unwrap();
        let source = write_png(dir.path(), "icon.png", 64, 64);
        let dest = dir.path().join("res");

        let options = GenerationOptions::new(&dest).dest_sizes(["mdpi", "xhdpi"]);
        let mut artifacts = ResourceGenerator::new(options)
            .generate_resource(&source)
            .await
            .unwrap();
        artifacts.sort_by(|a, b| a.path.cmp(&b.path));

        let paths: Vec<PathBuf> = artifacts.into_iter().map(|a| a.path).collect();
        assert_eq!(
            paths,
            vec![
                dest.join("drawable-mdpi/icon.png"),
                dest.join("drawable-xhdpi/icon.png"),
            ]
        );

        let mut dirs: Vec<String> = fs::read_dir(&dest)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        dirs.sort();
        assert_eq!(dirs, vec!["drawable-mdpi", "drawable-xhdpi"]);
    }

    #[tokio::test]
    async fn test_unknown_source_size_matches_xxxhdpi() {
        let dir = tempdir().unwrap();
        let source = write_png(dir.path(), "icon.png", 100, 60);

        let bogus = ResourceGenerator::new(GenerationOptions::new(dir.path().join("a")).source_size(Some("huge")))
            .generate_resource(&source)
            .await
            .unwrap();
        let explicit =
            ResourceGenerator::new(GenerationOptions::new(dir.path().join("b")).source_size(Some("xxxhdpi")))
                .generate_resource(&source)
                .await
                .unwrap();

        let sizes = |artifacts: Vec<Artifact>| {
            let mut v: Vec<(&str, u32, u32)> = artifacts.iter().map(|a| (a.density, a.width, a.height)).collect();
            v.sort();
            v
        };
        assert_eq!(sizes(bogus), sizes(explicit));
    }

    #[tokio::test]
    async fn test_strips_source_directory_from_name() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("art/icons")).unwrap();
        let source = write_png(&dir.path().join("art/icons"), "star.png", 8, 8);
        let dest = dir.path().join("res");

        let options = GenerationOptions::new(&dest).dest_sizes(["xxxhdpi"]);
        ResourceGenerator::new(options)
            .generate_resource(&source)
            .await
            .unwrap();

        assert!(dest.join("drawable-xxxhdpi/star.png").exists());
    }

    #[tokio::test]
    async fn test_missing_source_is_not_found() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("res");

        let err = ResourceGenerator::new(GenerationOptions::new(&dest))
            .generate_resource(&dir.path().join("missing.png"))
            .await
            .unwrap_err();

        assert!(matches!(err, DrawablesError::NotFound { .. }));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_empty_source_is_not_found() {
        let err = ResourceGenerator::new(GenerationOptions::new("res"))
            .generate_resource(Path::new(""))
            .await
            .unwrap_err();

        assert!(matches!(err, DrawablesError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_probe_failure_writes_nothing() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("corrupt.png");
        fs::write(&source, b"garbage").unwrap();
        let dest = dir.path().join("res");

        let err = ResourceGenerator::new(GenerationOptions::new(&dest))
            .generate_resource(&source)
            .await
            .unwrap_err();

        assert!(matches!(err, DrawablesError::Probe { .. }));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_write_failure_keeps_siblings() {
        let dir = tempdir().unwrap();
        let source = write_png(dir.path(), "icon.png", 16, 16);
        let dest = dir.path().join("res");

        // A plain file where the hdpi directory should go
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("drawable-hdpi"), b"in the way").unwrap();

        let err = ResourceGenerator::new(GenerationOptions::new(&dest))
            .generate_resource(&source)
            .await
            .unwrap_err();

        assert!(matches!(err, DrawablesError::Write { .. }));
        for name in ["mdpi", "xhdpi", "xxhdpi", "xxxhdpi"] {
            assert!(dest.join(format!("drawable-{}/icon.png", name)).exists(), "{}", name);
        }
    }

    #[tokio::test]
    async fn test_progress_reports_each_artifact() {
        let dir = tempdir().unwrap();
        let source = write_png(dir.path(), "icon.png", 32, 32);
        let (progress, rx) = Progress::channel();

        let options = GenerationOptions::new(dir.path().join("res")).dest_sizes(["mdpi", "hdpi", "xhdpi"]);
        let generator = ResourceGenerator::new(options).with_progress(progress);
        let artifacts = generator.generate_resource(&source).await.unwrap();
        drop(generator);

        let events = drain(rx);
        assert!(matches!(events[0], Event::Started { width: 32, height: 32, .. }));

        let created: Vec<Artifact> = events
            .into_iter()
            .filter_map(|e| match e {
                Event::Created(artifact) => Some(artifact),
                _ => None,
            })
            .collect();
        assert_eq!(created, artifacts);
    }

    #[tokio::test]
    async fn test_batch_skips_missing_sources() {
        let dir = tempdir().unwrap();
        let valid = write_png(dir.path(), "valid.png", 40, 40);
        let missing = dir.path().join("missing.png");
        let dest = dir.path().join("res");
        let (progress, rx) = Progress::channel();

        let generator = ResourceGenerator::new(GenerationOptions::new(&dest)).with_progress(progress);
        let report = generator
            .generate_resources(&[valid.clone(), missing.clone()])
            .await
            .unwrap();
        drop(generator);

        assert_eq!(report.artifacts.len(), 5);
        assert!(report.artifacts.iter().all(|a| a.source == valid));
        assert_eq!(report.missing, vec![missing.clone()]);

        let events = drain(rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::Missing { source } if *source == missing)));
    }

    #[tokio::test]
    async fn test_batch_fails_but_keeps_good_sources() {
        let dir = tempdir().unwrap();
        let good = write_png(dir.path(), "good.png", 20, 20);
        let bad = dir.path().join("bad.png");
        fs::write(&bad, b"nope").unwrap();
        let dest = dir.path().join("res");
        let (progress, rx) = Progress::channel();

        let generator = ResourceGenerator::new(GenerationOptions::new(&dest).dest_sizes(["mdpi", "xxxhdpi"]))
            .with_progress(progress);
        let err = generator
            .generate_resources(&[bad.clone(), good.clone()])
            .await
            .unwrap_err();
        drop(generator);

        assert!(matches!(err, DrawablesError::Probe { .. }));
        assert!(dest.join("drawable-mdpi/good.png").exists());
        assert!(dest.join("drawable-xxxhdpi/good.png").exists());
        assert!(!dest.join("drawable-mdpi/bad.png").exists());

        let events = drain(rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::Failed { source, .. } if *source == bad)));
    }

    #[tokio::test]
    async fn test_batch_rejects_shared_file_names() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        let first = write_png(&dir.path().join("a"), "icon.png", 64, 64);
        let second = write_png(&dir.path().join("b"), "icon.png", 32, 16);
        let dest = dir.path().join("res");

        let err = ResourceGenerator::new(GenerationOptions::new(&dest).dest_sizes(["mdpi"]))
            .generate_resources(&[first.clone(), second.clone()])
            .await
            .unwrap_err();

        match err {
            DrawablesError::Config { message, .. } => {
                assert!(message.contains(&first.display().to_string()), "{}", message);
                assert!(message.contains(&second.display().to_string()), "{}", message);
            }
            other => panic!("expected a config error, got {:?}", other),
        }
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_batch_repeated_path_runs_once() {
        let dir = tempdir().unwrap();
        let source = write_png(dir.path(), "icon.png", 16, 16);

        let report = ResourceGenerator::new(GenerationOptions::new(dir.path().join("res")).dest_sizes(["mdpi"]))
            .generate_resources(&[source.clone(), source.clone()])
            .await
            .unwrap();

        assert_eq!(report.artifacts.len(), 1);
        assert_eq!(report.artifacts[0].dimensions(), Dimensions::new(4, 4));
    }

    #[tokio::test]
    async fn test_extensionless_source_is_sniffed() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("icon");
        image::RgbaImage::new(40, 20)
            .save_with_format(&source, image::ImageFormat::Png)
            .unwrap();
        let dest = dir.path().join("res");

        let artifacts = ResourceGenerator::new(GenerationOptions::new(&dest).dest_sizes(["hdpi"]))
            .generate_resource(&source)
            .await
            .unwrap();

        assert_eq!(artifacts[0].path, dest.join("drawable-hdpi/icon"));
        assert_eq!(size_of(&artifacts[0].path), (15, 8));
    }

    #[tokio::test]
    async fn test_batch_report_is_sorted() {
        let dir = tempdir().unwrap();
        let a = write_png(dir.path(), "a.png", 8, 8);
        let b = write_png(dir.path(), "b.png", 8, 8);

        let options = GenerationOptions::new(dir.path().join("res")).dest_sizes(["hdpi", "mdpi"]);
        let report = ResourceGenerator::new(options)
            .generate_resources(&[b, a])
            .await
            .unwrap();

        let names: Vec<String> = report
            .artifacts
            .iter()
            .map(|a| {
                let rel = a.path.strip_prefix(dir.path().join("res")).unwrap();
                rel.to_string_lossy().replace('\\', "/")
            })
            .collect();
        assert_eq!(
            names,
            vec![
                "drawable-hdpi/a.png",
                "drawable-hdpi/b.png",
                "drawable-mdpi/a.png",
                "drawable-mdpi/b.png",
            ]
        );
    }

    #[tokio::test]
    async fn test_rerun_is_byte_identical() {
        let dir = tempdir().unwrap();
        let source = write_png(dir.path(), "icon.png", 50, 30);
        let dest = dir.path().join("res");
        let generator = ResourceGenerator::new(GenerationOptions::new(&dest).dest_sizes(["hdpi"]));

        generator.generate_resource(&source).await.unwrap();
        let first = fs::read(dest.join("drawable-hdpi/icon.png")).unwrap();
        generator.generate_resource(&source).await.unwrap();
        let second = fs::read(dest.join("drawable-hdpi/icon.png")).unwrap();

        assert_eq!(first, second);
    }
}
