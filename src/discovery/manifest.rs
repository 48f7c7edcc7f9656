//! Project manifest (drawables.yaml) parsing.
//!
//! The manifest stores the settings of a project so `drawables generate` can
//! run without repeating them on the command line.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DrawablesError, Result};
use crate::generator::ResizeFilter;

/// Project manifest loaded from drawables.yaml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Source images or directories containing them.
    pub sources: Vec<String>,

    /// Android `res` directory to write into.
    pub dest: Option<PathBuf>,

    /// Density the sources were authored at (default: xxxhdpi).
    pub source_size: Option<String>,

    /// Buckets to generate (default: all).
    pub dest_sizes: Vec<String>,

    /// Resampling filter.
    pub filter: Option<ResizeFilter>,

    /// Patterns to skip while scanning source directories.
    pub excludes: Vec<String>,
}

impl Manifest {
    /// Load manifest from a drawables.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DrawablesError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| DrawablesError::Config {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check drawables.yaml syntax".to_string()),
        })
    }

    /// Check if a path should be skipped based on exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path = path.to_string_lossy().replace('\\', "/");
        self.excludes.iter().any(|pattern| matches_pattern(&path, pattern))
    }
}

/// Minimal glob matching: `*.ext`, `dir/*`, `**/dir/*`, or a plain substring.
fn matches_pattern(path: &str, pattern: &str) -> bool {
    if let Some(rest) = pattern.strip_prefix("**/") {
        return match rest.strip_suffix("/*") {
            Some(dir) => path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir)),
            None => path.ends_with(rest) || path.contains(rest),
        };
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        if !pattern.contains('/') {
            return path.ends_with(suffix);
        }
    }

    if let Some(dir) = pattern.strip_suffix("/*") {
        return path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir));
    }

    path.contains(pattern)
}
