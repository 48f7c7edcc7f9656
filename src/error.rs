use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for drawables operations
#[derive(Error, Diagnostic, Debug)]
pub enum DrawablesError {
    #[error("{} not found", path.display())]
    #[diagnostic(code(drawables::not_found))]
    NotFound { path: PathBuf },

    #[error("Failed to read dimensions of {}: {source}", path.display())]
    #[diagnostic(
        code(drawables::probe),
        help("The source must be a readable raster image (png, jpeg, webp, ...)")
    )]
    Probe {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to write {}: {source}", path.display())]
    #[diagnostic(code(drawables::write))]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(drawables::io))]
    Io { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(drawables::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Background task failed: {message}")]
    #[diagnostic(code(drawables::task))]
    Task { message: String },
}

impl From<tokio::task::JoinError> for DrawablesError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DrawablesError>;
