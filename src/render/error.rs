//! Error taxonomy for the render pipeline.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The composer could not lay the job out.  Indicates a configuration
/// mistake rather than bad input text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("canvas width {width} leaves no room inside padding {padding}")]
    CanvasTooSmall { width: u32, padding: u32 },

    #[error("unknown font '{0}'")]
    UnknownFont(String),
}

/// The panel driver failed to accept or show a frame.
#[derive(Debug, Error)]
#[error("panel {operation} failed: {message}")]
pub struct HardwareWriteError {
    pub operation: &'static str,
    pub message: String,
}

impl HardwareWriteError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Saving the preview snapshot failed.  Never fails a render.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to create preview directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write preview '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Pipeline stage a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Layout,
    Hardware,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Layout => "layout",
            Stage::Hardware => "hardware",
        };
        f.write_str(name)
    }
}

/// A render job that was accepted but did not reach the panel.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("layout stage: {0}")]
    Layout(#[from] LayoutError),

    #[error("hardware stage: {0}")]
    Hardware(#[from] HardwareWriteError),
}

impl RenderError {
    pub fn stage(&self) -> Stage {
        match self {
            RenderError::Layout(_) => Stage::Layout,
            RenderError::Hardware(_) => Stage::Hardware,
        }
    }
}

/// Outcome of [`Coordinator::submit`](super::Coordinator::submit) other
/// than success.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Another job holds the display.  Retry later.
    #[error("display busy")]
    Rejected,

    #[error("render failed: {0}")]
    Failed(#[from] RenderError),
}

impl SubmitError {
    /// Whether the caller should simply try again later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmitError::Rejected)
    }
}
