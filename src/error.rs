//! Error types shared by the pipeline stages and the tooling around them.
//!
//! - [`InputError`]: malformed raster or mask, invalid configuration values.
//! - [`ExportError`]: an output document could not be encoded or published.
//! - [`PipelineError`]: what a pipeline run returns; names the failing stage.
//! - [`ConfigError`]: a JSON tool configuration could not be read or parsed.
//! - [`FeedbackError`]: feedback history problems (ratings, persistence).
//!
//! Zero detected segments is not an error: the run succeeds with an empty
//! summary (see `pipeline::RunSummary::empty`).

use crate::pipeline::Stage;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid raster, mask or configuration supplied at pipeline entry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// The raster has no pixels.
    #[error("raster is empty ({width}x{height})")]
    EmptyRaster { width: usize, height: usize },

    /// Channel count other than 1 (gray), 3 (RGB) or 4 (RGBA).
    #[error("unsupported channel count {0} (expected 1, 3 or 4)")]
    UnsupportedChannels(usize),

    /// Sample buffer length does not match `width * height * channels`.
    #[error("raster buffer holds {actual} samples, expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    /// Edge mask dimensions differ from what the caller declared.
    #[error("edge mask is {mask_w}x{mask_h} but {expected_w}x{expected_h} was expected")]
    MaskDimensions {
        mask_w: usize,
        mask_h: usize,
        expected_w: usize,
        expected_h: usize,
    },

    /// A configuration field failed validation.
    #[error("invalid configuration `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// The image collaborator failed to decode a file.
    #[error("failed to read image {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
}

impl InputError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        InputError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure while encoding or publishing an output document.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("DXF error: {0}")]
    Dxf(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The temporary file could not be moved over the destination.
    #[error("failed to finalize {path}: {reason}")]
    Persist { path: PathBuf, reason: String },
}

/// Error returned by a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A stage rejected its input.
    #[error("input rejected by the {stage} stage: {source}")]
    Input {
        stage: Stage,
        #[source]
        source: InputError,
    },

    #[error("export stage failed: {0}")]
    Export(#[from] ExportError),

    /// A cancel request was observed at the boundary before `stage`.
    #[error("cancelled before the {stage} stage")]
    Cancelled { stage: Stage },
}

impl PipelineError {
    pub fn input(stage: Stage, source: InputError) -> Self {
        PipelineError::Input { stage, source }
    }

    /// Stage the error is attributed to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Input { stage, .. } => Some(*stage),
            PipelineError::Export(_) => Some(Stage::Export),
            PipelineError::Cancelled { stage } => Some(*stage),
        }
    }
}

/// Failure while loading a JSON tool configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by the feedback history.
#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("I/O error on feedback history: {0}")]
    Io(#[from] io::Error),

    #[error("feedback history JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
