//! Error types for the segmentation pipeline and the audio file layer.

use thiserror::Error;

/// Errors produced by the segmentation pipeline itself.
///
/// The pipeline is a pure computation: any failure is terminal and surfaced
/// directly to the caller, there is nothing to retry.
#[derive(Debug, Error)]
pub enum SplitError {
    /// The input buffer or sample rate cannot be analyzed at all
    /// (e.g. shorter than a single analysis frame, or a zero sample rate).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The pipeline configuration is malformed (e.g. a zero frame or hop
    /// length). Detected before any work is done.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors from loading input recordings and writing track files.
#[derive(Debug, Error)]
pub enum AudioFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be probed or decoded.
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error(transparent)]
    Split(#[from] SplitError),
}
