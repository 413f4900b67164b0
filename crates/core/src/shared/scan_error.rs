use std::path::PathBuf;

use thiserror::Error;

/// Failures that end a scan run.
///
/// Per-frame decode problems are never surfaced here; the sampler skips
/// those frames and the run continues.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("could not open video {path}: {reason}")]
    VideoOpen { path: PathBuf, reason: String },
    #[error("video reports an unusable frame rate ({0}); timestamps cannot be computed")]
    InvalidFrameRate(f64),
    #[error("could not read reference image {path}: {reason}")]
    ReferenceImage { path: PathBuf, reason: String },
    #[error("no face found in reference image {0}")]
    NoReferenceFace(PathBuf),
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
