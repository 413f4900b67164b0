use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    DEFAULT_DEDUP_SKIP_INTERVAL, DEFAULT_MATCH_SKIP_INTERVAL, DEFAULT_OUTPUT_ROOT,
    DEFAULT_TOLERANCE,
};
use crate::shared::face_encoding::DistanceMetric;
use crate::shared::scan_error::ScanError;

/// Which question a scan answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Save one thumbnail per distinct face.
    Dedup,
    /// Timestamp every occurrence of a reference face.
    Match,
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dedup => write!(f, "dedup"),
            Self::Match => write!(f, "match"),
        }
    }
}

/// All tunables of a scan run.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanConfig {
    pub mode: ScanMode,
    /// Local path or URL of the video.
    pub video_source: String,
    /// Required in [`ScanMode::Match`], ignored otherwise.
    pub reference_image: Option<PathBuf>,
    pub skip_interval: usize,
    pub tolerance: f64,
    pub metric: DistanceMetric,
    /// Parent of the per-run output directory.
    pub output_root: PathBuf,
    /// Decode on a separate thread while classifying.
    pub threaded: bool,
    /// Where annotated frames are dumped, if anywhere.
    pub annotated_dir: Option<PathBuf>,
    /// Where the JSON report is written, if anywhere.
    pub report_path: Option<PathBuf>,
}

impl ScanConfig {
    pub fn dedup(video_source: impl Into<String>) -> Self {
        Self {
            mode: ScanMode::Dedup,
            video_source: video_source.into(),
            reference_image: None,
            skip_interval: DEFAULT_DEDUP_SKIP_INTERVAL,
            tolerance: DEFAULT_TOLERANCE,
            metric: DistanceMetric::default(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            threaded: false,
            annotated_dir: None,
            report_path: None,
        }
    }

    pub fn matching(video_source: impl Into<String>, reference_image: PathBuf) -> Self {
        Self {
            mode: ScanMode::Match,
            reference_image: Some(reference_image),
            skip_interval: DEFAULT_MATCH_SKIP_INTERVAL,
            ..Self::dedup(video_source)
        }
    }

    pub fn validate(&self) -> Result<(), ScanError> {
        if self.video_source.trim().is_empty() {
            return Err(ScanError::InvalidConfig(
                "video source must not be empty".into(),
            ));
        }
        if self.skip_interval == 0 {
            return Err(ScanError::InvalidConfig(
                "skip interval must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.tolerance) {
            return Err(ScanError::InvalidConfig(format!(
                "tolerance must be between 0.0 and 1.0, got {}",
                self.tolerance
            )));
        }
        if self.mode == ScanMode::Match {
            match &self.reference_image {
                None => {
                    return Err(ScanError::InvalidConfig(
                        "match mode requires a reference image".into(),
                    ))
                }
                Some(path) if !path.exists() => {
                    return Err(ScanError::InvalidConfig(format!(
                        "reference image not found: {}",
                        path.display()
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
