use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::classification::domain::match_record::MatchRecord;
use crate::shared::scan_config::ScanMode;

/// Everything a finished scan produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub mode: ScanMode,
    /// Qualifying faces in non-decreasing frame order.
    pub records: Vec<MatchRecord>,
    pub frames_read: usize,
    pub frames_classified: usize,
    pub frame_rate: f64,
    pub output_dir: PathBuf,
    /// The run was aborted before the end of the video.
    #[serde(default)]
    pub cancelled: bool,
}

/// Whether a scan found anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    Found(usize),
    NoResults,
}

impl ScanReport {
    pub fn outcome(&self) -> ScanOutcome {
        if self.records.is_empty() {
            ScanOutcome::NoResults
        } else {
            ScanOutcome::Found(self.records.len())
        }
    }

    /// Message shown when the run produced no records.
    pub fn empty_message(&self) -> &'static str {
        match self.mode {
            ScanMode::Dedup => "No unique faces saved",
            ScanMode::Match => "Match not found",
        }
    }
}
