use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::shared::face_location::FaceLocation;
use crate::shared::timestamp::Timestamp;

/// One qualifying face: a reference match, or a newly seen face in dedup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub frame_number: usize,
    pub face_index: usize,
    pub timestamp: Timestamp,
    /// Full-resolution box.
    pub location: FaceLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<PathBuf>,
}

/// Outcome of classifying one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Classification {
    NoMatch,
    Match(Vec<MatchRecord>),
}

impl Classification {
    pub fn from_records(records: Vec<MatchRecord>) -> Self {
        if records.is_empty() {
            Self::NoMatch
        } else {
            Self::Match(records)
        }
    }

    pub fn records(&self) -> &[MatchRecord] {
        match self {
            Self::NoMatch => &[],
            Self::Match(records) => records,
        }
    }

    pub fn into_records(self) -> Vec<MatchRecord> {
        match self {
            Self::NoMatch => Vec::new(),
            Self::Match(records) => records,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match(_))
    }
}
