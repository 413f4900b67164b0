use std::fmt;

use serde::{Deserialize, Serialize};

/// Position in a video split into whole minutes and remaining seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timestamp {
    pub minutes: u64,
    pub seconds: f64,
}

impl Timestamp {
    pub fn from_seconds(total_seconds: f64) -> Self {
        let total_seconds = total_seconds.max(0.0);
        let minutes = (total_seconds / 60.0).floor();
        Self {
            minutes: minutes as u64,
            seconds: total_seconds - minutes * 60.0,
        }
    }

    /// Timestamp of the 1-based `frame_number` in a stream at `fps`.
    ///
    /// `fps` must be positive; callers validate it when the video is opened.
    pub fn from_frame(frame_number: usize, fps: f64) -> Self {
        debug_assert!(fps > 0.0, "fps must be positive");
        Self::from_seconds(frame_number as f64 / fps)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} minutes {:.2} seconds", self.minutes, self.seconds)
    }
}
