use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    /// Timestamps can only be derived from a finite, positive frame rate.
    pub fn has_usable_fps(&self) -> bool {
        self.fps.is_finite() && self.fps > 0.0
    }
}
