use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::shared::scan_config::ScanMode;
use crate::shared::scan_error::ScanError;
use crate::video::domain::video_source_resolver::is_remote;

const RUN_ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Name of the per-run output directory for a run started at `started`.
pub fn run_id(started: &DateTime<Local>) -> String {
    started.format(RUN_ID_FORMAT).to_string()
}

/// Run ID for a run starting now.
pub fn current_run_id() -> String {
    run_id(&Local::now())
}

/// `<output_root>/<run_id>`, without touching the filesystem.
pub fn run_dir(output_root: &Path, run_id: &str) -> PathBuf {
    output_root.join(run_id)
}

/// Whether a run writes anything into its run directory: dedup thumbnails,
/// or a downloaded copy of a remote video.
pub fn needs_run_dir(mode: ScanMode, video_source: &str) -> bool {
    mode == ScanMode::Dedup || is_remote(video_source)
}

/// Creates `<output_root>/<run_id>` (and any missing parents).
pub fn create_run_dir(output_root: &Path, run_id: &str) -> Result<PathBuf, ScanError> {
    let dir = run_dir(output_root, run_id);
    std::fs::create_dir_all(&dir).map_err(|source| ScanError::OutputDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
