use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::download::DownloadError;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("video file not found: {0}")]
    NotFound(PathBuf),
    #[error("{host} links point at a watch page, not a video file; download the video first")]
    UnsupportedHost { host: String },
    #[error("invalid video URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error(transparent)]
    Download(#[from] DownloadError),
}

/// Turns a user-supplied video source (path or URL) into a local file the
/// [`VideoReader`](super::video_reader::VideoReader) can open.
pub trait VideoSourceResolver: Send {
    /// `download_dir` receives any file fetched from the network.
    fn resolve(&self, source: &str, download_dir: &Path) -> Result<PathBuf, ResolveError>;
}

/// True when `source` looks like an `http://` or `https://` URL.
pub fn is_remote(source: &str) -> bool {
    let lower = source.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::https("https://example.com/clip.mp4", true)]
    #[case::http_upper("HTTP://example.com/clip.mp4", true)]
    #[case::local_relative("videos/clip.mp4", false)]
    #[case::local_absolute("/home/user/clip.mp4", false)]
    #[case::windows(r"C:\Users\me\clip.mp4", false)]
    #[case::ftp("ftp://example.com/clip.mp4", false)]
    fn test_is_remote(#[case] source: &str, #[case] expected: bool) {
        assert_eq!(is_remote(source), expected);
    }
}
