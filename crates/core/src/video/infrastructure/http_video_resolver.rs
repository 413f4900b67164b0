use std::path::{Path, PathBuf};

use crate::shared::constants::UNSUPPORTED_VIDEO_HOSTS;
use crate::shared::download::{self, ProgressFn};
use crate::video::domain::video_source_resolver::{is_remote, ResolveError, VideoSourceResolver};

const FALLBACK_FILE_NAME: &str = "video.mp4";

/// Resolves local paths as-is and downloads direct `http(s)` media links.
///
/// Watch-page hosts are refused up front: they serve HTML, not a stream
/// ffmpeg can decode.
pub struct HttpVideoResolver {
    progress: Option<Box<dyn Fn() -> ProgressFn + Send>>,
}

impl HttpVideoResolver {
    pub fn new() -> Self {
        Self { progress: None }
    }

    /// Installs a factory producing a fresh progress callback per download.
    pub fn with_progress(mut self, factory: Box<dyn Fn() -> ProgressFn + Send>) -> Self {
        self.progress = Some(factory);
        self
    }
}

impl Default for HttpVideoResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoSourceResolver for HttpVideoResolver {
    fn resolve(&self, source: &str, download_dir: &Path) -> Result<PathBuf, ResolveError> {
        let source = source.trim();
        if !is_remote(source) {
            let path = PathBuf::from(source);
            return if path.exists() {
                Ok(path)
            } else {
                Err(ResolveError::NotFound(path))
            };
        }

        let url = reqwest::Url::parse(source).map_err(|e| ResolveError::InvalidUrl {
            url: source.to_string(),
            reason: e.to_string(),
        })?;
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        if is_unsupported_host(&host) {
            return Err(ResolveError::UnsupportedHost { host });
        }

        std::fs::create_dir_all(download_dir).map_err(|e| {
            ResolveError::Download(download::DownloadError::Write {
                path: download_dir.to_path_buf(),
                source: e,
            })
        })?;
        let dest = download_dir.join(file_name_for(&url));

        log::info!("Downloading {source} to {}", dest.display());
        download::download(source, &dest, self.progress.as_ref().map(|f| f()))?;
        Ok(dest)
    }
}

fn is_unsupported_host(host: &str) -> bool {
    UNSUPPORTED_VIDEO_HOSTS
        .iter()
        .any(|blocked| host == *blocked || host.ends_with(&format!(".{blocked}")))
}

/// Last non-empty path segment of the URL, or a fixed fallback name.
fn file_name_for(url: &reqwest::Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_local_path_returned_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        std::fs::write(&video, b"not really a video").unwrap();

        let resolved = HttpVideoResolver::new()
            .resolve(video.to_str().unwrap(), dir.path())
            .unwrap();
        assert_eq!(resolved, video);
    }

    #[test]
    fn test_missing_local_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = HttpVideoResolver::new().resolve("/nonexistent/clip.mp4", dir.path());
        assert!(matches!(result, Err(ResolveError::NotFound(_))));
    }

    #[rstest]
    #[case::watch_page("https://www.youtube.com/watch?v=abc")]
    #[case::short_link("https://youtu.be/0buHlSH-W2Q?si=xyz")]
    #[case::mobile("https://m.youtube.com/watch?v=abc")]
    fn test_watch_page_hosts_rejected(#[case] url: &str) {
        let dir = tempfile::tempdir().unwrap();
        let result = HttpVideoResolver::new().resolve(url, dir.path());
        assert!(matches!(result, Err(ResolveError::UnsupportedHost { .. })));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_lookalike_host_not_rejected() {
        assert!(!is_unsupported_host("notyoutube.com"));
        assert!(is_unsupported_host("youtube.com"));
    }

    #[rstest]
    #[case::plain("https://cdn.example.com/media/expo3.mp4", "expo3.mp4")]
    #[case::query("https://cdn.example.com/a/b/clip.webm?token=1", "clip.webm")]
    #[case::trailing_slash("https://cdn.example.com/media/", "video.mp4")]
    #[case::root("https://cdn.example.com", "video.mp4")]
    fn test_file_name_for(#[case] url: &str, #[case] expected: &str) {
        let url = reqwest::Url::parse(url).unwrap();
        assert_eq!(file_name_for(&url), expected);
    }

    #[test]
    fn test_unreachable_url_is_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = HttpVideoResolver::new().resolve("http://127.0.0.1:9/clip.mp4", dir.path());
        assert!(matches!(result, Err(ResolveError::Download(_))));
    }
}
