//! Download orchestration
//!
//! Wires the probe and download operations of the backend together with the
//! format-fallback policy: a selection that matched no available stream is
//! retried exactly once with the guaranteed fallback expression; every other
//! failure is terminal for the invocation.

use crate::core::format::FALLBACK_EXPRESSION;
use crate::core::metadata::MediaMetadata;
use crate::core::progress::ProgressEvent;
use crate::core::request::DownloadRequest;
use crate::error::GrabError;
use crate::ytdlp::YtDlpClient;
use std::path::PathBuf;
use tracing::{info, warn};
use url::Url;

/// Orchestrates metadata probing and downloading through the backend
#[derive(Debug, Clone, Default)]
pub struct Downloader {
    client: YtDlpClient,
}

impl Downloader {
    /// Create a downloader using the auto-located yt-dlp executable
    pub fn new() -> Self {
        Self {
            client: YtDlpClient::new(),
        }
    }

    /// Create a downloader for a specific yt-dlp executable
    pub fn with_binary(binary: impl Into<std::path::PathBuf>) -> Self {
        Self {
            client: YtDlpClient::with_binary(binary),
        }
    }

    /// Probe a URL for metadata without downloading.
    ///
    /// The URL is syntax-checked first; extraction failures (unreachable,
    /// private, removed, region-blocked) come back from the backend.
    pub async fn probe(&self, url: &str) -> Result<MediaMetadata, GrabError> {
        let url = url.trim();
        Url::parse(url).map_err(|_| GrabError::InvalidUrl(url.to_string()))?;
        self.client.probe(url).await
    }

    /// Download according to the request, with the one-shot fallback retry.
    ///
    /// Returns the deduplicated list of output file paths.
    pub async fn download<F>(
        &self,
        url: &str,
        request: &DownloadRequest,
        on_progress: F,
    ) -> Result<Vec<PathBuf>, GrabError>
    where
        F: Fn(ProgressEvent),
    {
        info!("starting download with format \"{}\"", request.format);
        match self.client.download(url, request, &on_progress).await {
            Ok(paths) => Ok(finalize_paths(paths, request)),
            Err(e) if e.is_format_unavailable() && request.format != FALLBACK_EXPRESSION => {
                warn!(
                    "format \"{}\" unavailable, retrying once with \"{}\"",
                    request.format, FALLBACK_EXPRESSION
                );
                let mut fallback = request.clone();
                fallback.format = FALLBACK_EXPRESSION.to_string();
                // Second failure, of any kind, is terminal
                let paths = self.client.download(url, &fallback, &on_progress).await?;
                Ok(finalize_paths(paths, &fallback))
            }
            Err(e) => Err(e),
        }
    }
}

/// Re-point collected paths at post-processed siblings where applicable.
///
/// The info document is printed before post-processing runs, so an audio
/// transcode leaves it naming the raw stream; the transcoded file sits next
/// to it with the target codec's extension.
fn finalize_paths(paths: Vec<PathBuf>, request: &DownloadRequest) -> Vec<PathBuf> {
    let Some(transcode) = &request.audio_transcode else {
        return paths;
    };

    let mut finalized: Vec<PathBuf> = Vec::new();
    for path in paths {
        let transcoded = path.with_extension(&transcode.codec);
        let resolved = if transcoded.is_file() { transcoded } else { path };
        if !finalized.contains(&resolved) {
            finalized.push(resolved);
        }
    }
    finalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::DownloadRequest;

    #[tokio::test]
    async fn test_probe_rejects_invalid_url() {
        let downloader = Downloader::new();
        let err = downloader.probe("not a url").await.unwrap_err();
        assert!(matches!(err, GrabError::InvalidUrl(_)));
    }

    #[test]
    fn test_finalize_paths_without_transcode_is_identity() {
        let request = DownloadRequest::default();
        let paths = vec![PathBuf::from("/tmp/a.mp4"), PathBuf::from("/tmp/b.webm")];
        assert_eq!(finalize_paths(paths.clone(), &request), paths);
    }

    #[test]
    fn test_finalize_paths_prefers_transcoded_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("song.webm");
        let transcoded = dir.path().join("song.mp3");
        std::fs::write(&transcoded, b"mp3").unwrap();

        let request = DownloadRequest {
            audio_transcode: Some(DownloadRequest::standard_audio_transcode()),
            ..Default::default()
        };
        assert_eq!(finalize_paths(vec![raw], &request), vec![transcoded]);
    }

    #[test]
    fn test_finalize_paths_keeps_raw_when_no_sibling() {
        let request = DownloadRequest {
            audio_transcode: Some(DownloadRequest::standard_audio_transcode()),
            ..Default::default()
        };
        let raw = PathBuf::from("/nonexistent/song.webm");
        assert_eq!(finalize_paths(vec![raw.clone()], &request), vec![raw]);
    }

    /// Write a fake yt-dlp that logs its arguments and behaves as scripted
    #[cfg(unix)]
    fn fake_backend(dir: &std::path::Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("fake-yt-dlp");
        std::fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_format_unavailable_retries_exactly_once_with_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("calls.log");
        let script = fake_backend(
            dir.path(),
            &format!(
                "echo \"$@\" >> {}\n\
                 echo 'ERROR: Requested format is not available' >&2\n\
                 exit 1",
                log.display()
            ),
        );

        let downloader = Downloader::with_binary(&script);
        let request = DownloadRequest {
            format: "9999+9999".to_string(),
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let err = downloader
            .download("https://example.com/v", &request, |_| {})
            .await
            .unwrap_err();

        // The fallback attempt failed too, so the error is terminal
        assert!(err.is_format_unavailable());

        let calls = std::fs::read_to_string(&log).unwrap();
        let lines: Vec<&str> = calls.lines().collect();
        assert_eq!(lines.len(), 2, "expected primary attempt plus one fallback");
        assert!(lines[0].contains("9999+9999"));
        assert!(lines[1].contains(FALLBACK_EXPRESSION));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_other_failures_are_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("calls.log");
        let script = fake_backend(
            dir.path(),
            &format!(
                "echo \"$@\" >> {}\n\
                 echo 'ERROR: [youtube] abc123: Video unavailable' >&2\n\
                 exit 1",
                log.display()
            ),
        );

        let downloader = Downloader::with_binary(&script);
        let request = DownloadRequest {
            format: "bestaudio/best".to_string(),
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let err = downloader
            .download("https://example.com/v", &request, |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, GrabError::Extraction(_)));
        let calls = std::fs::read_to_string(&log).unwrap();
        assert_eq!(calls.lines().count(), 1, "extraction errors are terminal");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_run_reports_progress_and_paths() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("clip.mp4");
        std::fs::write(&out, b"video").unwrap();
        let script = fake_backend(
            dir.path(),
            &format!(
                "echo 'tubegrab-progress:downloading|512|1024|NA|256.0|2'\n\
                 echo 'tubegrab-progress:finished|1024|1024|NA|NA|NA'\n\
                 echo '{{\"requested_downloads\": [{{\"filepath\": \"{}\"}}]}}'",
                out.display()
            ),
        );

        let events = AtomicUsize::new(0);
        let downloader = Downloader::with_binary(&script);
        let request = DownloadRequest {
            format: "bestvideo+bestaudio".to_string(),
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let paths = downloader
            .download("https://example.com/v", &request, |_| {
                events.fetch_add(1, Ordering::SeqCst);
            })
            .await
            .unwrap();

        assert_eq!(paths, vec![out]);
        assert_eq!(events.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_finalize_paths_dedups_after_remap() {
        let dir = tempfile::tempdir().unwrap();
        let transcoded = dir.path().join("song.mp3");
        std::fs::write(&transcoded, b"mp3").unwrap();

        let request = DownloadRequest {
            audio_transcode: Some(DownloadRequest::standard_audio_transcode()),
            ..Default::default()
        };
        let paths = vec![dir.path().join("song.webm"), dir.path().join("song.m4a")];
        assert_eq!(finalize_paths(paths, &request), vec![transcoded]);
    }
}
