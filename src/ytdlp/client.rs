//! yt-dlp process invocation
//!
//! The backend is consumed through exactly two operations: a probe that
//! extracts metadata without downloading, and a combined extract+download
//! run that streams progress ticks and prints the final info JSON.

use crate::core::metadata::MediaMetadata;
use crate::core::progress::ProgressEvent;
use crate::core::request::DownloadRequest;
use crate::error::{classify_failure, GrabError};
use crate::ytdlp::progress::{parse_progress_line, PROGRESS_TEMPLATE};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Well-known install locations checked before falling back to `PATH`
const COMMON_PATHS: &[&str] = &[
    "/opt/homebrew/bin/yt-dlp",
    "/usr/local/bin/yt-dlp",
    "/usr/bin/yt-dlp",
];

/// Handle on the yt-dlp executable
#[derive(Debug, Clone)]
pub struct YtDlpClient {
    binary: PathBuf,
}

impl YtDlpClient {
    /// Create a client, locating yt-dlp in common install paths and `PATH`
    pub fn new() -> Self {
        Self {
            binary: locate_binary(),
        }
    }

    /// Create a client for a specific executable path
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Extract metadata without downloading
    pub async fn probe(&self, url: &str) -> Result<MediaMetadata, GrabError> {
        let args = probe_args(url);
        debug!("probing: {} {:?}", self.binary.display(), args);

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(classify_failure(&String::from_utf8_lossy(&output.stderr)));
        }

        let metadata: MediaMetadata = serde_json::from_slice(&output.stdout)?;
        info!(
            "probed \"{}\" by {} ({} formats)",
            metadata.title,
            metadata.uploader,
            metadata.formats.len()
        );
        Ok(metadata)
    }

    /// Extract and download with the supplied configuration.
    ///
    /// Progress ticks are forwarded to `on_progress` as they arrive; the
    /// returned paths come from the run's `requested_downloads` list,
    /// deduplicated, falling back to top-level filename fields.
    pub async fn download<F>(
        &self,
        url: &str,
        request: &DownloadRequest,
        on_progress: F,
    ) -> Result<Vec<PathBuf>, GrabError>
    where
        F: Fn(ProgressEvent),
    {
        let args = download_args(url, request);
        debug!("downloading: {} {:?}", self.binary.display(), args);

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // Drain stderr on its own task so the child never blocks on a full pipe
        let stderr = child.stderr.take().ok_or_else(|| {
            GrabError::Extraction("failed to capture yt-dlp stderr".to_string())
        })?;
        let stderr_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            let mut collected = String::new();
            while let Ok(Some(line)) = lines.next_line().await {
                collected.push_str(&line);
                collected.push('\n');
            }
            collected
        });

        let stdout = child.stdout.take().ok_or_else(|| {
            GrabError::Extraction("failed to capture yt-dlp stdout".to_string())
        })?;
        let mut lines = BufReader::new(stdout).lines();
        let mut info_json: Option<String> = None;
        while let Some(line) = lines.next_line().await? {
            if let Some(event) = parse_progress_line(&line) {
                on_progress(event);
            } else if line.starts_with('{') {
                // --print-json emits the info document as one line
                info_json = Some(line);
            }
        }

        let status = child.wait().await?;
        let stderr_text = stderr_task.await.unwrap_or_default();

        if !status.success() {
            return Err(classify_failure(&stderr_text));
        }
        if !stderr_text.trim().is_empty() {
            debug!("yt-dlp stderr: {}", stderr_text.trim());
        }

        let json = info_json.ok_or_else(|| {
            GrabError::Extraction("yt-dlp finished without printing a result document".to_string())
        })?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        let paths = extract_output_paths(&value);
        if paths.is_empty() {
            warn!("download succeeded but no output paths were reported");
        }
        Ok(paths)
    }

    fn spawn_error(&self, err: std::io::Error) -> GrabError {
        if err.kind() == std::io::ErrorKind::NotFound {
            GrabError::BackendMissing(self.binary.display().to_string())
        } else {
            GrabError::Io(err)
        }
    }
}

impl Default for YtDlpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Locate the yt-dlp executable, preferring known install paths
fn locate_binary() -> PathBuf {
    for path in COMMON_PATHS {
        if Path::new(path).exists() {
            return PathBuf::from(path);
        }
    }
    // Fall back to PATH resolution at spawn time
    PathBuf::from("yt-dlp")
}

/// Arguments for the metadata probe (no download, no playlist expansion)
pub(crate) fn probe_args(url: &str) -> Vec<String> {
    vec![
        "--dump-json".to_string(),
        "--no-playlist".to_string(),
        "--no-warnings".to_string(),
        "--socket-timeout".to_string(),
        "30".to_string(),
        "--user-agent".to_string(),
        crate::core::request::DEFAULT_USER_AGENT.to_string(),
        "--extractor-args".to_string(),
        crate::core::request::DEFAULT_EXTRACTOR_ARGS.to_string(),
        url.to_string(),
    ]
}

/// Arguments for a combined extract+download run
pub(crate) fn download_args(url: &str, request: &DownloadRequest) -> Vec<String> {
    let mut args = vec![
        "-f".to_string(),
        request.format.clone(),
        "--no-playlist".to_string(),
        "--no-warnings".to_string(),
        "--newline".to_string(),
        "--progress-template".to_string(),
        PROGRESS_TEMPLATE.to_string(),
        "--print-json".to_string(),
        "--retries".to_string(),
        request.retries.to_string(),
        "--fragment-retries".to_string(),
        request.fragment_retries.to_string(),
        "--sleep-interval".to_string(),
        request.sleep_interval.0.to_string(),
        "--max-sleep-interval".to_string(),
        request.sleep_interval.1.to_string(),
        "--concurrent-fragments".to_string(),
        request.concurrent_fragments.to_string(),
        "--socket-timeout".to_string(),
        request.socket_timeout.as_secs().to_string(),
        "--user-agent".to_string(),
        request.user_agent.clone(),
        "--add-headers".to_string(),
        format!("Referer:{}", request.referer),
        "--extractor-args".to_string(),
        request.extractor_args.clone(),
        "-P".to_string(),
        request.output_dir.display().to_string(),
        "-o".to_string(),
        request.output_template.clone(),
    ];

    if let Some(cookie_file) = &request.cookie_file {
        args.push("--cookies".to_string());
        args.push(cookie_file.display().to_string());
    }
    if request.force_ipv4 {
        args.push("--force-ipv4".to_string());
    }
    if let Some(transcode) = &request.audio_transcode {
        args.push("-x".to_string());
        args.push("--audio-format".to_string());
        args.push(transcode.codec.clone());
        args.push("--audio-quality".to_string());
        args.push(transcode.quality.clone());
    }

    args.push(url.to_string());
    args
}

/// Pull output file paths out of the info document.
///
/// Prefers the `requested_downloads` list; falls back to top-level filename
/// fields when it is absent. Order-preserving deduplication.
pub(crate) fn extract_output_paths(value: &serde_json::Value) -> Vec<PathBuf> {
    fn filename_of(entry: &serde_json::Value) -> Option<&str> {
        entry["filepath"]
            .as_str()
            .or_else(|| entry["_filename"].as_str())
            .or_else(|| entry["filename"].as_str())
    }

    let mut candidates: Vec<&str> = Vec::new();
    if let Some(downloads) = value["requested_downloads"].as_array() {
        candidates.extend(downloads.iter().filter_map(filename_of));
    }
    if candidates.is_empty() {
        candidates.extend(filename_of(value));
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for candidate in candidates {
        let path = PathBuf::from(candidate);
        if !paths.contains(&path) {
            paths.push(path);
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_probe_args_disable_download_and_playlist() {
        let args = probe_args("https://youtu.be/abc123");
        assert!(args.contains(&"--dump-json".to_string()));
        assert!(args.contains(&"--no-playlist".to_string()));
        assert_eq!(args.last().unwrap(), "https://youtu.be/abc123");
    }

    #[test]
    fn test_download_args_carry_request_configuration() {
        let request = DownloadRequest {
            format: "bestaudio/best".to_string(),
            output_dir: PathBuf::from("/tmp/out"),
            audio_transcode: Some(DownloadRequest::standard_audio_transcode()),
            force_ipv4: true,
            cookie_file: Some(PathBuf::from("/tmp/cookies.txt")),
            ..Default::default()
        };
        let args = download_args("https://youtu.be/abc123", &request);

        let expect_pair = |flag: &str, value: &str| {
            let i = args.iter().position(|a| a == flag).unwrap_or_else(|| {
                panic!("missing flag {}", flag);
            });
            assert_eq!(args[i + 1], value, "wrong value for {}", flag);
        };

        expect_pair("-f", "bestaudio/best");
        expect_pair("--retries", "10");
        expect_pair("--fragment-retries", "10");
        expect_pair("--sleep-interval", "0.5");
        expect_pair("--max-sleep-interval", "1.5");
        expect_pair("--concurrent-fragments", "1");
        expect_pair("-P", "/tmp/out");
        expect_pair("-o", "%(title)s.%(ext)s");
        expect_pair("--cookies", "/tmp/cookies.txt");
        expect_pair("--audio-format", "mp3");
        expect_pair("--audio-quality", "192K");
        assert!(args.contains(&"--force-ipv4".to_string()));
        assert!(args.contains(&"-x".to_string()));
        assert!(args.contains(&"--no-playlist".to_string()));
        assert_eq!(args.last().unwrap(), "https://youtu.be/abc123");
    }

    #[test]
    fn test_download_args_omit_optional_flags() {
        let request = DownloadRequest {
            format: "best".to_string(),
            ..Default::default()
        };
        let args = download_args("u", &request);
        assert!(!args.contains(&"--cookies".to_string()));
        assert!(!args.contains(&"--force-ipv4".to_string()));
        assert!(!args.contains(&"-x".to_string()));
    }

    #[test]
    fn test_extract_paths_from_requested_downloads() {
        let value = json!({
            "requested_downloads": [
                {"filepath": "/tmp/out/a.mp4"},
                {"_filename": "/tmp/out/b.m4a"},
                {"filepath": "/tmp/out/a.mp4"}
            ],
            "filename": "/tmp/out/ignored.mp4"
        });
        let paths = extract_output_paths(&value);
        assert_eq!(
            paths,
            vec![PathBuf::from("/tmp/out/a.mp4"), PathBuf::from("/tmp/out/b.m4a")]
        );
    }

    #[test]
    fn test_extract_paths_falls_back_to_top_level() {
        let value = json!({"_filename": "/tmp/out/c.webm"});
        assert_eq!(
            extract_output_paths(&value),
            vec![PathBuf::from("/tmp/out/c.webm")]
        );

        let empty = json!({});
        assert!(extract_output_paths(&empty).is_empty());
    }

    #[test]
    fn test_with_binary_override() {
        let client = YtDlpClient::with_binary("/opt/tools/yt-dlp");
        assert_eq!(client.binary, PathBuf::from("/opt/tools/yt-dlp"));
    }
}
