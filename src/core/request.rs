//! Download request configuration
//!
//! The loosely-typed option dictionary the backend expects is assembled from
//! this explicit structure; every field is named, typed, and defaulted here
//! rather than scattered across call sites.

use std::path::PathBuf;
use std::time::Duration;

/// Browser user agent presented to media hosts
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/121.0.0.0 Safari/537.36";

/// Referer header presented to media hosts
pub const DEFAULT_REFERER: &str = "https://www.youtube.com/";

/// Extractor hint: the mobile player client avoids a class of access errors
/// the web client runs into
pub const DEFAULT_EXTRACTOR_ARGS: &str = "youtube:player_client=android";

/// Audio-extraction post-processing instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioTranscode {
    /// Target codec (e.g. "mp3")
    pub codec: String,
    /// Target quality/bitrate (e.g. "192K")
    pub quality: String,
}

/// Full configuration for one download attempt.
///
/// Constructed fresh per attempt and never persisted.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Format-selection expression
    pub format: String,
    /// Resolved destination directory
    pub output_dir: PathBuf,
    /// Output filename template, scoped to `output_dir`
    pub output_template: String,
    /// Optional audio-extraction step
    pub audio_transcode: Option<AudioTranscode>,
    /// Optional Netscape-format cookie file
    pub cookie_file: Option<PathBuf>,
    /// Restrict all connections to IPv4
    pub force_ipv4: bool,
    /// Whole-request retries handed to the backend
    pub retries: u32,
    /// Per-fragment retries handed to the backend
    pub fragment_retries: u32,
    /// Request pacing: min/max sleep between requests, in seconds
    pub sleep_interval: (f64, f64),
    /// Concurrent fragment fetches
    pub concurrent_fragments: u32,
    /// User-Agent header
    pub user_agent: String,
    /// Referer header
    pub referer: String,
    /// Extractor hints (yt-dlp `--extractor-args` syntax)
    pub extractor_args: String,
    /// Per-connection socket timeout
    pub socket_timeout: Duration,
}

impl Default for DownloadRequest {
    fn default() -> Self {
        Self {
            format: String::new(),
            output_dir: PathBuf::from("."),
            output_template: "%(title)s.%(ext)s".to_string(),
            audio_transcode: None,
            cookie_file: None,
            force_ipv4: false,
            retries: 10,
            fragment_retries: 10,
            sleep_interval: (0.5, 1.5),
            concurrent_fragments: 1,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            extractor_args: DEFAULT_EXTRACTOR_ARGS.to_string(),
            socket_timeout: Duration::from_secs(30),
        }
    }
}

impl DownloadRequest {
    /// The standard MP3 transcode attached to the audio-only choice
    pub fn standard_audio_transcode() -> AudioTranscode {
        AudioTranscode {
            codec: crate::core::format::AUDIO_CODEC.to_string(),
            quality: crate::core::format::AUDIO_QUALITY.to_string(),
        }
    }
}

/// Write uploaded cookie contents to a temporary file for the backend.
///
/// The file is removed when the returned handle drops, whatever the outcome
/// of the download; removal failures are swallowed by the handle itself.
pub fn stage_cookie_file(contents: &[u8]) -> Result<tempfile::NamedTempFile, crate::error::GrabError> {
    use std::io::Write;

    let mut file = tempfile::Builder::new()
        .prefix("tubegrab-cookies-")
        .suffix(".txt")
        .tempfile()?;
    file.write_all(contents)?;
    file.flush()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request_values() {
        let req = DownloadRequest::default();
        assert_eq!(req.retries, 10);
        assert_eq!(req.fragment_retries, 10);
        assert_eq!(req.sleep_interval, (0.5, 1.5));
        assert_eq!(req.concurrent_fragments, 1);
        assert_eq!(req.output_template, "%(title)s.%(ext)s");
        assert!(req.cookie_file.is_none());
        assert!(!req.force_ipv4);
        assert!(req.audio_transcode.is_none());
        assert!(req.user_agent.contains("Mozilla/5.0"));
        assert_eq!(req.referer, "https://www.youtube.com/");
        assert!(req.extractor_args.contains("android"));
    }

    #[test]
    fn test_standard_audio_transcode() {
        let t = DownloadRequest::standard_audio_transcode();
        assert_eq!(t.codec, "mp3");
        assert_eq!(t.quality, "192K");
    }

    #[test]
    fn test_stage_cookie_file_roundtrip_and_cleanup() {
        let staged = stage_cookie_file(b"# Netscape HTTP Cookie File\n").unwrap();
        let path = staged.path().to_path_buf();
        assert_eq!(
            std::fs::read(&path).unwrap(),
            b"# Netscape HTTP Cookie File\n"
        );
        drop(staged);
        assert!(!path.exists());
    }
}
