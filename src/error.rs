//! Error types for tubegrab

use thiserror::Error;

/// Main error type for tubegrab operations
#[derive(Debug, Error)]
pub enum GrabError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Requested format is unavailable: {0}")]
    FormatUnavailable(String),

    #[error("Filesystem error: {0}")]
    Filesystem(String),

    #[error("{0}")]
    UserInput(String),

    #[error("yt-dlp executable not found: {0}")]
    BackendMissing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),
}

impl GrabError {
    /// Check if this failure is eligible for the one-shot fallback retry
    /// with the guaranteed-to-match format expression.
    pub fn is_format_unavailable(&self) -> bool {
        matches!(self, GrabError::FormatUnavailable(_))
    }
}

/// Classify a failed yt-dlp invocation from its stderr.
///
/// yt-dlp reports a selection that matched no stream with a fixed message on
/// stderr; that condition is the only one the orchestrator retries. All other
/// stderr content is surfaced verbatim as an extraction failure. The
/// substring match is intentionally confined to this single function.
pub fn classify_failure(stderr: &str) -> GrabError {
    if stderr.contains("Requested format is not available") {
        return GrabError::FormatUnavailable(last_error_line(stderr));
    }
    GrabError::Extraction(last_error_line(stderr))
}

/// Pick the most useful line out of yt-dlp stderr: the last `ERROR:` line if
/// any, otherwise the last non-empty line, otherwise a generic message.
fn last_error_line(stderr: &str) -> String {
    stderr
        .lines()
        .rev()
        .find(|l| l.trim_start().starts_with("ERROR:"))
        .or_else(|| stderr.lines().rev().find(|l| !l.trim().is_empty()))
        .unwrap_or("yt-dlp failed without output")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_format_unavailable() {
        let stderr = "WARNING: something\nERROR: Requested format is not available. \
                      Use --list-formats for a list of available formats";
        let err = classify_failure(stderr);
        assert!(err.is_format_unavailable());
    }

    #[test]
    fn test_classify_generic_extraction() {
        let stderr = "ERROR: [youtube] abc123: Video unavailable";
        let err = classify_failure(stderr);
        assert!(!err.is_format_unavailable());
        assert!(matches!(err, GrabError::Extraction(_)));
        assert!(err.to_string().contains("Video unavailable"));
    }

    #[test]
    fn test_classify_prefers_error_line() {
        let stderr = "WARNING: unrelated noise\nERROR: Private video\ntrailing";
        let err = classify_failure(stderr);
        assert!(err.to_string().contains("Private video"));
    }

    #[test]
    fn test_classify_empty_stderr() {
        let err = classify_failure("");
        assert!(err.to_string().contains("yt-dlp failed without output"));
    }

    #[test]
    fn test_other_variants_not_format_unavailable() {
        assert!(!GrabError::Extraction("x".into()).is_format_unavailable());
        assert!(!GrabError::UserInput("x".into()).is_format_unavailable());
        assert!(!GrabError::Filesystem("x".into()).is_format_unavailable());
    }
}
