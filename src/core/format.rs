//! Format selection policy
//!
//! Maps the three user-facing download choices to yt-dlp format-selection
//! expressions. Expressions are passed through opaquely; apart from the
//! non-empty check on custom codes, validation is yt-dlp's job and failures
//! surface at download time.

use crate::error::GrabError;

/// Expression guaranteed to match something: separate best streams, or the
/// single best pre-muxed stream. Used for the one-shot fallback retry.
pub const FALLBACK_EXPRESSION: &str = "bv*+ba/b";

/// Target codec for the audio-only choice
pub const AUDIO_CODEC: &str = "mp3";

/// Target bitrate for the audio-only transcode
pub const AUDIO_QUALITY: &str = "192K";

/// User-facing download choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatChoice {
    /// Best video + best audio merged, falling back to best pre-muxed
    BestVideoAudio,
    /// Best audio stream, transcoded to MP3 at a fixed bitrate
    AudioOnly,
    /// User-supplied selection expression, passed verbatim (e.g. "137+140")
    Custom(String),
}

impl FormatChoice {
    /// The yt-dlp format-selection expression for this choice.
    ///
    /// A blank custom code is the only selection-time error; everything else
    /// is deferred to the download attempt.
    pub fn expression(&self) -> Result<String, GrabError> {
        match self {
            FormatChoice::BestVideoAudio => {
                Ok("bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best".to_string())
            }
            FormatChoice::AudioOnly => Ok("bestaudio/best".to_string()),
            FormatChoice::Custom(code) => {
                let code = code.trim();
                if code.is_empty() {
                    Err(GrabError::UserInput(
                        "a format code is required for the custom choice".to_string(),
                    ))
                } else {
                    Ok(code.to_string())
                }
            }
        }
    }

    /// Whether this choice attaches the audio-extraction post-processing step
    pub fn wants_audio_transcode(&self) -> bool {
        matches!(self, FormatChoice::AudioOnly)
    }

    /// Short label for logs and status lines
    pub fn label(&self) -> &'static str {
        match self {
            FormatChoice::BestVideoAudio => "video+audio (best)",
            FormatChoice::AudioOnly => "audio only (best)",
            FormatChoice::Custom(_) => "custom format",
        }
    }
}
