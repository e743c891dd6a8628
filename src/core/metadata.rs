//! Media metadata structures
//!
//! Deserialized from the JSON document yt-dlp prints for `--dump-json` and
//! `--print-json`. Fields the extractor omits get the documented defaults;
//! everything here is read-only once fetched.

use crate::core::progress::{format_bytes, format_duration};
use serde::Deserialize;

/// Metadata for one media source
#[derive(Debug, Clone, Deserialize)]
pub struct MediaMetadata {
    /// Source identifier assigned by the extractor
    #[serde(default)]
    pub id: String,
    /// Media title
    #[serde(default = "default_title")]
    pub title: String,
    /// Uploader/channel name
    #[serde(default = "default_uploader")]
    pub uploader: String,
    /// Duration in seconds (yt-dlp reports fractional seconds; absent or
    /// null for live content)
    #[serde(default)]
    pub duration: Option<f64>,
    /// View count
    #[serde(default)]
    pub view_count: Option<u64>,
    /// Thumbnail URL
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Available encoded streams
    #[serde(default)]
    pub formats: Vec<StreamFormat>,
}

fn default_title() -> String {
    "video".to_string()
}

fn default_uploader() -> String {
    "unknown".to_string()
}

impl MediaMetadata {
    /// Duration in whole seconds, zero when unknown
    pub fn duration_secs(&self) -> u64 {
        self.duration.unwrap_or(0.0).max(0.0) as u64
    }

    /// View count, zero when unknown
    pub fn views(&self) -> u64 {
        self.view_count.unwrap_or(0)
    }

    /// Human-readable duration
    pub fn duration_string(&self) -> String {
        format_duration(self.duration_secs())
    }
}

/// One encoded stream variant of the source media
#[derive(Debug, Clone, Deserialize)]
pub struct StreamFormat {
    /// Format identifier used in selection expressions (e.g. "137")
    #[serde(default)]
    pub format_id: String,
    /// Container extension
    #[serde(default)]
    pub ext: String,
    /// Quality note (e.g. "1080p", "medium")
    #[serde(default)]
    pub format_note: String,
    /// Resolution string (e.g. "1920x1080", "audio only")
    #[serde(default)]
    pub resolution: Option<String>,
    /// Video codec, "none" for audio-only streams
    #[serde(default)]
    pub vcodec: Option<String>,
    /// Audio codec, "none" for video-only streams
    #[serde(default)]
    pub acodec: Option<String>,
    /// Frame rate
    #[serde(default)]
    pub fps: Option<f64>,
    /// Total bitrate in kbit/s
    #[serde(default)]
    pub tbr: Option<f64>,
    /// Exact file size in bytes
    #[serde(default)]
    pub filesize: Option<u64>,
    /// Estimated file size in bytes
    #[serde(default)]
    pub filesize_approx: Option<u64>,
}

impl StreamFormat {
    /// File size, exact when known, otherwise the extractor's estimate
    pub fn size(&self) -> Option<u64> {
        self.filesize.or(self.filesize_approx)
    }

    /// Check if this stream carries audio but no video
    pub fn is_audio_only(&self) -> bool {
        matches!(self.vcodec.as_deref(), None | Some("none"))
            && !matches!(self.acodec.as_deref(), None | Some("none"))
    }

    /// Quality label for display
    pub fn quality_label(&self) -> &str {
        if !self.format_note.is_empty() {
            &self.format_note
        } else if let Some(res) = &self.resolution {
            res
        } else {
            "unknown"
        }
    }

    /// Human-readable size string
    pub fn size_string(&self) -> String {
        match self.size() {
            Some(size) => format_bytes(size),
            None => "?".to_string(),
        }
    }

    /// Human-readable bitrate string
    pub fn bitrate_string(&self) -> String {
        match self.tbr {
            Some(tbr) => format!("{:.0}k", tbr),
            None => "?".to_string(),
        }
    }
}
