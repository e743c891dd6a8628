//! Progress events and human-readable formatting
//!
//! Events originate from yt-dlp's progress template stream and are rendered
//! either by the console progress bar or the GUI status line.

/// Phase of a download reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    /// Bytes are still being transferred
    Downloading,
    /// Transfer done; merging/transcoding may still be running
    Finished,
}

/// One progress tick of a running download
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    /// Download phase
    pub status: ProgressStatus,
    /// Bytes transferred so far
    pub downloaded_bytes: u64,
    /// Total bytes, exact or estimated; `None` when unknown
    pub total_bytes: Option<u64>,
    /// Transfer rate in bytes per second
    pub speed: Option<f64>,
    /// Estimated seconds remaining
    pub eta: Option<u64>,
}

impl ProgressEvent {
    /// Completion percentage in [0, 100]; 0 when the total is unknown
    pub fn percent(&self) -> f64 {
        match self.total_bytes {
            Some(total) if total > 0 => {
                (self.downloaded_bytes as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
            }
            _ => 0.0,
        }
    }

    /// Status line shown to the user for this tick
    pub fn message(&self) -> String {
        match self.status {
            ProgressStatus::Finished => {
                "Download complete. Processing (merging/post-processing)...".to_string()
            }
            ProgressStatus::Downloading => {
                let total = self
                    .total_bytes
                    .map(format_bytes)
                    .unwrap_or_else(|| "?".to_string());
                let speed = self
                    .speed
                    .map(|s| format!("{}/s", format_bytes(s as u64)))
                    .unwrap_or_else(|| "?".to_string());
                let eta = self
                    .eta
                    .map(format_duration)
                    .unwrap_or_else(|| "?".to_string());
                format!(
                    "Downloading: {} of {} at {} • ETA: {}",
                    format_bytes(self.downloaded_bytes),
                    total,
                    speed,
                    eta
                )
            }
        }
    }
}

/// Format a byte count with binary prefixes and exactly two decimal places.
///
/// The numeric part stays in [0, 1024) for every unit except the top one.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 || *unit == "TB" {
            return format!("{:.2} {}", size, unit);
        }
        size /= 1024.0;
    }
    unreachable!()
}

/// Format a duration in seconds as `Hh MMm SSs`, omitting the hour component
/// when it is zero. Minutes and seconds are always zero-padded.
pub fn format_duration(seconds: u64) -> String {
    let (hours, rest) = (seconds / 3600, seconds % 3600);
    let (minutes, secs) = (rest / 60, rest % 60);

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, secs)
    } else {
        format!("{:02}m {:02}s", minutes, secs)
    }
}
