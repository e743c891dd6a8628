//! yt-dlp subprocess adapter
//!
//! Everything that knows yt-dlp's command line, output framing, and error
//! text lives here. The rest of the crate only sees `MediaMetadata`,
//! `ProgressEvent`, and resolved output paths.

pub mod client;
pub mod progress;

pub use client::YtDlpClient;
pub use progress::{parse_progress_line, PROGRESS_TEMPLATE};
