//! # tubegrab - media download front-end
//!
//! Console and GUI front-end for downloading a video or audio stream from a
//! URL. All extraction, format negotiation, and transcoding is delegated to
//! the external `yt-dlp` executable; this crate probes metadata, maps the
//! user's choice to a format-selection expression, resolves a writable
//! output directory, drives the download with progress reporting, and hands
//! the resulting files back to the user.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tubegrab::core::{Downloader, DownloadRequest, FormatChoice};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tubegrab::GrabError> {
//!     let downloader = Downloader::new();
//!     let meta = downloader.probe("https://youtu.be/abc123").await?;
//!     println!("{} by {}", meta.title, meta.uploader);
//!
//!     let request = DownloadRequest {
//!         format: FormatChoice::BestVideoAudio.expression()?,
//!         output_dir: std::env::temp_dir(),
//!         ..Default::default()
//!     };
//!     let files = downloader.download("https://youtu.be/abc123", &request, |_| {}).await?;
//!     println!("downloaded {} file(s)", files.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod gui;
pub mod utils;
pub mod ytdlp;

// Re-export main types
pub use core::{
    DeliveredFile, Downloader, DownloadRequest, FormatChoice, MediaMetadata, ProgressEvent,
    ProgressStatus, StreamFormat,
};
pub use error::GrabError;

/// Result type alias for tubegrab operations
pub type Result<T> = std::result::Result<T, GrabError>;
