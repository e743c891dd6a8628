//! Core functionality for tubegrab

pub mod delivery;
pub mod downloader;
pub mod format;
pub mod metadata;
pub mod progress;
pub mod request;

pub use delivery::DeliveredFile;
pub use downloader::Downloader;
pub use format::{FormatChoice, FALLBACK_EXPRESSION};
pub use metadata::{MediaMetadata, StreamFormat};
pub use progress::{ProgressEvent, ProgressStatus};
pub use request::{AudioTranscode, DownloadRequest};
