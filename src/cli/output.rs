//! Output formatting and progress display

use crate::cli::args::VerbosityLevel;
use crate::core::delivery::DeliveredFile;
use crate::core::metadata::{MediaMetadata, StreamFormat};
use crate::core::progress::{ProgressEvent, ProgressStatus};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Output formatter for the console binary
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
    progress_bar: Option<ProgressBar>,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            progress_bar: None,
        }
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("{}", message);
        }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("{}", message.green());
        }
    }

    /// Print warning message
    pub fn warning(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            eprintln!("{}", message.yellow());
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("{}", message.red());
    }

    /// Spinner shown while the metadata probe runs
    pub fn probe_spinner(&self) -> ProgressBar {
        let spinner = if self.verbosity == VerbosityLevel::Quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        spinner.set_message("Fetching media info...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    /// Print probed metadata
    pub fn print_media_info(&self, meta: &MediaMetadata) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        println!();
        println!("Title:    {}", meta.title);
        println!("Uploader: {}", meta.uploader);
        println!("Length:   {}", meta.duration_string());
        println!("Views:    {}", meta.views());
        println!();
    }

    /// Print the table of available streams for the custom choice
    pub fn print_stream_table(&self, formats: &[StreamFormat]) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        println!(
            "{:<10} {:<6} {:<12} {:<14} {:<14} {:>6} {:>8} {:>12}",
            "CODE", "EXT", "QUALITY", "VCODEC", "ACODEC", "FPS", "BITRATE", "SIZE"
        );
        for f in formats {
            println!(
                "{:<10} {:<6} {:<12} {:<14} {:<14} {:>6} {:>8} {:>12}",
                f.format_id,
                f.ext,
                f.quality_label(),
                f.vcodec.as_deref().unwrap_or("?"),
                f.acodec.as_deref().unwrap_or("?"),
                f.fps.map(|v| format!("{:.0}", v)).unwrap_or_else(|| "-".into()),
                f.bitrate_string(),
                f.size_string(),
            );
        }
        println!();
    }

    /// Create the download progress bar; length is adjusted as events arrive
    pub fn start_download_bar(&mut self) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {percent:>3}% {msg}")
            .unwrap()
            .progress_chars("#>-");

        let bar = ProgressBar::new(100);
        bar.set_style(style);
        bar.set_message("Starting download...");
        self.progress_bar = Some(bar);
    }

    /// Render one progress event
    pub fn update_progress(&self, event: &ProgressEvent) {
        if let Some(bar) = &self.progress_bar {
            match event.status {
                ProgressStatus::Downloading => {
                    bar.set_position(event.percent() as u64);
                    bar.set_message(event.message());
                }
                ProgressStatus::Finished => {
                    bar.set_position(100);
                    bar.set_message(event.message());
                }
            }
        }
    }

    /// Finish and clear the download progress bar
    pub fn finish_download(&mut self) {
        if let Some(bar) = self.progress_bar.take() {
            bar.finish_and_clear();
        }
    }

    /// Report the delivered output files
    pub fn print_delivery(&self, files: &[DeliveredFile]) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        println!();
        for file in files {
            println!("Saved: {} ({})", file.path.display(), file.mime);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn formatter(verbosity: VerbosityLevel) -> OutputFormatter {
        OutputFormatter::new(verbosity)
    }

    #[test]
    fn test_quiet_mode_has_no_progress_bar() {
        let mut f = formatter(VerbosityLevel::Quiet);
        f.start_download_bar();
        assert!(f.progress_bar.is_none());
    }

    #[test]
    fn test_normal_mode_creates_progress_bar() {
        let mut f = formatter(VerbosityLevel::Normal);
        f.start_download_bar();
        assert!(f.progress_bar.is_some());
        f.finish_download();
        assert!(f.progress_bar.is_none());
    }

    #[test]
    fn test_update_progress_without_bar_does_not_panic() {
        let f = formatter(VerbosityLevel::Normal);
        f.update_progress(&ProgressEvent {
            status: ProgressStatus::Downloading,
            downloaded_bytes: 10,
            total_bytes: Some(100),
            speed: None,
            eta: None,
        });
    }

    #[test]
    fn test_print_helpers_do_not_panic() {
        let f = formatter(VerbosityLevel::Normal);
        f.info("info");
        f.success("ok");
        f.warning("careful");
        f.error("boom");

        let meta: MediaMetadata = serde_json::from_str(
            r#"{"title": "T", "uploader": "U", "duration": 61, "view_count": 5,
                "formats": [{"format_id": "140", "ext": "m4a"}]}"#,
        )
        .unwrap();
        f.print_media_info(&meta);
        f.print_stream_table(&meta.formats);
        f.print_delivery(&[crate::core::delivery::describe(Path::new("/tmp/a.mp4"))]);
    }
}
