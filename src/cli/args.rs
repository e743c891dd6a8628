//! Command line argument parsing

use crate::core::FormatChoice;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// TubeGrab - download a video or audio stream via yt-dlp
///
/// Anything not supplied as a flag is asked for interactively.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Video or audio URL (prompted for when omitted)
    pub url: Option<String>,

    /// Download mode
    #[arg(short, long, value_enum)]
    pub mode: Option<DownloadMode>,

    /// Format code for custom mode (e.g. '137+140')
    #[arg(short = 'f', long, value_name = "CODE")]
    pub format_code: Option<String>,

    /// Output directory (prompted for when omitted; unwritable paths fall
    /// back to the system temp directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Netscape-format cookie file passed to the backend
    #[arg(long, value_name = "PATH")]
    pub cookies: Option<PathBuf>,

    /// Restrict all connections to IPv4
    #[arg(long)]
    pub force_ipv4: bool,

    /// Socket timeout handed to the backend (e.g. 30s, 1m)
    #[arg(long, value_name = "DURATION", default_value = "30s")]
    pub socket_timeout: humantime::Duration,

    /// Path to the yt-dlp executable (auto-located when omitted)
    #[arg(long, value_name = "PATH")]
    pub ytdlp_path: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Download mode selectable from the command line
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum DownloadMode {
    /// Best video + best audio, merged
    Best,
    /// Best audio only, transcoded to MP3
    Audio,
    /// User-supplied format code
    Custom,
}

impl Args {
    /// Get the socket timeout as a Duration
    pub fn socket_timeout_duration(&self) -> Duration {
        self.socket_timeout.into()
    }

    /// Map the mode flags to a format choice, when one was given.
    ///
    /// `--mode custom` without `--format-code` returns `None` so the caller
    /// can fall back to the interactive flow (stream table + prompt).
    pub fn format_choice(&self) -> Option<FormatChoice> {
        match self.mode? {
            DownloadMode::Best => Some(FormatChoice::BestVideoAudio),
            DownloadMode::Audio => Some(FormatChoice::AudioOnly),
            DownloadMode::Custom => self
                .format_code
                .as_ref()
                .filter(|code| !code.trim().is_empty())
                .map(|code| FormatChoice::Custom(code.clone())),
        }
    }

    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}
