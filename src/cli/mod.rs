//! Command line interface for tubegrab

pub mod args;
pub mod output;
pub mod prompt;

pub use args::Args;
pub use output::OutputFormatter;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system for a binary.
///
/// Level comes from `RUST_LOG`, defaulting to warnings so log lines do not
/// fight the interactive prompts and progress bar.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
