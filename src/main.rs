//! Main entry point for the tubegrab console binary

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tubegrab::cli::{self, prompt, Args, OutputFormatter};
use tubegrab::core::{delivery, Downloader, DownloadRequest, FormatChoice, MediaMetadata};
use tubegrab::utils::outdir::resolve_output_dir;

#[tokio::main]
async fn main() -> Result<()> {
    cli::init_logging();

    let args = Args::parse();
    let mut formatter = OutputFormatter::new(args.verbosity_level());

    if let Err(e) = run(&args, &mut formatter).await {
        formatter.error(&format!("Download failed: {}", e));
        std::process::exit(1);
    }
    Ok(())
}

async fn run(args: &Args, formatter: &mut OutputFormatter) -> tubegrab::Result<()> {
    let url = match &args.url {
        Some(url) => url.clone(),
        None => prompt::prompt_url()?,
    };

    let downloader = match &args.ytdlp_path {
        Some(path) => Downloader::with_binary(path),
        None => Downloader::new(),
    };

    // Probe while a spinner keeps the interface alive
    let spinner = formatter.probe_spinner();
    let probe_result = downloader.probe(&url).await;
    spinner.finish_and_clear();
    let metadata = probe_result?;
    formatter.print_media_info(&metadata);

    let choice = select_format(args, &metadata, formatter)?;
    info!("selected {}", choice.label());

    let requested_dir = match &args.output {
        Some(dir) => dir.display().to_string(),
        None => prompt::prompt_output_dir()?,
    };
    let resolved = resolve_output_dir(&requested_dir);
    if resolved.fell_back {
        formatter.warning(&format!(
            "Requested folder is not writable; saving to {} instead",
            resolved.display()
        ));
    }

    let request = DownloadRequest {
        format: choice.expression()?,
        output_dir: resolved.path,
        audio_transcode: choice
            .wants_audio_transcode()
            .then(DownloadRequest::standard_audio_transcode),
        cookie_file: args.cookies.clone(),
        force_ipv4: args.force_ipv4,
        socket_timeout: args.socket_timeout_duration(),
        ..Default::default()
    };

    formatter.start_download_bar();
    let result = downloader
        .download(&url, &request, |event| formatter.update_progress(&event))
        .await;
    formatter.finish_download();
    let paths = result?;

    let files: Vec<_> = paths.iter().map(|p| delivery::describe(p)).collect();
    formatter.print_delivery(&files);
    formatter.success(&format!(
        "Download completed successfully! ({} file{})",
        files.len(),
        if files.len() == 1 { "" } else { "s" }
    ));
    Ok(())
}

/// Resolve the download choice from flags, falling back to the interactive
/// menu; the custom choice lists available streams before asking for a code.
fn select_format(
    args: &Args,
    metadata: &MediaMetadata,
    formatter: &OutputFormatter,
) -> tubegrab::Result<FormatChoice> {
    if let Some(choice) = args.format_choice() {
        return Ok(choice);
    }

    let choice = match args.mode {
        // --mode custom without a code goes straight to the table + prompt
        Some(_) => 3,
        None => prompt::prompt_choice()?,
    };

    match choice {
        1 => Ok(FormatChoice::BestVideoAudio),
        2 => Ok(FormatChoice::AudioOnly),
        _ => {
            formatter.print_stream_table(&metadata.formats);
            Ok(prompt::prompt_format_code()?)
        }
    }
}
