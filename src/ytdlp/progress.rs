//! Progress template and line parsing
//!
//! yt-dlp is given a machine-readable progress template so each tick arrives
//! as a single prefixed line on stdout. Fields yt-dlp cannot fill are
//! printed as the literal string `NA`.

use crate::core::progress::{ProgressEvent, ProgressStatus};

/// Prefix distinguishing progress ticks from the rest of stdout
pub const PROGRESS_PREFIX: &str = "tubegrab-progress:";

/// Template handed to yt-dlp via `--progress-template`
pub const PROGRESS_TEMPLATE: &str = "tubegrab-progress:%(progress.status)s|\
%(progress.downloaded_bytes)s|%(progress.total_bytes)s|\
%(progress.total_bytes_estimate)s|%(progress.speed)s|%(progress.eta)s";

/// Parse one stdout line into a progress event.
///
/// Returns `None` for lines that are not progress ticks, malformed ticks,
/// and status tags other than downloading/finished.
pub fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let payload = line.strip_prefix(PROGRESS_PREFIX)?;
    let mut fields = payload.split('|');

    let status = match fields.next()? {
        "downloading" => ProgressStatus::Downloading,
        "finished" => ProgressStatus::Finished,
        _ => return None,
    };

    let downloaded_bytes = parse_u64(fields.next()?).unwrap_or(0);
    let total_bytes = parse_u64(fields.next()?);
    let total_estimate = parse_u64(fields.next()?);
    let speed = parse_f64(fields.next()?);
    let eta = parse_u64(fields.next()?);

    Some(ProgressEvent {
        status,
        downloaded_bytes,
        // Exact total when known, otherwise the estimate
        total_bytes: total_bytes.or(total_estimate),
        speed,
        eta,
    })
}

fn parse_f64(field: &str) -> Option<f64> {
    let field = field.trim();
    if field.is_empty() || field == "NA" || field == "None" {
        return None;
    }
    field.parse::<f64>().ok()
}

fn parse_u64(field: &str) -> Option<u64> {
    parse_f64(field).map(|v| v.max(0.0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_downloading_tick() {
        let line = "tubegrab-progress:downloading|1048576|10485760|NA|524288.5|18";
        let ev = parse_progress_line(line).unwrap();
        assert_eq!(ev.status, ProgressStatus::Downloading);
        assert_eq!(ev.downloaded_bytes, 1048576);
        assert_eq!(ev.total_bytes, Some(10485760));
        assert_eq!(ev.speed, Some(524288.5));
        assert_eq!(ev.eta, Some(18));
        assert_eq!(ev.percent() as u32, 10);
    }

    #[test]
    fn test_parse_estimate_used_when_total_missing() {
        let line = "tubegrab-progress:downloading|512.0|NA|2048|NA|NA";
        let ev = parse_progress_line(line).unwrap();
        assert_eq!(ev.downloaded_bytes, 512);
        assert_eq!(ev.total_bytes, Some(2048));
        assert!(ev.speed.is_none());
        assert!(ev.eta.is_none());
    }

    #[test]
    fn test_parse_finished_tick() {
        let line = "tubegrab-progress:finished|10485760|10485760|NA|NA|NA";
        let ev = parse_progress_line(line).unwrap();
        assert_eq!(ev.status, ProgressStatus::Finished);
    }

    #[test]
    fn test_non_progress_lines_are_ignored() {
        assert!(parse_progress_line("[download] Destination: clip.mp4").is_none());
        assert!(parse_progress_line("{\"id\": \"abc\"}").is_none());
        assert!(parse_progress_line("").is_none());
    }

    #[test]
    fn test_unknown_status_is_ignored() {
        assert!(parse_progress_line("tubegrab-progress:error|0|NA|NA|NA|NA").is_none());
    }

    #[test]
    fn test_template_matches_parser_field_order() {
        // The template must produce the six fields the parser expects
        assert!(PROGRESS_TEMPLATE.starts_with(PROGRESS_PREFIX));
        assert_eq!(PROGRESS_TEMPLATE.matches('|').count(), 5);
        assert!(PROGRESS_TEMPLATE.contains("%(progress.status)s"));
        assert!(PROGRESS_TEMPLATE.contains("%(progress.downloaded_bytes)s"));
        assert!(PROGRESS_TEMPLATE.contains("%(progress.total_bytes)s"));
        assert!(PROGRESS_TEMPLATE.contains("%(progress.total_bytes_estimate)s"));
        assert!(PROGRESS_TEMPLATE.contains("%(progress.speed)s"));
        assert!(PROGRESS_TEMPLATE.contains("%(progress.eta)s"));
    }
}
