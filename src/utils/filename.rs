//! Safe filename generation utilities

use regex::Regex;

/// Convert a title to a safe filename by removing/replacing invalid characters
pub fn to_safe_filename(title: &str, extension: &str) -> String {
    // Remove or replace invalid characters for filenames
    let invalid_chars = Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).unwrap();
    let mut safe_title = invalid_chars.replace_all(title, "_").to_string();

    // Remove leading/trailing dots and spaces
    safe_title = safe_title
        .trim_matches(|c: char| c == '.' || c == ' ')
        .to_string();

    // Limit length (Windows has 255 char limit, be conservative)
    if safe_title.len() > 200 {
        safe_title.truncate(200);
        safe_title = safe_title.trim_end().to_string();
    }

    // Ensure it's not empty
    if safe_title.is_empty() {
        safe_title = "media".to_string();
    }

    // Add extension if provided
    if !extension.is_empty() {
        let ext = if extension.starts_with('.') {
            extension.to_string()
        } else {
            format!(".{}", extension)
        };
        format!("{}{}", safe_title, ext)
    } else {
        safe_title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_safe_filename() {
        assert_eq!(
            to_safe_filename("Test Video: Title", "mp4"),
            "Test Video_ Title.mp4"
        );

        assert_eq!(
            to_safe_filename("Video with <invalid> chars", "mp3"),
            "Video with _invalid_ chars.mp3"
        );

        assert_eq!(to_safe_filename("", "mp4"), "media.mp4");
        assert_eq!(to_safe_filename("...", ""), "media");
    }

    #[test]
    fn test_to_safe_filename_extension_dot() {
        assert_eq!(to_safe_filename("clip", ".webm"), "clip.webm");
        assert_eq!(to_safe_filename("clip", "webm"), "clip.webm");
    }

    #[test]
    fn test_to_safe_filename_truncates() {
        let long = "x".repeat(300);
        let name = to_safe_filename(&long, "mp4");
        assert!(name.len() <= 204);
        assert!(name.ends_with(".mp4"));
    }
}
