//! Delivery of completed downloads
//!
//! Console mode leaves files where the backend wrote them and just reports
//! them; the GUI reads each file fully into memory and offers it as a named,
//! typed byte download. A file that cannot be read produces a per-file
//! warning and never aborts delivery of the rest.

use crate::core::progress::format_bytes;
use crate::error::GrabError;
use crate::utils::filename::to_safe_filename;
use crate::utils::mime::mime_from_ext;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One output file ready to hand to the user
#[derive(Debug, Clone)]
pub struct DeliveredFile {
    /// Location on disk
    pub path: PathBuf,
    /// Sanitized name offered for the download
    pub file_name: String,
    /// Content type inferred from the extension
    pub mime: &'static str,
    /// Full contents, present only when loaded for in-memory delivery
    pub bytes: Option<Vec<u8>>,
}

impl DeliveredFile {
    /// Human-readable size of the in-memory contents
    pub fn size_string(&self) -> Option<String> {
        self.bytes.as_ref().map(|b| format_bytes(b.len() as u64))
    }
}

/// Describe a file without reading it (console delivery)
pub fn describe(path: &Path) -> DeliveredFile {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    DeliveredFile {
        path: path.to_path_buf(),
        file_name: to_safe_filename(&stem, &ext),
        mime: mime_from_ext(&ext),
        bytes: None,
    }
}

/// Read a file fully into memory for in-memory delivery (GUI)
pub fn load(path: &Path) -> Result<DeliveredFile, GrabError> {
    let bytes = std::fs::read(path).map_err(|e| {
        GrabError::Filesystem(format!("cannot read {}: {}", path.display(), e))
    })?;
    let mut file = describe(path);
    file.bytes = Some(bytes);
    Ok(file)
}

/// Load every output file, collecting per-file warnings instead of failing
pub fn load_all(paths: &[PathBuf]) -> (Vec<DeliveredFile>, Vec<String>) {
    let mut files = Vec::new();
    let mut warnings = Vec::new();
    for path in paths {
        match load(path) {
            Ok(file) => files.push(file),
            Err(e) => {
                warn!("{}", e);
                warnings.push(e.to_string());
            }
        }
    }
    (files, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_infers_mime_and_name() {
        let file = describe(Path::new("/tmp/out/abc123-title.mp3"));
        assert_eq!(file.mime, "audio/mpeg");
        assert_eq!(file.file_name, "abc123-title.mp3");
        assert!(file.bytes.is_none());
        assert!(file.size_string().is_none());
    }

    #[test]
    fn test_describe_unknown_extension_is_binary() {
        let file = describe(Path::new("/tmp/out/clip.xyz"));
        assert_eq!(file.mime, "application/octet-stream");
    }

    #[test]
    fn test_load_reads_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"not really a video").unwrap();

        let file = load(&path).unwrap();
        assert_eq!(file.mime, "video/mp4");
        assert_eq!(file.bytes.as_deref(), Some(&b"not really a video"[..]));
        assert_eq!(file.size_string().unwrap(), "18.00 B");
    }

    #[test]
    fn test_load_all_warns_per_file_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("song.mp3");
        std::fs::write(&good, b"audio").unwrap();
        let missing = dir.path().join("gone.mp4");

        let (files, warnings) = load_all(&[missing.clone(), good.clone()]);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, good);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("gone.mp4"));
    }
}
