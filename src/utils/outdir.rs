//! Output directory resolution
//!
//! Resolving a destination never fails: a directory that cannot be created
//! or written falls back to the system temp directory, and the substitution
//! is reported through the `fell_back` flag so the caller can tell the user
//! before any download starts.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A usable destination directory for downloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputDir {
    /// Directory that exists and passed a write probe
    pub path: PathBuf,
    /// True when the requested path was not usable and the system temp
    /// directory was substituted
    pub fell_back: bool,
}

impl ResolvedOutputDir {
    /// Display form of the resolved path
    pub fn display(&self) -> std::path::Display<'_> {
        self.path.display()
    }
}

/// Resolve a requested directory (possibly blank) into a writable one.
///
/// Blank input resolves to the current working directory when writable,
/// otherwise the temp directory. Non-blank input is created if missing and
/// write-probed with a create-and-delete zero-byte file.
pub fn resolve_output_dir(requested: &str) -> ResolvedOutputDir {
    let requested = requested.trim();

    if requested.is_empty() {
        let cwd = std::env::current_dir().unwrap_or_else(|_| std::env::temp_dir());
        if is_writable(&cwd) {
            debug!("using current directory: {}", cwd.display());
            return ResolvedOutputDir {
                path: cwd,
                fell_back: false,
            };
        }
        warn!("current directory not writable, using temp directory");
        return ResolvedOutputDir {
            path: std::env::temp_dir(),
            fell_back: true,
        };
    }

    let path = PathBuf::from(requested);
    if std::fs::create_dir_all(&path).is_ok() && is_writable(&path) {
        return ResolvedOutputDir {
            path,
            fell_back: false,
        };
    }

    warn!(
        "requested directory {} not usable, falling back to temp directory",
        path.display()
    );
    ResolvedOutputDir {
        path: std::env::temp_dir(),
        fell_back: true,
    }
}

/// Write-probe a directory by creating (and implicitly deleting) an unnamed
/// zero-byte file inside it.
fn is_writable(dir: &Path) -> bool {
    tempfile::tempfile_in(dir).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writable_path_is_honored() {
        let dir = tempfile::tempdir().unwrap();
        let requested = dir.path().to_string_lossy().to_string();

        let resolved = resolve_output_dir(&requested);
        assert_eq!(resolved.path, dir.path());
        assert!(!resolved.fell_back);
    }

    #[test]
    fn test_missing_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let resolved = resolve_output_dir(&nested.to_string_lossy());
        assert_eq!(resolved.path, nested);
        assert!(!resolved.fell_back);
        assert!(nested.is_dir());
    }

    #[test]
    fn test_blank_resolves_to_some_usable_directory() {
        let resolved = resolve_output_dir("  ");
        assert!(resolved.path.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_path_falls_back_to_temp() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();
        if tempfile::tempfile_in(&locked).is_ok() {
            // Privileged user ignores the permission bits; nothing to assert
            return;
        }

        let requested = locked.join("out");
        let resolved = resolve_output_dir(&requested.to_string_lossy());
        assert!(resolved.fell_back);
        assert_eq!(resolved.path, std::env::temp_dir());

        // Restore so the tempdir can clean itself up
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
}
