//! Utility modules for tubegrab

pub mod filename;
pub mod mime;
pub mod outdir;

pub use filename::to_safe_filename;
pub use mime::mime_from_ext;
pub use outdir::{resolve_output_dir, ResolvedOutputDir};
