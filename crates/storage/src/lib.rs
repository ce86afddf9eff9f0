//! Storage analysis for steam-vdf.
//!
//! Reports disk usage of the volume holding a library and measures
//! directories next to it, so Steam's share of the disk can be compared
//! with everything else.

mod size;
mod usage;

pub use size::format_size;
pub use usage::{DirSize, DiskUsage, dir_size, disk_usage, sibling_dir_sizes};

/// Errors for storage analysis.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("path has no parent directory: {0}")]
    NoParent(String),
}
