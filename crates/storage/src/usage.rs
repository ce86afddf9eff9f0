use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::StorageError;

/// Space on the volume holding a path, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiskUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

/// A directory and the bytes it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirSize {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Returns total/used/free space of the volume containing `path`.
pub fn disk_usage(path: &Path) -> Result<DiskUsage, StorageError> {
    let io_err = |source: std::io::Error| StorageError::Io {
        path: path.display().to_string(),
        source,
    };

    let total = fs2::total_space(path).map_err(io_err)?;
    let free = fs2::available_space(path).map_err(io_err)?;
    let used = total.saturating_sub(fs2::free_space(path).map_err(io_err)?);

    Ok(DiskUsage { total, used, free })
}

/// Sums the sizes of regular files below `path`. Symlinks are not
/// followed; unreadable entries are skipped.
pub fn dir_size(path: &Path) -> u64 {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(path = %path.display(), "skipping unreadable directory: {e}");
            return 0;
        }
    };

    let mut total = 0u64;
    for entry in entries.filter_map(|entry| entry.ok()) {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_symlink() {
            continue;
        }
        if file_type.is_dir() {
            total += dir_size(&entry.path());
        } else if file_type.is_file() {
            total += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }
    }
    total
}

/// Measures the directories next to `path` (excluding `path` itself).
///
/// Only non-empty directories are returned, largest first.
pub fn sibling_dir_sizes(path: &Path) -> Result<Vec<DirSize>, StorageError> {
    let path = fs::canonicalize(path).map_err(|source| StorageError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let parent = path
        .parent()
        .ok_or_else(|| StorageError::NoParent(path.display().to_string()))?;

    let entries = fs::read_dir(parent).map_err(|source| StorageError::Io {
        path: parent.display().to_string(),
        source,
    })?;

    let mut sizes: Vec<DirSize> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_dir()))
        .map(|entry| entry.path())
        .filter(|dir| *dir != path)
        .map(|dir| DirSize {
            bytes: dir_size(&dir),
            path: dir,
        })
        .filter(|d| d.bytes > 0)
        .collect();

    sizes.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.path.cmp(&b.path)));
    Ok(sizes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_size_sums_nested_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a"), vec![0u8; 100]).unwrap();
        fs::create_dir_all(tmp.path().join("sub").join("deeper")).unwrap();
        fs::write(tmp.path().join("sub").join("b"), vec![0u8; 20]).unwrap();
        fs::write(tmp.path().join("sub").join("deeper").join("c"), vec![0u8; 3]).unwrap();
        assert_eq!(dir_size(tmp.path()), 123);
    }

    #[cfg(unix)]
    #[test]
    fn dir_size_ignores_symlinks() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("real"), vec![0u8; 10]).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link")).unwrap();
        assert_eq!(dir_size(tmp.path()), 10);
    }

    #[test]
    fn dir_size_missing_is_zero() {
        assert_eq!(dir_size(Path::new("/nonexistent/dir")), 0);
    }

    #[test]
    fn siblings_sorted_and_filtered() {
        let tmp = tempfile::tempdir().unwrap();
        let steam = tmp.path().join("Steam");
        let big = tmp.path().join("Videos");
        let small = tmp.path().join("Docs");
        let empty = tmp.path().join("Empty");
        for d in [&steam, &big, &small, &empty] {
            fs::create_dir_all(d).unwrap();
        }
        fs::write(steam.join("huge"), vec![0u8; 5000]).unwrap();
        fs::write(big.join("v"), vec![0u8; 300]).unwrap();
        fs::write(small.join("d"), vec![0u8; 30]).unwrap();
        fs::write(tmp.path().join("loose-file"), vec![0u8; 999]).unwrap();

        let sizes = sibling_dir_sizes(&steam).unwrap();
        let names: Vec<_> = sizes
            .iter()
            .map(|d| d.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Videos", "Docs"]);
        assert_eq!(sizes[0].bytes, 300);
    }

    #[test]
    fn siblings_of_missing_path_errors() {
        assert!(sibling_dir_sizes(Path::new("/nonexistent/steam")).is_err());
    }

    #[test]
    fn disk_usage_is_consistent() {
        let tmp = tempfile::tempdir().unwrap();
        let usage = disk_usage(tmp.path()).unwrap();
        assert!(usage.total > 0);
        assert!(usage.used <= usage.total);
        assert!(usage.free <= usage.total);
    }
}
