use std::path::{Path, PathBuf};

use crate::SteamError;

/// Grid image suffixes Steam appends to an app ID: wide capsule, portrait
/// capsule, hero, logo, icon.
const ARTWORK_SUFFIXES: [&str; 5] = ["", "p", "_hero", "_logo", "_icon"];

/// File stems of every grid image Steam may keep for `app_id`.
pub fn artwork_stems(app_id: u32) -> impl Iterator<Item = String> {
    ARTWORK_SUFFIXES
        .iter()
        .map(move |suffix| format!("{app_id}{suffix}"))
}

/// Well-known locations inside one Steam installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    /// Creates a `Paths` for the first Steam installation found.
    pub fn new() -> Result<Self, SteamError> {
        detect_roots()
            .into_iter()
            .next()
            .map(Self::with_base)
            .ok_or(SteamError::NotFound)
    }

    pub fn with_base(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// `config/`, holding `loginusers.vdf` and `config.vdf`.
    pub fn config_dir(&self) -> PathBuf {
        self.base_dir.join("config")
    }

    pub fn loginusers_path(&self) -> PathBuf {
        self.config_dir().join("loginusers.vdf")
    }

    pub fn config_vdf_path(&self) -> PathBuf {
        self.config_dir().join("config.vdf")
    }

    pub fn steamapps_dir(&self) -> PathBuf {
        steamapps_dir(&self.base_dir)
    }

    pub fn libraryfolders_path(&self) -> PathBuf {
        self.steamapps_dir().join("libraryfolders.vdf")
    }

    pub fn user_data_dir(&self) -> PathBuf {
        self.base_dir.join("userdata")
    }

    /// `userdata/<steam32>`.
    pub fn user_dir(&self, user_id: &str) -> PathBuf {
        self.user_data_dir().join(user_id)
    }

    pub fn user_config_dir(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("config")
    }

    pub fn shortcuts_path(&self, user_id: &str) -> PathBuf {
        self.user_config_dir(user_id).join("shortcuts.vdf")
    }

    pub fn grid_dir(&self, user_id: &str) -> PathBuf {
        self.user_config_dir(user_id).join("grid")
    }

    pub fn has_shortcuts(&self, user_id: &str) -> bool {
        self.shortcuts_path(user_id).exists()
    }
}

/// Returns the `steamapps` directory of a library folder.
pub fn steamapps_dir(library: &Path) -> PathBuf {
    library.join("steamapps")
}

/// Returns every existing Steam installation directory, most preferred
/// first. Symlinked aliases (`~/.steam/steam` -> `~/.local/share/Steam`)
/// collapse to one entry.
pub fn detect_roots() -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();
    for candidate in candidate_roots() {
        if !candidate.is_dir() {
            continue;
        }
        let resolved = std::fs::canonicalize(&candidate).unwrap_or(candidate);
        if !roots.contains(&resolved) {
            tracing::debug!(path = %resolved.display(), "found steam installation");
            roots.push(resolved);
        }
    }
    roots
}

// Platform-specific candidate locations.
#[cfg(target_os = "linux")]
fn candidate_roots() -> Vec<PathBuf> {
    crate::paths_linux::candidate_roots()
}

#[cfg(target_os = "windows")]
fn candidate_roots() -> Vec<PathBuf> {
    crate::paths_windows::candidate_roots()
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
fn candidate_roots() -> Vec<PathBuf> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_with_base() {
        let paths = Paths::with_base("/tmp/steam");
        assert_eq!(paths.base_dir(), Path::new("/tmp/steam"));
        assert_eq!(paths.user_data_dir(), PathBuf::from("/tmp/steam/userdata"));
        assert_eq!(
            paths.loginusers_path(),
            PathBuf::from("/tmp/steam/config/loginusers.vdf")
        );
        assert_eq!(
            paths.libraryfolders_path(),
            PathBuf::from("/tmp/steam/steamapps/libraryfolders.vdf")
        );
    }

    #[test]
    fn user_dir_structure() {
        let paths = Paths::with_base("/steam");
        assert_eq!(
            paths.user_dir("12345"),
            PathBuf::from("/steam/userdata/12345")
        );
        assert_eq!(
            paths.shortcuts_path("12345"),
            PathBuf::from("/steam/userdata/12345/config/shortcuts.vdf")
        );
        assert_eq!(
            paths.grid_dir("12345"),
            PathBuf::from("/steam/userdata/12345/config/grid")
        );
    }

    #[test]
    fn artwork_file_stems() {
        let stems: Vec<String> = artwork_stems(999).collect();
        assert_eq!(stems, ["999", "999p", "999_hero", "999_logo", "999_icon"]);
    }

    #[test]
    fn has_shortcuts_checks_file() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = Paths::with_base(tmp.path());
        assert!(!paths.has_shortcuts("1"));

        std::fs::create_dir_all(paths.user_config_dir("1")).unwrap();
        std::fs::write(paths.shortcuts_path("1"), b"").unwrap();
        assert!(paths.has_shortcuts("1"));
    }
}
