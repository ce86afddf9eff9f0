//! Installed app manifests (`steamapps/appmanifest_<id>.acf`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::SteamError;
use crate::libraries::Library;
use crate::vdf::{Value, Vdf, text};

/// An installed Steam app, as recorded in its manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledApp {
    pub app_id: u32,
    pub name: String,
    pub install_dir: String,
    pub size_on_disk: u64,
    pub state_flags: u32,
    pub last_updated: Option<u64>,
    #[serde(skip)]
    pub manifest_path: PathBuf,
}

impl InstalledApp {
    /// Builds an app from a parsed manifest.
    pub fn from_manifest(vdf: &Vdf, manifest_path: &Path) -> Result<Self, SteamError> {
        if !vdf.key.eq_ignore_ascii_case("AppState") {
            return Err(SteamError::Vdf(format!(
                "expected root 'AppState', got '{}'",
                vdf.key
            )));
        }
        let state = &vdf.root;

        let app_id = state
            .get_ci("appid")
            .and_then(Value::as_u32_bits)
            .or_else(|| app_id_from_file_name(manifest_path))
            .ok_or_else(|| SteamError::Vdf("manifest without appid".into()))?;

        Ok(Self {
            app_id,
            name: state.get_str_ci("name").unwrap_or("Unknown").to_owned(),
            install_dir: state.get_str_ci("installdir").unwrap_or_default().to_owned(),
            size_on_disk: state.get_ci("SizeOnDisk").and_then(Value::as_u64).unwrap_or(0),
            state_flags: state
                .get_ci("StateFlags")
                .and_then(Value::as_u32_bits)
                .unwrap_or(0),
            last_updated: state.get_ci("LastUpdated").and_then(Value::as_u64),
            manifest_path: manifest_path.to_path_buf(),
        })
    }

    /// Resolves the game directory inside its library.
    pub fn install_path(&self, library: &Library) -> PathBuf {
        library.steamapps_dir().join("common").join(&self.install_dir)
    }
}

/// Returns the manifest files of a library, sorted by name.
pub fn manifest_paths(library: &Library) -> Result<Vec<PathBuf>, SteamError> {
    let dir = library.steamapps_dir();
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(SteamError::Io(format!(
                "failed to read {}: {e}",
                dir.display()
            )));
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("appmanifest_") && n.ends_with(".acf"))
        })
        .collect();
    paths.sort();
    Ok(paths)
}

/// Reads every app manifest of a library. Unreadable manifests are logged
/// and skipped.
pub fn installed_apps(library: &Library) -> Result<Vec<InstalledApp>, SteamError> {
    let mut apps = Vec::new();
    for path in manifest_paths(library)? {
        match text::load(&path).and_then(|vdf| InstalledApp::from_manifest(&vdf, &path)) {
            Ok(app) => apps.push(app),
            Err(e) => tracing::error!(path = %path.display(), "error reading manifest: {e}"),
        }
    }
    tracing::debug!(
        library = %library.path.display(),
        count = apps.len(),
        "loaded app manifests"
    );
    Ok(apps)
}

fn app_id_from_file_name(path: &Path) -> Option<u32> {
    path.file_stem()?
        .to_str()?
        .strip_prefix("appmanifest_")?
        .parse()
        .ok()
}
