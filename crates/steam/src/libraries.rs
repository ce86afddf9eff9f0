//! Steam library folder discovery.
//!
//! Every Steam installation is itself a library and lists any additional
//! library folders in `steamapps/libraryfolders.vdf`.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::SteamError;
use crate::paths::{Paths, steamapps_dir};
use crate::vdf::{Object, Value, text};

/// A Steam library folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    /// Library folder (contains `steamapps/`).
    pub path: PathBuf,
    /// Steam installation that registered this library; owns `userdata/`.
    pub steam_root: PathBuf,
    pub label: String,
    pub content_id: Option<u64>,
    pub total_size: Option<u64>,
    /// App IDs Steam records as living in this library.
    pub app_ids: Vec<u32>,
}

impl Library {
    fn bare(path: PathBuf, steam_root: PathBuf) -> Self {
        Self {
            path,
            steam_root,
            label: String::new(),
            content_id: None,
            total_size: None,
            app_ids: Vec::new(),
        }
    }

    pub fn steamapps_dir(&self) -> PathBuf {
        steamapps_dir(&self.path)
    }

    /// Paths of the owning Steam installation.
    pub fn steam_paths(&self) -> Paths {
        Paths::with_base(&self.steam_root)
    }

    pub fn is_steam_root(&self) -> bool {
        self.path == self.steam_root
    }
}

/// Finds all libraries of the given Steam installations.
///
/// Each installation contributes itself first, then the folders from its
/// `libraryfolders.vdf`. Paths are canonicalized and de-duplicated in
/// discovery order. Folders that no longer exist are skipped.
pub fn find_libraries(roots: &[PathBuf]) -> Vec<Library> {
    let mut libraries: Vec<Library> = Vec::new();

    for root in roots {
        if !root.is_dir() {
            tracing::debug!(path = %root.display(), "steam root does not exist");
            continue;
        }
        let root = canonical(root);

        let mut found = match read_library_folders(&root) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(path = %root.display(), "could not read libraryfolders.vdf: {e}");
                Vec::new()
            }
        };

        // The installation itself always comes first.
        match found.iter().position(|lib| lib.path == root) {
            Some(idx) => {
                let lib = found.remove(idx);
                found.insert(0, lib);
            }
            None => found.insert(0, Library::bare(root.clone(), root.clone())),
        }

        for lib in found {
            if libraries.iter().any(|l| l.path == lib.path) {
                continue;
            }
            tracing::debug!(path = %lib.path.display(), label = %lib.label, "found library");
            libraries.push(lib);
        }
    }

    libraries
}

/// Reads `steamapps/libraryfolders.vdf` of one Steam installation.
pub fn read_library_folders(root: &Path) -> Result<Vec<Library>, SteamError> {
    let vdf = text::load(&Paths::with_base(root).libraryfolders_path())?;
    Ok(parse_library_folders(&vdf.root, root))
}

/// Extracts library entries from a parsed `libraryfolders` root.
///
/// Handles both the current layout (`"0" { "path" "..." }`) and the
/// legacy one (`"1" "/path"`). Non-numeric keys are metadata.
fn parse_library_folders(root_obj: &Object, steam_root: &Path) -> Vec<Library> {
    let mut out = Vec::new();

    for (key, value) in root_obj.iter() {
        if key.parse::<u32>().is_err() {
            continue;
        }

        let lib = match value {
            Value::Str(path) => Library::bare(PathBuf::from(path), steam_root.to_path_buf()),
            Value::Obj(entry) => {
                let Some(path) = entry.get_str_ci("path") else {
                    tracing::warn!(entry = key, "library entry without path");
                    continue;
                };
                let mut lib = Library::bare(PathBuf::from(path), steam_root.to_path_buf());
                lib.label = entry.get_str_ci("label").unwrap_or_default().to_owned();
                lib.content_id = entry.get_ci("contentid").and_then(Value::as_u64);
                lib.total_size = entry
                    .get_ci("totalsize")
                    .and_then(Value::as_u64)
                    .filter(|&v| v > 0);
                if let Some(apps) = entry.get_obj_ci("apps") {
                    lib.app_ids = apps.keys().filter_map(|k| k.parse().ok()).collect();
                }
                lib
            }
            _ => continue,
        };

        if !lib.path.is_dir() {
            tracing::warn!(path = %lib.path.display(), "library folder missing, skipping");
            continue;
        }

        out.push(Library {
            path: canonical(&lib.path),
            ..lib
        });
    }

    out
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_libraryfolders(root: &Path, body: &str) {
        let dir = root.join("steamapps");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("libraryfolders.vdf"), body).unwrap();
    }

    fn vdf_path(p: &Path) -> String {
        p.to_string_lossy().replace('\\', "\\\\")
    }

    #[test]
    fn root_only_without_libraryfolders() {
        let tmp = tempfile::tempdir().unwrap();
        let libs = find_libraries(&[tmp.path().to_path_buf()]);
        assert_eq!(libs.len(), 1);
        assert!(libs[0].is_steam_root());
    }

    #[test]
    fn new_format_with_extra_library() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("Steam");
        let extra = tmp.path().join("SteamLibrary");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&extra).unwrap();

        write_libraryfolders(
            &root,
            &format!(
                r#""libraryfolders"
{{
    "contentstatsid" "-123"
    "0"
    {{
        "path" "{}"
        "label" ""
        "contentid" "42"
        "totalsize" "0"
        "apps" {{ "228980" "1000" }}
    }}
    "1"
    {{
        "path" "{}"
        "label" "Games"
        "totalsize" "500107862016"
        "apps" {{ "620" "123" "400" "456" }}
    }}
}}"#,
                vdf_path(&root),
                vdf_path(&extra)
            ),
        );

        let libs = find_libraries(&[root.clone()]);
        assert_eq!(libs.len(), 2);
        assert!(libs[0].is_steam_root());
        assert_eq!(libs[0].content_id, Some(42));
        assert_eq!(libs[0].total_size, None);
        assert_eq!(libs[0].app_ids, vec![228980]);

        assert_eq!(libs[1].label, "Games");
        assert_eq!(libs[1].total_size, Some(500107862016));
        assert_eq!(libs[1].steam_root, libs[0].path);
        let mut ids = libs[1].app_ids.clone();
        ids.sort();
        assert_eq!(ids, vec![400, 620]);
    }

    #[test]
    fn legacy_format_and_missing_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("Steam");
        let extra = tmp.path().join("Old");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&extra).unwrap();

        write_libraryfolders(
            &root,
            &format!(
                "\"LibraryFolders\"\n{{\n\"TimeNextStatsReport\" \"1\"\n\"1\" \"{}\"\n\"2\" \"{}\"\n}}\n",
                vdf_path(&extra),
                vdf_path(&tmp.path().join("gone"))
            ),
        );

        let libs = find_libraries(&[root]);
        assert_eq!(libs.len(), 2);
        assert!(libs[1].path.ends_with("Old"));
    }

    #[test]
    fn duplicate_roots_collapse() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let libs = find_libraries(&[root.clone(), root.join(".")]);
        assert_eq!(libs.len(), 1);
    }

    #[test]
    fn missing_roots_yield_nothing() {
        let libs = find_libraries(&[PathBuf::from("/nonexistent/steam")]);
        assert!(libs.is_empty());
    }

    #[test]
    fn malformed_libraryfolders_falls_back_to_root() {
        let tmp = tempfile::tempdir().unwrap();
        write_libraryfolders(tmp.path(), "\"libraryfolders\" {");
        let libs = find_libraries(&[tmp.path().to_path_buf()]);
        assert_eq!(libs.len(), 1);
    }
}
