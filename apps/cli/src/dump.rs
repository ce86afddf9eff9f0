//! `--dump-vdfs`: mirrors every VDF file a command reads as pretty JSON.

use std::path::{Path, PathBuf};

use anyhow::Context;
use steam_vdf_steam::apps::manifest_paths;
use steam_vdf_steam::vdf::text;
use steam_vdf_steam::{Library, ShortcutStore, Vdf};

/// Writes VDF trees below a dump directory.
#[derive(Debug, Clone)]
pub struct Dumper {
    dir: PathBuf,
}

impl Dumper {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes `vdf` to `<dir>/<file relative to base>.json` and returns the
    /// written path. Files outside `base` keep only their file name.
    pub fn dump(&self, base: &Path, file: &Path, vdf: &Vdf) -> anyhow::Result<PathBuf> {
        let relative = match file.strip_prefix(base) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => PathBuf::from(file.file_name().unwrap_or(file.as_os_str())),
        };
        let mut name = relative.into_os_string();
        name.push(".json");
        let target = self.dir.join(name);

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(vdf)?;
        std::fs::write(&target, json).with_context(|| format!("writing {}", target.display()))?;

        tracing::debug!(source = %file.display(), target = %target.display(), "dumped vdf");
        Ok(target)
    }

    /// Dumps the account files `get_users` reads: `loginusers.vdf` and
    /// `config.vdf`.
    pub fn dump_users(&self, library: &Library) {
        let paths = library.steam_paths();
        let base = paths.base_dir().to_path_buf();
        self.dump_text_files(vec![
            (base.clone(), paths.loginusers_path()),
            (base, paths.config_vdf_path()),
        ]);
    }

    /// Dumps the text files of a library and its Steam installation:
    /// the account files, `libraryfolders.vdf` and every app manifest.
    pub fn dump_library(&self, library: &Library) {
        self.dump_users(library);

        let paths = library.steam_paths();
        let mut files = vec![(paths.base_dir().to_path_buf(), paths.libraryfolders_path())];
        match manifest_paths(library) {
            Ok(manifests) => {
                files.extend(manifests.into_iter().map(|m| (library.path.clone(), m)));
            }
            Err(e) => tracing::warn!("could not list app manifests: {e}"),
        }
        self.dump_text_files(files);
    }

    /// Missing files are skipped, unreadable ones logged and skipped.
    fn dump_text_files(&self, files: Vec<(PathBuf, PathBuf)>) {
        for (base, file) in files {
            if !file.exists() {
                continue;
            }
            let result = text::load(&file)
                .map_err(anyhow::Error::from)
                .and_then(|vdf| self.dump(&base, &file, &vdf));
            if let Err(e) = result {
                tracing::warn!(path = %file.display(), "could not dump vdf: {e:#}");
            }
        }
    }

    /// Dumps one user's `shortcuts.vdf` if present.
    pub fn dump_shortcuts(&self, library: &Library, store: &ShortcutStore) {
        let result = store
            .load_vdf()
            .map_err(anyhow::Error::from)
            .and_then(|vdf| match vdf {
                Some(vdf) => self.dump(&library.steam_root, store.path(), &vdf).map(Some),
                None => Ok(None),
            });
        if let Err(e) = result {
            tracing::warn!(path = %store.path().display(), "could not dump vdf: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use steam_vdf_steam::Object;

    use super::*;

    #[test]
    fn dump_mirrors_relative_path() {
        let tmp = tempfile::tempdir().unwrap();
        let dumper = Dumper::new(tmp.path().join("out"));

        let mut root = Object::new();
        root.push("AccountName", "testuser");
        let vdf = Vdf::new("users", root);

        let target = dumper
            .dump(
                Path::new("/steam"),
                Path::new("/steam/config/loginusers.vdf"),
                &vdf,
            )
            .unwrap();
        assert_eq!(target, tmp.path().join("out/config/loginusers.vdf.json"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(json["users"]["AccountName"], "testuser");
    }

    #[test]
    fn dump_outside_base_uses_file_name() {
        let tmp = tempfile::tempdir().unwrap();
        let dumper = Dumper::new(tmp.path());
        let vdf = Vdf::new("AppState", Object::new());

        let target = dumper
            .dump(
                Path::new("/steam"),
                Path::new("/mnt/games/steamapps/appmanifest_620.acf"),
                &vdf,
            )
            .unwrap();
        assert_eq!(target, tmp.path().join("appmanifest_620.acf.json"));
    }
}
