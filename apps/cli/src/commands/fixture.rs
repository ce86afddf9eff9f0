//! Throwaway Steam installations for command tests.

use std::fs;
use std::path::PathBuf;

use steam_vdf_steam::{Library, Paths, find_libraries};

const LOGINUSERS: &str = r#""users"
{
    "76561197960287930"
    {
        "AccountName"   "testuser"
        "PersonaName"   "Test User"
        "MostRecent"    "1"
        "Timestamp"     "1700000000"
    }
}
"#;

const PORTAL2_MANIFEST: &str = r#""AppState"
{
    "appid"         "620"
    "name"          "Portal 2"
    "installdir"    "Portal 2"
    "SizeOnDisk"    "12938219383"
    "StateFlags"    "4"
}
"#;

const HALF_LIFE_MANIFEST: &str = r#""AppState"
{
    "appid"         "70"
    "name"          "Half-Life"
    "installdir"    "Half-Life"
    "SizeOnDisk"    "500000000"
}
"#;

/// A Steam root with two users (`22202` known as `testuser`, `33303`
/// unknown) and two installed apps.
pub struct SteamFixture {
    dir: tempfile::TempDir,
}

impl SteamFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("Steam");

        fs::create_dir_all(root.join("config")).unwrap();
        fs::write(root.join("config").join("loginusers.vdf"), LOGINUSERS).unwrap();

        let steamapps = root.join("steamapps");
        fs::create_dir_all(steamapps.join("common")).unwrap();
        fs::write(steamapps.join("appmanifest_620.acf"), PORTAL2_MANIFEST).unwrap();
        fs::write(steamapps.join("appmanifest_70.acf"), HALF_LIFE_MANIFEST).unwrap();

        for id in ["22202", "33303"] {
            fs::create_dir_all(root.join("userdata").join(id).join("config")).unwrap();
        }

        Self { dir }
    }

    /// Canonical Steam root.
    pub fn root(&self) -> PathBuf {
        fs::canonicalize(self.dir.path().join("Steam")).unwrap()
    }

    /// Directory holding the Steam root.
    pub fn parent(&self) -> PathBuf {
        fs::canonicalize(self.dir.path()).unwrap()
    }

    pub fn paths(&self) -> Paths {
        Paths::with_base(self.root())
    }

    pub fn library(&self) -> Library {
        find_libraries(&[self.root()]).remove(0)
    }

    /// Registers a second library folder next to the root and returns its
    /// canonical path.
    pub fn add_library(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::create_dir_all(path.join("steamapps")).unwrap();
        let path = fs::canonicalize(path).unwrap();

        let vdf = format!(
            "\"libraryfolders\"\n{{\n    \"0\"\n    {{\n        \"path\" \"{}\"\n        \"label\" \"\"\n    }}\n    \"1\"\n    {{\n        \"path\" \"{}\"\n        \"label\" \"Games\"\n    }}\n}}\n",
            self.root().display(),
            path.display()
        );
        fs::write(self.root().join("steamapps").join("libraryfolders.vdf"), vdf).unwrap();
        path
    }

    /// Creates an executable-looking file and returns its path.
    pub fn exe(&self, name: &str) -> PathBuf {
        let dir = self.dir.path().join("Games");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, b"#!/bin/sh\n").unwrap();
        fs::canonicalize(path).unwrap()
    }
}
