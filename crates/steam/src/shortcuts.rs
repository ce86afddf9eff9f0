//! Non-Steam game shortcuts (`userdata/<id>/config/shortcuts.vdf`).

use std::fs;
use std::path::{Path, PathBuf};

use crc32fast::Hasher;
use serde::Serialize;

use crate::SteamError;
use crate::paths::{Paths, artwork_stems};
use crate::vdf::{Object, Value, Vdf, binary};

/// Root key of `shortcuts.vdf`.
const ROOT_KEY: &str = "shortcuts";

/// Artwork file extensions Steam accepts in the grid directory.
const ARTWORK_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "ico"];

/// One shortcut entry.
///
/// Keys this type does not model are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortcut {
    pub app_id: u32,
    pub app_name: String,
    /// Executable, stored quoted.
    pub exe: String,
    /// Working directory, stored quoted.
    pub start_dir: String,
    pub icon: String,
    pub shortcut_path: String,
    pub launch_options: String,
    pub is_hidden: bool,
    pub allow_desktop_config: bool,
    pub allow_overlay: bool,
    pub open_vr: bool,
    pub devkit: bool,
    pub devkit_game_id: String,
    pub devkit_override_app_id: u32,
    pub last_play_time: u32,
    pub flatpak_app_id: String,
    pub tags: Vec<String>,
    #[serde(skip)]
    pub extra: Object,
}

impl Default for Shortcut {
    fn default() -> Self {
        Self {
            app_id: 0,
            app_name: String::new(),
            exe: String::new(),
            start_dir: String::new(),
            icon: String::new(),
            shortcut_path: String::new(),
            launch_options: String::new(),
            is_hidden: false,
            allow_desktop_config: true,
            allow_overlay: true,
            open_vr: false,
            devkit: false,
            devkit_game_id: String::new(),
            devkit_override_app_id: 0,
            last_play_time: 0,
            flatpak_app_id: String::new(),
            tags: Vec::new(),
            extra: Object::new(),
        }
    }
}

impl Shortcut {
    /// Reads a shortcut from its VDF entry. Keys match case-insensitively.
    pub fn from_object(obj: &Object) -> Self {
        let mut sc = Shortcut {
            allow_desktop_config: false,
            allow_overlay: false,
            ..Shortcut::default()
        };

        let text = |v: &Value| v.as_str().unwrap_or_default().to_owned();
        let flag = |v: &Value| v.as_bool().unwrap_or(false);
        let int = |v: &Value| v.as_u32_bits().unwrap_or(0);

        for (key, value) in obj.iter() {
            match key.to_ascii_lowercase().as_str() {
                "appid" => sc.app_id = int(value),
                "appname" => sc.app_name = text(value),
                "exe" => sc.exe = text(value),
                "startdir" => sc.start_dir = text(value),
                "icon" => sc.icon = text(value),
                "shortcutpath" => sc.shortcut_path = text(value),
                "launchoptions" => sc.launch_options = text(value),
                "ishidden" => sc.is_hidden = flag(value),
                "allowdesktopconfig" => sc.allow_desktop_config = flag(value),
                "allowoverlay" => sc.allow_overlay = flag(value),
                "openvr" => sc.open_vr = flag(value),
                "devkit" => sc.devkit = flag(value),
                "devkitgameid" => sc.devkit_game_id = text(value),
                "devkitoverrideappid" => sc.devkit_override_app_id = int(value),
                "lastplaytime" => sc.last_play_time = int(value),
                "flatpakappid" => sc.flatpak_app_id = text(value),
                "tags" => {
                    sc.tags = value
                        .as_obj()
                        .map(|tags| {
                            tags.iter()
                                .filter_map(|(_, v)| v.as_str().map(str::to_owned))
                                .collect()
                        })
                        .unwrap_or_default();
                }
                _ => sc.extra.push(key, value.clone()),
            }
        }

        sc
    }

    /// Builds the VDF entry in the key order Steam writes.
    pub fn to_object(&self) -> Object {
        let mut obj = Object::new();
        obj.push("appid", Value::Int32(self.app_id as i32));
        obj.push("AppName", self.app_name.as_str());
        obj.push("Exe", self.exe.as_str());
        obj.push("StartDir", self.start_dir.as_str());
        obj.push("icon", self.icon.as_str());
        obj.push("ShortcutPath", self.shortcut_path.as_str());
        obj.push("LaunchOptions", self.launch_options.as_str());
        obj.push("IsHidden", flag_value(self.is_hidden));
        obj.push("AllowDesktopConfig", flag_value(self.allow_desktop_config));
        obj.push("AllowOverlay", flag_value(self.allow_overlay));
        obj.push("OpenVR", flag_value(self.open_vr));
        obj.push("Devkit", flag_value(self.devkit));
        obj.push("DevkitGameID", self.devkit_game_id.as_str());
        obj.push(
            "DevkitOverrideAppID",
            Value::Int32(self.devkit_override_app_id as i32),
        );
        obj.push("LastPlayTime", Value::Int32(self.last_play_time as i32));
        obj.push("FlatpakAppID", self.flatpak_app_id.as_str());

        let mut tags = Object::new();
        for (i, tag) in self.tags.iter().enumerate() {
            tags.push(i.to_string(), tag.as_str());
        }
        obj.push("tags", tags);

        for (key, value) in self.extra.iter() {
            obj.push(key, value.clone());
        }
        obj
    }
}

fn flag_value(v: bool) -> Value {
    Value::Int32(i32::from(v))
}

/// Input for a new shortcut. Paths are given unquoted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewShortcut {
    pub name: String,
    pub exe: String,
    /// Defaults to the executable's parent directory.
    pub start_dir: Option<String>,
    pub launch_options: String,
    pub tags: Vec<String>,
}

impl NewShortcut {
    pub fn into_shortcut(self) -> Shortcut {
        let exe = display_path(&self.exe).to_owned();
        let start_dir = self
            .start_dir
            .map(|d| display_path(&d).to_owned())
            .unwrap_or_else(|| {
                Path::new(&exe)
                    .parent()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });

        let exe = quote(&exe);
        Shortcut {
            app_id: generate_app_id(&exe, &self.name),
            app_name: self.name,
            exe,
            start_dir: quote(&start_dir),
            launch_options: self.launch_options,
            tags: self.tags,
            ..Shortcut::default()
        }
    }
}

/// How to pick a shortcut for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutSelector {
    /// First entry with this app ID.
    AppId(u32),
    /// First entry with this exact name, ignoring case.
    Name(String),
    /// Position in the list [`ShortcutStore::load`] returns.
    Index(usize),
}

impl ShortcutSelector {
    /// Position of the selected shortcut in `shortcuts`.
    pub fn position(&self, shortcuts: &[Shortcut]) -> Option<usize> {
        match self {
            ShortcutSelector::AppId(id) => shortcuts.iter().position(|sc| sc.app_id == *id),
            ShortcutSelector::Name(name) => shortcuts
                .iter()
                .position(|sc| sc.app_name.eq_ignore_ascii_case(name)),
            ShortcutSelector::Index(i) => (*i < shortcuts.len()).then_some(*i),
        }
    }
}

impl std::fmt::Display for ShortcutSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShortcutSelector::AppId(id) => write!(f, "appid {id}"),
            ShortcutSelector::Name(name) => write!(f, "'{name}'"),
            ShortcutSelector::Index(i) => write!(f, "entry #{i}"),
        }
    }
}

/// Raw entries of a `shortcuts.vdf`, kept as read so a rewrite only
/// touches the entries that changed.
struct Entries {
    root_key: String,
    values: Vec<Value>,
}

impl Entries {
    fn empty() -> Self {
        Self {
            root_key: ROOT_KEY.to_owned(),
            values: Vec::new(),
        }
    }

    /// Typed shortcuts, each with the index of the raw value it came from.
    fn shortcuts(&self) -> (Vec<Shortcut>, Vec<usize>) {
        let mut shortcuts = Vec::new();
        let mut origins = Vec::new();
        for (i, value) in self.values.iter().enumerate() {
            match value.as_obj() {
                Some(obj) => {
                    shortcuts.push(Shortcut::from_object(obj));
                    origins.push(i);
                }
                None => tracing::warn!(index = i, "ignoring non-object shortcuts entry"),
            }
        }
        (shortcuts, origins)
    }

    /// Re-indexes the entries from 0.
    fn into_vdf(self) -> Vdf {
        let root = self
            .values
            .into_iter()
            .enumerate()
            .map(|(i, value)| (i.to_string(), value))
            .collect();
        Vdf::new(self.root_key, root)
    }
}

/// Reads and writes one user's `shortcuts.vdf`.
#[derive(Debug, Clone)]
pub struct ShortcutStore {
    path: PathBuf,
    grid_dir: PathBuf,
}

impl ShortcutStore {
    pub fn for_user(paths: &Paths, user_id: &str) -> Self {
        Self {
            path: paths.shortcuts_path(user_id),
            grid_dir: paths.grid_dir(user_id),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads the raw VDF tree, `None` if the file does not exist.
    pub fn load_vdf(&self) -> Result<Option<Vdf>, SteamError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let vdf = binary::load(&self.path)?;
        if !vdf.key.eq_ignore_ascii_case(ROOT_KEY) {
            return Err(SteamError::Vdf(format!(
                "expected root key '{ROOT_KEY}', got '{}'",
                vdf.key
            )));
        }
        Ok(Some(vdf))
    }

    fn load_entries(&self) -> Result<Entries, SteamError> {
        let Some(vdf) = self.load_vdf()? else {
            tracing::debug!(path = %self.path.display(), "no shortcuts file");
            return Ok(Entries::empty());
        };
        Ok(Entries {
            root_key: vdf.key,
            values: vdf.root.into_iter().map(|(_, value)| value).collect(),
        })
    }

    /// Returns all shortcuts; a missing file means none.
    pub fn load(&self) -> Result<Vec<Shortcut>, SteamError> {
        Ok(self.load_entries()?.shortcuts().0)
    }

    /// Writes the entries, re-indexed from 0. The previous file is kept
    /// as `shortcuts.vdf.bak`.
    fn save(&self, entries: Entries) -> Result<(), SteamError> {
        let count = entries.values.len();
        let data = binary::write(&entries.into_vdf());

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                SteamError::Io(format!("failed to create {}: {e}", dir.display()))
            })?;
        }

        if self.path.exists() {
            let backup = self.path.with_extension("vdf.bak");
            fs::copy(&self.path, &backup)
                .map_err(|e| SteamError::Io(format!("failed to back up shortcuts: {e}")))?;
            tracing::debug!(path = %backup.display(), "backed up shortcuts");
        }

        let tmp = self.path.with_extension("vdf.tmp");
        fs::write(&tmp, &data)
            .map_err(|e| SteamError::Io(format!("failed to write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            SteamError::Io(format!("failed to replace {}: {e}", self.path.display()))
        })?;

        tracing::info!(path = %self.path.display(), count, "wrote shortcuts");
        Ok(())
    }

    /// Appends a shortcut. Fails if one with the same app ID exists.
    pub fn add(&self, new: NewShortcut) -> Result<Shortcut, SteamError> {
        let mut entries = self.load_entries()?;
        let sc = new.into_shortcut();

        if entries.shortcuts().0.iter().any(|s| s.app_id == sc.app_id) {
            return Err(SteamError::DuplicateShortcut {
                name: sc.app_name,
                app_id: sc.app_id,
            });
        }

        entries.values.push(Value::Obj(sc.to_object()));
        self.save(entries)?;
        tracing::info!(name = %sc.app_name, app_id = sc.app_id, "added shortcut");
        Ok(sc)
    }

    /// Removes the selected shortcut and its grid artwork. The other
    /// entries are written back exactly as they were read.
    pub fn delete(&self, selector: &ShortcutSelector) -> Result<Shortcut, SteamError> {
        let mut entries = self.load_entries()?;
        let (mut shortcuts, origins) = entries.shortcuts();
        let idx = selector
            .position(&shortcuts)
            .ok_or_else(|| SteamError::ShortcutNotFound(selector.to_string()))?;

        entries.values.remove(origins[idx]);
        self.save(entries)?;
        let removed = shortcuts.swap_remove(idx);

        // The entry is already written out; artwork errors only warn.
        let artwork = match self.delete_artwork(removed.app_id) {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(app_id = removed.app_id, "could not remove artwork: {e}");
                0
            }
        };
        tracing::info!(
            name = %removed.app_name,
            app_id = removed.app_id,
            artwork,
            "deleted shortcut"
        );
        Ok(removed)
    }

    /// Finds existing artwork files for an app ID.
    pub fn find_artwork(&self, app_id: u32) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for stem in artwork_stems(app_id) {
            for ext in ARTWORK_EXTENSIONS {
                let path = self.grid_dir.join(format!("{stem}.{ext}"));
                if path.exists() {
                    found.push(path);
                    break;
                }
            }
        }
        found
    }

    /// Removes all artwork for an app ID, returning how many files went.
    fn delete_artwork(&self, app_id: u32) -> Result<usize, SteamError> {
        let existing = self.find_artwork(app_id);
        for path in &existing {
            if let Err(e) = fs::remove_file(path)
                && e.kind() != std::io::ErrorKind::NotFound
            {
                return Err(SteamError::Io(format!(
                    "failed to remove {}: {e}",
                    path.display()
                )));
            }
        }
        Ok(existing.len())
    }
}

/// Generates a Steam shortcut app ID from executable path and name.
///
/// Matches Steam's algorithm: `CRC32(exe + name) | 0x80000000 | 0x02000000`.
pub fn generate_app_id(exe: &str, name: &str) -> u32 {
    let key = format!("{exe}{name}");
    let mut hasher = Hasher::new();
    hasher.update(key.as_bytes());
    let crc = hasher.finalize();
    (crc | 0x80000000) | 0x02000000
}

/// Strips the quotes Steam wraps paths in.
pub fn display_path(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s)
}

fn quote(s: &str) -> String {
    if s.is_empty() {
        String::new()
    } else {
        format!("\"{s}\"")
    }
}
