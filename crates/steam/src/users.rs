//! Steam accounts and their `userdata/` directories.

use std::fs;

use serde::Serialize;

use crate::SteamError;
use crate::ids::SteamId;
use crate::paths::Paths;
use crate::vdf::{Value, Vdf, text};

/// Key path of the account table in `config/config.vdf`.
const CONFIG_ACCOUNTS_PATH: &[&str] = &["Software", "Valve", "Steam", "Accounts"];

/// A Steam account known to this installation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_name: String,
    pub persona_name: String,
    pub steam_id: Option<SteamId>,
    pub most_recent: bool,
    pub timestamp: Option<u64>,
}

/// Reads accounts from `loginusers.vdf` and `config.vdf`. Missing files
/// contribute nothing; malformed files are errors.
pub fn load_accounts(paths: &Paths) -> Result<Vec<Account>, SteamError> {
    let loginusers = load_optional(&paths.loginusers_path())?;
    let config = load_optional(&paths.config_vdf_path())?;
    Ok(accounts_from_vdfs(loginusers.as_ref(), config.as_ref()))
}

fn load_optional(path: &std::path::Path) -> Result<Option<Vdf>, SteamError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "file not found, skipping");
        return Ok(None);
    }
    text::load(path).map(Some)
}

/// Merges the two account sources. `loginusers.vdf` entries come first;
/// accounts only listed in `config.vdf` are appended.
pub fn accounts_from_vdfs(loginusers: Option<&Vdf>, config: Option<&Vdf>) -> Vec<Account> {
    let mut accounts = Vec::new();

    if let Some(vdf) = loginusers {
        for (key, value) in vdf.root.iter() {
            let Some(entry) = value.as_obj() else {
                continue;
            };
            let Ok(steam64) = key.parse::<u64>() else {
                tracing::warn!(key, "ignoring non-numeric loginusers entry");
                continue;
            };
            accounts.push(Account {
                account_name: entry.get_str_ci("AccountName").unwrap_or_default().to_owned(),
                persona_name: entry.get_str_ci("PersonaName").unwrap_or_default().to_owned(),
                steam_id: Some(SteamId::from_steam64(steam64)),
                most_recent: entry
                    .get_ci("MostRecent")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                timestamp: entry.get_ci("Timestamp").and_then(Value::as_u64),
            });
        }
    }

    let config_accounts = config.and_then(|vdf| vdf.root.get_path_ci(CONFIG_ACCOUNTS_PATH));
    if let Some(table) = config_accounts.and_then(Value::as_obj) {
        for (name, value) in table.iter() {
            let entry = value.as_obj();
            let steam_id = entry
                .and_then(|e| e.get_ci("SteamID"))
                .and_then(Value::as_u64)
                .map(SteamId::from_steam64);

            if let Some(existing) = accounts
                .iter_mut()
                .find(|a| a.account_name.eq_ignore_ascii_case(name))
            {
                if existing.steam_id.is_none() {
                    existing.steam_id = steam_id;
                }
                continue;
            }

            accounts.push(Account {
                account_name: name.to_owned(),
                persona_name: entry
                    .and_then(|e| e.get_str_ci("PersonaName"))
                    .unwrap_or_default()
                    .to_owned(),
                steam_id,
                most_recent: false,
                timestamp: None,
            });
        }
    }

    accounts
}

/// One view of an account inside a [`UserIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserRecord {
    pub persona_name: String,
    pub account_name: String,
    #[serde(rename = "Steam32ID", skip_serializing_if = "Option::is_none")]
    pub steam32: Option<String>,
    #[serde(rename = "Steam64ID")]
    pub steam64: Option<String>,
}

/// Lookup table from any account key (Steam64, Steam32 or account name)
/// to the account's names and IDs.
///
/// Steam64 keys carry the Steam32 form, Steam32 keys carry the Steam64
/// form, account-name keys carry the Steam64 form when known.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserIndex {
    entries: Vec<(String, UserRecord)>,
}

impl UserIndex {
    pub fn from_accounts(accounts: &[Account]) -> Self {
        let mut index = Self::default();

        for a in accounts {
            let Some(id) = a.steam_id else { continue };
            let Ok(steam32) = id.steam32() else {
                tracing::warn!(steam_id = %id, "steam id outside the individual account range");
                continue;
            };
            index.insert(
                id.to_string(),
                UserRecord {
                    persona_name: a.persona_name.clone(),
                    account_name: a.account_name.clone(),
                    steam32: Some(steam32.to_string()),
                    steam64: None,
                },
            );
        }

        for a in accounts {
            let Some(id) = a.steam_id else { continue };
            let Ok(steam32) = id.steam32() else { continue };
            index.insert(
                steam32.to_string(),
                UserRecord {
                    persona_name: a.persona_name.clone(),
                    account_name: a.account_name.clone(),
                    steam32: None,
                    steam64: Some(id.to_string()),
                },
            );
        }

        for a in accounts.iter().filter(|a| !a.account_name.is_empty()) {
            index.insert(
                a.account_name.clone(),
                UserRecord {
                    persona_name: a.persona_name.clone(),
                    account_name: a.account_name.clone(),
                    steam32: None,
                    steam64: a.steam_id.map(|id| id.to_string()),
                },
            );
        }

        index
    }

    fn insert(&mut self, key: String, record: UserRecord) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = record,
            None => self.entries.push((key, record)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&UserRecord> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &UserRecord)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for UserIndex {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, record) in &self.entries {
            map.serialize_entry(key, record)?;
        }
        map.end()
    }
}

/// A Steam user with a `userdata/` directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Steam32 account ID (the directory name).
    pub id: String,
    pub has_shortcuts: bool,
    pub account: Option<Account>,
}

impl User {
    /// Persona name when known, otherwise the account ID.
    pub fn display_name(&self) -> &str {
        self.account
            .as_ref()
            .map(|a| a.persona_name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.id)
    }

    pub fn steam_id(&self) -> Option<SteamId> {
        self.id.parse::<u32>().ok().map(SteamId::from_steam32)
    }
}

/// Lists user directories, joined with their accounts where known.
///
/// Errors with [`SteamError::NoUserData`] when `userdata/` is missing.
pub fn get_users(paths: &Paths) -> Result<Vec<User>, SteamError> {
    let accounts = load_accounts(paths).unwrap_or_else(|e| {
        tracing::warn!("could not read steam accounts: {e}");
        Vec::new()
    });
    get_users_with_accounts(paths, &accounts)
}

/// Lists user directories using an already loaded account list.
pub fn get_users_with_accounts(
    paths: &Paths,
    accounts: &[Account],
) -> Result<Vec<User>, SteamError> {
    let user_data_dir = paths.user_data_dir();

    let entries = fs::read_dir(&user_data_dir).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SteamError::NoUserData(user_data_dir.display().to_string())
        } else {
            SteamError::Io(e.to_string())
        }
    })?;

    let mut users = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SteamError::Io(e.to_string()))?;

        if !entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy();

        // Verify it's a numeric account ID
        let Ok(steam32) = name.parse::<u32>() else {
            continue;
        };

        // "0" is a placeholder directory, not an account
        if steam32 == 0 {
            continue;
        }

        let steam_id = SteamId::from_steam32(steam32);
        let account = accounts
            .iter()
            .find(|a| a.steam_id == Some(steam_id))
            .cloned();

        users.push(User {
            has_shortcuts: paths.has_shortcuts(&name),
            id: name.into_owned(),
            account,
        });
    }

    users.sort_by_key(|u| u.id.parse::<u32>().unwrap_or(u32::MAX));
    Ok(users)
}

/// Finds a user by Steam32, Steam64 or account name.
pub fn find_user<'a>(users: &'a [User], key: &str) -> Result<&'a User, SteamError> {
    let by_id = key
        .parse::<SteamId>()
        .ok()
        .and_then(|id| users.iter().find(|u| u.steam_id() == Some(id)));

    by_id
        .or_else(|| {
            users.iter().find(|u| {
                u.account
                    .as_ref()
                    .is_some_and(|a| a.account_name.eq_ignore_ascii_case(key))
            })
        })
        .ok_or_else(|| SteamError::UserNotFound(key.to_owned()))
}

/// Returns the most recently logged-in user, else the first user with
/// shortcuts, else the first user.
pub fn preferred_user(users: &[User]) -> Option<&User> {
    users
        .iter()
        .find(|u| u.account.as_ref().is_some_and(|a| a.most_recent))
        .or_else(|| users.iter().find(|u| u.has_shortcuts))
        .or_else(|| users.first())
}
