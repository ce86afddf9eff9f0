//! Subcommand implementations.

pub mod info;
pub mod restart;
pub mod shortcuts;
pub mod storage;

#[cfg(test)]
pub(crate) mod fixture;

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Context as _;
use steam_vdf_steam::users::{find_user, preferred_user};
use steam_vdf_steam::{Library, SteamError, User};

use crate::console::Console;
use crate::dump::Dumper;

/// Settings shared by all commands.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Skip confirmation prompts.
    pub yes: bool,
    /// Set when `--dump-vdfs` is active.
    pub dumper: Option<Dumper>,
}

/// Picks the library to operate on: the one matching `wanted`, the only
/// one found, or the user's choice from a numbered list.
pub fn select_library<R: BufRead, W: Write>(
    mut libraries: Vec<Library>,
    wanted: Option<&Path>,
    console: &mut Console<R, W>,
) -> anyhow::Result<Library> {
    if let Some(wanted) = wanted {
        let canonical = std::fs::canonicalize(wanted).unwrap_or_else(|_| wanted.to_path_buf());
        return libraries
            .into_iter()
            .find(|lib| lib.path == canonical)
            .with_context(|| format!("not a known steam library: {}", wanted.display()));
    }

    match libraries.len() {
        0 => Err(SteamError::NoLibraries.into()),
        1 => Ok(libraries.remove(0)),
        _ => {
            let labels: Vec<String> = libraries.iter().map(library_label).collect();
            let index = console
                .choose("Steam libraries:", &labels)?
                .context("no library selected")?;
            Ok(libraries.swap_remove(index))
        }
    }
}

fn library_label(library: &Library) -> String {
    if library.label.is_empty() {
        library.path.display().to_string()
    } else {
        format!("{} ({})", library.path.display(), library.label)
    }
}

/// Picks a user: the one matching `wanted`, the only one, or the user's
/// choice. The most recently logged-in account is marked in the list.
pub fn select_user<'a, R: BufRead, W: Write>(
    users: &'a [User],
    wanted: Option<&str>,
    console: &mut Console<R, W>,
) -> anyhow::Result<&'a User> {
    if let Some(key) = wanted {
        return Ok(find_user(users, key)?);
    }

    match users {
        [] => anyhow::bail!("no steam users found"),
        [only] => Ok(only),
        _ => {
            let preferred = preferred_user(users).map(|u| u.id.as_str());
            let labels: Vec<String> = users
                .iter()
                .map(|u| {
                    let label = user_label(u);
                    if Some(u.id.as_str()) == preferred {
                        format!("{label} *")
                    } else {
                        label
                    }
                })
                .collect();
            let index = console
                .choose("Steam users:", &labels)?
                .context("no user selected")?;
            Ok(&users[index])
        }
    }
}

/// `Persona (account) [id]`, or just the ID when the account is unknown.
pub fn user_label(user: &User) -> String {
    match &user.account {
        Some(account) if !account.account_name.is_empty() => format!(
            "{} ({}) [{}]",
            user.display_name(),
            account.account_name,
            user.id
        ),
        _ => format!("{} [{}]", user.display_name(), user.id),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use steam_vdf_steam::find_libraries;
    use steam_vdf_steam::users::get_users;

    use super::fixture::SteamFixture;
    use super::*;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn single_library_is_selected_without_prompt() {
        let fx = SteamFixture::new();
        let libraries = find_libraries(&[fx.root()]);
        let mut c = console("");
        let lib = select_library(libraries, None, &mut c).unwrap();
        assert_eq!(lib.path, fx.root());
        assert!(c.into_output().is_empty());
    }

    #[test]
    fn library_prompt_and_flag() {
        let fx = SteamFixture::new();
        let extra = fx.add_library("games");

        let libraries = find_libraries(&[fx.root()]);
        assert_eq!(libraries.len(), 2);

        let mut c = console("2\n");
        let lib = select_library(libraries.clone(), None, &mut c).unwrap();
        assert_eq!(lib.path, extra);

        let mut c = console("");
        let lib = select_library(libraries.clone(), Some(&extra), &mut c).unwrap();
        assert_eq!(lib.path, extra);

        let mut c = console("");
        assert!(select_library(libraries.clone(), None, &mut c).is_err());
        assert!(select_library(libraries, Some(Path::new("/nowhere")), &mut c).is_err());
    }

    #[test]
    fn no_libraries_is_an_error() {
        let mut c = console("");
        let err = select_library(Vec::new(), None, &mut c).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SteamError>(),
            Some(SteamError::NoLibraries)
        ));
    }

    #[test]
    fn user_selection() {
        let fx = SteamFixture::new();
        let users = get_users(&fx.paths()).unwrap();
        assert_eq!(users.len(), 2);

        let mut c = console("");
        assert_eq!(select_user(&users, Some("testuser"), &mut c).unwrap().id, "22202");
        assert!(select_user(&users, Some("nobody"), &mut c).is_err());

        let mut c = console("2\n");
        assert_eq!(select_user(&users, None, &mut c).unwrap().id, "33303");
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("1. Test User (testuser) [22202] *"));
        assert!(out.contains("2. 33303 [33303]"));
    }
}
