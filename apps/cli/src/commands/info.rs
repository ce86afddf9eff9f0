//! `info`: Steam installation, users and installed games.

use std::io::{BufRead, Write};

use steam_vdf_steam::users::get_users_with_accounts;
use steam_vdf_steam::{Library, ShortcutStore, SteamError, UserIndex, installed_apps, load_accounts};
use steam_vdf_storage::format_size;

use super::{Context, storage, user_label};
use crate::console::Console;

pub fn run<R: BufRead, W: Write>(
    ctx: &Context,
    library: &Library,
    analyze_storage: bool,
    console: &mut Console<R, W>,
) -> anyhow::Result<()> {
    let paths = library.steam_paths();
    if let Some(dumper) = &ctx.dumper {
        dumper.dump_library(library);
    }

    let out = console.out();
    writeln!(out, "Steam installation: {}", paths.base_dir().display())?;
    write!(out, "Library: {}", library.path.display())?;
    if !library.label.is_empty() {
        write!(out, " ({})", library.label)?;
    }
    writeln!(out)?;
    if let Some(total) = library.total_size {
        writeln!(out, "Library size: {}", format_size(total))?;
    }

    let accounts = load_accounts(&paths).unwrap_or_else(|e| {
        tracing::warn!("could not read steam accounts: {e}");
        Vec::new()
    });
    let index = UserIndex::from_accounts(&accounts);
    for (key, record) in index.entries() {
        tracing::debug!(key, ?record, "user index entry");
    }

    writeln!(out, "\nUsers:")?;
    match get_users_with_accounts(&paths, &accounts) {
        Ok(users) if users.is_empty() => writeln!(out, "  No users found")?,
        Ok(users) => {
            for user in &users {
                let store = ShortcutStore::for_user(&paths, &user.id);
                if let Some(dumper) = &ctx.dumper {
                    dumper.dump_shortcuts(library, &store);
                }
                let shortcuts = match store.load() {
                    Ok(list) => list.len().to_string(),
                    Err(e) => {
                        tracing::warn!(user = %user.id, "could not read shortcuts: {e}");
                        "?".into()
                    }
                };
                let steam64 = user
                    .steam_id()
                    .map(|id| id.to_string())
                    .unwrap_or_default();
                writeln!(
                    out,
                    "  {}  Steam64: {}  Shortcuts: {}",
                    user_label(user),
                    steam64,
                    shortcuts
                )?;
            }
        }
        Err(SteamError::NoUserData(dir)) => writeln!(out, "  No userdata directory at {dir}")?,
        Err(e) => return Err(e.into()),
    }

    let mut apps = installed_apps(library).unwrap_or_else(|e| {
        tracing::warn!("could not list installed apps: {e}");
        Vec::new()
    });
    apps.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    writeln!(out, "\nInstalled games ({}):", apps.len())?;
    for app in &apps {
        writeln!(
            out,
            "  {} (ID: {})  {}",
            app.name,
            app.app_id,
            format_size(app.size_on_disk)
        )?;
    }

    if analyze_storage {
        storage::analyze(out, library, &apps)?;
    }

    Ok(())
}
