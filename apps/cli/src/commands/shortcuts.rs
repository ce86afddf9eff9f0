//! `list-shortcuts`, `add-shortcut` and `delete-shortcut`.

use std::io::{BufRead, Write};

use anyhow::Context as _;
use steam_vdf_steam::shortcuts::display_path;
use steam_vdf_steam::users::find_user;
use steam_vdf_steam::{
    Library, NewShortcut, Shortcut, ShortcutSelector, ShortcutStore, SteamError, get_users,
};

use super::{Context, select_user, user_label};
use crate::cli::{AddShortcutArgs, DeleteShortcutArgs};
use crate::config::expand_home;
use crate::console::Console;

/// Prints the shortcuts of every user, or only of `user`.
pub fn list<R: BufRead, W: Write>(
    ctx: &Context,
    library: &Library,
    user: Option<&str>,
    console: &mut Console<R, W>,
) -> anyhow::Result<()> {
    let paths = library.steam_paths();
    let users = get_users(&paths)?;
    if let Some(dumper) = &ctx.dumper {
        dumper.dump_users(library);
    }
    let selected: Vec<_> = match user {
        Some(key) => vec![find_user(&users, key)?],
        None => users.iter().collect(),
    };

    let out = console.out();
    if selected.is_empty() {
        writeln!(out, "No Steam users found")?;
        return Ok(());
    }

    for user in selected {
        let store = ShortcutStore::for_user(&paths, &user.id);
        writeln!(out, "\nUser: {}", user_label(user))?;

        if !store.exists() {
            writeln!(out, "  No shortcuts.vdf found")?;
            continue;
        }
        if let Some(dumper) = &ctx.dumper {
            dumper.dump_shortcuts(library, &store);
        }

        let shortcuts = match store.load() {
            Ok(shortcuts) => shortcuts,
            Err(e) => {
                tracing::error!(path = %store.path().display(), "could not read shortcuts: {e}");
                writeln!(out, "  Could not read {}", store.path().display())?;
                continue;
            }
        };

        if shortcuts.is_empty() {
            writeln!(out, "  No shortcuts")?;
        }
        for (i, sc) in shortcuts.iter().enumerate() {
            write_shortcut(out, i, sc)?;
        }
    }

    Ok(())
}

fn write_shortcut(out: &mut impl Write, index: usize, sc: &Shortcut) -> std::io::Result<()> {
    writeln!(out, "  [{index}] {}", sc.app_name)?;
    writeln!(out, "      App ID: {}", sc.app_id)?;
    writeln!(out, "      Exe: {}", display_path(&sc.exe))?;
    writeln!(out, "      Start dir: {}", display_path(&sc.start_dir))?;
    if !sc.launch_options.is_empty() {
        writeln!(out, "      Launch options: {}", sc.launch_options)?;
    }
    if !sc.tags.is_empty() {
        writeln!(out, "      Tags: {}", sc.tags.join(", "))?;
    }
    if sc.is_hidden {
        writeln!(out, "      Hidden")?;
    }
    Ok(())
}

/// Adds a shortcut, prompting for whatever the arguments leave out.
pub fn add<R: BufRead, W: Write>(
    ctx: &Context,
    library: &Library,
    args: AddShortcutArgs,
    console: &mut Console<R, W>,
) -> anyhow::Result<Shortcut> {
    let paths = library.steam_paths();
    let users = get_users(&paths)?;
    if let Some(dumper) = &ctx.dumper {
        dumper.dump_users(library);
    }
    let user = select_user(&users, args.user.as_deref(), console)?;

    let name = match args.name {
        Some(name) if !name.trim().is_empty() => name.trim().to_owned(),
        _ => console
            .ask_required("Enter the name for the shortcut: ")?
            .context("no shortcut name given")?,
    };
    let exe = match args.exe {
        Some(exe) if !exe.trim().is_empty() => exe,
        _ => console
            .ask_required("Enter the path to the executable: ")?
            .context("no executable given")?,
    };

    let exe = expand_home(display_path(exe.trim()));
    if !exe.is_file() {
        anyhow::bail!("executable not found: {}", exe.display());
    }
    let exe = std::path::absolute(&exe)
        .with_context(|| format!("resolving {}", exe.display()))?;
    let start_dir = args
        .start_dir
        .map(|dir| expand_home(display_path(dir.trim())).to_string_lossy().into_owned());

    let new = NewShortcut {
        name,
        exe: exe.to_string_lossy().into_owned(),
        start_dir,
        launch_options: args.launch_options.unwrap_or_default(),
        tags: args.tags,
    };

    let store = ShortcutStore::for_user(&paths, &user.id);
    if let Some(dumper) = &ctx.dumper {
        dumper.dump_shortcuts(library, &store);
    }
    let shortcut = store
        .add(new)
        .with_context(|| format!("adding shortcut for user {}", user.id))?;

    let out = console.out();
    writeln!(
        out,
        "Added shortcut '{}' for {} (App ID: {})",
        shortcut.app_name,
        user_label(user),
        shortcut.app_id
    )?;
    writeln!(out, "Restart Steam for the change to take effect.")?;

    Ok(shortcut)
}

/// Deletes a shortcut. Returns `None` when there was nothing to delete or
/// the user backed out.
pub fn delete<R: BufRead, W: Write>(
    ctx: &Context,
    library: &Library,
    args: DeleteShortcutArgs,
    console: &mut Console<R, W>,
) -> anyhow::Result<Option<Shortcut>> {
    let paths = library.steam_paths();
    let users = get_users(&paths)?;
    if let Some(dumper) = &ctx.dumper {
        dumper.dump_users(library);
    }
    let user = select_user(&users, args.user.as_deref(), console)?;

    let store = ShortcutStore::for_user(&paths, &user.id);
    if let Some(dumper) = &ctx.dumper {
        dumper.dump_shortcuts(library, &store);
    }
    let shortcuts = store.load()?;
    if shortcuts.is_empty() {
        writeln!(console.out(), "No shortcuts found for {}", user_label(user))?;
        return Ok(None);
    }

    let selector = match (args.app_id, args.name) {
        (Some(app_id), _) => ShortcutSelector::AppId(app_id),
        (None, Some(name)) => ShortcutSelector::Name(name),
        (None, None) => {
            let labels: Vec<String> = shortcuts
                .iter()
                .map(|sc| format!("{} (App ID: {})", sc.app_name, sc.app_id))
                .collect();
            let index = console
                .choose("Shortcuts:", &labels)?
                .context("no shortcut selected")?;
            ShortcutSelector::Index(index)
        }
    };

    let target = selector
        .position(&shortcuts)
        .map(|i| &shortcuts[i])
        .ok_or_else(|| SteamError::ShortcutNotFound(selector.to_string()))?;

    let question = format!(
        "Delete shortcut '{}' (App ID: {})?",
        target.app_name, target.app_id
    );
    if !ctx.yes && !console.confirm(&question)? {
        writeln!(console.out(), "Cancelled")?;
        return Ok(None);
    }

    let removed = store.delete(&selector)?;
    writeln!(
        console.out(),
        "Deleted shortcut '{}' (App ID: {})",
        removed.app_name,
        removed.app_id
    )?;
    Ok(Some(removed))
}
