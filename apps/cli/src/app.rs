//! Command dispatch.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use steam_vdf_steam::paths::detect_roots;
use steam_vdf_steam::{
    Controller, Library, SteamError, SteamProcess, SystemProcess, find_libraries,
};

use crate::cli::{Cli, Command};
use crate::commands::{self, Context, info, restart, shortcuts};
use crate::config::Config;
use crate::console::Console;
use crate::dump::Dumper;

/// Runs the parsed command against the real terminal and Steam process.
pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let controller = Controller::with_process(SystemProcess, config.controller_timeouts());
    let mut console = Console::stdio();
    dispatch(cli, &config, &controller, &mut console).await
}

pub async fn dispatch<P: SteamProcess, R: BufRead, W: Write>(
    cli: Cli,
    config: &Config,
    controller: &Controller<P>,
    console: &mut Console<R, W>,
) -> anyhow::Result<()> {
    let Cli {
        dump_vdfs,
        steam_dir,
        library,
        yes,
        command,
        ..
    } = cli;

    let ctx = Context {
        yes,
        dumper: dump_vdfs.then(|| Dumper::new(config.dump_dir())),
    };
    if ctx.dumper.is_some() {
        tracing::info!(dir = %config.dump_dir().display(), "dumping VDF files as JSON");
    }

    let steam_dir = steam_dir.or_else(|| config.steam_dir());
    let open = |console: &mut Console<R, W>| {
        open_library(steam_dir.clone(), library.as_deref(), console)
    };

    match command {
        Command::RestartSteam => {
            restart::run(controller, yes, console).await?;
        }
        Command::Info { analyze_storage } => {
            let library = open(console)?;
            info::run(&ctx, &library, analyze_storage, console)?;
        }
        Command::ListShortcuts { user } => {
            let library = open(console)?;
            shortcuts::list(&ctx, &library, user.as_deref(), console)?;
        }
        Command::AddShortcut(args) => {
            let library = open(console)?;
            shortcuts::add(&ctx, &library, args, console)?;
        }
        Command::DeleteShortcut(args) => {
            let library = open(console)?;
            if shortcuts::delete(&ctx, &library, args, console)?.is_some() {
                restart::run(controller, yes, console).await?;
            }
        }
    }

    Ok(())
}

/// Finds the libraries of the configured or detected Steam installations
/// and picks one.
fn open_library<R: BufRead, W: Write>(
    steam_dir: Option<PathBuf>,
    wanted: Option<&Path>,
    console: &mut Console<R, W>,
) -> anyhow::Result<Library> {
    let roots = match steam_dir {
        Some(dir) => vec![dir],
        None => detect_roots(),
    };
    if roots.is_empty() {
        return Err(SteamError::NotFound.into());
    }
    tracing::debug!(?roots, "steam roots");

    let library = commands::select_library(find_libraries(&roots), wanted, console)?;
    tracing::info!(path = %library.path.display(), "using library");
    Ok(library)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use clap::Parser;
    use steam_vdf_steam::ShortcutStore;

    use super::*;
    use crate::commands::fixture::SteamFixture;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("steam-vdf").chain(args.iter().copied())).unwrap()
    }

    async fn dispatch_with(
        args: &[&str],
        config: &Config,
        input: &str,
    ) -> (anyhow::Result<()>, String) {
        let controller = Controller::new();
        let mut console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let result = dispatch(parse(args), config, &controller, &mut console).await;
        (result, String::from_utf8(console.into_output()).unwrap())
    }

    #[tokio::test]
    async fn info_uses_steam_dir_flag() {
        let fx = SteamFixture::new();
        let root = fx.root().display().to_string();

        let (result, out) =
            dispatch_with(&["info", "--steam-dir", &root], &Config::default(), "").await;
        result.unwrap();
        assert!(out.contains("Portal 2 (ID: 620)"));
    }

    #[tokio::test]
    async fn steam_dir_from_config() {
        let fx = SteamFixture::new();
        let config = Config {
            steam_dir: Some(fx.root().display().to_string()),
            ..Config::default()
        };

        let (result, out) = dispatch_with(&["list-shortcuts"], &config, "").await;
        result.unwrap();
        assert!(out.contains("User: Test User (testuser) [22202]"));
    }

    #[tokio::test]
    async fn missing_steam_dir_has_no_libraries() {
        let (result, _) = dispatch_with(
            &["info", "--steam-dir", "/nonexistent/steam"],
            &Config::default(),
            "",
        )
        .await;
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SteamError>(),
            Some(SteamError::NoLibraries)
        ));
    }

    #[tokio::test]
    async fn add_then_delete_declining_restart() {
        let fx = SteamFixture::new();
        let root = fx.root().display().to_string();
        let exe = fx.exe("launch.sh").display().to_string();

        let (result, _) = dispatch_with(
            &[
                "add-shortcut",
                "--steam-dir",
                &root,
                "--user",
                "22202",
                "--name",
                "Launcher",
                "--exe",
                &exe,
            ],
            &Config::default(),
            "",
        )
        .await;
        result.unwrap();

        let (result, out) = dispatch_with(
            &[
                "delete-shortcut",
                "--steam-dir",
                &root,
                "--user",
                "22202",
                "--name",
                "launcher",
            ],
            &Config::default(),
            "y\nn\n",
        )
        .await;
        result.unwrap();
        assert!(out.contains("Deleted shortcut 'Launcher'"));
        assert!(out.contains("Please restart Steam manually"));

        let store = ShortcutStore::for_user(&fx.paths(), "22202");
        assert!(store.load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dump_vdfs_writes_json() {
        let fx = SteamFixture::new();
        let root = fx.root().display().to_string();
        let dump_dir = fx.parent().join("dump");
        let config = Config {
            dump_dir: dump_dir.display().to_string(),
            ..Config::default()
        };

        let (result, _) = dispatch_with(&["-v", "info", "--steam-dir", &root], &config, "").await;
        result.unwrap();
        assert!(dump_dir.join("config/loginusers.vdf.json").is_file());
    }

    #[tokio::test]
    async fn dump_vdfs_for_shortcut_commands() {
        let fx = SteamFixture::new();
        let root = fx.root().display().to_string();
        let exe = fx.exe("dumped.sh").display().to_string();
        let dump_dir = fx.parent().join("dump");
        let config = Config {
            dump_dir: dump_dir.display().to_string(),
            ..Config::default()
        };
        let shortcuts_json = dump_dir.join("userdata/22202/config/shortcuts.vdf.json");

        let add = [
            "-v", "add-shortcut", "--steam-dir", root.as_str(), "--user", "22202", "--name",
            "Dumped", "--exe", exe.as_str(),
        ];
        let (result, _) = dispatch_with(&add, &config, "").await;
        result.unwrap();
        assert!(dump_dir.join("config/loginusers.vdf.json").is_file());

        let list = ["-v", "list-shortcuts", "--steam-dir", root.as_str(), "--user", "22202"];
        let (result, _) = dispatch_with(&list, &config, "").await;
        result.unwrap();
        assert!(shortcuts_json.is_file());

        std::fs::remove_dir_all(&dump_dir).unwrap();
        let delete = [
            "-v", "delete-shortcut", "--steam-dir", root.as_str(), "--user", "22202", "--name",
            "dumped",
        ];
        let (result, _) = dispatch_with(&delete, &config, "y\nn\n").await;
        result.unwrap();
        assert!(shortcuts_json.is_file());
        assert!(dump_dir.join("config/loginusers.vdf.json").is_file());
    }
}
