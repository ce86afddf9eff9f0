//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Inspect Steam libraries, users and non-Steam game shortcuts.
#[derive(Parser, Debug)]
#[command(name = "steam-vdf", version, arg_required_else_help = true)]
pub struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Write every VDF file read to the dump directory as JSON
    #[arg(short = 'v', long, global = true)]
    pub dump_vdfs: bool,

    /// Steam installation to use instead of auto-detection
    #[arg(long, global = true, value_name = "PATH")]
    pub steam_dir: Option<PathBuf>,

    /// Library folder to use when several are found
    #[arg(long, global = true, value_name = "PATH")]
    pub library: Option<PathBuf>,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Display Steam library information
    Info {
        /// Analyze storage usage of the library and its neighbours
        #[arg(long)]
        analyze_storage: bool,
    },

    /// Add a new non-Steam game shortcut
    AddShortcut(AddShortcutArgs),

    /// List existing non-Steam game shortcuts
    ListShortcuts {
        /// Only list shortcuts of this user (Steam32, Steam64 or account name)
        #[arg(long)]
        user: Option<String>,
    },

    /// Delete an existing non-Steam game shortcut
    DeleteShortcut(DeleteShortcutArgs),

    /// Restart Steam
    RestartSteam,
}

#[derive(Args, Debug, Clone, PartialEq, Default)]
pub struct AddShortcutArgs {
    /// User to add the shortcut for
    #[arg(long)]
    pub user: Option<String>,

    /// Shortcut name
    #[arg(long)]
    pub name: Option<String>,

    /// Path to the executable
    #[arg(long, value_name = "PATH")]
    pub exe: Option<String>,

    /// Working directory (defaults to the executable's directory)
    #[arg(long, value_name = "PATH")]
    pub start_dir: Option<String>,

    /// Launch options passed to the executable
    #[arg(long, allow_hyphen_values = true)]
    pub launch_options: Option<String>,

    /// Collection tag, may be repeated
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
}

#[derive(Args, Debug, Clone, PartialEq, Default)]
pub struct DeleteShortcutArgs {
    /// User to delete the shortcut from
    #[arg(long)]
    pub user: Option<String>,

    /// App ID of the shortcut
    #[arg(long, conflicts_with = "name")]
    pub app_id: Option<u32>,

    /// Name of the shortcut (case-insensitive)
    #[arg(long)]
    pub name: Option<String>,
}
