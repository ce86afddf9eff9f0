//! Steam integration for steam-vdf.
//!
//! Locates Steam installations and their library folders, reads the text
//! and binary VDF files Steam keeps its state in, and manages non-Steam
//! game shortcuts per user account.

pub mod apps;
pub mod controller;
pub mod ids;
pub mod libraries;
pub mod paths;
#[cfg(target_os = "linux")]
mod paths_linux;
#[cfg(target_os = "windows")]
mod paths_windows;
pub mod shortcuts;
pub mod users;
pub mod vdf;

// Re-export primary types.
pub use apps::{InstalledApp, installed_apps};
pub use controller::{Controller, ControllerTimeouts, RestartResult, SteamProcess, SystemProcess};
pub use ids::{STEAM64_BASE, SteamId};
pub use libraries::{Library, find_libraries};
pub use paths::Paths;
pub use shortcuts::{NewShortcut, Shortcut, ShortcutSelector, ShortcutStore, generate_app_id};
pub use users::{Account, User, UserIndex, UserRecord, get_users, load_accounts};
pub use vdf::{Object, Value, Vdf};

/// Errors for Steam operations.
#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    #[error("steam installation not found")]
    NotFound,

    #[error("no steam libraries found")]
    NoLibraries,

    #[error("steam user not found: {0}")]
    UserNotFound(String),

    #[error("userdata directory not found: {0}")]
    NoUserData(String),

    #[error("shortcut not found: {0}")]
    ShortcutNotFound(String),

    #[error("shortcut already exists: {name} (appid {app_id})")]
    DuplicateShortcut { name: String, app_id: u32 },

    #[error("invalid steam id: {0}")]
    InvalidSteamId(String),

    #[error("VDF parse error: {0}")]
    Vdf(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("controller error: {0}")]
    Controller(String),

    #[error("timeout: {0}")]
    Timeout(String),
}
