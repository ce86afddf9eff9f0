//! Tool configuration.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/steam-vdf/config.toml`
//! - Windows: `%APPDATA%/steam-vdf/config.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use steam_vdf_steam::ControllerTimeouts;

/// Tool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Steam installation to use instead of auto-detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steam_dir: Option<String>,

    /// Debug log file, appended to on every run.
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Where `--dump-vdfs` writes its JSON files.
    #[serde(default = "default_dump_dir")]
    pub dump_dir: String,

    /// Seconds to wait for Steam to exit before force killing it.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Seconds to wait for Steam to come back after a restart.
    #[serde(default = "default_restart_timeout")]
    pub restart_timeout_secs: u64,

    /// Process poll interval in milliseconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_log_file() -> String {
    std::env::temp_dir()
        .join("steam_library.log")
        .to_string_lossy()
        .into_owned()
}

fn default_dump_dir() -> String {
    std::env::temp_dir()
        .join("steam-vdf")
        .to_string_lossy()
        .into_owned()
}

fn default_shutdown_timeout() -> u64 {
    10
}

fn default_restart_timeout() -> u64 {
    30
}

fn default_poll_interval() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steam_dir: None,
            log_file: default_log_file(),
            dump_dir: default_dump_dir(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            restart_timeout_secs: default_restart_timeout(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(&path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn steam_dir(&self) -> Option<PathBuf> {
        self.steam_dir.as_deref().map(expand_home)
    }

    pub fn log_file(&self) -> PathBuf {
        expand_home(&self.log_file)
    }

    pub fn dump_dir(&self) -> PathBuf {
        expand_home(&self.dump_dir)
    }

    /// Controller timing derived from the configured values.
    pub fn controller_timeouts(&self) -> ControllerTimeouts {
        ControllerTimeouts {
            shutdown: Duration::from_secs(self.shutdown_timeout_secs),
            start: Duration::from_secs(self.restart_timeout_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(10)),
            ..ControllerTimeouts::default()
        }
    }
}

/// Returns the user's home directory.
pub fn home_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    let var = "USERPROFILE";
    #[cfg(not(windows))]
    let var = "HOME";

    std::env::var_os(var).map(PathBuf::from)
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return PathBuf::from(path),
    };

    match home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(path),
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("steam-vdf").join("config.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| home_dir().map(|h| h.join(".config")))
            .ok_or_else(|| anyhow::anyhow!("cannot determine config directory"))?;
        Ok(base.join("steam-vdf").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.steam_dir.is_none());
        assert!(config.log_file.ends_with("steam_library.log"));
        assert_eq!(config.shutdown_timeout_secs, 10);
        assert_eq!(config.restart_timeout_secs, 30);
        assert_eq!(config.poll_interval_ms, 500);
    }

    #[test]
    fn config_partial_toml() {
        let config: Config = toml::from_str(r#"steam_dir = "/opt/steam""#).unwrap();
        assert_eq!(config.steam_dir(), Some(PathBuf::from("/opt/steam")));
        assert_eq!(config.restart_timeout_secs, 30);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = Config {
            steam_dir: Some("/srv/steam".into()),
            log_file: "/var/log/steam-vdf.log".into(),
            dump_dir: "/tmp/dumps".into(),
            shutdown_timeout_secs: 3,
            restart_timeout_secs: 7,
            poll_interval_ms: 100,
        };
        let parsed: Config = toml::from_str(&toml::to_string_pretty(&config).unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn controller_timeouts_from_config() {
        let config = Config {
            shutdown_timeout_secs: 1,
            restart_timeout_secs: 2,
            poll_interval_ms: 0,
            ..Config::default()
        };
        let t = config.controller_timeouts();
        assert_eq!(t.shutdown, Duration::from_secs(1));
        assert_eq!(t.start, Duration::from_secs(2));
        assert_eq!(t.poll_interval, Duration::from_millis(10));
    }

    #[test]
    fn save_to_creates_parent() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        Config::default().save_to(&path).unwrap();
        let loaded: Config = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn expand_home_only_touches_leading_tilde() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_home("~user/x"), PathBuf::from("~user/x"));
        if let Some(home) = home_dir() {
            assert_eq!(expand_home("~"), home);
            assert_eq!(expand_home("~/Games/run.sh"), home.join("Games").join("run.sh"));
        }
    }
}
