//! Linux-specific Steam process handling.

use std::process::{Output, Stdio};

use tokio::process::Command;

use crate::SteamError;

/// Process name matched by `pgrep`/`pkill`.
const PROCESS_NAME: &str = "steam";

async fn run(program: &str, args: &[&str]) -> std::io::Result<Output> {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
}

pub async fn is_running() -> bool {
    run("pgrep", &["-x", PROCESS_NAME])
        .await
        .is_ok_and(|out| out.status.success() && !out.stdout.is_empty())
}

/// Steam Deck game mode: gamescope relaunches Steam on its own.
pub fn is_gaming_mode() -> bool {
    is_gamescope(std::env::var("XDG_CURRENT_DESKTOP").ok().as_deref())
}

fn is_gamescope(desktop: Option<&str>) -> bool {
    desktop.is_some_and(|d| d.eq_ignore_ascii_case("gamescope"))
}

/// Spawns Steam in its own process group so it outlives this tool.
pub async fn start() -> Result<(), SteamError> {
    Command::new(PROCESS_NAME)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0)
        .spawn()
        .map_err(|e| SteamError::Controller(format!("failed to start Steam: {e}")))?;

    tracing::info!("started steam");
    Ok(())
}

/// Asks Steam to exit with `steam -shutdown`; `killall steam` if that fails.
pub async fn shutdown_command() -> Result<(), SteamError> {
    match run(PROCESS_NAME, &["-shutdown"]).await {
        Ok(out) if out.status.success() => return Ok(()),
        Ok(out) => tracing::warn!(status = %out.status, "steam -shutdown failed, using killall"),
        Err(e) => tracing::warn!("could not run steam -shutdown ({e}), using killall"),
    }

    let out = run("killall", &[PROCESS_NAME])
        .await
        .map_err(|e| SteamError::Controller(format!("failed to run killall: {e}")))?;
    if !out.status.success() {
        tracing::warn!("killall found no steam process");
    }
    Ok(())
}

/// `pkill -9 -x steam`.
pub async fn force_kill() -> Result<(), SteamError> {
    let out = run("pkill", &["-9", "-x", PROCESS_NAME])
        .await
        .map_err(|e| SteamError::Controller(format!("failed to run pkill: {e}")))?;

    if out.status.success() {
        Ok(())
    } else {
        Err(SteamError::Controller(format!(
            "pkill exited with {}",
            out.status
        )))
    }
}
