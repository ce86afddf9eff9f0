//! Windows-specific Steam process handling.

use std::path::PathBuf;
use std::process::{Output, Stdio};

use tokio::process::Command;

use crate::SteamError;

const IMAGE_NAME: &str = "steam.exe";

fn steam_exe() -> Option<PathBuf> {
    crate::paths::detect_roots()
        .into_iter()
        .map(|root| root.join(IMAGE_NAME))
        .find(|exe| exe.is_file())
}

/// `cmd /C start <uri>`, used when `steam.exe` cannot be located.
fn uri_command(uri: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", uri]);
    cmd
}

async fn run(mut cmd: Command, what: &str) -> Result<Output, SteamError> {
    cmd.output()
        .await
        .map_err(|e| SteamError::Controller(format!("{what}: {e}")))
}

/// Whether `tasklist` output lists the Steam image.
fn lists_steam(tasklist_stdout: &[u8]) -> bool {
    String::from_utf8_lossy(tasklist_stdout)
        .to_ascii_lowercase()
        .contains(IMAGE_NAME)
}

pub async fn is_running() -> bool {
    let filter = format!("IMAGENAME eq {IMAGE_NAME}");
    let mut cmd = Command::new("tasklist");
    cmd.args(["/FI", filter.as_str(), "/NH"]);
    run(cmd, "tasklist")
        .await
        .is_ok_and(|out| lists_steam(&out.stdout))
}

/// No session manager restarts Steam on Windows.
pub fn is_gaming_mode() -> bool {
    false
}

pub async fn start() -> Result<(), SteamError> {
    let mut cmd = match steam_exe() {
        Some(exe) => Command::new(exe),
        None => uri_command("steam://open/main"),
    };
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| SteamError::Controller(format!("failed to start Steam: {e}")))?;

    tracing::info!("started steam");
    Ok(())
}

pub async fn shutdown_command() -> Result<(), SteamError> {
    let cmd = match steam_exe() {
        Some(exe) => {
            let mut cmd = Command::new(exe);
            cmd.arg("-shutdown");
            cmd
        }
        None => uri_command("steam://exit"),
    };

    let output = run(cmd, "failed to send shutdown").await?;
    if !output.status.success() {
        tracing::warn!(status = %output.status, "steam shutdown request failed");
    }
    Ok(())
}

pub async fn force_kill() -> Result<(), SteamError> {
    let mut cmd = Command::new("taskkill");
    cmd.args(["/F", "/IM", IMAGE_NAME]);

    let output = run(cmd, "failed to run taskkill").await?;
    if output.status.success() {
        Ok(())
    } else {
        Err(SteamError::Controller(format!(
            "taskkill exited with {}",
            output.status
        )))
    }
}
