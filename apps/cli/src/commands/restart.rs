//! `restart-steam`, also offered after a shortcut is deleted.

use std::io::{BufRead, Write};

use steam_vdf_steam::{Controller, SteamProcess};

use crate::console::Console;

/// Asks whether to restart Steam (unless `yes`) and restarts it.
///
/// Returns whether a restart happened. A failed restart is an error.
pub async fn run<P: SteamProcess, R: BufRead, W: Write>(
    controller: &Controller<P>,
    yes: bool,
    console: &mut Console<R, W>,
) -> anyhow::Result<bool> {
    if !yes && !console.confirm("\nWould you like to restart Steam now?")? {
        writeln!(
            console.out(),
            "Please restart Steam manually for changes to take effect."
        )?;
        return Ok(false);
    }

    writeln!(console.out(), "Restarting Steam...")?;
    let result = controller.restart().await;
    if !result.success {
        anyhow::bail!("{}", result.message);
    }

    tracing::info!("{}", result.message);
    writeln!(console.out(), "{}", result.message)?;
    Ok(true)
}
