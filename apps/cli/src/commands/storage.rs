//! `info --analyze-storage` report.

use std::io::Write;
use std::path::{Path, PathBuf};

use steam_vdf_steam::{InstalledApp, Library};
use steam_vdf_storage::{DirSize, DiskUsage, disk_usage, format_size, sibling_dir_sizes};

use crate::config::home_dir;

/// Entries shown per ranking.
const TOP_N: usize = 20;

/// Measures the volume, the library's games and the directories next to
/// the library, then writes the report.
pub fn analyze(
    out: &mut impl Write,
    library: &Library,
    apps: &[InstalledApp],
) -> anyhow::Result<()> {
    let usage = match disk_usage(&library.path) {
        Ok(usage) => Some(usage),
        Err(e) => {
            tracing::warn!("could not read disk usage: {e}");
            None
        }
    };

    tracing::debug!(path = %library.path.display(), "measuring sibling directories");
    let siblings = match sibling_dir_sizes(&library.path) {
        Ok(sizes) => sizes,
        Err(e) => {
            tracing::warn!("could not measure sibling directories: {e}");
            Vec::new()
        }
    };

    write_report(out, library, usage, apps, &siblings, home_dir().as_deref())
}

/// Writes the storage report from already measured data.
pub fn write_report(
    out: &mut impl Write,
    library: &Library,
    usage: Option<DiskUsage>,
    apps: &[InstalledApp],
    siblings: &[DirSize],
    home: Option<&Path>,
) -> anyhow::Result<()> {
    writeln!(out, "\nStorage analysis for {}", tilde(&library.path, home))?;

    if let Some(usage) = usage {
        writeln!(out, "  Total: {}", format_size(usage.total))?;
        writeln!(out, "  Used:  {}", format_size(usage.used))?;
        writeln!(out, "  Free:  {}", format_size(usage.free))?;
    }

    let mut games: Vec<&InstalledApp> = apps.iter().filter(|a| a.size_on_disk > 0).collect();
    games.sort_by(|a, b| b.size_on_disk.cmp(&a.size_on_disk));

    writeln!(out, "\nTop {TOP_N} games by size:")?;
    if games.is_empty() {
        writeln!(out, "  No installed games found")?;
    }
    for app in games.iter().take(TOP_N) {
        writeln!(
            out,
            "  {:>10}  {} (ID: {})",
            format_size(app.size_on_disk),
            app.name,
            app.app_id
        )?;
    }
    let games_total: u64 = games.iter().map(|a| a.size_on_disk).sum();
    writeln!(out, "  Total: {}", format_size(games_total))?;

    writeln!(out, "\nTop {TOP_N} non-Steam directories:")?;
    if siblings.is_empty() {
        writeln!(out, "  No other directories found")?;
    }
    for dir in siblings.iter().take(TOP_N) {
        writeln!(out, "  {:>10}  {}", format_size(dir.bytes), tilde(&dir.path, home))?;
    }
    let dirs_total: u64 = siblings.iter().map(|d| d.bytes).sum();
    writeln!(out, "  Total: {}", format_size(dirs_total))?;

    Ok(())
}

/// Shows `path` with the home directory replaced by `~`.
fn tilde(path: &Path, home: Option<&Path>) -> String {
    match home.and_then(|h| path.strip_prefix(h).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "~".into(),
        Some(rest) => PathBuf::from("~").join(rest).display().to_string(),
        None => path.display().to_string(),
    }
}
