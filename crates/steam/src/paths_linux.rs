use std::path::PathBuf;

/// Known Steam locations on Linux, most preferred first.
pub(crate) fn candidate_roots() -> Vec<PathBuf> {
    let Some(home) = std::env::var_os("HOME").map(PathBuf::from) else {
        tracing::warn!("HOME is not set, cannot look for steam");
        return Vec::new();
    };

    vec![
        // Primary location
        home.join(".steam").join("steam"),
        home.join(".local").join("share").join("Steam"),
        // Flatpak
        home.join(".var")
            .join("app")
            .join("com.valvesoftware.Steam")
            .join(".steam")
            .join("steam"),
        home.join(".steam").join("root"),
    ]
}
