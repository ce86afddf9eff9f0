use std::path::PathBuf;

/// 32-bit registry view (`Wow6432Node`, where the Steam installer writes)
/// first, then the native view.
const REGISTRY_KEYS: [&str; 2] = [r"SOFTWARE\Wow6432Node\Valve\Steam", r"SOFTWARE\Valve\Steam"];

/// Steam install locations from the registry, falling back to the default
/// install directories.
pub(crate) fn candidate_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();

    for subkey in REGISTRY_KEYS {
        if let Some(path) = read_steam_registry(subkey) {
            roots.push(path);
        }
    }

    roots.push(PathBuf::from(r"C:\Program Files (x86)\Steam"));
    roots.push(PathBuf::from(r"C:\Program Files\Steam"));
    roots
}

fn read_steam_registry(subkey: &str) -> Option<PathBuf> {
    use winreg::RegKey;
    use winreg::enums::HKEY_LOCAL_MACHINE;

    let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
    let key = hklm.open_subkey(subkey).ok()?;
    let install_path: String = key.get_value("InstallPath").ok()?;
    Some(PathBuf::from(install_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wow6432_view_is_read_first() {
        assert!(REGISTRY_KEYS[0].contains("Wow6432Node"));
        assert!(!REGISTRY_KEYS[1].contains("Wow6432Node"));
    }
}
