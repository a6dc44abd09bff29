use std::path::PathBuf;

const APP_DIR: &str = "git-shepherd";

/// Per-user configuration directory for git-shepherd.
///
/// An absolute `XDG_CONFIG_HOME` wins on every platform; otherwise the platform
/// convention applies.
pub fn get_config_directory() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        if xdg.is_absolute() {
            return xdg.join(APP_DIR);
        }
    }

    let home = dirs::home_dir().unwrap_or_default();
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => home.join(".config"),
        "macos" => home.join("Library/Application Support"),
        _ => dirs::config_dir().unwrap_or(home),
    };

    base.join(APP_DIR)
}
