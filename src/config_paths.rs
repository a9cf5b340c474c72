//! Where the simulator keeps its config and logs
//!
//! `SWIPE_REVEAL_HOME` overrides the location. Otherwise files go to
//! `$XDG_CONFIG_HOME/swipe-reveal` or `~/.config/swipe-reveal`, and to the
//! platform config directory on Windows.

use std::path::PathBuf;

const HOME_ENV: &str = "SWIPE_REVEAL_HOME";
const APP_DIR: &str = "swipe-reveal";

pub fn config_dir() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Some(PathBuf::from(home));
    }

    let base = if cfg!(target_os = "windows") {
        dirs::config_dir()
    } else {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
    };
    base.map(|base| base.join(APP_DIR))
}

/// Row config read by `SwipeConfig::load`
pub fn config_file() -> Option<PathBuf> {
    Some(config_dir()?.join("config.yaml"))
}

pub fn logs_dir() -> Option<PathBuf> {
    Some(config_dir()?.join("logs"))
}

/// Create the log directory if needed
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or("no home or config directory to log into")?;
    std::fs::create_dir_all(&logs)
        .map_err(|e| format!("Failed to create log directory {}: {}", logs.display(), e))?;
    Ok(logs)
}

