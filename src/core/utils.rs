use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".spendlog";
const CONFIG_FILE: &str = "config.json";

/// Returns the application-specific data directory, defaulting to `~/.spendlog`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("SPENDLOG_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Path of the counter-party configuration used when none is given.
pub fn default_config_file() -> PathBuf {
    app_data_dir().join(CONFIG_FILE)
}
