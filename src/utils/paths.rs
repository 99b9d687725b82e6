use dirs::home_dir;
use std::{
    env,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".prostep";
const SESSION_FILE: &str = "session.json";

/// Returns the application data directory, defaulting to `~/.prostep`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("PROSTEP_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Path to the saved in-progress session under `base`.
pub fn session_file_in(base: &Path) -> PathBuf {
    base.join(SESSION_FILE)
}
