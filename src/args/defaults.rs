use std::path::PathBuf;

const DB_FILE_NAME: &str = "routecheck.db";
const CONFIG_FILE_NAME: &str = "config.toml";

/// `~/.config/routecheck/routecheck.db`, or `.routecheck/routecheck.db` when
/// no home directory is known.
#[must_use]
pub fn default_db_path() -> PathBuf {
    default_base_dir().join(DB_FILE_NAME)
}

#[must_use]
pub fn default_config_path() -> PathBuf {
    default_base_dir().join(CONFIG_FILE_NAME)
}

fn default_base_dir() -> PathBuf {
    if let Some(home) = user_home_dir() {
        return home.join(".config").join("routecheck");
    }

    PathBuf::from(".routecheck")
}

fn user_home_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        if let Some(value) = std::env::var_os("USERPROFILE") {
            return Some(PathBuf::from(value));
        }
        let drive = std::env::var_os("HOMEDRIVE");
        let path = std::env::var_os("HOMEPATH");
        if let (Some(drive), Some(path)) = (drive, path) {
            let mut full = PathBuf::from(drive);
            full.push(path);
            return Some(full);
        }
    }

    std::env::var_os("HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
