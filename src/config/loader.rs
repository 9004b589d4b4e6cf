use std::path::{Path, PathBuf};

use tracing::debug;

use crate::args::default_config_path;
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Config files looked up in the working directory, in order.
const LOCAL_CONFIG_FILES: [&str; 2] = ["routecheck.toml", "routecheck.json"];

/// Loads a configuration file from the provided path or default locations.
///
/// Without an explicit path the working directory is checked first, then
/// `~/.config/routecheck/config.toml`.
///
/// # Errors
///
/// Returns an error when the config file cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> AppResult<Option<ConfigFile>> {
    if let Some(explicit) = path {
        return Ok(Some(load_config_file(&PathBuf::from(explicit))?));
    }

    for candidate in LOCAL_CONFIG_FILES {
        let local = PathBuf::from(candidate);
        if local.exists() {
            return Ok(Some(load_config_file(&local)?));
        }
    }

    let user_path = default_config_path();
    if user_path.exists() {
        return Ok(Some(load_config_file(&user_path)?));
    }

    Ok(None)
}

/// Reads one config file, choosing the format from its extension.
///
/// # Errors
///
/// Returns an error when the file cannot be read, has an unknown extension or
/// fails to parse.
pub fn load_config_file(path: &Path) -> AppResult<ConfigFile> {
    debug!("Loading config from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseToml {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some("json") => serde_json::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseJson {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some(ext) => Err(AppError::config(ConfigError::UnsupportedExtension {
            ext: ext.to_owned(),
        })),
        None => Err(AppError::config(ConfigError::MissingExtension)),
    }
}
