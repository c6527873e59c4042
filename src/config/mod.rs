pub mod model;

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

pub use model::ServerConfig;

/// Used when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Config path from the first command-line argument, or [`DEFAULT_CONFIG_PATH`].
pub fn config_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Read and validate the config file at `path`.
///
/// Files ending in `.json` are parsed as JSON, anything else as TOML.
pub fn load_config(path: &Path) -> Result<ServerConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(path, &contents)?;
    config.validate().map_err(|message| Error::ConfigParse {
        path: path.to_path_buf(),
        message,
    })?;
    Ok(config)
}

fn parse_config(path: &Path, contents: &str) -> Result<ServerConfig> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        serde_json::from_str(contents).map_err(|e| e.to_string())
    } else {
        toml::from_str(contents).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| Error::ConfigParse {
        path: path.to_path_buf(),
        message,
    })
}
