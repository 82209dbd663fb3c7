use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::warn;

use crate::model::config::{ClientConfig, ConfigOverrides};

/// Environment variable overriding the server URL
pub const ENV_SERVER: &str = "TODOSHARE_SERVER";
/// Environment variable overriding the list token
pub const ENV_TOKEN: &str = "TODOSHARE_TOKEN";

/// Error type for config file I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Get the config file path, respecting XDG_CONFIG_HOME
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_dir.join("todoshare").join("config.toml")
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read the config from a specific path.
/// A missing file gives the defaults. A corrupted file is backed up as
/// .bak and the defaults are used.
pub fn read_config_from(path: &Path) -> ClientConfig {
    if !path.exists() {
        return ClientConfig::default();
    }

    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str::<ClientConfig>(&content) {
            Ok(config) => config,
            Err(e) => {
                let bak = path.with_extension("toml.bak");
                let _ = fs::copy(path, &bak);
                warn!(
                    path = %path.display(),
                    backup = %bak.display(),
                    error = %e,
                    "could not parse config, using defaults"
                );
                ClientConfig::default()
            }
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read config, using defaults");
            ClientConfig::default()
        }
    }
}

/// Write the config atomically (temp file + rename).
pub fn write_config_to(path: &Path, config: &ClientConfig) -> Result<(), ConfigError> {
    let write_error = |source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    };
    let content = toml::to_string_pretty(config)?;
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir).map_err(write_error)?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(content.as_bytes()).map_err(write_error)?;
    tmp.flush().map_err(write_error)?;
    tmp.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

/// Layer environment values and command-line overrides over the file
/// config. `env` looks up a variable by name.
pub fn effective_config(
    file: &ClientConfig,
    overrides: &ConfigOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ClientConfig {
    let mut config = file.clone();
    if let Some(server) = env(ENV_SERVER).filter(|s| !s.is_empty()) {
        config.server = server;
    }
    if let Some(token) = env(ENV_TOKEN).filter(|s| !s.is_empty()) {
        config.token = Some(token);
    }
    if let Some(ref server) = overrides.server {
        config.server = server.clone();
    }
    if let Some(ref token) = overrides.token {
        config.token = Some(token.clone());
    }
    config
}
