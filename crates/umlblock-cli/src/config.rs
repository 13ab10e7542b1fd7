//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use umlblock::{UmlBlockError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for UmlBlockError {
    fn from(err: ConfigError) -> Self {
        UmlBlockError::config(err.to_string())
    }
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit,
    /// `umlblock/config.toml` under the working directory.
    Local,
    /// The platform configuration directory.
    System,
}

/// Local configuration path, relative to the working directory.
pub const LOCAL_CONFIG: &str = "umlblock/config.toml";

/// Locates the configuration file to load.
///
/// An explicit path is returned as is, whether or not it exists. Otherwise
/// the local and the platform locations are tried in turn, and `None` means
/// the defaults apply.
pub fn discover(explicit_path: Option<&Path>) -> Option<(ConfigSource, PathBuf)> {
    if let Some(path) = explicit_path {
        return Some((ConfigSource::Explicit, path.to_path_buf()));
    }

    let local = PathBuf::from(LOCAL_CONFIG);
    if local.is_file() {
        return Some((ConfigSource::Local, local));
    }

    let Some(proj_dirs) = ProjectDirs::from("com", "umlblock", "umlblock") else {
        debug!("Could not determine platform-specific config directory");
        return None;
    };
    let system = proj_dirs.config_dir().join("config.toml");
    if system.is_file() {
        return Some((ConfigSource::System, system));
    }

    debug!(path = system.display().to_string(); "System configuration file not found");
    None
}

/// Find and load the configuration, falling back to defaults.
///
/// See [`discover`] for the search order.
///
/// # Errors
///
/// Returns [`UmlBlockError::Config`] if an explicit path does not exist, or
/// the file found cannot be read, parsed or validated.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, UmlBlockError> {
    let explicit_path: Option<&Path> = explicit_path.as_ref().map(|path| path.as_ref());
    let Some((source, path)) = discover(explicit_path) else {
        debug!("No configuration file found, using default configuration");
        return Ok(AppConfig::default());
    };

    info!(source:?, path = path.display().to_string(); "Loading configuration");

    let content = fs::read_to_string(&path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => ConfigError::MissingFile(path.clone()),
        _ => ConfigError::Read {
            path: path.clone(),
            source: err,
        },
    })?;

    let config = parse_config(&content)?;
    Ok(config)
}

/// Parses and validates configuration text.
fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    if config.renderer().timeout().is_some_and(|t| t.is_zero()) {
        return Err(ConfigError::Validation(
            "renderer.timeout_secs must be greater than zero".to_string(),
        ));
    }
    if config.renderer().jar().as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "renderer.jar must not be empty".to_string(),
        ));
    }

    Ok(config)
}
