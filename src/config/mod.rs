mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the config directory path (~/.config/exam-benefits/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("exam-benefits"))
}

/// Get the default config file path (~/.config/exam-benefits/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Get the default record file path (~/.config/exam-benefits/records.json)
pub fn get_default_store_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("records.json"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional explicit path. If None, uses ~/.config/exam-benefits/config.yaml
///
/// # Errors
///
/// Returns an error if:
/// - An explicit config path does not exist (a missing default file yields defaults)
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    parse_config_file(&config_path)
}

fn parse_config_file(config_path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref path) = config.store_path {
        if path.as_os_str().is_empty() {
            errors.push("store_path: must not be empty".to_string());
        } else if path.is_dir() {
            errors.push(format!("store_path: {} is a directory", path.display()));
        } else if path.extension().and_then(|e| e.to_str()) != Some("json") {
            errors.push(format!("store_path: {} must be a .json file", path.display()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Resolve the record file: CLI override, then config, then the default path.
pub fn resolve_store_path(cli_override: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    match cli_override.or_else(|| config.store_path.clone()) {
        Some(p) => Ok(p),
        None => get_default_store_path(),
    }
}
