mod schema;

pub use schema::{builtin_regions, Config};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::classifier::validate_classifier;
use crate::region::validate_regions;
use crate::scenario::validate_scenarios;
use crate::scoring::validate_scoring;

/// Get the config directory path (~/.config/povrisk/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("povrisk"))
}

/// Get the default config file path (~/.config/povrisk/config.yaml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   and falls back to the built-in configuration when that file is absent.
///
/// # Errors
///
/// Returns an error if:
/// - An explicit config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            path
        }
        None => match get_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    Ok(config)
}

/// Validate every section of the configuration.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_regions(&config.regions, config.fallback_region.as_deref()) {
        errors.extend(e);
    }
    if let Err(e) = validate_scoring(&config.scoring) {
        errors.extend(e);
    }
    if let Some(ref classifier) = config.classifier {
        if let Err(e) = validate_classifier(classifier) {
            errors.extend(e);
        }
    }
    if let Err(e) = validate_scenarios(&config.scenarios) {
        errors.extend(e);
    }
    if config.session.capacity == 0 {
        errors.push("session.capacity: must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
