// src/config.rs
use crate::generator::DEFAULT_LENGTH;
use crate::storage::RECORDS_FILE_NAME;
use directories::ProjectDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "passgen_config.toml";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Overrides the location of the record file.
    pub data_file: Option<PathBuf>,
    /// Length used by `generate` when none is given.
    pub default_length: usize,
    /// Whether newly saved passwords become the current one.
    pub save_as_current: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: None,
            default_length: DEFAULT_LENGTH,
            save_as_current: true,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "PassgenRS", "PassgenRS")
}

fn get_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Where the record file lives: the configured override, else the platform
/// data directory, else the working directory.
pub fn data_file_path(config: &Config) -> PathBuf {
    if let Some(path) = &config.data_file {
        return path.clone();
    }
    match project_dirs() {
        Some(dirs) => dirs.data_dir().join(RECORDS_FILE_NAME),
        None => {
            warn!("Could not determine data directory. Using {} in the working directory.", RECORDS_FILE_NAME);
            PathBuf::from(RECORDS_FILE_NAME)
        }
    }
}

fn save_default_config(config_path: &Path, config: &Config) -> Result<(), String> {
    info!("Attempting to save default config to {:?}", config_path);
    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)
                .map_err(|e| format!("Failed to create config directory {:?}: {}", parent_dir, e))?;
            info!("Created config directory: {:?}", parent_dir);
        }
    }

    let toml_string = toml::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize default config to TOML: {}", e))?;

    fs::write(config_path, toml_string)
        .map_err(|e| format!("Failed to write default config to {:?}: {}", config_path, e))?;

    info!("Saved default configuration to {:?}", config_path);
    Ok(())
}

/// Reads the config at `config_path`, writing defaults out if it is missing.
/// Any read or parse failure falls back to defaults.
pub fn load_config_from(config_path: &Path) -> Config {
    if !config_path.exists() {
        info!(
            "Config file not found at {:?}. Creating and using default configuration.",
            config_path
        );
        let default_config = Config::default();
        if let Err(e) = save_default_config(config_path, &default_config) {
            warn!("Failed to save default configuration: {}", e);
        }
        return default_config;
    }

    info!("Loading configuration from {:?}", config_path);
    match fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(loaded_config) => {
                info!("Configuration loaded successfully.");
                loaded_config
            }
            Err(e) => {
                warn!(
                    "Failed to parse config file at {:?}: {}. Using default configuration.",
                    config_path, e
                );
                Config::default()
            }
        },
        Err(e) => {
            warn!(
                "Failed to read config file at {:?}: {}. Using default configuration.",
                config_path, e
            );
            Config::default()
        }
    }
}

pub fn load_config() -> Config {
    match get_config_path() {
        Some(config_path) => load_config_from(&config_path),
        None => {
            warn!("Could not determine config directory. Using default configuration.");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_length, 12);
        assert!(config.save_as_current);
        assert!(config.data_file.is_none());
    }

    #[test]
    fn test_missing_config_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = load_config_from(&config_path);
        assert_eq!(config, Config::default());
        assert!(config_path.exists());

        let content = fs::read_to_string(&config_path).unwrap();
        let reloaded: Config = toml::from_str(&content).unwrap();
        assert_eq!(reloaded, Config::default());
    }

    #[test]
    fn test_partial_config_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &config_path,
            r#"
default_length = 20
data_file = "/tmp/passgen/passes.json"
"#,
        )
        .unwrap();

        let config = load_config_from(&config_path);
        assert_eq!(config.default_length, 20);
        assert_eq!(config.data_file, Some(PathBuf::from("/tmp/passgen/passes.json")));
        assert!(config.save_as_current, "save_as_current should keep its default");
    }

    #[test]
    fn test_invalid_toml_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "this is not valid toml content = definitely_broken").unwrap();

        assert_eq!(load_config_from(&config_path), Config::default());
    }

    #[test]
    fn test_wrong_type_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "default_length = \"long\"\n").unwrap();

        assert_eq!(load_config_from(&config_path), Config::default());
    }

    #[test]
    fn test_data_file_override_wins() {
        let config = Config {
            data_file: Some(PathBuf::from("custom.json")),
            ..Config::default()
        };
        assert_eq!(data_file_path(&config), PathBuf::from("custom.json"));
    }

    #[test]
    fn test_default_data_file_name() {
        let path = data_file_path(&Config::default());
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(RECORDS_FILE_NAME));
    }
}
