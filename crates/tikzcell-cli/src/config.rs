//! Configuration file loading for the CLI
//!
//! This module finds and loads TOML configuration files from various
//! locations (explicit path, local directory, system directory) and applies
//! environment overrides on top.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use tikzcell::{TikzcellError, config::AppConfig};

/// Environment variable overriding `output.save_dir`.
pub const SAVE_DIR_ENV: &str = "TIKZCELL_SAVEDIR";

/// Environment variable overriding `compiler.pdftocairo`.
pub const PDFTOCAIRO_ENV: &str = "TIKZCELL_PDFTOCAIROPATH";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for TikzcellError {
    fn from(err: ConfigError) -> Self {
        TikzcellError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (tikzcell/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, TikzcellError> {
    // 1. Try the explicitly provided path first if available
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path:% = path.display(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    // 2. Try the local project directory
    let local_config = Path::new("tikzcell/config.toml");
    if local_config.exists() {
        info!(path:% = local_config.display(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    // 3. Try the platform-specific config directory
    if let Some(proj_dirs) = ProjectDirs::from("com", "tikzcell", "tikzcell") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path:% = system_config.display(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path:% = system_config.display(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    // 4. If no config is found, return default config
    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Applies environment overrides to `config`.
///
/// `lookup` resolves a variable name to its value; the CLI passes
/// `std::env::var`. Empty values are ignored.
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let lookup = |name: &str| lookup(name).filter(|value| !value.is_empty());

    if let Some(save_dir) = lookup(SAVE_DIR_ENV) {
        debug!(save_dir = save_dir.as_str(); "Save directory set from environment");
        config.output_mut().set_save_dir(save_dir);
    }

    if let Some(pdftocairo) = lookup(PDFTOCAIRO_ENV) {
        debug!(pdftocairo = pdftocairo.as_str(); "pdftocairo set from environment");
        config.compiler_mut().set_pdftocairo(pdftocairo);
    }
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, TikzcellError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    // Parse TOML content
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [compiler]
            tex_program = "xelatex"

            [output]
            dpi = 150
            "#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.compiler().tex_program(), "xelatex");
        assert_eq!(config.output().dpi(), 150);
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(dir.path().join("missing.toml"))).unwrap_err();
        match err {
            TikzcellError::Config(message) => {
                assert!(message.starts_with("Missing configuration file"));
            }
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[output]\ndpi = \"high\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, TikzcellError::Config(ref m) if m.starts_with("Failed to parse")));
    }

    #[test]
    fn test_env_overrides() {
        let env = HashMap::from([
            (SAVE_DIR_ENV, "/tmp/figures"),
            (PDFTOCAIRO_ENV, "/opt/poppler/pdftocairo"),
        ]);
        let mut config = AppConfig::default();

        apply_env_overrides(&mut config, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.output().save_dir(), Some(Path::new("/tmp/figures")));
        assert_eq!(config.compiler().pdftocairo(), "/opt/poppler/pdftocairo");
    }

    #[test]
    fn test_empty_env_values_ignored() {
        let mut config = AppConfig::default();

        apply_env_overrides(&mut config, |_| Some(String::new()));

        assert_eq!(config.output().save_dir(), None);
        assert_eq!(config.compiler().pdftocairo(), "pdftocairo");
    }
}
