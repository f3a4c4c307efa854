//! Config file discovery and layered merging.
//!
//! Resolution order (later overrides earlier):
//! 1. `<config dir>/config.toml` (`HEARTH_CONFIG_DIR` or the platform config dir)
//! 2. `./hearth.toml` (project-local)
//! 3. `HEARTH_*` environment variables
//! 4. CLI arguments (handled externally)

use std::path::{Path, PathBuf};

use crate::{ClientConfig, ConfigError, Result};

/// Default config filename for project-local config.
const PROJECT_CONFIG_FILE: &str = "hearth.toml";

/// Default config filename within the user config directory.
const USER_CONFIG_FILE: &str = "config.toml";

/// Session filename within the data directory.
const SESSION_FILE: &str = "session.json";

/// Application name for platform directory resolution.
const APP_NAME: &str = "hearth";

/// Environment variable to override the config directory.
const CONFIG_DIR_ENV: &str = "HEARTH_CONFIG_DIR";

/// Environment variable to override the data directory.
const DATA_DIR_ENV: &str = "HEARTH_DATA_DIR";

/// Tracks where each config layer was loaded from.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub loaded: bool,
}

/// Result of config discovery and loading.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The merged configuration, environment overrides applied.
    pub config: ClientConfig,
    /// Sources that were checked, lowest precedence first.
    pub sources: Vec<ConfigSource>,
    /// Files that existed but could not be loaded.
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Paths of the sources that were actually loaded.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
            .collect()
    }
}

/// Load configuration by discovering and merging all layers.
pub fn load_config(project_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_options(project_dir, None)
}

/// Load configuration with explicit control over the user config directory.
///
/// `config_dir` overrides both `HEARTH_CONFIG_DIR` and the platform default.
pub fn load_config_with_options(
    project_dir: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    let mut config = ClientConfig::new();
    let mut sources = Vec::new();
    let mut warnings = Vec::new();

    let user_config_path = match config_dir {
        Some(dir) => Some(dir.join(USER_CONFIG_FILE)),
        None => config_path(),
    };
    if let Some(path) = user_config_path {
        sources.push(load_layer(&mut config, &path, &mut warnings));
    }

    let project_path = project_dir
        .map(|d| d.join(PROJECT_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));
    sources.push(load_layer(&mut config, &project_path, &mut warnings));

    config.apply_env()?;

    Ok(LoadedConfig {
        config,
        sources,
        warnings,
    })
}

/// Load config from a specific file path (no discovery, no env overrides).
pub fn load_config_file(path: &Path) -> Result<ClientConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    ClientConfig::from_toml(&contents)
}

/// Save configuration to a file, creating parent directories.
pub fn save_config(config: &ClientConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let contents = config.to_toml()?;
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Path of the user config file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// User config directory.
///
/// Checks `HEARTH_CONFIG_DIR` first, then the platform default
/// (`~/.config/hearth` on Linux).
pub fn config_dir() -> Option<PathBuf> {
    env_dir(CONFIG_DIR_ENV).or_else(|| dirs::config_dir().map(|d| d.join(APP_NAME)))
}

/// Data directory holding the persisted session.
///
/// Checks `HEARTH_DATA_DIR` first, then the platform default
/// (`~/.local/share/hearth` on Linux).
pub fn data_dir() -> Option<PathBuf> {
    env_dir(DATA_DIR_ENV).or_else(|| dirs::data_dir().map(|d| d.join(APP_NAME)))
}

/// Default session file: `<data dir>/session.json`.
pub fn default_session_file() -> Result<PathBuf> {
    data_dir()
        .map(|d| d.join(SESSION_FILE))
        .ok_or(ConfigError::NoDirectory("data", DATA_DIR_ENV))
}

fn env_dir(var: &str) -> Option<PathBuf> {
    match std::env::var(var) {
        Ok(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => None,
    }
}

/// Try to load a config file and merge it into the existing config.
fn load_layer(config: &mut ClientConfig, path: &Path, warnings: &mut Vec<String>) -> ConfigSource {
    if !path.is_file() {
        return ConfigSource {
            path: path.to_path_buf(),
            loaded: false,
        };
    }

    match load_config_file(path) {
        Ok(layer) => {
            config.merge(layer);
            ConfigSource {
                path: path.to_path_buf(),
                loaded: true,
            }
        }
        Err(e) => {
            warnings.push(format!("Failed to load {}: {}", path.display(), e));
            ConfigSource {
                path: path.to_path_buf(),
                loaded: false,
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_url = \"http://nas.local:8000/api\"\n").unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.api_url(), "http://nas.local:8000/api");
    }

    #[test]
    fn test_load_config_file_not_found() {
        let err = load_config_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "this is not valid toml {{{{").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_layered_merge() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();

        let user_config = user_dir.path().join("config.toml");
        fs::write(
            &user_config,
            "api_url = \"http://user/api\"\ntimeout_secs = 8\n",
        )
        .unwrap();
        let project_config = project_dir.path().join("hearth.toml");
        fs::write(&project_config, "api_url = \"http://project/api\"\n").unwrap();

        let mut config = ClientConfig::new();
        let mut warnings = Vec::new();
        assert!(load_layer(&mut config, &user_config, &mut warnings).loaded);
        assert!(load_layer(&mut config, &project_config, &mut warnings).loaded);

        assert_eq!(config.api_url.as_deref(), Some("http://project/api"));
        assert_eq!(config.timeout_secs, Some(8));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_layer_is_not_loaded() {
        let dir = TempDir::new().unwrap();
        let mut config = ClientConfig::new();
        let mut warnings = Vec::new();

        let source = load_layer(&mut config, &dir.path().join("config.toml"), &mut warnings);

        assert!(!source.loaded);
        assert_eq!(config, ClientConfig::new());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_malformed_layer_warns_but_continues() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hearth.toml");
        fs::write(&path, "not valid toml {{{{").unwrap();

        let mut config = ClientConfig::new();
        let mut warnings = Vec::new();
        let source = load_layer(&mut config, &path, &mut warnings);

        assert!(!source.loaded);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Failed to load"));
    }

    #[test]
    fn test_load_config_tracks_sources() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        fs::write(
            project_dir.path().join("hearth.toml"),
            "user_agent = \"kitchen-tablet\"\n",
        )
        .unwrap();

        let loaded =
            load_config_with_options(Some(project_dir.path()), Some(user_dir.path())).unwrap();

        assert_eq!(loaded.config.user_agent.as_deref(), Some("kitchen-tablet"));
        let paths = loaded.loaded_from();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("hearth.toml"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = ClientConfig {
            api_url: Some("https://family.example.com/api".to_string()),
            timeout_secs: Some(15),
            ..Default::default()
        };

        save_config(&config, &path).unwrap();
        assert_eq!(load_config_file(&path).unwrap(), config);
    }

    #[test]
    fn test_config_path_ends_with_file_name() {
        if let Some(path) = config_path() {
            assert!(path.ends_with("config.toml"));
        }
    }
}
