use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the directory, under the user's configuration directory, that holds
/// the tool's own settings.
pub const SETTINGS_DIR_NAME: &str = "git-sw";

/// Environment variable that overrides the settings file location.
pub const SETTINGS_ENV: &str = "GIT_SW_SETTINGS";

/// Serialization formats understood by `export` and `import`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Json,
    Yaml,
    Toml,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub version: String,
    /// Config file used when `--file` is not given. Falls back to the global
    /// git config when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_file: Option<PathBuf>,
    pub export_format: DocumentFormat,
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            default_file: None,
            export_format: DocumentFormat::Toml,
            verbose: false,
        }
    }
}

pub trait SettingsProvider {
    fn load_settings(&self) -> Result<Settings>;
    fn save_settings(&self, settings: &Settings) -> Result<()>;
    fn get_settings_path(&self) -> &Path;
}

/// Loads and stores [`Settings`] as TOML.
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    /// Locates the settings file: `$GIT_SW_SETTINGS` if set, otherwise
    /// `<config dir>/git-sw/settings.toml`.
    pub fn new() -> Result<Self> {
        if let Some(path) = std::env::var_os(SETTINGS_ENV) {
            return Ok(Self::new_at(PathBuf::from(path)));
        }
        let config_dir = dirs::config_dir().context("Could not determine the user config directory")?;
        Ok(Self::new_at(
            config_dir.join(SETTINGS_DIR_NAME).join("settings.toml"),
        ))
    }

    pub fn new_at(settings_path: PathBuf) -> Self {
        Self { settings_path }
    }

    /// Writes the default settings unless a settings file already exists.
    /// Returns whether a file was created.
    pub fn initialize(&self) -> Result<bool> {
        if self.settings_path.exists() {
            return Ok(false);
        }
        self.save_settings(&Settings::default())?;
        Ok(true)
    }
}

impl SettingsProvider for SettingsManager {
    fn load_settings(&self) -> Result<Settings> {
        if !self.settings_path.exists() {
            debug!(path = %self.settings_path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }

        let content =
            fs::read_to_string(&self.settings_path).context("Failed to read settings file")?;

        toml::from_str(&content).context("Failed to parse settings file")
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;

        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }
        fs::write(&self.settings_path, content).context("Failed to write settings file")?;

        Ok(())
    }

    fn get_settings_path(&self) -> &Path {
        &self.settings_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_settings_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = SettingsManager::new_at(dir.path().join("settings.toml"));
        assert_eq!(manager.load_settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_initialize_writes_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let manager = SettingsManager::new_at(path.clone());

        assert!(manager.initialize().unwrap());
        assert!(path.exists());
        assert!(!manager.initialize().unwrap());
    }

    #[test]
    fn test_settings_round_trip() {
        let dir = tempdir().unwrap();
        let manager = SettingsManager::new_at(dir.path().join("settings.toml"));
        let settings = Settings {
            default_file: Some(PathBuf::from("/tmp/profile.gitconfig")),
            export_format: DocumentFormat::Json,
            verbose: true,
            ..Settings::default()
        };
        manager.save_settings(&settings).unwrap();
        assert_eq!(manager.load_settings().unwrap(), settings);
    }

    #[test]
    fn test_malformed_settings_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "export_format = [").unwrap();
        let manager = SettingsManager::new_at(path);
        assert!(manager.load_settings().is_err());
    }
}
