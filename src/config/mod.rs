//! Configuration loading and management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Folder scanned for save archives.
    /// `%LOCALAPPDATA%` and `$env:LOCALAPPDATA` are expanded at scan time.
    #[serde(default = "default_saves_folder")]
    pub saves_folder: String,

    /// Explicit path to the Divine executable.
    /// When unset, the bundled copy and then `PATH` are searched.
    #[serde(default)]
    pub divine_path: Option<PathBuf>,

    /// Directory holding the extraction working area.
    /// When unset, the user cache directory is used.
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            saves_folder: default_saves_folder(),
            divine_path: None,
            work_dir: None,
        }
    }
}

fn default_saves_folder() -> String {
    if cfg!(windows) {
        return "%LOCALAPPDATA%\\Larian Studios\\Baldur's Gate 3\\PlayerProfiles\\Public\\Savegames\\Story"
            .to_string();
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Larian Studios/Baldur's Gate 3/PlayerProfiles/Public/Savegames/Story")
        .to_string_lossy()
        .into_owned()
}

impl Config {
    /// Get the default config file path (<config dir>/lsvedit/config.toml)
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lsvedit")
            .join("config.toml")
    }

    /// The directory saves are unpacked into
    ///
    /// Always a dedicated subdirectory, since the backend clears it on every
    /// extraction.
    pub fn extraction_dir(&self) -> PathBuf {
        match &self.work_dir {
            Some(dir) => dir.join("temp_save"),
            None => dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("lsvedit")
                .join("temp_save"),
        }
    }

    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration, falling back to defaults.
    ///
    /// An explicit `path` must exist; with none given, a missing file at the
    /// default location just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let default_path = Self::default_path();
        if default_path.exists() {
            Self::from_file(&default_path)
        } else {
            debug!(path = %default_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a file with an atomic write.
    ///
    /// Writes a temp file and renames it over the target, creating the
    /// parent directory if needed.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        let temp_path = path.with_extension("toml.tmp");
        std::fs::write(&temp_path, &content)
            .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;

        std::fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename config file: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_point_at_the_larian_saves_folder() {
        let config = Config::default();
        assert!(config.saves_folder.contains("Larian Studios"));
        assert!(config.saves_folder.ends_with("Story"));
        assert!(config.divine_path.is_none());
        assert!(config.work_dir.is_none());
    }

    #[test]
    fn extraction_dir_is_a_subdirectory_of_the_work_dir() {
        let config = Config {
            work_dir: Some(PathBuf::from("/tmp/lsvedit-work")),
            ..Config::default()
        };
        assert_eq!(
            config.extraction_dir(),
            PathBuf::from("/tmp/lsvedit-work/temp_save")
        );
    }

    #[test]
    fn configs_survive_a_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config {
            saves_folder: "/saves".to_string(),
            divine_path: Some(PathBuf::from("/opt/lslib/Divine.exe")),
            work_dir: Some(PathBuf::from("/tmp/work")),
        };
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.saves_folder, "/saves");
        assert_eq!(
            loaded.divine_path,
            Some(PathBuf::from("/opt/lslib/Divine.exe"))
        );
        assert_eq!(loaded.work_dir, Some(PathBuf::from("/tmp/work")));
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "divine_path = \"/opt/lslib/Divine.exe\"\n").unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(
            loaded.divine_path,
            Some(PathBuf::from("/opt/lslib/Divine.exe"))
        );
        assert_eq!(loaded.saves_folder, default_saves_folder());
    }

    #[test]
    fn an_explicit_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");

        let err = Config::load(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
