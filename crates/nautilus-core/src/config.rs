//! Configuration types for Nautilus Core

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::mode::Mode;
use crate::path::is_valid_name;

/// Session bootstrap settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Mode of the root directory.
    pub root_mode: Mode,
    /// Mode given to directories created by `mkdir`.
    pub directory_mode: Mode,
    /// Mode given to files created by `touch`.
    pub file_mode: Mode,
    /// Users registered next to `root` when the session starts.
    pub users: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            root_mode: Mode::DEFAULT_DIRECTORY,
            directory_mode: Mode::DEFAULT_DIRECTORY,
            file_mode: Mode::DEFAULT_FILE,
            users: Vec::new(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid user name in config: {0:?}")]
    InvalidUser(String),
    #[error("{0} must be a directory mode")]
    NotADirectoryMode(&'static str),
    #[error("file_mode must not have the directory bit set")]
    FileModeIsDirectory,
}

impl ShellConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.root_mode.is_dir() {
            return Err(ConfigError::NotADirectoryMode("root_mode"));
        }
        if !self.directory_mode.is_dir() {
            return Err(ConfigError::NotADirectoryMode("directory_mode"));
        }
        if self.file_mode.is_dir() {
            return Err(ConfigError::FileModeIsDirectory);
        }
        if let Some(bad) = self.users.iter().find(|u| u.is_empty() || !is_valid_name(u)) {
            return Err(ConfigError::InvalidUser(bad.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = ShellConfig::from_json("{}").unwrap();
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = ShellConfig::from_json(r#"{"file_mode": 48, "users": ["alice"]}"#).unwrap();
        assert_eq!(config.file_mode, Mode::new(0b011_0000));
        assert_eq!(config.directory_mode, Mode::DEFAULT_DIRECTORY);
        assert_eq!(config.users, vec!["alice".to_string()]);
    }

    #[test]
    fn test_rejects_bad_users_and_modes() {
        assert!(matches!(
            ShellConfig::from_json(r#"{"users": ["a/b"]}"#),
            Err(ConfigError::InvalidUser(_))
        ));
        assert!(matches!(
            ShellConfig::from_json(r#"{"directory_mode": 61}"#),
            Err(ConfigError::NotADirectoryMode("directory_mode"))
        ));
        assert!(matches!(
            ShellConfig::from_json(r#"{"file_mode": 116}"#),
            Err(ConfigError::FileModeIsDirectory)
        ));
        assert!(matches!(ShellConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nautilus.json");
        std::fs::write(&path, r#"{"users": ["bob"]}"#).unwrap();
        let config = ShellConfig::load(&path).unwrap();
        assert_eq!(config.users, vec!["bob".to_string()]);
    }
}
