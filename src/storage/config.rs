//! Configuration handling
//!
//! Configuration is TOML with optional sections. Lookup order: an explicit
//! `--config` path, then the vault's own `9_ADMIN/maskvault.toml`, then
//! `~/.config/maskvault/config.toml` (per-platform via `directories`).
//! A missing file at any fallback level is fine; defaults apply.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Vault location settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VaultSection {
    /// Vault root. A `--vault` flag overrides this.
    pub path: Option<PathBuf>,
}

/// Inbox-watching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchSection {
    /// Seconds of quiet before a changed file is ingested.
    pub debounce_seconds: u64,

    /// Report moves without performing them.
    pub dry_run: bool,

    /// Drop inbox files whose content hash is already indexed.
    pub dedup: bool,
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            debounce_seconds: 2,
            dry_run: false,
            dedup: true,
        }
    }
}

/// Combined configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub vault: VaultSection,
    pub watch: WatchSection,
}

impl Config {
    /// Loads configuration, trying `explicit`, then the vault-local file,
    /// then the user config directory.
    ///
    /// An explicit path that does not exist is an error; the fallback
    /// locations are optional.
    pub fn load(explicit: Option<&Path>, vault_hint: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Some(vault) = vault_hint {
            let local = vault.join("9_ADMIN").join("maskvault.toml");
            if local.exists() {
                return Self::from_file(&local);
            }
        }

        if let Some(dir) = Self::user_config_dir() {
            let global = dir.join("config.toml");
            if global.exists() {
                return Self::from_file(&global);
            }
        }

        Ok(Self::default())
    }

    /// Returns the per-user configuration directory.
    pub fn user_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "maskvault", "maskvault")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_any_file() {
        let config = Config::load(None, None).unwrap();
        assert_eq!(config.watch.debounce_seconds, 2);
        assert!(config.watch.dedup);
        assert!(!config.watch.dry_run);
        assert!(config.vault.path.is_none());
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [vault]
            path = "/data/vault"

            [watch]
            debounce_seconds = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.vault.path, Some(PathBuf::from("/data/vault")));
        assert_eq!(config.watch.debounce_seconds, 10);
        // Unset keys keep their defaults.
        assert!(config.watch.dedup);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let missing = Path::new("/nonexistent/maskvault.toml");
        assert!(Config::load(Some(missing), None).is_err());
    }

    #[test]
    fn vault_local_config_wins_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let admin = dir.path().join("9_ADMIN");
        fs::create_dir_all(&admin).unwrap();
        fs::write(
            admin.join("maskvault.toml"),
            "[watch]\ndebounce_seconds = 30\n",
        )
        .unwrap();

        let config = Config::load(None, Some(dir.path())).unwrap();
        assert_eq!(config.watch.debounce_seconds, 30);
    }
}
