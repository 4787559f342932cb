use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Resolve the workspace data directory path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. LOGHIVE_PATH environment variable (with tilde expansion)
/// 3. XDG data directory (recommended default)
/// 4. ~/.loghive (fallback for systems without XDG)
pub fn resolve_workspace_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("LOGHIVE_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("loghive"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".loghive"));
    }

    Err(Error::Config(
        "Could not determine workspace path: no HOME directory or XDG data directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub enabled: bool,
    pub log_root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderSettings>,
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(resolve_workspace_path(None)?.join("config.toml"))
    }

    /// Probe every registered provider's default log root and enable the
    /// ones that exist on this machine.
    pub fn detect_providers() -> Config {
        let mut providers = BTreeMap::new();
        for (name, log_root) in loghive_providers::default_log_roots() {
            if log_root.exists() {
                providers.insert(
                    name,
                    ProviderSettings {
                        enabled: true,
                        log_root,
                    },
                );
            }
        }
        Config { providers }
    }

    /// Enabled providers paired with their log roots, resolving unknown
    /// names lazily at scan time.
    pub fn enabled_providers(&self) -> Vec<(String, PathBuf)> {
        self.providers
            .iter()
            .filter(|(_, settings)| settings.enabled)
            .map(|(name, settings)| (name.clone(), settings.log_root.clone()))
            .collect()
    }
}

pub fn primary_db_path(workspace: &Path) -> PathBuf {
    workspace.join("loghive.db")
}

pub fn search_db_path(workspace: &Path) -> PathBuf {
    workspace.join("search.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(config.providers.is_empty());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.providers.insert(
            "codex".to_string(),
            ProviderSettings {
                enabled: true,
                log_root: PathBuf::from("/tmp/codex-logs"),
            },
        );
        config.providers.insert(
            "gemini".to_string(),
            ProviderSettings {
                enabled: false,
                log_root: PathBuf::from("/tmp/gemini-logs"),
            },
        );
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.providers.len(), 2);
        assert_eq!(
            loaded.enabled_providers(),
            vec![("codex".to_string(), PathBuf::from("/tmp/codex-logs"))]
        );
    }

    #[test]
    fn explicit_path_wins() {
        let path = resolve_workspace_path(Some("/custom/workspace")).unwrap();
        assert_eq!(path, PathBuf::from("/custom/workspace"));
    }
}
