use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FunlearnError, Result};

/// Fixed key the library snapshot is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "edulearn-storage";

/// Root application configuration, loaded from `~/.config/funlearn/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_path: String,
    pub key: String,
}

/// Simulated latency of each generation step, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub summary_delay_ms: u64,
    pub quiz_delay_ms: u64,
    pub games_delay_ms: u64,
    pub audio_delay_ms: u64,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("funlearn");

        Self {
            data_path: data_dir.to_string_lossy().to_string(),
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            summary_delay_ms: 3000,
            quiz_delay_ms: 2500,
            games_delay_ms: 2500,
            audio_delay_ms: 4000,
        }
    }
}

impl GenerationConfig {
    /// Zero delays everywhere; handy for scripts and tests.
    pub fn instant() -> Self {
        Self {
            summary_delay_ms: 0,
            quiz_delay_ms: 0,
            games_delay_ms: 0,
            audio_delay_ms: 0,
        }
    }

    pub fn summary_delay(&self) -> Duration {
        Duration::from_millis(self.summary_delay_ms)
    }

    pub fn quiz_delay(&self) -> Duration {
        Duration::from_millis(self.quiz_delay_ms)
    }

    pub fn games_delay(&self) -> Duration {
        Duration::from_millis(self.games_delay_ms)
    }

    pub fn audio_delay(&self) -> Duration {
        Duration::from_millis(self.audio_delay_ms)
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/funlearn/config.toml`
    pub fn config_path() -> PathBuf {
        // Allow override via env var
        if let Ok(path) = std::env::var("FUNLEARN_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("funlearn")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        Self::load_from(&path)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard path.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        self.save_to(&path)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let key = self.storage.key.trim();
        if key.is_empty() {
            return Err(FunlearnError::ConfigError("storage.key must not be empty".into()));
        }
        if key.contains(['/', '\\']) {
            return Err(FunlearnError::ConfigError(format!(
                "storage.key must be a plain name, got {key:?}"
            )));
        }
        Ok(())
    }

    /// Override the data directory (used for `FUNLEARN_DATA_PATH`).
    pub fn set_data_path(&mut self, path: PathBuf) {
        self.storage.data_path = path.to_string_lossy().to_string();
    }

    // ─── Derived paths ─────────────────────────────────────

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_path)
    }

    /// Path to the JSON snapshot: `{data_path}/{key}.json`.
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_path().join(format!("{}.json", self.storage.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.storage.key, "edulearn-storage");
        assert_eq!(cfg.generation.summary_delay_ms, 3000);
        assert_eq!(cfg.generation.audio_delay_ms, 4000);
        assert!(!cfg.storage.data_path.is_empty());
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = AppConfig::default();
        cfg.generation.quiz_delay_ms = 10;
        cfg.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.storage.key, cfg.storage.key);
        assert_eq!(loaded.generation.quiz_delay_ms, 10);
        assert_eq!(loaded.generation.games_delay_ms, 2500);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[generation]\naudio_delay_ms = 1\n").unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.generation.audio_delay_ms, 1);
        assert_eq!(loaded.generation.summary_delay_ms, 3000);
        assert_eq!(loaded.storage.key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let cfg = AppConfig::load_from(Path::new("/tmp/nonexistent_funlearn_config.toml")).unwrap();
        assert_eq!(cfg.storage.key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_rejects_key_with_separator() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\nkey = \"../escape\"\n").unwrap();

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(FunlearnError::ConfigError(_))
        ));
    }

    #[test]
    fn test_snapshot_path() {
        let mut cfg = AppConfig::default();
        cfg.set_data_path(PathBuf::from("/srv/funlearn"));
        assert_eq!(
            cfg.snapshot_path(),
            PathBuf::from("/srv/funlearn/edulearn-storage.json")
        );
    }
}
