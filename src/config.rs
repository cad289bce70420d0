use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::cell::CellOptions;
use crate::word::DEFAULT_TIMER_SECS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub words_file: Option<PathBuf>,
    pub shuffle: bool,
    pub free_premarked: bool,
    pub celebrations: bool,
    pub default_timer_secs: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            words_file: None,
            shuffle: true,
            free_premarked: true,
            celebrations: true,
            default_timer_secs: DEFAULT_TIMER_SECS,
        }
    }
}

impl Config {
    /// A zero timer length falls back to the default, like an invalid `time`.
    fn normalised(mut self) -> Self {
        if self.default_timer_secs == 0 {
            log::warn!(
                "config default_timer_secs is 0, using {DEFAULT_TIMER_SECS}"
            );
            self.default_timer_secs = DEFAULT_TIMER_SECS;
        }
        self
    }

    pub fn words_path(&self) -> PathBuf {
        self.words_file.clone().unwrap_or_else(AppDirs::words_path)
    }

    pub fn cell_options(&self) -> CellOptions {
        CellOptions {
            free_premarked: self.free_premarked,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg.normalised(),
                Err(e) => log::warn!("ignoring unreadable config {}: {e}", self.path.display()),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            words_file: Some(PathBuf::from("/tmp/office.json")),
            shuffle: false,
            free_premarked: false,
            celebrations: false,
            default_timer_secs: 90,
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
        assert_eq!(loaded.words_path(), PathBuf::from("/tmp/office.json"));
        assert!(!loaded.cell_options().free_premarked);
    }

    #[test]
    fn missing_or_broken_file_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());

        fs::write(&path, "{ nope").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "shuffle": false }"#).unwrap();
        let loaded = FileConfigStore::with_path(&path).load();
        assert!(!loaded.shuffle);
        assert!(loaded.celebrations);
        assert_eq!(loaded.default_timer_secs, DEFAULT_TIMER_SECS);
    }

    #[test]
    fn zero_timer_length_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "default_timer_secs": 0, "shuffle": false }"#).unwrap();
        let loaded = FileConfigStore::with_path(&path).load();
        assert_eq!(loaded.default_timer_secs, DEFAULT_TIMER_SECS);
        assert!(!loaded.shuffle);
    }
}
