use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "bingo")
    }

    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("bingo_config.json"))
    }

    pub fn words_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.data_dir().join("words.json"))
            .unwrap_or_else(|| PathBuf::from("words.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("bingo");
            Some(state_dir.join("bingo.log"))
        } else {
            Self::project().map(|pd| pd.data_local_dir().join("bingo.log"))
        }
    }
}
