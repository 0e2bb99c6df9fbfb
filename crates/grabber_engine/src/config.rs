use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::fetch::FetchSettings;
use crate::persist::CollisionPolicy;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:38.0) Gecko/20100101 Firefox/38.0";
const DEFAULT_FOLDER: &str = "Image Grabber";

/// User preferences. Read once at startup; changing them requires a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrabberConfig {
    /// Root of the download tree.
    pub path: PathBuf,
    pub file_exists_mode: CollisionPolicy,
    pub save_by_nickname: bool,
    pub download_threads: usize,
    pub user_agent: String,
    /// Seconds.
    pub request_timeout: u64,
    /// Print job failures into the chat window.
    pub debug: bool,
}

impl Default for GrabberConfig {
    fn default() -> Self {
        Self {
            path: default_download_root(),
            file_exists_mode: CollisionPolicy::Rename,
            save_by_nickname: true,
            download_threads: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: 10,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("download_threads must be at least 1")]
    NoWorkers,
    #[error("request_timeout must be at least 1 second")]
    ZeroTimeout,
}

impl GrabberConfig {
    pub fn default_with_path(path: PathBuf) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.download_threads == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.request_timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout: self.request_timeout(),
            user_agent: self.user_agent.clone(),
        }
    }
}

fn default_download_root() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_FOLDER))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FOLDER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GrabberConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.path.ends_with(DEFAULT_FOLDER));
        assert_eq!(config.file_exists_mode, CollisionPolicy::Rename);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn zero_values_are_rejected() {
        let mut config = GrabberConfig::default_with_path(PathBuf::from("x"));
        config.download_threads = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoWorkers));
        config.download_threads = 1;
        config.request_timeout = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }
}
