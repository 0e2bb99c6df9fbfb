use std::fs;
use std::io;
use std::path::Path;

use grabber_engine::GrabberConfig;
use grabber_logging::{grabber_info, grabber_warn};

pub(crate) const DEFAULT_CONFIG_FILE: &str = "image_grabber.ron";

/// Read the grabber settings from a RON file. A missing or unreadable file
/// falls back to the defaults.
pub(crate) fn load_config(path: &Path) -> GrabberConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            grabber_info!("No settings at {:?}, using defaults", path);
            return GrabberConfig::default();
        }
        Err(err) => {
            grabber_warn!("Failed to read settings from {:?}: {}", path, err);
            return GrabberConfig::default();
        }
    };

    match ron::from_str::<GrabberConfig>(&content) {
        Ok(config) => {
            grabber_info!("Loaded settings from {:?}", path);
            config
        }
        Err(err) => {
            grabber_warn!("Failed to parse settings from {:?}: {}", path, err);
            GrabberConfig::default()
        }
    }
}
