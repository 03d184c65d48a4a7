use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The toggles reachable from the settings panel. `auto_close_pairs` is read
/// by buffer insertion, `inline_error_markers` by the line decorator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub auto_close_pairs: bool,
    pub inline_error_markers: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_close_pairs: true,
            inline_error_markers: true,
        }
    }
}

impl Settings {
    /// Load saved settings, falling back to defaults on any problem. A
    /// corrupt or missing settings file must never stop the editor.
    pub fn load() -> Self {
        let path = match Self::settings_path() {
            Some(path) => path,
            None => return Self::default(),
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Self>(&content) {
                Ok(settings) => {
                    log::info!("Loaded settings from: {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Failed to parse settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!("No settings file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = match Self::settings_path() {
            Some(path) => path,
            None => return Ok(()),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        log::info!("Saved settings to: {}", path.display());
        Ok(())
    }

    fn settings_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("STILUS_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("STILUS_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("settings.json"));
        }

        ProjectDirs::from("com", "stilus", "stilus")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }
}

/// Settings path resolution reads process-wide env vars; tests that touch
/// them (here and in other modules) serialize on this lock.
#[cfg(test)]
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn with_config_dir<T>(dir: &std::path::Path, body: impl FnOnce() -> T) -> T {
        let _guard = env_lock();
        let previous_dir = std::env::var("STILUS_CONFIG_DIR").ok();
        let previous_path = std::env::var("STILUS_CONFIG_PATH").ok();
        std::env::set_var("STILUS_CONFIG_DIR", dir);
        std::env::remove_var("STILUS_CONFIG_PATH");

        let result = body();

        match previous_dir {
            Some(value) => std::env::set_var("STILUS_CONFIG_DIR", value),
            None => std::env::remove_var("STILUS_CONFIG_DIR"),
        }
        match previous_path {
            Some(value) => std::env::set_var("STILUS_CONFIG_PATH", value),
            None => std::env::remove_var("STILUS_CONFIG_PATH"),
        }
        result
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.auto_close_pairs);
        assert!(settings.inline_error_markers);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        with_config_dir(temp_dir.path(), || {
            let settings = Settings {
                auto_close_pairs: false,
                inline_error_markers: true,
            };
            settings.save().unwrap();

            let loaded = Settings::load();
            assert!(!loaded.auto_close_pairs);
            assert!(loaded.inline_error_markers);
        });
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        with_config_dir(temp_dir.path(), || {
            let loaded = Settings::load();
            assert!(loaded.auto_close_pairs);
            assert!(loaded.inline_error_markers);
        });
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("settings.json"), "{not json").unwrap();
        with_config_dir(temp_dir.path(), || {
            let loaded = Settings::load();
            assert!(loaded.auto_close_pairs);
        });
    }

    #[test]
    fn test_serialization_shape() {
        let json = serde_json::to_string_pretty(&Settings::default()).unwrap();
        assert!(json.contains("\"auto_close_pairs\""));
        assert!(json.contains("\"inline_error_markers\""));
    }
}
