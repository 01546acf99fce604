use std::{env, path::PathBuf, time::Duration};

use super::schema::Settings;
use crate::error::Error;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `CANTOR__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CANTOR")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> crate::Result<()> {
        if self.catalog.base_url.trim().is_empty() {
            return Err(Error::Config("catalog.base_url must not be empty".into()));
        }
        if self.catalog.audio_extension.trim().trim_start_matches('.').is_empty() {
            return Err(Error::Config("catalog.audio_extension must not be empty".into()));
        }
        if self.audio.poll_interval_ms == 0 {
            return Err(Error::Config("audio.poll_interval_ms must be >= 1".into()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.audio.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.request_timeout_secs)
    }

    /// Configured state file, or the XDG default.
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage.path.clone().or_else(default_storage_path)
    }
}

/// Resolve the config path from `CANTOR_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("CANTOR_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// `$XDG_CONFIG_HOME/cantor/config.toml` or `~/.config/cantor/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"]).map(|d| d.join("cantor").join("config.toml"))
}

/// `$XDG_DATA_HOME/cantor/state.json` or `~/.local/share/cantor/state.json`.
pub fn default_storage_path() -> Option<PathBuf> {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"]).map(|d| d.join("cantor").join("state.json"))
}

fn xdg_dir(var: &str, home_fallback: &[&str]) -> Option<PathBuf> {
    if let Some(dir) = env::var_os(var).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    env::var_os("HOME").map(|home| home_fallback.iter().fold(PathBuf::from(home), |p, s| p.join(s)))
}
