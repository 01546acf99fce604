use log::warn;

use crate::config;

/// Load settings, falling back to defaults when the config cannot be used.
///
/// Runs before the logger exists, so the problem is handed back to be
/// logged once logging is up.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(e) => (config::Settings::default(), Some(format!("invalid config: {e}"))),
        },
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config: {e}")),
        ),
    }
}

pub fn report(problem: Option<String>) {
    if let Some(p) = problem {
        warn!("{p}; using defaults");
    }
}
