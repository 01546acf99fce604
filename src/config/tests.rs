use super::load::{default_config_path, default_storage_path, resolve_config_path};
use super::schema::*;
use crate::audio::RepeatMode;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

fn write_config(body: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, body).unwrap();
    (dir, path)
}

#[test]
fn resolve_config_path_prefers_cantor_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CANTOR_CONFIG_PATH", "/tmp/cantor-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/cantor-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/xdg-config-home/cantor/config.toml")
    );
}

#[test]
fn default_paths_fall_back_to_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::remove("XDG_DATA_HOME");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/home-dir/.config/cantor/config.toml")
    );
    assert_eq!(
        default_storage_path().unwrap(),
        PathBuf::from("/tmp/home-dir/.local/share/cantor/state.json")
    );
}

#[test]
fn storage_path_setting_overrides_xdg_data_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_DATA_HOME", "/tmp/xdg-data");

    let mut s = Settings::default();
    assert_eq!(
        s.storage_path().unwrap(),
        PathBuf::from("/tmp/xdg-data/cantor/state.json")
    );

    s.storage.path = Some(PathBuf::from("/srv/cantor/state.json"));
    assert_eq!(s.storage_path().unwrap(), PathBuf::from("/srv/cantor/state.json"));
}

#[test]
fn defaults_are_valid() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(s.catalog.audio_extension, "mp3");
    assert_eq!(s.catalog.request_timeout_secs, 15);
    assert_eq!(s.audio.poll_interval_ms, 200);
    assert_eq!(s.logging.level, "info");
    assert!(!s.playback.shuffle);
    assert_eq!(RepeatMode::from(s.playback.repeat), RepeatMode::Off);
}

#[test]
fn validate_rejects_unusable_values() {
    let mut s = Settings::default();
    s.catalog.base_url = "  ".into();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.catalog.audio_extension = ".".into();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.poll_interval_ms = 0;
    let err = s.validate().unwrap_err();
    assert!(err.to_string().contains("poll_interval_ms"));
}

#[test]
fn repeat_aliases_parse_from_toml() {
    for (text, expected) in [
        ("off", RepeatSetting::Off),
        ("none", RepeatSetting::Off),
        ("repeat-all", RepeatSetting::RepeatAll),
        ("all", RepeatSetting::RepeatAll),
        ("loop-all", RepeatSetting::RepeatAll),
        ("repeat-one", RepeatSetting::RepeatOne),
        ("one", RepeatSetting::RepeatOne),
        ("repeat_one", RepeatSetting::RepeatOne),
    ] {
        let body = format!("[playback]\nrepeat = \"{text}\"\n");
        let s: Settings = toml::from_str(&body).unwrap();
        assert_eq!(s.playback.repeat, expected, "{text}");
    }

    assert!(toml::from_str::<Settings>("[playback]\nrepeat = \"sometimes\"\n").is_err());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let (_dir, cfg_path) = write_config(
        r#"
[catalog]
base_url = "https://media.example.org/"
audio_extension = "ogg"
request_timeout_secs = 4

[playback]
shuffle = true
repeat = "repeat-one"

[audio]
poll_interval_ms = 50

[storage]
path = "/tmp/cantor-state.json"

[logging]
level = "debug"
"#,
    );

    let _g1 = EnvGuard::set("CANTOR_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CANTOR__AUDIO__POLL_INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.catalog.base_url, "https://media.example.org/");
    assert_eq!(s.catalog.audio_extension, "ogg");
    assert_eq!(s.request_timeout(), std::time::Duration::from_secs(4));
    assert!(s.playback.shuffle);
    assert_eq!(s.playback.repeat, RepeatSetting::RepeatOne);
    assert_eq!(s.poll_interval(), std::time::Duration::from_millis(50));
    assert_eq!(s.storage.path, Some(PathBuf::from("/tmp/cantor-state.json")));
    assert_eq!(s.logging.level, "debug");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_missing_file_yields_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::set(
        "CANTOR_CONFIG_PATH",
        dir.path().join("absent.toml").to_str().unwrap(),
    );
    let _g2 = EnvGuard::remove("CANTOR__AUDIO__POLL_INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.poll_interval_ms, 200);
    assert_eq!(s.catalog.base_url, CatalogSettings::default().base_url);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let (_dir, cfg_path) = write_config(
        r#"
[audio]
poll_interval_ms = 250
"#,
    );

    let _g1 = EnvGuard::set("CANTOR_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CANTOR__AUDIO__POLL_INTERVAL_MS", "75");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.poll_interval_ms, 75);
}
