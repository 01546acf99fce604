use crate::config::LoggingSettings;

/// Install the global logger. `RUST_LOG` wins over the configured level.
pub fn init(settings: &LoggingSettings) {
    let env = env_logger::Env::default().default_filter_or(settings.level.as_str());
    if let Err(e) = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()
    {
        eprintln!("cantor: logger already initialised: {e}");
    }
}
