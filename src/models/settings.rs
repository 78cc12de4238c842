use std::sync::OnceLock;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub static SETTINGS: OnceLock<Settings> = OnceLock::new();

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Base url of the deck service. Without one every player gets the starter deck.
    #[serde(default)]
    pub deck_server: Option<String>,
    pub turn_tick_ms: u64,
}

impl Settings {
    /// Reads `settings.toml` (optional) and `CCG_*` environment variables over the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8000)?
            .set_default("log_level", "info")?
            .set_default("turn_tick_ms", 1000)?
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("CCG").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Settings of this process, or the defaults when none were installed (tests).
    pub fn current() -> &'static Settings {
        SETTINGS.get_or_init(Settings::default)
    }

    pub fn turn_tick(&self) -> Duration {
        Duration::from_millis(self.turn_tick_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            deck_server: None,
            turn_tick_ms: 1000,
        }
    }
}
