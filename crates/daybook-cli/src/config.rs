use crate::logging::LogFormat;
use crate::timezone::{detect_system_timezone, normalize_timezone_input};
use chrono_tz::Tz;
use daybook_core::error::CoreError;
use daybook_core::sync::SyncConfig;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::time::Duration;

pub const CONFIG_FILE: &str = "daybook.toml";

/// Settings merged from defaults, `daybook.toml` and `DAYBOOK_*` variables.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// SQLite database file
    pub database_path: String,
    /// Owner id used for every CLI action
    pub owner: String,
    /// IANA timezone that decides what "today" is
    pub timezone: String,
    /// Window in which re-adding the same text is ignored
    pub debounce_ms: u64,
    /// Listen address for `serve`
    pub bind: String,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "daybook.db".to_string(),
            owner: default_owner(),
            timezone: detect_system_timezone(),
            debounce_ms: 1000,
            bind: "127.0.0.1:8787".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

fn default_owner() -> String {
    std::env::var("USER")
        .ok()
        .filter(|user| !user.trim().is_empty())
        .unwrap_or_else(|| "local".to_string())
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed("DAYBOOK_")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        figment.extract()
    }

    /// The configured zone; unknown names come back with suggestions.
    pub fn timezone(&self) -> Result<Tz, CoreError> {
        normalize_timezone_input(&self.timezone)
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }
}
