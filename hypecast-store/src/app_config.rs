use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Engine tunables. Defaults match the documented design: 25% overbooking
/// and a one-hour contact window.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_overbook_fraction")]
    pub overbook_fraction: f64,

    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    #[serde(default = "default_invitation_currency")]
    pub invitation_currency: String,
}

fn default_overbook_fraction() -> f64 {
    0.25
}

fn default_rate_limit_window_secs() -> u64 {
    3600
}

fn default_invitation_currency() -> String {
    "USD".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            overbook_fraction: default_overbook_fraction(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
            invitation_currency: default_invitation_currency(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific file, optional.
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in.
            .add_source(config::File::with_name("config/local").required(false))
            // `HYPECAST_ENGINE__OVERBOOK_FRACTION=0.3` style overrides.
            .add_source(config::Environment::with_prefix("HYPECAST").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
