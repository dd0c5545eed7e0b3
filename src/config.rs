//! Layered settings.
//!
//! Loading order (later sources override earlier):
//! 1. built-in defaults
//! 2. an optional TOML file (`--config`)
//! 3. environment variables with the `PULSEWATCH__` prefix, e.g.
//!    `PULSEWATCH__DASHBOARD__USER_ID=7`
//! 4. command-line overrides

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::data::duration::parse_duration;
use crate::engine::{EngineConfig, OverlapPolicy};

const DEFAULTS: &str = r#"
[api]
endpoint = "http://127.0.0.1:5000"
timeout = "10s"

[dashboard]
user_id = 1
refresh_interval = "5m"
staleness = "5m"
notification_ttl = "5s"
overlap = "last-completed-wins"
export_dir = "."

[logging]
level = "info"
file = "pulsewatch.log"
"#;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub dashboard: DashboardSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub endpoint: String,
    #[serde(deserialize_with = "duration_str")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSettings {
    pub user_id: u64,
    #[serde(deserialize_with = "duration_str")]
    pub refresh_interval: Duration,
    #[serde(deserialize_with = "duration_str")]
    pub staleness: Duration,
    #[serde(deserialize_with = "duration_str")]
    pub notification_ttl: Duration,
    pub overlap: OverlapPolicy,
    /// Directory CSV exports are written to.
    pub export_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Default filter; `RUST_LOG` takes precedence.
    pub level: String,
    pub file: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Settings {
    /// Load settings, applying `overrides` (dotted key, value) last.
    pub fn load(path: Option<&Path>, overrides: &[(&str, String)]) -> Result<Self, SettingsError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULTS, config::FileFormat::Toml));

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(config::Environment::with_prefix("PULSEWATCH").separator("__"));

        for (key, value) in overrides {
            builder = builder.set_override(*key, value.as_str())?;
        }

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if !self.api.endpoint.starts_with("http://") && !self.api.endpoint.starts_with("https://") {
            return Err(SettingsError::InvalidValue(format!(
                "api.endpoint must be an http(s) URL, got '{}'",
                self.api.endpoint
            )));
        }
        if self.dashboard.refresh_interval.is_zero() {
            return Err(SettingsError::InvalidValue(
                "dashboard.refresh_interval cannot be 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            user_id: self.dashboard.user_id,
            refresh_interval: self.dashboard.refresh_interval,
            staleness: self.dashboard.staleness,
            notification_ttl: self.dashboard.notification_ttl,
            overlap: self.dashboard.overlap,
        }
    }
}

fn duration_str<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_duration(&s).map_err(serde::de::Error::custom)
}
