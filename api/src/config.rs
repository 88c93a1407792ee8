//! Service configuration from the environment

use formbuilder_core::application::AutoSaveConfig;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

pub const PORT_VAR: &str = "FORMBUILDER_PORT";
pub const HOST_VAR: &str = "FORMBUILDER_HOST";
pub const AUTOSAVE_VAR: &str = "FORMBUILDER_AUTOSAVE_MS";
pub const DRAFT_IDLE_VAR: &str = "FORMBUILDER_DRAFT_IDLE_SECS";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_AUTOSAVE_MS: u64 = 800;
const DEFAULT_DRAFT_IDLE_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub autosave: AutoSaveConfig,
    /// How long a settled draft session stays open
    pub draft_idle: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            autosave: AutoSaveConfig::default(),
            draft_idle: Duration::from_secs(DEFAULT_DRAFT_IDLE_SECS),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let autosave_ms = read(&lookup, AUTOSAVE_VAR, DEFAULT_AUTOSAVE_MS);
        Self {
            host: read(&lookup, HOST_VAR, DEFAULT_HOST.to_string()),
            port: read(&lookup, PORT_VAR, DEFAULT_PORT),
            autosave: AutoSaveConfig { debounce: Duration::from_millis(autosave_ms) },
            draft_idle: Duration::from_secs(read(&lookup, DRAFT_IDLE_VAR, DEFAULT_DRAFT_IDLE_SECS)),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, default = %default, "Invalid setting, using default");
                default
            }
        },
        None => {
            info!(key, default = %default, "Setting not provided, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = ApiConfig::from_lookup(|_| None);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.autosave.debounce, Duration::from_millis(800));
        assert_eq!(config.draft_idle, Duration::from_secs(300));
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let vars: HashMap<&str, &str> =
            [(PORT_VAR, "9090"), (HOST_VAR, "127.0.0.1"), (AUTOSAVE_VAR, "soon"), (DRAFT_IDLE_VAR, "45")]
            .into();
        let config = ApiConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.bind_address(), "127.0.0.1:9090");
        assert_eq!(config.autosave.debounce, Duration::from_millis(800));
        assert_eq!(config.draft_idle, Duration::from_secs(45));
    }
}
