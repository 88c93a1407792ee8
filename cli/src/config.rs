//! CLI Configuration

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR: &str = ".formbuilder";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub user: Option<String>,
    pub role: Option<String>,
    pub default_format: Option<String>,
}

impl Config {
    pub fn load(profile: Option<&str>) -> Result<Self> {
        let path = Self::config_path(profile)?;
        if path.exists() {
            let content = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, profile: Option<&str>) -> Result<PathBuf> {
        let path = Self::config_path(profile)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(path)
    }

    pub fn get(&self, key: &str) -> Result<Option<&str>> {
        let value = match key {
            "api_url" => &self.api_url,
            "user" => &self.user,
            "role" => &self.role,
            "default_format" => &self.default_format,
            _ => return Err(anyhow!("Unknown config key: {}", key)),
        };
        Ok(value.as_deref())
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        let slot = match key {
            "api_url" => &mut self.api_url,
            "user" => &mut self.user,
            "role" => &mut self.role,
            "default_format" => &mut self.default_format,
            _ => return Err(anyhow!("Unknown config key: {}", key)),
        };
        *slot = Some(value);
        Ok(())
    }

    fn config_path(profile: Option<&str>) -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot find home directory"))?;
        Ok(home.join(CONFIG_DIR).join(file_name(profile)))
    }
}

fn file_name(profile: Option<&str>) -> String {
    match profile {
        Some(p) => format!("config.{}.toml", p),
        None => "config.toml".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_file_names() {
        assert_eq!(file_name(None), "config.toml");
        assert_eq!(file_name(Some("staging")), "config.staging.toml");
    }

    #[test]
    fn test_get_and_set_keys() {
        let mut config = Config::default();
        config.set("user", "alice".into()).unwrap();
        assert_eq!(config.get("user").unwrap(), Some("alice"));
        assert_eq!(config.get("role").unwrap(), None);
        assert!(config.set("tenant_id", "x".into()).is_err());

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.user.as_deref(), Some("alice"));
    }
}
