use std::collections::HashMap;
use std::env;
use std::fs;

use chrono_tz::Tz;

use crate::clients::timetable_client::DEFAULT_API_URL;

pub const DEFAULT_CENTER: &str = "Huntingdon";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_TEMPLATE_DIR: &str = "./templates";
pub const DEFAULT_ASSETS_DIR: &str = "./public";
pub const DEFAULT_TIMEZONE: &str = "Europe/London";

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn load() -> Self {
        match env::var("CONFIG_FILE") {
            Ok(path) => AppConfig::from_file(&path).unwrap_or_default(),
            Err(_) => AppConfig::default(),
        }
    }

    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(format!("Invalid config line {}: {}", idx + 1, line));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if (value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\''))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    // Config file wins over the process environment.
    pub fn prop(&self, key: &str) -> Option<String> {
        self.get(key).or_else(|| env::var(key).ok())
    }
}

// Resolved once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Settings {
    pub center: String,
    pub listen_addr: String,
    pub template_dir: String,
    pub assets_dir: String,
    pub timezone: Tz,
    pub api_url: String,
}

impl Settings {
    pub fn from_config(config: &AppConfig) -> Result<Self, String> {
        let timezone_name = config
            .prop("TIMEZONE")
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|_| format!("Invalid TIMEZONE {}", timezone_name))?;

        Ok(Settings {
            center: config
                .prop("CENTER_NAME")
                .unwrap_or_else(|| DEFAULT_CENTER.to_string()),
            listen_addr: config
                .prop("LISTEN_ADDR")
                .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            template_dir: config
                .prop("TEMPLATE_DIR")
                .unwrap_or_else(|| DEFAULT_TEMPLATE_DIR.to_string()),
            assets_dir: config
                .prop("ASSETS_DIR")
                .unwrap_or_else(|| DEFAULT_ASSETS_DIR.to_string()),
            timezone,
            api_url: config
                .prop("API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}
