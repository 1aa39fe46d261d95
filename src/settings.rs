use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::models::plans::Plan;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub data_file: Option<String>,
}

impl Storage {
    pub fn data_path(&self) -> PathBuf {
        if let Some(path) = &self.data_file {
            return PathBuf::from(path);
        }

        match ProjectDirs::from("com", "selfcare", "selfcare") {
            Some(dirs) => dirs.data_dir().join("storage.json"),
            None => PathBuf::from("storage.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Timings {
    pub api_latency_ms: u64,
    pub payment_ms: u64,
    pub chat_reply_ms: u64,
    pub notification_visible_ms: u64,
    pub notification_exit_ms: u64,
}

impl Timings {
    pub fn api_latency(&self) -> Duration {
        Duration::from_millis(self.api_latency_ms)
    }

    pub fn payment(&self) -> Duration {
        Duration::from_millis(self.payment_ms)
    }

    pub fn chat_reply(&self) -> Duration {
        Duration::from_millis(self.chat_reply_ms)
    }

    pub fn notification_visible(&self) -> Duration {
        Duration::from_millis(self.notification_visible_ms)
    }

    pub fn notification_exit(&self) -> Duration {
        Duration::from_millis(self.notification_exit_ms)
    }
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            api_latency_ms: 500,
            payment_ms: 2000,
            chat_reply_ms: 1000,
            notification_visible_ms: 3000,
            notification_exit_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub base_url: String,
}

impl Default for Api {
    fn default() -> Self {
        Api {
            base_url: "https://api.jio.com/v1".to_string(),
        }
    }
}

/// Identity given to users who log in without going through signup.
#[derive(Debug, Clone, Deserialize)]
pub struct Defaults {
    pub user_name: String,
    pub user_email: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            user_name: "Jio User".to_string(),
            user_email: "user@jio.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub storage: Storage,
    pub timings: Timings,
    pub api: Api,
    pub defaults: Defaults,
    #[serde(default)]
    pub plans: Vec<Plan>,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let Settings {
            api,
            timings,
            defaults,
            ..
        } = Settings::default();

        let config = Config::builder()
            .set_default("api.base_url", api.base_url)?
            .set_default("timings.api_latency_ms", timings.api_latency_ms)?
            .set_default("timings.payment_ms", timings.payment_ms)?
            .set_default("timings.chat_reply_ms", timings.chat_reply_ms)?
            .set_default("timings.notification_visible_ms", timings.notification_visible_ms)?
            .set_default("timings.notification_exit_ms", timings.notification_exit_ms)?
            .set_default("defaults.user_name", defaults.user_name)?
            .set_default("defaults.user_email", defaults.user_email)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("SELFCARE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let settings = Settings::new(path.to_str().unwrap()).unwrap();

        assert_eq!(settings.timings.payment_ms, 2000);
        assert_eq!(settings.timings.notification_exit_ms, 300);
        assert_eq!(settings.defaults.user_name, "Jio User");
        assert!(settings.plans.is_empty());
    }

    #[test]
    fn file_overrides_defaults_and_lists_plans() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("selfcare.toml");
        fs::write(
            &path,
            r#"
[storage]
data_file = "/tmp/selfcare-test.json"

[timings]
payment_ms = 10

[[plans]]
amount = "299"
validity = "28 days"
data = "2GB/day"
category = "popular"
"#,
        )
        .unwrap();

        let settings = Settings::new(path.to_str().unwrap()).unwrap();

        assert_eq!(settings.timings.payment_ms, 10);
        assert_eq!(settings.timings.chat_reply_ms, 1000);
        assert_eq!(
            settings.storage.data_path(),
            PathBuf::from("/tmp/selfcare-test.json")
        );
        assert_eq!(settings.plans.len(), 1);
        assert_eq!(settings.plans[0].amount, "299");
    }
}
