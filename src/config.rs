// file: src/config.rs
// description: application configuration from defaults, optional toml and environment
// reference: https://docs.rs/config

use crate::error::{Result, SyncError};
use crate::models::CloneAuth;
use chrono::Weekday;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_CONFIG_FILE: &str = "config/default.toml";

#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceConfig,
    pub mirror: MirrorConfig,
    pub schedule: ScheduleConfig,
    pub http_timeout: Duration,
    pub dry_run: bool,
}

#[derive(Clone)]
pub struct SourceConfig {
    pub api_url: String,
    pub username: String,
    pub token: String,
}

#[derive(Clone)]
pub struct MirrorConfig {
    /// Gitea API root, e.g. `https://git.example.com/api/v1`.
    pub base_url: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub weekday: Weekday,
    pub hour: u32,
    pub utc: bool,
    pub run_on_start: bool,
}

impl SourceConfig {
    /// Credentials handed to the mirror service for private repositories.
    pub fn clone_auth(&self) -> CloneAuth {
        CloneAuth {
            auth_username: self.username.clone(),
            auth_password: self.token.clone(),
        }
    }
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("token", &"***")
            .finish()
    }
}

impl fmt::Debug for MirrorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MirrorConfig")
            .field("base_url", &self.base_url)
            .field("token", &"***")
            .finish()
    }
}

/// Flat key space shared by the toml file and the environment.
#[derive(Debug, Deserialize)]
struct Settings {
    gitea_url: Option<String>,
    gitea_token: Option<String>,
    github_username: Option<String>,
    github_token: Option<String>,
    github_api_url: String,
    http_timeout_secs: u64,
    schedule_weekday: String,
    schedule_hour: u32,
    schedule_utc: bool,
    run_on_start: bool,
    dry_run: bool,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = Self::defaults()?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false));
        }

        builder = builder.add_source(Environment::default());

        Self::build(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        config::Config::builder()
            .set_default("github_api_url", DEFAULT_GITHUB_API_URL)
            .and_then(|b| b.set_default("http_timeout_secs", 30i64))
            .and_then(|b| b.set_default("schedule_weekday", "sun"))
            .and_then(|b| b.set_default("schedule_hour", 0i64))
            .and_then(|b| b.set_default("schedule_utc", false))
            .and_then(|b| b.set_default("run_on_start", true))
            .and_then(|b| b.set_default("dry_run", false))
            .map_err(|e| SyncError::Config(e.to_string()))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings: Settings = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| SyncError::Config(e.to_string()))?;

        Self::from_settings(settings)
    }

    fn from_settings(settings: Settings) -> Result<Self> {
        let mut missing = Vec::new();
        let gitea_url = required(settings.gitea_url, "GITEA_URL", &mut missing);
        let gitea_token = required(settings.gitea_token, "GITEA_TOKEN", &mut missing);
        let github_username = required(settings.github_username, "GITHUB_USERNAME", &mut missing);
        let github_token = required(settings.github_token, "GITHUB_TOKEN", &mut missing);

        if !missing.is_empty() {
            return Err(SyncError::Config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let weekday = settings
            .schedule_weekday
            .trim()
            .parse::<Weekday>()
            .map_err(|_| {
                SyncError::Config(format!(
                    "schedule_weekday is not a weekday: {}",
                    settings.schedule_weekday
                ))
            })?;

        let config = Config {
            source: SourceConfig {
                api_url: normalize_url(&settings.github_api_url),
                username: github_username,
                token: github_token,
            },
            mirror: MirrorConfig {
                base_url: normalize_url(&gitea_url),
                token: gitea_token,
            },
            schedule: ScheduleConfig {
                weekday,
                hour: settings.schedule_hour,
                utc: settings.schedule_utc,
                run_on_start: settings.run_on_start,
            },
            http_timeout: Duration::from_secs(settings.http_timeout_secs),
            dry_run: settings.dry_run,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        validate_url("GITEA_URL", &self.mirror.base_url)?;
        validate_url("GITHUB_API_URL", &self.source.api_url)?;

        if self.schedule.hour > 23 {
            return Err(SyncError::Config(format!(
                "schedule_hour must be between 0 and 23, got {}",
                self.schedule.hour
            )));
        }

        if self.http_timeout.is_zero() {
            return Err(SyncError::Config(
                "http_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn required(value: Option<String>, name: &'static str, missing: &mut Vec<&'static str>) -> String {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => v,
        _ => {
            missing.push(name);
            String::new()
        }
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn validate_url(name: &str, url: &str) -> Result<()> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| SyncError::Config(format!("{} is not a valid URL ({}): {}", name, e, url)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SyncError::Config(format!(
            "{} must use http or https: {}",
            name, url
        )));
    }
    Ok(())
}
