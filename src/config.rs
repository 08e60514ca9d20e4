use std::fmt;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BridgeError, Result};
use crate::logging::LogFormat;
use crate::types::Repository;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_LABELS: [&str; 2] = ["question", "help wanted"];

/// On-disk configuration. Every field is optional; env vars take precedence.
#[derive(Deserialize, Serialize, Default, Debug)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_format: Option<LogFormat>,
}

/// Fully resolved configuration, fixed for the life of the process.
#[derive(Clone)]
pub struct Settings {
    pub token: String,
    pub repository: Repository,
    pub port: u16,
    pub api_url: Url,
    pub labels: Vec<String>,
    pub log_format: LogFormat,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("token", &"<redacted>")
            .field("repository", &self.repository)
            .field("port", &self.port)
            .field("api_url", &self.api_url.as_str())
            .field("labels", &self.labels)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// Load from an explicit path, or from the platform config dir.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::config_path()?),
        }
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(config_path).map_err(|e| BridgeError::ConfigRead {
                path: config_path.to_path_buf(),
                source: e,
            })?;

        toml::from_str(&contents).map_err(|e| BridgeError::ConfigParse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "issue-bridge")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(BridgeError::NoConfigDir)
    }

    /// Resolve against the process environment. `port` comes from the command line.
    pub fn settings(&self, port: Option<u16>) -> Result<Settings> {
        self.resolve(port, |key| std::env::var(key).ok())
    }

    /// Precedence: explicit argument, then env var, then file, then default.
    pub fn resolve<F>(&self, port: Option<u16>, env: F) -> Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let token = env("GITHUB_TOKEN")
            .or_else(|| self.token.clone())
            .ok_or(BridgeError::MissingToken)?;

        let owner = env("GITHUB_REPO_OWNER").or_else(|| self.owner.clone());
        let repo = env("GITHUB_REPO_NAME").or_else(|| self.repo.clone());
        let repository = match (owner, repo) {
            (Some(owner), Some(repo)) => Repository::new(owner, repo),
            _ => return Err(BridgeError::MissingRepository),
        };

        let port = match (port, env("PORT")) {
            (Some(port), _) => port,
            (None, Some(raw)) => {
                raw.trim()
                    .parse::<u16>()
                    .map_err(|_| BridgeError::InvalidSetting {
                        field: "PORT",
                        value: raw.clone(),
                    })?
            }
            (None, None) => self.port.unwrap_or(DEFAULT_PORT),
        };

        let raw_url = env("GITHUB_API_URL")
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url =
            Url::parse(&raw_url).map_err(|_| BridgeError::InvalidUrl(raw_url.clone()))?;

        let log_format = match env("LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>().map_err(|_| BridgeError::InvalidSetting {
                field: "LOG_FORMAT",
                value: raw.clone(),
            })?,
            None => self.log_format.unwrap_or_default(),
        };

        let labels = self
            .labels
            .clone()
            .unwrap_or_else(|| DEFAULT_LABELS.iter().map(|l| l.to_string()).collect());

        Ok(Settings {
            token,
            repository,
            port,
            api_url,
            labels,
            log_format,
        })
    }
}
