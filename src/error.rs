use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tracker error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Collaborator pagination stopped: {0}")]
    Pagination(String),

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error(
        "No access token found. Set GITHUB_TOKEN env var or add token to ~/.config/issue-bridge/config.toml"
    )]
    MissingToken,

    #[error(
        "Target repository not configured. Set GITHUB_REPO_OWNER and GITHUB_REPO_NAME or add owner/repo to the config file"
    )]
    MissingRepository,

    #[error("Invalid {field}: {value}")]
    InvalidSetting { field: &'static str, value: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, BridgeError>;
