//! Settings for the binary, layered as: defaults, then the TOML config file,
//! then environment variables, then command-line flags.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use card_logging::{LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;
use profile_card_engine::FetchSettings;
use serde::Deserialize;
use thiserror::Error;

use super::cli::Args;

pub const DEFAULT_CONFIG_FILE: &str = "profile_card.toml";

pub const ENV_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_API_URL: &str = "GITHUB_API_URL";
pub const ENV_TOP_REPOS: &str = "PROFILE_CARD__TOP_REPOS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Contents of `profile_card.toml`. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub top_repos: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub fetch: FetchSettings,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
}

impl Settings {
    /// How long a one-shot lookup may wait: two requests plus slack.
    pub fn settle_timeout(&self) -> Duration {
        self.fetch
            .request_timeout
            .saturating_mul(2)
            .saturating_add(Duration::from_secs(1))
    }
}

pub fn load(args: &Args) -> Result<Settings, ConfigError> {
    load_with_env(args, |name| std::env::var(name).ok())
}

pub(crate) fn load_with_env(
    args: &Args,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    let file = match &args.config {
        Some(path) => read_file_config(path)?,
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                read_file_config(path)?
            } else {
                FileConfig::default()
            }
        }
    };

    let mut fetch = FetchSettings::default();

    if let Some(v) = file.api_url {
        fetch.api_base_url = v;
    }
    if let Some(v) = file.token {
        fetch.token = Some(v);
    }
    if let Some(v) = file.top_repos {
        fetch.top_repo_limit = v;
    }
    if let Some(v) = file.timeout_secs {
        fetch.request_timeout = Duration::from_secs(v);
    }

    if let Some(v) = non_empty(env(ENV_API_URL)) {
        fetch.api_base_url = v;
    }
    if let Some(v) = non_empty(env(ENV_TOKEN)) {
        fetch.token = Some(v);
    }
    if let Some(v) = non_empty(env(ENV_TOP_REPOS)) {
        fetch.top_repo_limit = v.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            name: ENV_TOP_REPOS,
            value: v.clone(),
        })?;
    }

    if let Some(v) = &args.api_url {
        fetch.api_base_url = v.clone();
    }
    if let Some(v) = &args.token {
        fetch.token = Some(v.clone());
    }
    if let Some(v) = args.top_repos {
        fetch.top_repo_limit = v;
    }
    if let Some(v) = args.timeout {
        fetch.request_timeout = Duration::from_secs(v);
    }

    let log_file = args
        .log_file
        .clone()
        .or(file.log_file)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let (log_destination, log_level) = if args.verbose {
        (LogDestination::Both(log_file), LevelFilter::Debug)
    } else {
        (LogDestination::File(log_file), LevelFilter::Info)
    };

    Ok(Settings {
        fetch,
        log_destination,
        log_level,
    })
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
