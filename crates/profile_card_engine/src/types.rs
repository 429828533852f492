use std::fmt;
use std::io;

use profile_card_core::{ProfileRecord, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    FetchCompleted {
        request_id: RequestId,
        result: Result<ProfileRecord, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUsername,
    InvalidUrl,
    NotFound,
    RateLimited,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Malformed,
    Network,
    Internal,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUsername => write!(f, "invalid username"),
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::NotFound => write!(f, "user not found"),
            FailureKind::RateLimited => write!(f, "rate limited"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Malformed => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Internal => write!(f, "internal error"),
        }
    }
}

/// Failures while setting up the engine or handing it work.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid fetch settings: {0}")]
    InvalidSettings(String),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("failed to spawn engine thread: {0}")]
    Thread(#[source] io::Error),
    #[error("engine stopped")]
    Stopped,
}
