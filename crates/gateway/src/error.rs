use std::error::Error as _;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid gateway configuration: {0}")]
    Config(String),
    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unreadable response: {0}")]
    Decode(String),
    #[error("server returned {status}")]
    Api {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("server rejected the request: {0}")]
    Rejected(String),
    #[error("request cancelled")]
    Cancelled,
}

impl GatewayError {
    /// The single user-facing string a failure collapses to. Always starts
    /// with the operation label.
    pub fn failure_message(&self, label: &str) -> String {
        match self {
            Self::Config(reason) => format!("{label} failed: {reason}"),
            Self::Transport(error) if error.is_timeout() => {
                format!("{label} failed: request timed out")
            }
            Self::Transport(error) => {
                format!("{label} failed: network error ({})", error_chain(error))
            }
            Self::Decode(reason) => format!("{label} failed: unreadable response ({reason})"),
            Self::Api {
                status,
                detail: Some(detail),
            } => format!("{label} failed: {status} ({detail})"),
            Self::Api {
                status,
                detail: None,
            } => format!("{label} failed: {status}"),
            Self::Rejected(reason) => format!("{label} failed: {reason}"),
            Self::Cancelled => format!("{label} cancelled"),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
            Self::Api { .. } => "api",
            Self::Rejected(_) => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

fn error_chain(error: &reqwest::Error) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = error.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !parts.contains(&text) {
            parts.push(text);
        }
        source = inner.source();
    }
    parts.join(": ")
}
