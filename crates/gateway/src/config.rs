use std::env;
use std::time::Duration;

use reqwest::Url;

use crate::error::GatewayError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";
const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            read_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            base_url: env::var("YATRA_API_BASE_URL")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.base_url),
            connect_timeout: seconds_from_env(
                "YATRA_CONNECT_TIMEOUT_SECONDS",
                defaults.connect_timeout,
            ),
            read_timeout: seconds_from_env("YATRA_READ_TIMEOUT_SECONDS", defaults.read_timeout),
            request_timeout: seconds_from_env(
                "YATRA_REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout,
            ),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Applies one bound to connect, read and overall request time.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self.read_timeout = timeout;
        self.request_timeout = timeout;
        self
    }

    /// Routes are joined beneath the base, so the path always ends in `/`.
    pub fn parsed_base_url(&self) -> Result<Url, GatewayError> {
        let raw = self.base_url.trim();
        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };

        let url = Url::parse(&normalized)
            .map_err(|error| GatewayError::Config(format!("bad base URL {raw:?}: {error}")))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(GatewayError::Config(format!(
                "unsupported base URL scheme {other:?}"
            ))),
        }
    }
}

fn seconds_from_env(key: &str, default: Duration) -> Duration {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}
