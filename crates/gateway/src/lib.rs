mod batch;
mod config;
mod error;

use std::time::Instant;

use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use yatra_core::{ApiEnvelope, HttpMethod, Operation, RequestResult, RouteSpec, NO_DATA_FOUND};

pub use config::{GatewayConfig, DEFAULT_BASE_URL};
pub use error::GatewayError;

const MAX_DETAIL_CHARS: usize = 200;

/// Anything that can turn an operation into a `RequestResult`.
pub trait TravelBackend: Send + Sync {
    async fn dispatch(&self, operation: &Operation, cancel: &CancellationToken) -> RequestResult;
}

/// One outbound call per operation against a fixed base endpoint. Cloning is
/// cheap and clones share the connection pool.
#[derive(Debug, Clone)]
pub struct RequestGateway {
    client: Client,
    base_url: Url,
}

impl RequestGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let base_url = config.parsed_base_url()?;
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|error| GatewayError::Config(format!("failed to build HTTP client: {error}")))?;

        Ok(Self { client, base_url })
    }

    pub fn from_env() -> Result<Self, GatewayError> {
        Self::new(&GatewayConfig::from_env())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn invoke(&self, operation: &Operation) -> RequestResult {
        self.invoke_with_cancel(operation, &CancellationToken::new())
            .await
    }

    /// Never fails: every error collapses to `RequestResult::Failure`. When
    /// `cancel` fires first the in-flight request is dropped.
    #[instrument(skip(self, operation, cancel), fields(operation = operation.slug()))]
    pub async fn invoke_with_cancel(
        &self,
        operation: &Operation,
        cancel: &CancellationToken,
    ) -> RequestResult {
        let started = Instant::now();

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GatewayError::Cancelled),
            result = self.execute(operation) => result,
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match outcome {
            Ok(text) => {
                info!(elapsed_ms, chars = text.len(), "request succeeded");
                RequestResult::Success(text)
            }
            Err(error) => {
                warn!(elapsed_ms, kind = error.kind(), error = %error, "request failed");
                RequestResult::Failure(error.failure_message(&operation.label()))
            }
        }
    }

    /// The raw call with the structured error kept.
    pub async fn execute(&self, operation: &Operation) -> Result<String, GatewayError> {
        let route = operation.route();
        let url = self.url_for(&route)?;

        let mut request = match route.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        if !route.query.is_empty() {
            request = request.query(&route.query);
        }
        if let Some(body) = &route.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(GatewayError::Transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(GatewayError::Transport)?;

        decode_body(status, &body)
    }

    fn url_for(&self, route: &RouteSpec) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| GatewayError::Config("base URL cannot carry a path".to_string()))?;
            segments.pop_if_empty();
            segments.extend(route.segments.iter());
        }
        Ok(url)
    }
}

impl TravelBackend for RequestGateway {
    async fn dispatch(&self, operation: &Operation, cancel: &CancellationToken) -> RequestResult {
        self.invoke_with_cancel(operation, cancel).await
    }
}

fn decode_body(status: StatusCode, body: &[u8]) -> Result<String, GatewayError> {
    if !status.is_success() {
        return Err(GatewayError::Api {
            status,
            detail: error_detail(body),
        });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(NO_DATA_FOUND.to_string());
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|error| GatewayError::Decode(error.to_string()))?;

    let envelope = match value {
        Value::Null => return Ok(NO_DATA_FOUND.to_string()),
        Value::String(text) if text.trim().is_empty() => return Ok(NO_DATA_FOUND.to_string()),
        Value::String(text) => return Ok(text),
        Value::Object(_) => serde_json::from_value::<ApiEnvelope>(value)
            .map_err(|error| GatewayError::Decode(error.to_string()))?,
        _ => {
            return Err(GatewayError::Decode(
                "expected a JSON object body".to_string(),
            ))
        }
    };

    if let Some(reason) = envelope.rejection() {
        return Err(GatewayError::Rejected(reason.to_string()));
    }

    Ok(envelope.display_text())
}

/// At most `MAX_DETAIL_CHARS` of the JSON `detail`/`error`, else of the raw body.
fn error_detail(body: &[u8]) -> Option<String> {
    let detail = match serde_json::from_slice::<ApiEnvelope>(body) {
        Ok(envelope) => envelope.detail_text()?,
        Err(_) => {
            let text = String::from_utf8_lossy(body);
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            text.to_string()
        }
    };

    Some(detail.chars().take(MAX_DETAIL_CHARS).collect())
}
