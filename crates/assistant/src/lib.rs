use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use yatra_core::{format_response, Action, DisplayBlock, DraftError, RequestResult, TripDraft};
use yatra_gateway::TravelBackend;
use yatra_observability::AppMetrics;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    Loading {
        action: Action,
        request_id: Uuid,
    },
    Success {
        action: Action,
        blocks: Vec<DisplayBlock>,
    },
    Failure {
        action: Action,
        message: String,
    },
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

/// Everything a trip screen renders. Never mutated in place: each update
/// builds a new value and swaps it in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantState {
    pub draft: TripDraft,
    pub request: RequestState,
    pub last_action: Option<Action>,
    pub sections: BTreeMap<Action, Vec<DisplayBlock>>,
}

pub struct TripAssistant<B>
where
    B: TravelBackend,
{
    backend: Arc<B>,
    metrics: Arc<AppMetrics>,
    state: RwLock<Arc<AssistantState>>,
}

impl<B> TripAssistant<B>
where
    B: TravelBackend,
{
    pub fn new(backend: Arc<B>, metrics: Arc<AppMetrics>) -> Self {
        Self {
            backend,
            metrics,
            state: RwLock::new(Arc::new(AssistantState::default())),
        }
    }

    pub fn state(&self) -> Arc<AssistantState> {
        self.state.read().clone()
    }

    pub fn draft(&self) -> TripDraft {
        self.state.read().draft.clone()
    }

    pub fn sections(&self) -> BTreeMap<Action, Vec<DisplayBlock>> {
        self.state.read().sections.clone()
    }

    pub fn update_draft(&self, edit: impl FnOnce(&TripDraft) -> TripDraft) {
        self.replace(|current| AssistantState {
            draft: edit(&current.draft),
            ..current.clone()
        });
    }

    /// Clears the draft, results and request state.
    pub fn reset(&self) {
        self.replace(|_| AssistantState::default());
    }

    /// Validates the draft for `action`, calls the backend once and formats a
    /// successful payload. A validation error is returned without touching
    /// the state or the backend.
    #[instrument(skip(self, cancel))]
    pub async fn dispatch(
        &self,
        action: Action,
        cancel: &CancellationToken,
    ) -> Result<RequestState, DraftError> {
        let operation = match self.draft().operation(action) {
            Ok(operation) => operation,
            Err(error) => {
                self.metrics.inc_validation_reject();
                warn!(error = %error, "dispatch blocked by draft validation");
                return Err(error);
            }
        };

        let request_id = Uuid::new_v4();
        self.replace(|current| AssistantState {
            request: RequestState::Loading { action, request_id },
            last_action: Some(action),
            ..current.clone()
        });

        self.metrics.inc_request();
        let started = Instant::now();
        let result = self.backend.dispatch(&operation, cancel).await;
        self.metrics.observe_latency(started.elapsed());

        let outcome = match result {
            RequestResult::Success(text) => {
                let blocks = format_response(&text);
                self.metrics.add_blocks_rendered(blocks.len());
                RequestState::Success { action, blocks }
            }
            RequestResult::Failure(message) => {
                if cancel.is_cancelled() {
                    self.metrics.inc_cancelled();
                } else {
                    self.metrics.inc_failure();
                }
                RequestState::Failure { action, message }
            }
        };

        self.replace(|current| {
            let mut sections = current.sections.clone();
            if let RequestState::Success { blocks, .. } = &outcome {
                sections.insert(action, blocks.clone());
            }

            // A newer dispatch owns the request slot once it has started.
            let still_current = matches!(
                current.request,
                RequestState::Loading { request_id: id, .. } if id == request_id
            );

            AssistantState {
                request: if still_current {
                    outcome.clone()
                } else {
                    current.request.clone()
                },
                sections,
                ..current.clone()
            }
        });

        info!(
            request_id = %request_id,
            operation = operation.slug(),
            success = matches!(outcome, RequestState::Success { .. }),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dispatch finished"
        );

        Ok(outcome)
    }

    /// Re-runs the last attempted action with the current draft. `None` when
    /// nothing has been dispatched yet.
    pub async fn retry(
        &self,
        cancel: &CancellationToken,
    ) -> Option<Result<RequestState, DraftError>> {
        let action = self.state.read().last_action?;
        Some(self.dispatch(action, cancel).await)
    }

    fn replace(&self, update: impl FnOnce(&AssistantState) -> AssistantState) {
        let mut guard = self.state.write();
        let next = update(&guard);
        *guard = Arc::new(next);
    }
}
