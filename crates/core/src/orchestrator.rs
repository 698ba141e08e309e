use crate::generation::{
    GenerationOutcome, GenerationRequest, GenerationResponse, GenerationResult, GenerationService,
};
use crate::selection::Selection;
use std::sync::Arc;
use std::time::Duration;

/// Shown for every transport failure. Raw diagnostics go to the log only.
pub const TRANSPORT_ERROR_MESSAGE: &str =
    "Failed to connect to the generation service. Is the server running?";

/// Upper bound on a single outbound call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds requests, performs exactly one call per submit and classifies
/// the answer into a `GenerationOutcome`. Never retries.
#[derive(Clone)]
pub struct RequestOrchestrator {
    service: Arc<dyn GenerationService>,
    timeout: Duration,
}

impl RequestOrchestrator {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self::with_timeout(service, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(service: Arc<dyn GenerationService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn submit(&self, selection: &Selection) -> GenerationOutcome {
        let request = GenerationRequest::from(selection);
        self.dispatch(&request).await
    }

    /// Sends an already built request. The wait is bounded even if the
    /// service implementation itself never gives up.
    pub async fn dispatch(&self, request: &GenerationRequest) -> GenerationOutcome {
        tracing::info!(
            "Requesting a {} for emotion {}",
            request.style,
            request.emotion
        );

        match tokio::time::timeout(self.timeout, self.service.generate(request)).await {
            Err(_) => {
                tracing::error!(
                    "Generation request timed out after {:?}",
                    self.timeout
                );
                GenerationOutcome::TransportError(TRANSPORT_ERROR_MESSAGE.to_string())
            }
            Ok(Err(e)) => {
                tracing::error!("Generation request failed: {}", e);
                GenerationOutcome::TransportError(TRANSPORT_ERROR_MESSAGE.to_string())
            }
            Ok(Ok(response)) => classify(response),
        }
    }
}

/// Maps a response body onto an outcome. An `error` field wins over
/// everything else; otherwise both `title` and `content` must be present.
pub fn classify(response: GenerationResponse) -> GenerationOutcome {
    if let Some(error) = response.error.filter(|e| !e.is_empty()) {
        tracing::warn!("Generation service reported an error: {}", error);
        return GenerationOutcome::ApplicationError(error);
    }

    match (response.title, response.content) {
        (Some(title), Some(content)) => {
            tracing::info!("Received \"{}\" ({} chars)", title, content.len());
            GenerationOutcome::Success(GenerationResult { title, content })
        }
        (title, content) => {
            tracing::error!(
                "Unexpected response shape (title present: {}, content present: {})",
                title.is_some(),
                content.is_some()
            );
            GenerationOutcome::TransportError(TRANSPORT_ERROR_MESSAGE.to_string())
        }
    }
}
