use crate::selection::Selection;
use anyhow::{Context, Result};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The payload sent for one submit attempt. Built from a `Selection` snapshot,
/// so later edits to the selection never reach a request already in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub emotion: String,
    pub desc: String,
    pub style: String,
}

impl From<&Selection> for GenerationRequest {
    fn from(selection: &Selection) -> Self {
        Self {
            emotion: selection.emotion.name().to_string(),
            desc: selection.note.clone(),
            style: selection.style.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerationResult {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The service answered but reported a problem of its own.
    ApplicationError(String),
    /// The call did not complete or its answer could not be read.
    TransportError(String),
}

impl FailureReason {
    pub fn message(&self) -> &str {
        match self {
            FailureReason::ApplicationError(message) | FailureReason::TransportError(message) => {
                message
            }
        }
    }
}

/// How a single request settled. Exactly one of these is produced per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(GenerationResult),
    ApplicationError(String),
    TransportError(String),
}

/// Body returned by the generation service.
///
/// The service answers either `{title, content}` or `{error}`, so every field
/// is optional here and the orchestrator decides what the shape means.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Ways the HTTP round trip itself can fail. These carry raw diagnostics and
/// are only ever logged.
#[derive(Debug, thiserror::Error)]
pub enum TransportFailure {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Server returned status {0}")]
    Status(u16),

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

// Anything able to turn a `GenerationRequest` into a raw service response.
// The orchestrator only depends on this trait, so tests swap in
// `MockGenerationService` instead of talking to a real server.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<GenerationResponse, TransportFailure>;
}

/// Default base address of the generation service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Upper bound for the reachability check, independent of the generation timeout.
pub const AVAILABILITY_TIMEOUT: Duration = Duration::from_secs(2);

/// Talks to the generation service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGenerationService {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl HttpGenerationService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self) -> String {
        format!("{}/generate", self.base_url)
    }

    /// Checks whether the service host answers on its root route. Gives up
    /// after `AVAILABILITY_TIMEOUT` (or the generation timeout, if shorter).
    pub async fn is_available(&self) -> bool {
        let root = match Url::parse(&self.base_url).and_then(|url| url.join("/")) {
            Ok(root) => root,
            Err(e) => {
                tracing::debug!("Invalid generation service URL {}: {}", self.base_url, e);
                return false;
            }
        };

        match self
            .client
            .get(root)
            .timeout(self.timeout.min(AVAILABILITY_TIMEOUT))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Generation service not available: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<GenerationResponse, TransportFailure> {
        let url = self.endpoint();
        tracing::debug!("POST {} {:?}", url, request);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportFailure::Timeout(self.timeout.as_secs())
                } else {
                    TransportFailure::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportFailure::Status(status.as_u16()));
        }

        response
            .json::<GenerationResponse>()
            .await
            .map_err(|e| TransportFailure::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Emotion, Style};
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });
        format!("http://{}/api", addr)
    }

    fn sample_request() -> GenerationRequest {
        GenerationRequest::from(&Selection {
            emotion: Emotion::Sad,
            note: "missed the train".to_string(),
            style: Style::MotivationalQuote,
        })
    }

    #[test]
    fn test_request_uses_catalog_identifiers() {
        for emotion in Emotion::ALL {
            for style in Style::ALL {
                let selection = Selection {
                    emotion,
                    note: String::new(),
                    style,
                };
                let request = GenerationRequest::from(&selection);
                assert_eq!(request.emotion, emotion.name());
                assert_eq!(request.style, style.label());
                assert_eq!(request.desc, "");
            }
        }
    }

    #[test]
    fn test_request_wire_shape() {
        let value = serde_json::to_value(sample_request()).expect("serialize");
        assert_eq!(
            value,
            json!({
                "emotion": "Sad",
                "desc": "missed the train",
                "style": "Motivational Quote"
            })
        );
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let response: GenerationResponse =
            serde_json::from_str(r#"{"error": "quota exceeded"}"#).expect("deserialize");
        assert_eq!(response.error.as_deref(), Some("quota exceeded"));
        assert!(response.title.is_none());
        assert!(response.content.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let service =
            HttpGenerationService::new("http://localhost:9000/api/", Duration::from_secs(5))
                .expect("client");
        assert_eq!(service.base_url(), "http://localhost:9000/api");
        assert_eq!(service.endpoint(), "http://localhost:9000/api/generate");
        assert_eq!(service.timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_generate_posts_payload_and_reads_body() {
        let app = Router::new().route(
            "/api/generate",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "title": format!("For {}", body["emotion"].as_str().unwrap_or_default()),
                    "content": body["style"],
                }))
            }),
        );
        let base_url = spawn_server(app).await;
        let service = HttpGenerationService::new(base_url, Duration::from_secs(5)).expect("client");

        let response = service
            .generate(&sample_request())
            .await
            .expect("generate should succeed");

        assert!(response.error.is_none());
        assert_eq!(response.title.as_deref(), Some("For Sad"));
        assert_eq!(response.content.as_deref(), Some("Motivational Quote"));
    }

    #[tokio::test]
    async fn test_generate_non_success_status() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base_url = spawn_server(app).await;
        let service = HttpGenerationService::new(base_url, Duration::from_secs(5)).expect("client");

        let err = service.generate(&sample_request()).await.unwrap_err();
        assert!(matches!(err, TransportFailure::Status(500)));
    }

    #[tokio::test]
    async fn test_generate_unparsable_body() {
        let app = Router::new().route("/api/generate", post(|| async { "not json" }));
        let base_url = spawn_server(app).await;
        let service = HttpGenerationService::new(base_url, Duration::from_secs(5)).expect("client");

        let err = service.generate(&sample_request()).await.unwrap_err();
        assert!(matches!(err, TransportFailure::ParseError(_)));
    }

    #[tokio::test]
    async fn test_generate_connection_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let service =
            HttpGenerationService::new(format!("http://{}/api", addr), Duration::from_secs(5))
                .expect("client");

        let err = service.generate(&sample_request()).await.unwrap_err();
        assert!(matches!(err, TransportFailure::ConnectionFailed(_)));
        assert!(!service.is_available().await);
    }

    #[tokio::test]
    async fn test_generate_timeout() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"title": "late", "content": "late"}))
            }),
        );
        let base_url = spawn_server(app).await;
        let service =
            HttpGenerationService::new(base_url, Duration::from_millis(200)).expect("client");

        let err = service.generate(&sample_request()).await.unwrap_err();
        assert!(matches!(err, TransportFailure::Timeout(_)));
    }

    #[tokio::test]
    async fn test_is_available_checks_root() {
        let app = Router::new().route(
            "/",
            axum::routing::get(|| async { Json(json!({"message": "running"})) }),
        );
        let base_url = spawn_server(app).await;
        let service = HttpGenerationService::new(base_url, Duration::from_secs(5)).expect("client");

        assert!(service.is_available().await);
    }

    #[tokio::test]
    async fn test_is_available_gives_up_before_generation_timeout() {
        let app = Router::new().route(
            "/",
            axum::routing::get(|| async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Json(json!({"message": "running"}))
            }),
        );
        let base_url = spawn_server(app).await;
        let service = HttpGenerationService::new(base_url, Duration::from_secs(30)).expect("client");

        let available = tokio::time::timeout(AVAILABILITY_TIMEOUT * 3, service.is_available())
            .await
            .expect("availability check should not wait for the generation timeout");
        assert!(!available);
    }
}
