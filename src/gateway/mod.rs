//! Request Gateway
//!
//! The functional core: validates a request, selects the prompt pair from
//! the catalog, invokes the model client once, and normalizes the outcome.
//!
//! Every call is independent and stateless - no shared mutable state, no
//! deduplication or in-flight caching, no automatic retries. Errors are
//! mapped exactly once into a user-facing `GatewayResult::Failure`; raw
//! upstream detail stays in the logs.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::catalog::PromptCatalog;
use crate::constants::input;
use crate::model::SharedModelClient;
use crate::types::{
    ArtifactKind, ErrorKind, GatewayError, GatewayRequest, GatewayResult, ModelError,
};

pub struct RequestGateway {
    catalog: PromptCatalog,
    client: SharedModelClient,
}

impl RequestGateway {
    pub fn new(catalog: PromptCatalog, client: SharedModelClient) -> Self {
        Self { catalog, client }
    }

    pub fn shared(catalog: PromptCatalog, client: SharedModelClient) -> Arc<Self> {
        Arc::new(Self::new(catalog, client))
    }

    /// Handle one generation request end to end
    pub async fn handle(&self, request: &GatewayRequest) -> GatewayResult {
        let kind = request.kind;

        // Reject bad input before anything reaches the model
        if let Err(err) = validate_input(&request.input) {
            debug!(%kind, "Rejected request: {}", err.message);
            return GatewayResult::failure(err);
        }

        // An unregistered kind is a configuration error, not a user error
        let template = match self.catalog.lookup(kind) {
            Ok(t) => t,
            Err(err) => {
                error!(%kind, "Catalog lookup failed: {}", err);
                return GatewayResult::failure(err);
            }
        };
        let options = match self.catalog.options_for(kind) {
            Ok(o) => o,
            Err(err) => {
                error!(%kind, "Catalog lookup failed: {}", err);
                return GatewayResult::failure(err);
            }
        };

        let user_text = template.user_text(request.input.trim());
        let start = Instant::now();
        info!(%kind, client = self.client.name(), "Dispatching generation request");

        match self
            .client
            .complete(template.system_text(), &user_text, options)
            .await
        {
            Ok(html) => {
                info!(
                    %kind,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Generation succeeded"
                );
                GatewayResult::success(kind, html)
            }
            Err(err) => {
                warn!(%kind, "Generation failed: {}", err);
                GatewayResult::failure(map_model_error(kind, &err))
            }
        }
    }
}

/// Uniform input length band for every artifact kind
fn validate_input(raw: &str) -> std::result::Result<(), GatewayError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::invalid_input(
            "Input is required. Please describe your project before generating.",
        ));
    }
    let chars = trimmed.chars().count();
    if chars < input::MIN_CHARS {
        return Err(GatewayError::invalid_input(format!(
            "Please provide more detail (at least {} characters) for a comprehensive result.",
            input::MIN_CHARS
        )));
    }
    if chars > input::MAX_CHARS {
        return Err(GatewayError::invalid_input(format!(
            "Input is too long (maximum {} characters).",
            input::MAX_CHARS
        )));
    }
    Ok(())
}

/// Map a classified model failure to a user-facing message. The message is
/// distinct per artifact kind for generic failures; credential-related
/// failures carry setup guidance instead and never echo upstream detail.
fn map_model_error(kind: ArtifactKind, err: &ModelError) -> GatewayError {
    let message = match err.kind {
        ErrorKind::Auth => {
            "Invalid or missing OpenAI API key. Please check your API key configuration."
                .to_string()
        }
        ErrorKind::QuotaExceeded => {
            "OpenAI API quota exceeded. Please check your OpenAI account usage and billing."
                .to_string()
        }
        ErrorKind::RateLimited => {
            "Rate limit exceeded. Please wait a moment and try again.".to_string()
        }
        _ => format!("Failed to generate {}. Please try again.", kind.label()),
    };
    GatewayError::new(err.kind, message)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::catalog::GenerationOptions;
    use crate::model::ModelClient;

    /// Stub client: counts calls and replays a queue of canned outcomes
    pub(crate) struct StubClient {
        calls: AtomicUsize,
        outcomes: std::sync::Mutex<Vec<std::result::Result<String, ModelError>>>,
    }

    impl StubClient {
        pub(crate) fn returning(html: &str) -> Self {
            Self::with_outcomes(vec![Ok(html.to_string())])
        }

        pub(crate) fn failing(err: ModelError) -> Self {
            Self::with_outcomes(vec![Err(err)])
        }

        pub(crate) fn with_outcomes(
            mut outcomes: Vec<std::result::Result<String, ModelError>>,
        ) -> Self {
            // Pop from the back, so store reversed
            outcomes.reverse();
            Self {
                calls: AtomicUsize::new(0),
                outcomes: std::sync::Mutex::new(outcomes),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ModelClient for StubClient {
        async fn complete(
            &self,
            _system_text: &str,
            _user_text: &str,
            _options: &GenerationOptions,
        ) -> std::result::Result<String, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok("<p>stub</p>".to_string()))
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn gateway_with(client: Arc<StubClient>) -> RequestGateway {
        RequestGateway::new(PromptCatalog::standard(), client)
    }

    const VALID_INPUT: &str =
        "A community blog platform with posts, comments, tags, and author profiles.";

    #[tokio::test]
    async fn test_empty_input_never_reaches_model() {
        let stub = Arc::new(StubClient::returning("<p>never</p>"));
        let gateway = gateway_with(stub.clone());

        let result = gateway
            .handle(&GatewayRequest::new(ArtifactKind::Analysis, ""))
            .await;

        match result {
            GatewayResult::Failure { error, .. } => {
                assert_eq!(error.kind, ErrorKind::InvalidInput)
            }
            _ => panic!("expected failure"),
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_short_input_is_rejected() {
        let stub = Arc::new(StubClient::returning("<p>never</p>"));
        let gateway = gateway_with(stub.clone());

        let result = gateway
            .handle(&GatewayRequest::new(ArtifactKind::Design, "too short"))
            .await;

        assert!(!result.is_success());
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_unregistered_kind_is_config_error() {
        let stub = Arc::new(StubClient::returning("<p>never</p>"));
        let gateway = RequestGateway::new(PromptCatalog::empty(), stub.clone());

        let result = gateway
            .handle(&GatewayRequest::new(ArtifactKind::Erd, VALID_INPUT))
            .await;

        match result {
            GatewayResult::Failure { error, .. } => {
                assert_eq!(error.kind, ErrorKind::UnknownArtifactKind)
            }
            _ => panic!("expected failure"),
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_uses_kind_field_name() {
        let stub = Arc::new(StubClient::returning("<h3>OK</h3>"));
        let gateway = gateway_with(stub);

        let result = gateway
            .handle(&GatewayRequest::new(
                ArtifactKind::Analysis,
                "a valid sixty character concept description of a web shop app",
            ))
            .await;

        match result {
            GatewayResult::Success { field, html } => {
                assert_eq!(field, "analysis");
                assert_eq!(html, "<h3>OK</h3>");
            }
            _ => panic!("expected success"),
        }
    }

    #[tokio::test]
    async fn test_auth_failure_never_leaks_credential() {
        let secret = "sk-proj-abc123-leaky";
        let stub = Arc::new(StubClient::failing(ModelError::auth(format!(
            "Incorrect API key provided: {}",
            secret
        ))));
        let gateway = gateway_with(stub);

        let result = gateway
            .handle(&GatewayRequest::new(ArtifactKind::Design, VALID_INPUT))
            .await;

        match result {
            GatewayResult::Failure { error, .. } => {
                assert_eq!(error.kind, ErrorKind::Auth);
                assert!(!error.message.contains(secret));
                assert!(error.message.contains("API key"));
            }
            _ => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_quota_and_rate_limit_messages_differ() {
        for (err, expected) in [
            (
                ModelError::new(ErrorKind::QuotaExceeded, "insufficient_quota"),
                "quota",
            ),
            (
                ModelError::new(ErrorKind::RateLimited, "rate_limit_exceeded"),
                "wait a moment",
            ),
        ] {
            let stub = Arc::new(StubClient::failing(err));
            let gateway = gateway_with(stub);
            let result = gateway
                .handle(&GatewayRequest::new(ArtifactKind::Erd, VALID_INPUT))
                .await;
            match result {
                GatewayResult::Failure { error, .. } => {
                    assert!(error.message.to_lowercase().contains(expected))
                }
                _ => panic!("expected failure"),
            }
        }
    }

    #[tokio::test]
    async fn test_field_name_is_function_of_kind_only() {
        let stub = Arc::new(StubClient::with_outcomes(vec![
            Ok("<p>first</p>".to_string()),
            Ok("<p>second</p>".to_string()),
        ]));
        let gateway = gateway_with(stub);
        let request = GatewayRequest::new(ArtifactKind::WebsiteStructure, VALID_INPUT);

        let first = gateway.handle(&request).await;
        let second = gateway.handle(&request).await;

        match (first, second) {
            (
                GatewayResult::Success { field: f1, html: h1 },
                GatewayResult::Success { field: f2, html: h2 },
            ) => {
                assert_eq!(f1, "structure");
                assert_eq!(f1, f2);
                assert_ne!(h1, h2);
            }
            _ => panic!("expected two successes"),
        }
    }

    #[tokio::test]
    async fn test_erd_end_to_end_reproduces_stub_html() {
        let canned = "<table><tr><th>posts</th></tr><tr><td>id PK</td></tr></table>";
        let stub = Arc::new(StubClient::returning(canned));
        let gateway = gateway_with(stub);

        let result = gateway
            .handle(&GatewayRequest::new(
                ArtifactKind::Erd,
                "A blog with posts and comments: each post has an author, many comments, \
                 and a set of tags shared across posts.",
            ))
            .await;

        match result {
            GatewayResult::Success { field, html } => {
                assert_eq!(field, "erd");
                assert_eq!(html, canned);
            }
            _ => panic!("expected success"),
        }
    }

    #[tokio::test]
    async fn test_upstream_failure_message_names_artifact() {
        let stub = Arc::new(StubClient::failing(ModelError::upstream("HTTP 500: boom")));
        let gateway = gateway_with(stub);

        let result = gateway
            .handle(&GatewayRequest::new(ArtifactKind::LowLevel, VALID_INPUT))
            .await;

        match result {
            GatewayResult::Failure { error, .. } => {
                assert_eq!(error.kind, ErrorKind::Upstream);
                assert!(error.message.contains("low level diagrams"));
                assert!(!error.message.contains("boom"));
            }
            _ => panic!("expected failure"),
        }
    }
}
