//! Environment-Adaptive Dispatch
//!
//! Routes a UI-originated request to the right transport based on the
//! hosting context, which is injected once at construction and never
//! re-inspected:
//!
//! - **embedded-server**: same-origin HTTP POST to `/api/<route>`
//! - **serverless-function**: HTTP POST to the platform function path
//! - **static-only**: the gateway runs in-process with a session-scoped,
//!   user-supplied credential; without one, canned demo content is returned
//!   and no model call is ever made

pub mod demo;
mod remote;

pub use remote::{RemoteTransport, RouteStyle};

use secrecy::SecretString;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info};

use crate::catalog::PromptCatalog;
use crate::config::ModelConfig;
use crate::gateway::RequestGateway;
use crate::model::{OpenAiClient, SharedModelClient};
use crate::types::{
    ArtifactKind, ErrorKind, GatewayError, GatewayRequest, GatewayResult, HostingContext, Result,
};

// =============================================================================
// Session Credential
// =============================================================================

/// Session-scoped credential store for the static-only path.
///
/// State machine: `Unconfigured -> Configured` on a user-supplied non-empty
/// key; `Configured -> Unconfigured` only on an explicit `clear()`. The key
/// lives in memory for the session and is never persisted or logged.
#[derive(Clone, Default)]
pub struct SessionCredential {
    inner: Arc<RwLock<Option<SecretString>>>,
}

impl SessionCredential {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a user-supplied key. Blank entries are rejected.
    pub fn configure(&self, key: &str) -> std::result::Result<(), GatewayError> {
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(GatewayError::invalid_input("API key is required"));
        }
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) =
            Some(SecretString::from(trimmed.to_string()));
        info!("Session credential configured");
        Ok(())
    }

    /// Explicit clear; the only transition back to `Unconfigured`
    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
        info!("Session credential cleared");
    }

    pub fn is_configured(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn key(&self) -> Option<SecretString> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl std::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCredential")
            .field("configured", &self.is_configured())
            .finish()
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Builds a model client from a session credential on the static-only path.
/// Injectable so tests can substitute a stub without touching the network.
pub type ClientFactory = Arc<dyn Fn(SecretString) -> Result<SharedModelClient> + Send + Sync>;

enum Transport {
    Remote(RemoteTransport),
    Local {
        credential: SessionCredential,
        catalog: PromptCatalog,
        factory: ClientFactory,
    },
}

/// Transport selector fixed by the hosting context at construction time
pub struct EnvironmentDispatcher {
    context: HostingContext,
    transport: Transport,
}

impl EnvironmentDispatcher {
    /// Same-origin `/api/*` transport for the embedded-server context
    pub fn embedded_server(base_url: url::Url, timeout: Duration) -> Result<Self> {
        Ok(Self {
            context: HostingContext::EmbeddedServer,
            transport: Transport::Remote(RemoteTransport::new(
                base_url,
                RouteStyle::Api,
                timeout,
            )?),
        })
    }

    /// Platform-function transport for the serverless context
    pub fn serverless(base_url: url::Url, timeout: Duration) -> Result<Self> {
        Ok(Self {
            context: HostingContext::ServerlessFunction,
            transport: Transport::Remote(RemoteTransport::new(
                base_url,
                RouteStyle::ServerlessFunctions,
                timeout,
            )?),
        })
    }

    /// In-process gateway for the static-only context, backed by the session
    /// credential
    pub fn static_only(credential: SessionCredential, model: &ModelConfig) -> Self {
        let api_base = model.api_base.clone();
        let timeout = Duration::from_secs(model.timeout_secs);
        let factory: ClientFactory = Arc::new(move |key| {
            let client = OpenAiClient::new(key, api_base.clone(), timeout)?;
            Ok(Arc::new(client) as SharedModelClient)
        });
        Self::static_only_with_factory(credential, PromptCatalog::standard_with_model(&model.name), factory)
    }

    /// Static-only with an injected catalog and client factory
    pub fn static_only_with_factory(
        credential: SessionCredential,
        catalog: PromptCatalog,
        factory: ClientFactory,
    ) -> Self {
        Self {
            context: HostingContext::StaticOnly,
            transport: Transport::Local {
                credential,
                catalog,
                factory,
            },
        }
    }

    pub fn context(&self) -> HostingContext {
        self.context
    }

    /// Dispatch one request over the transport chosen at construction
    pub async fn dispatch(&self, kind: ArtifactKind, input: &str) -> GatewayResult {
        debug!(context = %self.context, %kind, "Dispatching request");
        match &self.transport {
            Transport::Remote(remote) => remote.send(kind, input).await,
            Transport::Local {
                credential,
                catalog,
                factory,
            } => {
                let Some(key) = credential.key() else {
                    debug!(%kind, "No session credential; returning demo content");
                    return GatewayResult::demo(
                        GatewayError::new(ErrorKind::DemoMode, demo::DEMO_MESSAGE),
                        demo::placeholder_for(kind),
                    );
                };
                let client = match factory(key) {
                    Ok(client) => client,
                    Err(e) => {
                        return GatewayResult::failure(GatewayError::new(
                            ErrorKind::Upstream,
                            format!("Could not initialize the AI client: {}", e),
                        ));
                    }
                };
                let gateway = RequestGateway::new(catalog.clone(), client);
                gateway.handle(&GatewayRequest::new(kind, input)).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::gateway::tests::StubClient;

    const VALID_INPUT: &str =
        "An eighty-plus character description of a blog with posts, comments, tags, and \
         author profiles for testing.";

    fn counting_factory(stub: Arc<StubClient>) -> (ClientFactory, Arc<AtomicUsize>) {
        let invocations = Arc::new(AtomicUsize::new(0));
        let counter = invocations.clone();
        let factory: ClientFactory = Arc::new(move |_key| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(stub.clone() as SharedModelClient)
        });
        (factory, invocations)
    }

    #[test]
    fn test_credential_state_machine() {
        let credential = SessionCredential::new();
        assert!(!credential.is_configured());

        assert!(credential.configure("   ").is_err());
        assert!(!credential.is_configured());

        credential.configure("sk-test-key").unwrap();
        assert!(credential.is_configured());

        // Stays configured until an explicit clear
        assert!(credential.is_configured());
        credential.clear();
        assert!(!credential.is_configured());
    }

    #[test]
    fn test_credential_debug_hides_key() {
        let credential = SessionCredential::new();
        credential.configure("sk-secret-value").unwrap();
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("sk-secret-value"));
    }

    #[tokio::test]
    async fn test_unconfigured_static_returns_demo_without_model_call() {
        let stub = Arc::new(StubClient::returning("<p>never</p>"));
        let (factory, invocations) = counting_factory(stub.clone());
        let dispatcher = EnvironmentDispatcher::static_only_with_factory(
            SessionCredential::new(),
            PromptCatalog::standard(),
            factory,
        );

        let result = dispatcher.dispatch(ArtifactKind::Analysis, VALID_INPUT).await;

        match result {
            GatewayResult::Failure { error, placeholder } => {
                assert_eq!(error.kind, ErrorKind::DemoMode);
                let placeholder = placeholder.expect("demo result carries placeholder html");
                assert!(!placeholder.is_empty());
            }
            _ => panic!("expected demo failure"),
        }
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_configured_static_runs_gateway() {
        let stub = Arc::new(StubClient::returning("<h3>live</h3>"));
        let (factory, invocations) = counting_factory(stub.clone());
        let credential = SessionCredential::new();
        credential.configure("sk-user-supplied").unwrap();
        let dispatcher = EnvironmentDispatcher::static_only_with_factory(
            credential,
            PromptCatalog::standard(),
            factory,
        );

        let result = dispatcher.dispatch(ArtifactKind::Design, VALID_INPUT).await;

        match result {
            GatewayResult::Success { field, html } => {
                assert_eq!(field, "design");
                assert_eq!(html, "<h3>live</h3>");
            }
            _ => panic!("expected success"),
        }
        assert_eq!(invocations.load(Ordering::SeqCst), 1);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_clearing_credential_restores_demo_mode() {
        let stub = Arc::new(StubClient::returning("<p>live</p>"));
        let (factory, _) = counting_factory(stub);
        let credential = SessionCredential::new();
        credential.configure("sk-user-supplied").unwrap();
        let dispatcher = EnvironmentDispatcher::static_only_with_factory(
            credential.clone(),
            PromptCatalog::standard(),
            factory,
        );

        assert!(dispatcher.dispatch(ArtifactKind::Erd, VALID_INPUT).await.is_success());

        credential.clear();
        let result = dispatcher.dispatch(ArtifactKind::Erd, VALID_INPUT).await;
        match result {
            GatewayResult::Failure { error, .. } => assert_eq!(error.kind, ErrorKind::DemoMode),
            _ => panic!("expected demo failure after clear"),
        }
    }

    #[test]
    fn test_context_is_fixed_at_construction() {
        let stub = Arc::new(StubClient::returning("<p></p>"));
        let (factory, _) = counting_factory(stub);
        let dispatcher = EnvironmentDispatcher::static_only_with_factory(
            SessionCredential::new(),
            PromptCatalog::standard(),
            factory,
        );
        assert_eq!(dispatcher.context(), HostingContext::StaticOnly);
    }
}
