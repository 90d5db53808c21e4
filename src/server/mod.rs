//! Embedded HTTP Server
//!
//! Axum server for the embedded-server hosting context. Exposes the
//! generation routes under `/api/` with permissive CORS and the exact
//! request/response contracts the UI collaborators rely on. A missing
//! credential degrades gracefully: the server starts and every generation
//! route answers with a configuration error body instead of crashing.

use axum::{
    Json, Router,
    extract::State,
    http::{Method, StatusCode, header},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::catalog::PromptCatalog;
use crate::config::Config;
use crate::constants::model as model_defaults;
use crate::gateway::RequestGateway;
use crate::model::OpenAiClient;
use crate::types::{ArtifactKind, GatewayError, GatewayRequest, GatewayResult, Result, SdlcPhase};

/// Shared handler state. `gateway` is `None` when the server-side credential
/// is absent.
#[derive(Clone)]
pub struct AppState {
    gateway: Option<Arc<RequestGateway>>,
}

impl AppState {
    pub fn new(gateway: Option<Arc<RequestGateway>>) -> Self {
        Self { gateway }
    }

    /// Build state from the process environment and config
    pub fn from_env(config: &Config) -> Result<Self> {
        let client = OpenAiClient::from_env(
            config.model.api_base.clone(),
            Duration::from_secs(config.model.timeout_secs),
        )?;
        let gateway = client.map(|c| {
            RequestGateway::shared(
                PromptCatalog::standard_with_model(&config.model.name),
                Arc::new(c),
            )
        });
        Ok(Self::new(gateway))
    }
}

/// Build the router with all generation routes and permissive CORS
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/analyze", post(analyze).options(preflight))
        .route("/api/generate", post(generate).options(preflight))
        .route("/api/design", post(design).options(preflight))
        .route("/api/erd", post(erd).options(preflight))
        .route("/api/lowlevel", post(lowlevel).options(preflight))
        .route(
            "/api/website-structure",
            post(website_structure).options(preflight),
        )
        .route("/api/user-stories", post(user_stories).options(preflight))
        .route("/api/requirements", post(requirements).options(preflight))
        .route("/api/health", get(health).options(preflight))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until ctrl-c
pub async fn run(config: &Config) -> Result<()> {
    let state = AppState::from_env(config)?;
    if state.gateway.is_some() {
        info!("OpenAI API initialized successfully");
    }
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Preppy gateway listening on http://{}/", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                error!("Server error: {}", e);
                return Err(e.into());
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown requested, stopping server");
        }
    }
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

async fn analyze(State(state): State<AppState>, body: String) -> (StatusCode, Json<Value>) {
    run_generation(state, ArtifactKind::Analysis, &body).await
}

async fn design(State(state): State<AppState>, body: String) -> (StatusCode, Json<Value>) {
    run_generation(state, ArtifactKind::Design, &body).await
}

async fn erd(State(state): State<AppState>, body: String) -> (StatusCode, Json<Value>) {
    run_generation(state, ArtifactKind::Erd, &body).await
}

async fn lowlevel(State(state): State<AppState>, body: String) -> (StatusCode, Json<Value>) {
    run_generation(state, ArtifactKind::LowLevel, &body).await
}

async fn website_structure(
    State(state): State<AppState>,
    body: String,
) -> (StatusCode, Json<Value>) {
    run_generation(state, ArtifactKind::WebsiteStructure, &body).await
}

async fn user_stories(State(state): State<AppState>, body: String) -> (StatusCode, Json<Value>) {
    run_generation(state, ArtifactKind::UserStories, &body).await
}

async fn requirements(State(state): State<AppState>, body: String) -> (StatusCode, Json<Value>) {
    run_generation(state, ArtifactKind::Requirements, &body).await
}

/// `/api/generate` carries the phase in the body as `type`
async fn generate(State(state): State<AppState>, body: String) -> (StatusCode, Json<Value>) {
    let parsed: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let kind = match parsed["type"]
        .as_str()
        .and_then(|s| s.parse::<SdlcPhase>().ok())
    {
        Some(phase) => ArtifactKind::Generic(phase),
        None => {
            return failure_response(&GatewayError::invalid_input(
                "A valid SDLC phase is required: design, development, testing, deployment, maintenance",
            ));
        }
    };
    run_generation(state, kind, &body).await
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "ai_configured": state.gateway.is_some(),
    }))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": "Endpoint not found" })),
    )
}

// =============================================================================
// Shared plumbing
// =============================================================================

async fn run_generation(
    state: AppState,
    kind: ArtifactKind,
    body: &str,
) -> (StatusCode, Json<Value>) {
    let Some(gateway) = state.gateway else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "error": format!(
                    "{} not configured. Please add {} to environment variables.",
                    model_defaults::CREDENTIAL_ENV,
                    model_defaults::CREDENTIAL_ENV
                ),
            })),
        );
    };

    let input = match extract_input(body, kind.input_field()) {
        Ok(input) => input,
        Err(err) => return failure_response(&err),
    };

    let result = gateway.handle(&GatewayRequest::new(kind, input)).await;
    respond(&result)
}

/// Parse the request body ourselves so malformed JSON still gets the
/// `{success:false, error}` shape rather than a framework default.
fn extract_input(body: &str, field: &str) -> std::result::Result<String, GatewayError> {
    let parsed: Value = serde_json::from_str(body)
        .map_err(|_| GatewayError::invalid_input("Invalid JSON in request body"))?;
    parsed[field]
        .as_str()
        .map(String::from)
        .ok_or_else(|| GatewayError::invalid_input(format!("Field '{}' is required", field)))
}

fn respond(result: &GatewayResult) -> (StatusCode, Json<Value>) {
    let status = match result {
        GatewayResult::Success { .. } => StatusCode::OK,
        GatewayResult::Failure { error, .. } => {
            StatusCode::from_u16(error.kind.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
    };
    (status, Json(result.to_json()))
}

fn failure_response(error: &GatewayError) -> (StatusCode, Json<Value>) {
    respond(&GatewayResult::failure(error.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::gateway::tests::StubClient;

    fn app_with_stub(stub: Arc<StubClient>) -> Router {
        let gateway = RequestGateway::shared(PromptCatalog::standard(), stub);
        build_router(AppState::new(Some(gateway)))
    }

    fn app_without_credential() -> Router {
        build_router(AppState::new(None))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    const VALID_CONCEPT: &str =
        "A recipe sharing site with user accounts, ratings, and weekly meal plans.";

    #[tokio::test]
    async fn test_analyze_success_shape() {
        let app = app_with_stub(Arc::new(StubClient::returning("<h3>OK</h3>")));
        let body = json!({ "concept": VALID_CONCEPT }).to_string();

        let response = app.oneshot(post_json("/api/analyze", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let v = body_json(response).await;
        assert_eq!(v["success"], json!(true));
        assert_eq!(v["analysis"], json!("<h3>OK</h3>"));
    }

    #[tokio::test]
    async fn test_missing_field_is_400_with_contract_shape() {
        let app = app_with_stub(Arc::new(StubClient::returning("<p></p>")));

        let response = app
            .oneshot(post_json("/api/design", r#"{"wrong":"field"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let v = body_json(response).await;
        assert_eq!(v["success"], json!(false));
        assert!(v["error"].as_str().unwrap().contains("requirements"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_400_with_contract_shape() {
        let app = app_with_stub(Arc::new(StubClient::returning("<p></p>")));

        let response = app
            .oneshot(post_json("/api/erd", "this is not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let v = body_json(response).await;
        assert_eq!(v["success"], json!(false));
    }

    #[tokio::test]
    async fn test_missing_credential_degrades_gracefully() {
        let app = app_without_credential();
        let body = json!({ "concept": VALID_CONCEPT }).to_string();

        let response = app.oneshot(post_json("/api/analyze", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let v = body_json(response).await;
        assert_eq!(v["success"], json!(false));
        assert!(v["error"].as_str().unwrap().contains("OPENAI_API_KEY not configured"));
    }

    #[tokio::test]
    async fn test_generate_requires_known_phase() {
        let app = app_with_stub(Arc::new(StubClient::returning("<p></p>")));
        let body = json!({ "prompt": VALID_CONCEPT, "type": "daydreaming" }).to_string();

        let response = app.oneshot(post_json("/api/generate", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_routes_to_result_field() {
        let app = app_with_stub(Arc::new(StubClient::returning("<p>test plan</p>")));
        let body = json!({ "prompt": VALID_CONCEPT, "type": "testing" }).to_string();

        let response = app.oneshot(post_json("/api/generate", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let v = body_json(response).await;
        assert_eq!(v["result"], json!("<p>test plan</p>"));
    }

    #[tokio::test]
    async fn test_user_stories_uses_content_field() {
        let app = app_with_stub(Arc::new(StubClient::returning("<ul><li>story</li></ul>")));
        let body = json!({ "prompt": VALID_CONCEPT }).to_string();

        let response = app
            .oneshot(post_json("/api/user-stories", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let v = body_json(response).await;
        assert_eq!(v["success"], json!(true));
        assert_eq!(v["content"], json!("<ul><li>story</li></ul>"));
    }

    #[tokio::test]
    async fn test_requirements_uses_document_field() {
        let app = app_with_stub(Arc::new(StubClient::returning("<h3>Requirements</h3>")));
        let body = json!({ "concept": VALID_CONCEPT }).to_string();

        let response = app
            .oneshot(post_json("/api/requirements", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let v = body_json(response).await;
        assert_eq!(v["success"], json!(true));
        assert_eq!(v["document"], json!("<h3>Requirements</h3>"));
    }

    #[tokio::test]
    async fn test_options_preflight_returns_200() {
        let app = app_with_stub(Arc::new(StubClient::returning("<p></p>")));
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/erd")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_api_route_is_404_json() {
        let app = app_with_stub(Arc::new(StubClient::returning("<p></p>")));

        let response = app
            .oneshot(post_json("/api/user-profiles", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let v = body_json(response).await;
        assert_eq!(v["error"], json!("Endpoint not found"));
    }

    #[tokio::test]
    async fn test_health_reports_credential_state() {
        let app = app_without_credential();
        let request = Request::builder()
            .method("GET")
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let v = body_json(response).await;
        assert_eq!(v["ai_configured"], json!(false));
    }

    #[tokio::test]
    async fn test_auth_failure_maps_to_401() {
        let stub = Arc::new(StubClient::failing(crate::types::ModelError::auth(
            "Incorrect API key",
        )));
        let app = app_with_stub(stub);
        let body = json!({ "requirements": VALID_CONCEPT }).to_string();

        let response = app.oneshot(post_json("/api/lowlevel", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let v = body_json(response).await;
        assert_eq!(v["success"], json!(false));
    }
}
