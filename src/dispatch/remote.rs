//! Remote Transports
//!
//! HTTP transport used on the embedded-server and serverless paths. The
//! request/response contracts mirror the server surface exactly, so the
//! dispatcher result is indistinguishable from an in-process gateway call.

use serde_json::{Value, json};
use std::time::Duration;
use tracing::warn;

use crate::constants::serverless;
use crate::types::{
    ArtifactKind, ErrorKind, GatewayError, GatewayResult, PreppyError, Result,
};

/// How routes are spelled on the remote host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStyle {
    /// Embedded server: `/api/<route>`
    Api,
    /// Platform functions: `/.netlify/functions/<route>`
    ServerlessFunctions,
}

impl RouteStyle {
    pub fn path_for(&self, kind: ArtifactKind) -> String {
        match self {
            Self::Api => format!("/api/{}", kind.route()),
            Self::ServerlessFunctions => {
                format!("{}/{}", serverless::FUNCTION_PREFIX, kind.route())
            }
        }
    }
}

/// Same-origin or platform-function HTTP transport
pub struct RemoteTransport {
    base_url: url::Url,
    style: RouteStyle,
    client: reqwest::Client,
}

impl RemoteTransport {
    pub fn new(base_url: url::Url, style: RouteStyle, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PreppyError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            base_url,
            style,
            client,
        })
    }

    pub async fn send(&self, kind: ArtifactKind, input: &str) -> GatewayResult {
        let url = match self.base_url.join(&self.style.path_for(kind)) {
            Ok(url) => url,
            Err(e) => {
                return GatewayResult::failure(GatewayError::new(
                    ErrorKind::Upstream,
                    format!("Invalid endpoint URL: {}", e),
                ));
            }
        };

        let response = match self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&request_body(kind, input))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(%kind, "Transport failure: {}", e);
                return GatewayResult::failure(GatewayError::new(
                    ErrorKind::Network,
                    format!(
                        "Could not reach the generation service for {}. Please try again.",
                        kind.label()
                    ),
                ));
            }
        };

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        map_response(kind, status, &body)
    }
}

/// Request body per kind: `{concept}`, `{requirements}`, or `{prompt, type}`
pub(crate) fn request_body(kind: ArtifactKind, input: &str) -> Value {
    let mut body = json!({ kind.input_field(): input });
    if let ArtifactKind::Generic(phase) = kind {
        body["type"] = json!(phase.as_str());
    }
    body
}

/// Map a wire response back into a `GatewayResult`
pub(crate) fn map_response(kind: ArtifactKind, status: u16, body: &str) -> GatewayResult {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);

    if (200..300).contains(&status) {
        if parsed["success"] == json!(true) {
            if let Some(html) = parsed[kind.field_name()].as_str() {
                return GatewayResult::success(kind, html);
            }
        }
        return GatewayResult::failure(GatewayError::new(
            ErrorKind::Upstream,
            format!("Malformed response for {}. Please try again.", kind.label()),
        ));
    }

    let message = parsed["error"]
        .as_str()
        .map(String::from)
        .unwrap_or_else(|| format!("Failed to generate {}. Please try again.", kind.label()));

    let error_kind = match status {
        400 => ErrorKind::InvalidInput,
        401 => ErrorKind::Auth,
        429 if message.to_lowercase().contains("quota") => ErrorKind::QuotaExceeded,
        429 => ErrorKind::RateLimited,
        _ => ErrorKind::Upstream,
    };
    GatewayResult::failure(GatewayError::new(error_kind, message))
}
