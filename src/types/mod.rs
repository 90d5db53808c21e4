//! Core Domain Types
//!
//! Artifact kinds, gateway request/result shapes, and the hosting context
//! that selects the dispatch transport at startup.

pub mod error;

pub use error::{ErrorClassifier, ErrorKind, GatewayError, ModelError, PreppyError, Result};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

// =============================================================================
// Artifact Kinds
// =============================================================================

/// SDLC phase for generic single-prompt generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdlcPhase {
    Design,
    Development,
    Testing,
    Deployment,
    Maintenance,
}

impl SdlcPhase {
    pub const ALL: [SdlcPhase; 5] = [
        SdlcPhase::Design,
        SdlcPhase::Development,
        SdlcPhase::Testing,
        SdlcPhase::Deployment,
        SdlcPhase::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Design => "design",
            Self::Development => "development",
            Self::Testing => "testing",
            Self::Deployment => "deployment",
            Self::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for SdlcPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SdlcPhase {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "design" => Ok(Self::Design),
            "development" => Ok(Self::Development),
            "testing" => Ok(Self::Testing),
            "deployment" => Ok(Self::Deployment),
            "maintenance" => Ok(Self::Maintenance),
            _ => Err(format!(
                "Invalid phase '{}'. Valid values: design, development, testing, deployment, maintenance",
                s
            )),
        }
    }
}

/// Category of SDLC document being generated.
///
/// Each kind owns exactly one prompt template, one set of generation options,
/// one HTTP route, and one success field name. The field name is part of the
/// external contract with the UI and must never vary with input or response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    Analysis,
    Design,
    Erd,
    LowLevel,
    WebsiteStructure,
    UserStories,
    Requirements,
    Generic(SdlcPhase),
}

impl ArtifactKind {
    /// All kinds with generic phases fully enumerated
    pub fn all() -> Vec<ArtifactKind> {
        let mut kinds = vec![
            Self::Analysis,
            Self::Design,
            Self::Erd,
            Self::LowLevel,
            Self::WebsiteStructure,
            Self::UserStories,
            Self::Requirements,
        ];
        kinds.extend(SdlcPhase::ALL.into_iter().map(Self::Generic));
        kinds
    }

    /// Success payload field name. External contract with the UI collaborators.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::Design => "design",
            Self::Erd => "erd",
            Self::LowLevel => "diagrams",
            Self::WebsiteStructure => "structure",
            Self::UserStories => "content",
            Self::Requirements => "document",
            Self::Generic(_) => "result",
        }
    }

    /// Route segment under `/api/` (embedded server) or the serverless
    /// function name.
    pub fn route(&self) -> &'static str {
        match self {
            Self::Analysis => "analyze",
            Self::Design => "design",
            Self::Erd => "erd",
            Self::LowLevel => "lowlevel",
            Self::WebsiteStructure => "website-structure",
            Self::UserStories => "user-stories",
            Self::Requirements => "requirements",
            Self::Generic(_) => "generate",
        }
    }

    /// Request body field carrying the user's free text
    pub fn input_field(&self) -> &'static str {
        match self {
            Self::Analysis | Self::WebsiteStructure | Self::Requirements => "concept",
            Self::Design | Self::Erd | Self::LowLevel => "requirements",
            Self::UserStories | Self::Generic(_) => "prompt",
        }
    }

    /// Human-readable label used in user-facing error messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Analysis => "project analysis",
            Self::Design => "high level design",
            Self::Erd => "entity-relationship diagram",
            Self::LowLevel => "low level diagrams",
            Self::WebsiteStructure => "website structure",
            Self::UserStories => "user stories",
            Self::Requirements => "requirements document",
            Self::Generic(_) => "content",
        }
    }

    /// Parse a kind name with an optional phase (required for `generic`)
    pub fn parse(kind: &str, phase: Option<&str>) -> std::result::Result<Self, String> {
        match kind.to_lowercase().as_str() {
            "analysis" | "analyze" => Ok(Self::Analysis),
            "design" => Ok(Self::Design),
            "erd" => Ok(Self::Erd),
            "lowlevel" | "low-level" => Ok(Self::LowLevel),
            "website-structure" | "structure" => Ok(Self::WebsiteStructure),
            "user-stories" | "stories" => Ok(Self::UserStories),
            "requirements" => Ok(Self::Requirements),
            "generic" | "generate" => {
                let phase = phase.ok_or_else(|| {
                    "Kind 'generic' requires a phase (design, development, testing, deployment, maintenance)"
                        .to_string()
                })?;
                Ok(Self::Generic(phase.parse()?))
            }
            _ => Err(format!(
                "Invalid kind '{}'. Valid values: analysis, design, erd, lowlevel, website-structure, user-stories, requirements, generic",
                kind
            )),
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generic(phase) => write!(f, "generic({})", phase),
            other => f.write_str(other.route()),
        }
    }
}

// =============================================================================
// Gateway Request / Result
// =============================================================================

/// One UI-originated generation request
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub kind: ArtifactKind,
    pub input: String,
}

impl GatewayRequest {
    pub fn new(kind: ArtifactKind, input: impl Into<String>) -> Self {
        Self {
            kind,
            input: input.into(),
        }
    }
}

/// Normalized outcome of one generation request.
///
/// `placeholder` is populated only for demo-mode failures on the static-only
/// path, so the UI can render illustrative content while still observing
/// `success: false`.
#[derive(Debug, Clone)]
pub enum GatewayResult {
    Success {
        field: &'static str,
        html: String,
    },
    Failure {
        error: GatewayError,
        placeholder: Option<String>,
    },
}

impl GatewayResult {
    pub fn success(kind: ArtifactKind, html: impl Into<String>) -> Self {
        Self::Success {
            field: kind.field_name(),
            html: html.into(),
        }
    }

    pub fn failure(error: GatewayError) -> Self {
        Self::Failure {
            error,
            placeholder: None,
        }
    }

    pub fn demo(error: GatewayError, placeholder: impl Into<String>) -> Self {
        Self::Failure {
            error,
            placeholder: Some(placeholder.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Wire shape: `{"success":true,"<field>":html}` or
    /// `{"success":false,"error":message}`
    pub fn to_json(&self) -> Value {
        match self {
            Self::Success { field, html } => {
                let mut map = serde_json::Map::new();
                map.insert("success".to_string(), Value::Bool(true));
                map.insert((*field).to_string(), Value::String(html.clone()));
                Value::Object(map)
            }
            Self::Failure { error, .. } => {
                json!({ "success": false, "error": error.message })
            }
        }
    }
}

// =============================================================================
// Hosting Context
// =============================================================================

/// Deployment mode, read once at startup. Determines which transport the
/// dispatcher uses; never changes during a process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HostingContext {
    #[default]
    EmbeddedServer,
    ServerlessFunction,
    StaticOnly,
}

impl std::str::FromStr for HostingContext {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "server" | "embedded-server" => Ok(Self::EmbeddedServer),
            "serverless" | "serverless-function" => Ok(Self::ServerlessFunction),
            "static" | "static-only" => Ok(Self::StaticOnly),
            _ => Err(format!(
                "Invalid hosting context '{}'. Valid values: server, serverless, static",
                s
            )),
        }
    }
}

impl std::fmt::Display for HostingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::EmbeddedServer => "embedded-server",
            Self::ServerlessFunction => "serverless-function",
            Self::StaticOnly => "static-only",
        };
        f.write_str(s)
    }
}
