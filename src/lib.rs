//! Preppy Gateway - Prompt-Templated AI Request Gateway
//!
//! Turns a UI request for an SDLC artifact (requirements analysis, high
//! level design, ERD, low level diagrams, website structure, user stories,
//! a requirements document, or a generic phase prompt) into a
//! chat-completion call and normalizes the outcome into a uniform result
//! shape.
//!
//! ## Architecture
//!
//! - [`catalog`]: one prompt template and one set of generation options per
//!   artifact kind
//! - [`model`]: the `ModelClient` trait and the OpenAI chat-completion client
//! - [`gateway`]: the functional core - validate, look up, invoke, normalize
//! - [`dispatch`]: hosting-context-aware transport selection (embedded
//!   server, serverless functions, or fully client-side with a session
//!   credential and demo-mode fallback)
//! - [`server`]: the embedded axum HTTP surface under `/api/`
//!
//! ## Quick Start
//!
//! ```ignore
//! use preppy_gateway::{PromptCatalog, RequestGateway, GatewayRequest, ArtifactKind};
//!
//! let gateway = RequestGateway::new(PromptCatalog::standard(), client);
//! let result = gateway
//!     .handle(&GatewayRequest::new(ArtifactKind::Analysis, concept))
//!     .await;
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod gateway;
pub mod model;
pub mod server;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, DispatchConfig, ModelConfig, ServerConfig};

// Error Types
pub use types::error::{ErrorClassifier, ErrorKind, GatewayError, ModelError, PreppyError, Result};

// Domain
pub use types::{ArtifactKind, GatewayRequest, GatewayResult, HostingContext, SdlcPhase};

// Catalog
pub use catalog::{GenerationOptions, PromptCatalog, PromptTemplate};

// Gateway & Dispatch
pub use dispatch::{EnvironmentDispatcher, RemoteTransport, RouteStyle, SessionCredential};
pub use gateway::RequestGateway;

// Model
pub use model::{ChatMessage, ModelClient, OpenAiClient, SharedModelClient};
