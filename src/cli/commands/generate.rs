//! Generate Command
//!
//! One-shot generation from the command line, dispatched through the same
//! environment-adaptive layer the UI uses. The transport follows the
//! configured hosting context; static-only picks up `OPENAI_API_KEY` from
//! the environment as the session credential when present.

use console::style;
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::config::Config;
use crate::constants::model as model_defaults;
use crate::dispatch::{EnvironmentDispatcher, SessionCredential};
use crate::types::{ArtifactKind, GatewayResult, HostingContext, PreppyError, Result};

pub struct GenerateOptions {
    pub kind: String,
    pub phase: Option<String>,
    pub input: Option<String>,
    pub input_file: Option<PathBuf>,
}

pub fn run(config: Config, opts: GenerateOptions) -> Result<()> {
    let kind = ArtifactKind::parse(&opts.kind, opts.phase.as_deref())
        .map_err(PreppyError::Config)?;
    let input = read_input(&opts)?;

    let dispatcher = build_dispatcher(&config)?;
    debug!(context = %dispatcher.context(), %kind, "CLI dispatch");

    let rt = Runtime::new()?;
    let result = rt.block_on(dispatcher.dispatch(kind, &input));

    match result {
        GatewayResult::Success { html, .. } => {
            println!("{}", html);
            Ok(())
        }
        GatewayResult::Failure {
            error,
            placeholder: Some(placeholder),
        } => {
            eprintln!("{} {}", style("note:").yellow().bold(), error.message);
            println!("{}", placeholder);
            Ok(())
        }
        GatewayResult::Failure { error, .. } => {
            eprintln!("{} {}", style("error:").red().bold(), error.message);
            Err(PreppyError::Config(error.message))
        }
    }
}

fn read_input(opts: &GenerateOptions) -> Result<String> {
    match (&opts.input, &opts.input_file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
        (None, None) => Err(PreppyError::Config(
            "Provide input with --input or --input-file".to_string(),
        )),
    }
}

fn build_dispatcher(config: &Config) -> Result<EnvironmentDispatcher> {
    let timeout = Duration::from_secs(config.model.timeout_secs);
    match config.hosting {
        HostingContext::EmbeddedServer => {
            let base = config
                .dispatch
                .base_url
                .clone()
                .unwrap_or_else(|| format!("http://127.0.0.1:{}", config.server.port));
            EnvironmentDispatcher::embedded_server(parse_url(&base)?, timeout)
        }
        HostingContext::ServerlessFunction => {
            let base = config.dispatch.base_url.clone().ok_or_else(|| {
                PreppyError::Config("Serverless hosting requires dispatch.base_url".to_string())
            })?;
            EnvironmentDispatcher::serverless(parse_url(&base)?, timeout)
        }
        HostingContext::StaticOnly => {
            let credential = SessionCredential::new();
            if let Ok(key) = std::env::var(model_defaults::CREDENTIAL_ENV)
                && !key.trim().is_empty()
            {
                credential
                    .configure(&key)
                    .map_err(|e| PreppyError::Config(e.message))?;
            }
            Ok(EnvironmentDispatcher::static_only(credential, &config.model))
        }
    }
}

fn parse_url(raw: &str) -> Result<url::Url> {
    url::Url::parse(raw).map_err(|e| PreppyError::Config(format!("Invalid base URL '{}': {}", raw, e)))
}
