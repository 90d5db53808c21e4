//! Config Command
//!
//! Display the merged configuration.

use crate::config::Config;
use crate::types::{PreppyError, Result};

pub fn show(config: &Config, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        "text" => {
            println!("Preppy Gateway Configuration");
            println!("============================");
            println!("hosting:            {}", config.hosting);
            println!("server.bind:        {}", config.server.bind);
            println!("server.port:        {}", config.server.port);
            println!("model.name:         {}", config.model.name);
            println!(
                "model.api_base:     {}",
                config.model.api_base.as_deref().unwrap_or("(default)")
            );
            println!("model.timeout_secs: {}", config.model.timeout_secs);
            println!("model.temperature:  {}", config.model.temperature);
            println!(
                "dispatch.base_url:  {}",
                config.dispatch.base_url.as_deref().unwrap_or("(none)")
            );
        }
        other => {
            return Err(PreppyError::Config(format!(
                "Unknown format '{}'. Valid values: text, json",
                other
            )));
        }
    }
    Ok(())
}
