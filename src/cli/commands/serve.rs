//! Serve Command
//!
//! Runs the embedded HTTP server for the embedded-server hosting context.

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::server;
use crate::types::Result;

pub fn run(mut config: Config, port: Option<u16>, bind: Option<String>) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    config.validate()?;

    let rt = Runtime::new()?;
    rt.block_on(server::run(&config))
}
