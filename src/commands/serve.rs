use crate::api::Mode;
use crate::args::ServeArgs;
use crate::commands::Out;
use crate::handler::RequestHandler;
use crate::{server, Config, Result};
use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server until it is interrupted.
pub async fn serve(config: Config, mode: Mode, args: &ServeArgs) -> Result<Out<()>> {
    let addr = listen_addr(&config, args)?;
    let handler = Arc::new(RequestHandler::from_config(&config, mode).await?);
    server::serve(handler, addr).await?;
    Ok("The server has stopped".into())
}

fn listen_addr(config: &Config, args: &ServeArgs) -> Result<SocketAddr> {
    match args.listen() {
        Some(addr) => Ok(addr),
        None => config
            .listen()
            .parse()
            .with_context(|| format!("Invalid listen address '{}'", config.listen())),
    }
}
