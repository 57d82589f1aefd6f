use clap::Parser;
use messaging_service::{config::Config, logging, web, MessageStore};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    config.validate()?;

    logging::init(&config.logging())?;
    info!("Starting messaging service");

    let store = Arc::new(MessageStore::new());
    let server_config = config.server();
    info!(
        "Text limit {} characters, read timeout {:?}, write timeout {:?}",
        server_config.char_limit, server_config.read_timeout, server_config.write_timeout
    );

    web::run_web_server(server_config, store).await?;

    info!("Server exiting...");
    Ok(())
}
