use std::path::Path;
use std::sync::Arc;

use sql_console::{ConsoleConfig, EngineClient, HttpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = match std::env::var("SQL_CONSOLE_CONFIG") {
        Ok(path) => ConsoleConfig::from_file(Path::new(&path))?,
        Err(_) => ConsoleConfig::default(),
    };

    let engine = EngineClient::new(&config.engine)?;
    let server = HttpServer::new(Arc::new(engine), &config.address, config.port);

    if let Err(e) = server.start().await {
        eprintln!("Server error: {}", e);
    }

    Ok(())
}
