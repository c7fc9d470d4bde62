//! HTTP server exposing the console proxy routes

use std::sync::Arc;

use axum::{routing::post, Router};
use tower_http::cors::CorsLayer;
use tracing::info;

use super::handler::{
    query_csv_handler, query_handler, query_jdbc_handler, query_text_handler, translate_handler,
};
use crate::engine::EngineClient;

/// HTTP server managing the console proxy API
pub struct HttpServer {
    engine: Arc<EngineClient>,
    address: String,
    port: u16,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(engine: Arc<EngineClient>, address: &str, port: u16) -> Self {
        Self {
            engine,
            address: address.to_string(),
            port,
        }
    }

    /// Build the console router; shared with tests.
    pub fn router(engine: Arc<EngineClient>) -> Router {
        Router::new()
            .route("/api/sql_console/query", post(query_handler))
            .route("/api/sql_console/querycsv", post(query_csv_handler))
            .route("/api/sql_console/queryjdbc", post(query_jdbc_handler))
            .route("/api/sql_console/querytext", post(query_text_handler))
            .route("/api/sql_console/translate", post(translate_handler))
            .layer(CorsLayer::permissive())
            .with_state(engine)
    }

    /// Start the HTTP server
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = Self::router(Arc::clone(&self.engine));

        let addr = format!("{}:{}", self.address, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("SQL console API available at http://{}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}
