//! Route handlers for the console proxy API

use std::sync::Arc;

use axum::extract::{Json, State};
use serde::Deserialize;
use tracing::debug;

use crate::engine::{EngineClient, SqlFormat};
use crate::response::EngineResponse;

/// Request body shared by every console route.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

async fn forward(engine: &EngineClient, format: Option<SqlFormat>, query: &str) -> EngineResponse {
    debug!("forwarding statement to engine");
    let result = match format {
        Some(format) => engine.query(query, format).await,
        None => engine.translate(query).await,
    };
    result.into()
}

/// Handler for `/api/sql_console/query`
pub async fn query_handler(
    State(engine): State<Arc<EngineClient>>,
    Json(payload): Json<QueryRequest>,
) -> Json<EngineResponse> {
    Json(forward(&engine, Some(SqlFormat::Json), &payload.query).await)
}

/// Handler for `/api/sql_console/querycsv`
pub async fn query_csv_handler(
    State(engine): State<Arc<EngineClient>>,
    Json(payload): Json<QueryRequest>,
) -> Json<EngineResponse> {
    Json(forward(&engine, Some(SqlFormat::Csv), &payload.query).await)
}

/// Handler for `/api/sql_console/queryjdbc`
pub async fn query_jdbc_handler(
    State(engine): State<Arc<EngineClient>>,
    Json(payload): Json<QueryRequest>,
) -> Json<EngineResponse> {
    Json(forward(&engine, Some(SqlFormat::Jdbc), &payload.query).await)
}

/// Handler for `/api/sql_console/querytext`
pub async fn query_text_handler(
    State(engine): State<Arc<EngineClient>>,
    Json(payload): Json<QueryRequest>,
) -> Json<EngineResponse> {
    Json(forward(&engine, Some(SqlFormat::Text), &payload.query).await)
}

/// Handler for `/api/sql_console/translate`
pub async fn translate_handler(
    State(engine): State<Arc<EngineClient>>,
    Json(payload): Json<QueryRequest>,
) -> Json<EngineResponse> {
    Json(forward(&engine, None, &payload.query).await)
}
