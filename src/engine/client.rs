//! HTTP client for the SQL translation/execution engine

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::response::EngineResponse;

/// Engine call errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Client could not be constructed
    #[error("failed to build engine client: {0}")]
    Config(String),

    /// Transport-level failure (connect, timeout, body read)
    #[error("engine request failed: {0}")]
    Network(String),

    /// The engine answered with a non-success status
    #[error("engine returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Output formats the engine can produce for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlFormat {
    /// Raw JSON hits/aggregation/tabular payload
    Json,
    Csv,
    Jdbc,
    Text,
}

impl SqlFormat {
    fn query_param(self) -> Option<&'static str> {
        match self {
            SqlFormat::Json => None,
            SqlFormat::Csv => Some("csv"),
            SqlFormat::Jdbc => Some("jdbc"),
            SqlFormat::Text => Some("txt"),
        }
    }
}

#[derive(Serialize)]
struct SqlRequest<'a> {
    query: &'a str,
}

/// Thin client over the engine's `_sql` endpoints.
pub struct EngineClient {
    client: Client,
    base_url: String,
}

impl EngineClient {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| EngineError::Config(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    /// Execute one statement, returning the engine's body verbatim.
    pub async fn query(&self, statement: &str, format: SqlFormat) -> Result<String, EngineError> {
        let mut request = self.client.post(format!("{}/_sql", self.base_url));
        if let Some(format) = format.query_param() {
            request = request.query(&[("format", format)]);
        }
        self.send(request, statement).await
    }

    /// Translate one statement into the engine's native query DSL.
    pub async fn translate(&self, statement: &str) -> Result<String, EngineError> {
        let request = self.client.post(format!("{}/_sql/_explain", self.base_url));
        self.send(request, statement).await
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        statement: &str,
    ) -> Result<String, EngineError> {
        let response = request
            .json(&SqlRequest { query: statement })
            .send()
            .await
            .map_err(|err| EngineError::Network(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| EngineError::Network(err.to_string()))?;

        if !status.is_success() {
            return Err(EngineError::Api { status: status.as_u16(), body });
        }
        Ok(body)
    }
}

impl From<Result<String, EngineError>> for EngineResponse {
    /// Fold an engine call into the `{ok, resp}` envelope the proxy
    /// routes answer with.
    fn from(result: Result<String, EngineError>) -> Self {
        match result {
            Ok(resp) => EngineResponse { ok: true, resp },
            Err(err) => EngineResponse { ok: false, resp: err.to_string() },
        }
    }
}
