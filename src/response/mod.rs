//! Backend envelopes and per-statement outcomes
//!
//! Every proxy route answers with an [`EngineResponse`] envelope; the
//! console turns one envelope per statement into a [`ResponseDetail`] that
//! is either the payload or the error text, never both.

use serde::{Deserialize, Serialize};

/// The `{ok, resp}` envelope emitted by the proxy routes.
///
/// `resp` carries the engine's body verbatim on success and the error text
/// on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineResponse {
    pub ok: bool,
    pub resp: String,
}

/// Tagged outcome of one backend call for one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseDetail<T> {
    Fulfilled(T),
    Rejected { error: String },
}

impl<T> ResponseDetail<T> {
    /// Build a rejected outcome from any error text.
    pub fn rejected(error: impl Into<String>) -> Self {
        ResponseDetail::Rejected { error: error.into() }
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(self, ResponseDetail::Fulfilled(_))
    }

    /// The payload, when fulfilled.
    pub fn data(&self) -> Option<&T> {
        match self {
            ResponseDetail::Fulfilled(data) => Some(data),
            ResponseDetail::Rejected { .. } => None,
        }
    }

    /// The error text, when rejected.
    pub fn error(&self) -> Option<&str> {
        match self {
            ResponseDetail::Fulfilled(_) => None,
            ResponseDetail::Rejected { error } => Some(error),
        }
    }
}

/// Convert a proxy envelope into a per-statement outcome.
///
/// A missing envelope (transport failure before any response) rejects with
/// a fixed message so it still gets a line in the Messages tab.
pub fn process_response(response: Option<EngineResponse>) -> ResponseDetail<String> {
    match response {
        None => ResponseDetail::rejected("no response"),
        Some(EngineResponse { ok: false, resp }) => ResponseDetail::Rejected { error: resp },
        Some(EngineResponse { resp, .. }) => ResponseDetail::Fulfilled(resp),
    }
}

/// Severity of a Messages-tab line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// One Messages-tab line, bound to the statement that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMessage {
    pub text: String,
    pub kind: MessageKind,
}

impl QueryMessage {
    pub fn success(text: impl Into<String>) -> Self {
        QueryMessage { text: text.into(), kind: MessageKind::Success }
    }

    pub fn error(text: impl Into<String>) -> Self {
        QueryMessage { text: text.into(), kind: MessageKind::Error }
    }
}

/// Render the shared Messages tab: one `Label: text` paragraph per
/// statement, in statement order.
pub fn message_report(messages: &[QueryMessage], tab_names: &[String]) -> String {
    messages
        .iter()
        .enumerate()
        .map(|(index, message)| {
            let name = tab_names.get(index).map(String::as_str).unwrap_or("");
            format!("{}: {}\n\n", capitalize(name), message.text)
        })
        .collect()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
