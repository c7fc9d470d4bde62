//! HTTP proxy surface for the console
//!
//! Thin pass-through routes: each one forwards the `{query}` body to the
//! engine and wraps the outcome in the `{ok, resp}` envelope. No request
//! validation happens here beyond the JSON body shape.

pub mod handler;
pub mod server;

pub use handler::QueryRequest;
pub use server::HttpServer;
