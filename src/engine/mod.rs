//! Client for the backend SQL engine

pub mod client;

pub use client::{EngineClient, EngineError, SqlFormat};
