//! Adapters implementation for external services

pub mod http_transport;

// Re-export adapters for easier import
pub use http_transport::{create_http_transport, HttpTransport};
