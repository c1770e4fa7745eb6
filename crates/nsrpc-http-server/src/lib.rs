//! # HTTP JSON-RPC Server
//!
//! HTTP/1.1 transport for [`nsrpc_json_rpc_server::Dispatcher`]. Each
//! `POST` to the configured path carries one JSON-RPC request; the body is
//! dispatched and the response adapter decides the status code and bytes.
//!
//! ## Features
//! - Content-type and body-size checks before dispatch
//! - 5xx error detail withheld from callers and logged
//! - Optional permissive CORS headers

pub mod cors;
pub mod handler;
pub mod server;

#[cfg(test)]
mod tests;

// Re-export main types
pub use cors::CorsLayer;
pub use handler::RpcHttpHandler;
pub use server::{HttpRpcServer, HttpRpcServerBuilder, ServerConfig};

// Re-export foundational types
pub use nsrpc_json_rpc_server::{Dispatcher, ErrorLogger, Namespace, ResponseAdapter};

/// Result type for HTTP JSON-RPC operations
pub type Result<T> = std::result::Result<T, HttpRpcError>;

/// HTTP transport errors
#[derive(Debug, thiserror::Error)]
pub enum HttpRpcError {
    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("HTTP response build error: {0}")]
    Response(#[from] http::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
