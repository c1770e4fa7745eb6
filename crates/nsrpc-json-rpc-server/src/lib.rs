//! # Namespaced JSON-RPC 2.0 Dispatch
//!
//! A transport-agnostic JSON-RPC 2.0 server core. Methods live in a tree of
//! namespaces and are addressed by dotted names such as `ns1.ns2.sum`.
//!
//! ## Features
//! - Namespace tree with separate handler and sub-namespace maps
//! - Iterative method resolution with precise not-found errors
//! - Fixed JSON-RPC 2.0 error code table with wrapped causes
//! - Response adapter that hides 5xx detail from callers and logs it
//!
//! ```
//! use nsrpc_json_rpc_server::prelude::*;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.root_mut().namespace_mut("math").register_handler(
//!     "sum",
//!     |params: RawParams| -> HandlerResult {
//!         let numbers: Vec<i64> = params.parse()?;
//!         Ok(json!(numbers.iter().sum::<i64>()))
//!     },
//! );
//!
//! let request = JsonRpcRequest::new(1, "math.sum", RawParams::from_json("[1,2,3,4]").unwrap());
//! let response = dispatcher.execute(request).await;
//! assert_eq!(response.result(), Some(&json!(10)));
//! # });
//! ```

pub mod dispatch;
pub mod error;
pub mod handler;
pub mod namespace;
pub mod prelude;
pub mod request;
pub mod resolve;
pub mod response;
pub mod transport;
pub mod types;

// Re-export main types
pub use dispatch::{DEFAULT_SEPARATOR, Dispatcher, parse_json_rpc_request};
pub use error::{BoxError, JsonRpcErrorCode, RpcError, TypedError};
pub use handler::{AsyncFunctionHandler, HandlerResult, MethodHandler, async_handler};
pub use namespace::Namespace;
pub use request::{JsonRpcRequest, RawParams};
pub use resolve::resolve;
pub use response::{JsonRpcError, JsonRpcMessage, JsonRpcResponse, ResponseError};
pub use transport::{EncodedResponse, ErrorLogger, ResponseAdapter, TracingErrorLogger};
pub use types::{JsonRpcVersion, RequestId};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}
