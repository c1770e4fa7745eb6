//! # JSON-RPC Server Prelude
//!
//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use nsrpc_json_rpc_server::prelude::*;
//! ```

pub use crate::dispatch::Dispatcher;
pub use crate::error::{RpcError, TypedError};
pub use crate::handler::{HandlerResult, MethodHandler, async_handler};
pub use crate::namespace::Namespace;
pub use crate::request::{JsonRpcRequest, RawParams};
pub use crate::response::{JsonRpcError, JsonRpcMessage, JsonRpcResponse, ResponseError};
pub use crate::transport::{ErrorLogger, ResponseAdapter};
pub use crate::types::{JsonRpcVersion, RequestId};

// Standard error codes
pub use crate::error_codes::*;
