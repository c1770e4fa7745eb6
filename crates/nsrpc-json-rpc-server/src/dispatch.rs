use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{JsonRpcErrorCode, RpcError, TypedError};
use crate::handler::MethodHandler;
use crate::namespace::Namespace;
use crate::request::JsonRpcRequest;
use crate::resolve::{resolve, split_method};
use crate::response::{JsonRpcError, JsonRpcMessage, ResponseError};
use crate::types::RequestId;

/// Namespace separator used unless configured otherwise
pub const DEFAULT_SEPARATOR: &str = ".";

/// Decode a request body into a [`JsonRpcRequest`].
///
/// Bodies that are not JSON fail with a parse error; JSON that is not a
/// well-formed request envelope fails with an invalid-request error. The
/// `id` is recovered where possible so the caller can still echo it.
pub fn parse_json_rpc_request(body: &[u8]) -> Result<JsonRpcRequest, JsonRpcError> {
    let value: Value = serde_json::from_slice(body).map_err(|err| {
        let error = ResponseError::new(JsonRpcErrorCode::ParseError.code(), "Parse error")
            .with_data(vec![err.to_string()])
            .with_transport_status(400);
        JsonRpcError::new(RequestId::Null, error)
    })?;

    let id = value
        .get("id")
        .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok())
        .unwrap_or_default();

    // Decode from the body bytes so `params` stays raw.
    serde_json::from_slice::<JsonRpcRequest>(body).map_err(|err| {
        let error = ResponseError::new(JsonRpcErrorCode::InvalidRequest.code(), "Invalid Request")
            .with_data(vec![err.to_string()])
            .with_transport_status(400);
        JsonRpcError::new(id, error)
    })
}

/// Resolves request methods against a namespace tree and invokes them.
///
/// Registration takes `&mut self` and execution takes `&self`, so once the
/// dispatcher is shared behind an `Arc` the tree can no longer change.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    root: Namespace,
    separator: String,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::with_root(Namespace::new())
    }

    /// Dispatch over an already built tree.
    pub fn with_root(root: Namespace) -> Self {
        Self {
            root,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    /// Use a different namespace separator.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn root(&self) -> &Namespace {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Namespace {
        &mut self.root
    }

    /// Register a namespace under the root
    pub fn register_namespace(&mut self, name: impl Into<String>, namespace: Namespace) {
        self.root.register_namespace(name, namespace);
    }

    /// Register a handler under the root
    pub fn register_handler<H>(&mut self, name: impl Into<String>, handler: H)
    where
        H: MethodHandler + 'static,
    {
        self.root.register_handler(name, handler);
    }

    /// Get all registered methods as full dotted paths
    pub fn registered_methods(&self) -> Vec<String> {
        self.root.registered_methods(&self.separator)
    }

    /// Find the handler for a full method name.
    pub fn find_method(&self, method: &str) -> Result<&Arc<dyn MethodHandler>, RpcError> {
        let segments = split_method(method, &self.separator);
        resolve(&self.root, &segments)
    }

    /// Resolve and invoke a request, always producing a response.
    pub async fn execute(&self, request: JsonRpcRequest) -> JsonRpcMessage {
        let JsonRpcRequest {
            method, params, id, ..
        } = request;

        let handler = match self.find_method(&method) {
            Ok(handler) => Arc::clone(handler),
            Err(err) => {
                debug!(method = %method, id = %id, error = %err, "Method resolution failed");
                return JsonRpcMessage::error(JsonRpcError::from_typed(id, &err));
            }
        };

        debug!(method = %method, id = %id, "Invoking method");
        match handler.handle(params).await {
            Ok(result) => JsonRpcMessage::success(id, result),
            Err(err) => {
                debug!(
                    method = %method,
                    id = %id,
                    code = err.code(),
                    error = %err,
                    "Method returned an error"
                );
                JsonRpcMessage::error(JsonRpcError::from_typed(id, &err))
            }
        }
    }

    /// Decode a request body and execute it.
    pub async fn handle_bytes(&self, body: &[u8]) -> JsonRpcMessage {
        match parse_json_rpc_request(body) {
            Ok(request) => self.execute(request).await,
            Err(error) => {
                warn!(
                    code = error.error.code,
                    "Rejected JSON-RPC request: {}", error.error.message
                );
                JsonRpcMessage::error(error)
            }
        }
    }
}
