use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::error::RpcError;
use crate::request::RawParams;

/// Result type for JSON-RPC method handlers
pub type HandlerResult = Result<Value, RpcError>;

/// A single callable method bound to a leaf of the namespace tree.
///
/// Handlers receive the undecoded `params` and own their decoding. They
/// run on the dispatching task with no timeout applied.
#[async_trait]
pub trait MethodHandler: Send + Sync {
    async fn handle(&self, params: RawParams) -> HandlerResult;
}

impl fmt::Debug for dyn MethodHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MethodHandler")
    }
}

/// Plain synchronous closures are handlers.
#[async_trait]
impl<F> MethodHandler for F
where
    F: Fn(RawParams) -> HandlerResult + Send + Sync,
{
    async fn handle(&self, params: RawParams) -> HandlerResult {
        (self)(params)
    }
}

/// Adapter for closures returning a future.
pub struct AsyncFunctionHandler<F> {
    handler_fn: F,
}

impl<F> AsyncFunctionHandler<F>
where
    F: Fn(RawParams) -> BoxFuture<'static, HandlerResult> + Send + Sync,
{
    pub fn new(handler_fn: F) -> Self {
        Self { handler_fn }
    }
}

#[async_trait]
impl<F> MethodHandler for AsyncFunctionHandler<F>
where
    F: Fn(RawParams) -> BoxFuture<'static, HandlerResult> + Send + Sync,
{
    async fn handle(&self, params: RawParams) -> HandlerResult {
        (self.handler_fn)(params).await
    }
}

/// Wrap an `async` closure as a handler.
///
/// ```
/// use nsrpc_json_rpc_server::{handler::async_handler, RawParams};
/// use serde_json::json;
///
/// let echo = async_handler(|params: RawParams| async move {
///     Ok::<_, nsrpc_json_rpc_server::RpcError>(json!(params.as_str()))
/// });
/// # let _ = echo;
/// ```
pub fn async_handler<F, Fut>(
    f: F,
) -> AsyncFunctionHandler<impl Fn(RawParams) -> BoxFuture<'static, HandlerResult> + Send + Sync>
where
    F: Fn(RawParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    AsyncFunctionHandler::new(move |params| -> BoxFuture<'static, HandlerResult> {
        Box::pin(f(params))
    })
}
