//! Turning a [`JsonRpcMessage`] into bytes and a transport status.
//!
//! Errors whose status resolves to 5xx never reach the caller verbatim:
//! their message is replaced with [`SANITIZED_MESSAGE`] and the original
//! detail goes to the injected [`ErrorLogger`] instead.

use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use tracing::error;

use crate::response::JsonRpcMessage;
use crate::types::RequestId;

/// Message sent in place of any 5xx error detail
pub const SANITIZED_MESSAGE: &str = "internal server error";

/// Body written when the response itself cannot be encoded
pub const ENCODING_FAILURE_BODY: &str = r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"internal server error"},"id":null}"#;

/// Receives error detail that is withheld from callers.
pub trait ErrorLogger: Send + Sync {
    fn log(&self, title: &str, cause: &str, data: &[String]);
}

/// Default logger, forwards to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorLogger;

impl ErrorLogger for TracingErrorLogger {
    fn log(&self, title: &str, cause: &str, data: &[String]) {
        error!(cause = %cause, data = ?data, "{}", title);
    }
}

/// Serialized response ready to be written by a transport
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Encodes responses for delivery, sanitizing server-side failures.
#[derive(Clone)]
pub struct ResponseAdapter {
    logger: Arc<dyn ErrorLogger>,
}

impl Default for ResponseAdapter {
    fn default() -> Self {
        Self::new(Arc::new(TracingErrorLogger))
    }
}

impl ResponseAdapter {
    pub fn new(logger: Arc<dyn ErrorLogger>) -> Self {
        Self { logger }
    }

    /// Status the transport should answer `message` with.
    ///
    /// Results are always 200; errors use their override, else 500.
    /// Overrides outside `100..=599` are treated as 500.
    pub fn status_for(message: &JsonRpcMessage) -> StatusCode {
        match message.error_object() {
            None => StatusCode::OK,
            Some(error) => error
                .transport_status
                .filter(|status| *status < 600)
                .and_then(|status| StatusCode::from_u16(status).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    /// Replace 5xx error detail with the generic phrase, logging the detail.
    pub fn sanitize(&self, mut message: JsonRpcMessage) -> JsonRpcMessage {
        if !Self::status_for(&message).is_server_error() {
            return message;
        }

        if let JsonRpcMessage::Error(err) = &mut message {
            let cause = std::mem::replace(&mut err.error.message, SANITIZED_MESSAGE.to_string());
            let data = err.error.data.take().unwrap_or_default();
            self.logger.log(
                &format!("JSON-RPC error {} (id {})", err.error.code, err.id),
                &cause,
                &data,
            );
        }
        message
    }

    /// Sanitize, serialize and pick the status for a response.
    pub fn encode(&self, message: JsonRpcMessage) -> EncodedResponse {
        let status = Self::status_for(&message);
        let message = self.sanitize(message);

        match serde_json::to_vec(&message) {
            Ok(body) => EncodedResponse {
                status,
                body: Bytes::from(body),
            },
            Err(err) => self.encoding_failed(&err, message.id()),
        }
    }

    fn encoding_failed(&self, err: &serde_json::Error, id: &RequestId) -> EncodedResponse {
        self.logger.log(
            "Failed to encode JSON-RPC response",
            &err.to_string(),
            &[format!("id {}", id)],
        );
        Self::encoding_failure()
    }

    /// Fixed internal-error response used when encoding fails.
    pub fn encoding_failure() -> EncodedResponse {
        EncodedResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: Bytes::from_static(ENCODING_FAILURE_BODY.as_bytes()),
        }
    }
}
