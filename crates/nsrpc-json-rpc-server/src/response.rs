use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::TypedError;
use crate::types::{JsonRpcVersion, RequestId};

/// A successful JSON-RPC response.
///
/// `result` is always serialized, a `null` result included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub result: Value,
    pub id: RequestId,
}

impl JsonRpcResponse {
    pub fn new(id: RequestId, result: Value) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            result,
            id,
        }
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<String>>,
    /// Status the transport should answer with; never sent on the wire
    #[serde(skip)]
    pub transport_status: Option<u16>,
}

impl ResponseError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
            transport_status: None,
        }
    }

    pub fn with_data(mut self, data: Vec<String>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_transport_status(mut self, status: u16) -> Self {
        self.transport_status = Some(status);
        self
    }
}

impl<E: TypedError + ?Sized> From<&E> for ResponseError {
    fn from(err: &E) -> Self {
        Self {
            code: err.code(),
            message: err.message(),
            data: None,
            transport_status: err.transport_status(),
        }
    }
}

/// JSON-RPC error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub error: ResponseError,
    pub id: RequestId,
}

impl JsonRpcError {
    pub fn new(id: RequestId, error: ResponseError) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            error,
            id,
        }
    }

    /// Build an error response from any typed error, echoing `id`.
    pub fn from_typed<E: TypedError + ?Sized>(id: RequestId, err: &E) -> Self {
        Self::new(id, ResponseError::from(err))
    }
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JSON-RPC Error {}: {}",
            self.error.code, self.error.message
        )
    }
}

impl std::error::Error for JsonRpcError {}

/// Either a successful response or an error response, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    /// Successful response with result field
    Response(JsonRpcResponse),
    /// Error response with error field
    Error(JsonRpcError),
}

impl JsonRpcMessage {
    pub fn success(id: RequestId, result: Value) -> Self {
        Self::Response(JsonRpcResponse::new(id, result))
    }

    pub fn error(error: JsonRpcError) -> Self {
        Self::Error(error)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, JsonRpcMessage::Error(_))
    }

    pub fn id(&self) -> &RequestId {
        match self {
            JsonRpcMessage::Response(resp) => &resp.id,
            JsonRpcMessage::Error(err) => &err.id,
        }
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            JsonRpcMessage::Response(resp) => Some(&resp.result),
            JsonRpcMessage::Error(_) => None,
        }
    }

    pub fn error_object(&self) -> Option<&ResponseError> {
        match self {
            JsonRpcMessage::Response(_) => None,
            JsonRpcMessage::Error(err) => Some(&err.error),
        }
    }
}

impl From<JsonRpcResponse> for JsonRpcMessage {
    fn from(response: JsonRpcResponse) -> Self {
        Self::Response(response)
    }
}

impl From<JsonRpcError> for JsonRpcMessage {
    fn from(error: JsonRpcError) -> Self {
        Self::Error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RpcError;
    use serde_json::{json, to_string};

    #[test]
    fn test_success_wire_format() {
        let message = JsonRpcMessage::success(RequestId::from(1), json!(10));
        assert_eq!(
            to_string(&message).unwrap(),
            r#"{"jsonrpc":"2.0","result":10,"id":1}"#
        );
    }

    #[test]
    fn test_null_result_is_still_serialized() {
        let message = JsonRpcMessage::success(RequestId::Null, Value::Null);
        assert_eq!(
            to_string(&message).unwrap(),
            r#"{"jsonrpc":"2.0","result":null,"id":null}"#
        );
    }

    #[test]
    fn test_error_wire_format_hides_transport_status() {
        let error =
            ResponseError::new(-32601, "method \"mul\" not found").with_transport_status(404);
        let message = JsonRpcMessage::error(JsonRpcError::new(RequestId::from(1), error));

        assert_eq!(
            to_string(&message).unwrap(),
            r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"method \"mul\" not found"},"id":1}"#
        );
    }

    #[test]
    fn test_error_data_serialized_when_present() {
        let error = ResponseError::new(-32602, "bad").with_data(vec!["field a".to_string()]);
        let json = to_string(&JsonRpcError::new(RequestId::from("x"), error)).unwrap();
        assert!(json.contains(r#""data":["field a"]"#));
    }

    #[test]
    fn test_from_typed() {
        let err = RpcError::missing_param("a");
        let response = JsonRpcError::from_typed(RequestId::from("abc"), &err);

        assert_eq!(response.id, RequestId::from("abc"));
        assert_eq!(response.error.code, -32602);
        assert_eq!(response.error.message, "parameter a expected but not found");
        assert!(response.error.data.is_none());
        assert_eq!(response.error.transport_status, Some(400));
    }

    #[test]
    fn test_message_accessors() {
        let ok = JsonRpcMessage::success(RequestId::from(2), json!({"ok": true}));
        assert!(!ok.is_error());
        assert_eq!(ok.result(), Some(&json!({"ok": true})));
        assert!(ok.error_object().is_none());

        let err: JsonRpcMessage =
            JsonRpcError::new(RequestId::from(2), ResponseError::new(-32603, "x")).into();
        assert!(err.is_error());
        assert!(err.result().is_none());
        assert_eq!(err.id(), &RequestId::from(2));
    }
}
