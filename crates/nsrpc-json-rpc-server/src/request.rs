use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

use crate::error::RpcError;
use crate::types::{JsonRpcVersion, RequestId};

/// The `params` member of a request, kept as undecoded JSON text.
///
/// Decoding is the handler's job; the dispatcher only moves the bytes.
/// An explicit `"params": null` is kept as the text `null`; only a missing
/// member is empty.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RawParams(Option<Box<RawValue>>);

impl<'de> Deserialize<'de> for RawParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Box::<RawValue>::deserialize(deserializer).map(|raw| Self(Some(raw)))
    }
}

impl RawParams {
    /// Params with no `params` member at all
    pub fn none() -> Self {
        Self(None)
    }

    /// Wrap already serialized JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        RawValue::from_string(json.to_string()).map(|raw| Self(Some(raw)))
    }

    /// Raw JSON text of the params, empty when absent
    pub fn as_bytes(&self) -> &[u8] {
        self.as_str().as_bytes()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_deref().map(RawValue::get).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Decode into `T`, reporting failures as invalid params.
    ///
    /// Absent params decode as JSON `null`, so `Option<T>` and unit-like
    /// targets accept a request without `params`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, RpcError> {
        let text = match self.0.as_deref() {
            Some(raw) => raw.get(),
            None => "null",
        };
        serde_json::from_str(text).map_err(RpcError::from)
    }
}

impl PartialEq for RawParams {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str() && self.is_empty() == other.is_empty()
    }
}

/// A JSON-RPC request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub method: String,
    #[serde(default, skip_serializing_if = "RawParams::is_empty")]
    pub params: RawParams,
    #[serde(default)]
    pub id: RequestId,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: RawParams) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            method: method.into(),
            params,
            id: id.into(),
        }
    }

    /// Create a new request with no parameters
    pub fn new_no_params(id: impl Into<RequestId>, method: impl Into<String>) -> Self {
        Self::new(id, method, RawParams::none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_str, to_string};

    #[test]
    fn test_request_keeps_params_raw() {
        let request: JsonRpcRequest =
            from_str(r#"{"jsonrpc":"2.0","method":"ns1.sum","params":[1, 2,3],"id":7}"#).unwrap();

        assert_eq!(request.method, "ns1.sum");
        assert_eq!(request.params.as_bytes(), b"[1, 2,3]");
        assert_eq!(request.id, RequestId::from(7));
    }

    #[test]
    fn test_request_without_id_or_params() {
        let request: JsonRpcRequest = from_str(r#"{"jsonrpc":"2.0","method":"ping"}"#).unwrap();

        assert!(request.id.is_null());
        assert!(request.params.is_empty());
        assert!(request.params.as_bytes().is_empty());
    }

    #[test]
    fn test_explicit_null_params_stay_raw() {
        let request: JsonRpcRequest =
            from_str(r#"{"jsonrpc":"2.0","method":"ping","params":null,"id":1}"#).unwrap();

        assert!(!request.params.is_empty());
        assert_eq!(request.params.as_bytes(), b"null");
        let absent: Option<Vec<i64>> = request.params.parse().unwrap();
        assert!(absent.is_none());
    }

    #[test]
    fn test_request_serialization() {
        let request = JsonRpcRequest::new_no_params("abc", "test_method");
        let json = to_string(&request).unwrap();

        assert_eq!(json, r#"{"jsonrpc":"2.0","method":"test_method","id":"abc"}"#);
    }

    #[test]
    fn test_params_parse() {
        let params = RawParams::from_json("[1,2,3,4]").unwrap();
        let numbers: Vec<i64> = params.parse().unwrap();
        assert_eq!(numbers, vec![1, 2, 3, 4]);

        let err = params.parse::<String>().unwrap_err();
        assert_eq!(crate::TypedError::code(&err), -32602);

        let absent: Option<Vec<i64>> = RawParams::none().parse().unwrap();
        assert!(absent.is_none());
    }
}
