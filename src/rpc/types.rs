//! JSON-RPC envelope types and error definitions.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Value,
}

impl RpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<u64>,
    /// `None` when the member is absent; an explicit `null` is `Some(Value::Null)`.
    #[serde(default, deserialize_with = "present_value")]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RemoteError>,
}

impl RpcResponse {
    /// A successful response to request `id`.
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            jsonrpc: Some("2.0".to_string()),
            id: Some(id),
            result: Some(result),
            error: None,
        }
    }

    /// An error response to request `id`.
    pub fn failure(id: u64, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: Some("2.0".to_string()),
            id: Some(id),
            result: None,
            error: Some(RemoteError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Error object returned by a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// JSON-RPC code for an unknown method.
pub const METHOD_NOT_FOUND: i64 = -32601;

impl RemoteError {
    /// True when the error says the node cannot serve the method at all,
    /// as opposed to rejecting the call's content.
    pub fn is_node_level(&self) -> bool {
        self.code == METHOD_NOT_FOUND
            || self.message.contains("Could not find API")
            || self.message.contains("Could not find method")
            || self.message.contains("no method with name")
    }
}

/// Errors that can occur during RPC operations.
#[derive(Debug, Error)]
pub enum RpcError {
    /// No nodes were configured.
    #[error("node roster is empty")]
    EmptyRoster,

    /// A configured node URL did not parse.
    #[error("invalid node url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A single node failed (connection, timeout, malformed response,
    /// method not found). Recovered by rotation inside `RpcClient::call`.
    #[error("node {url} unavailable: {reason}")]
    NodeUnavailable { url: String, reason: String },

    /// Every attempt in the retry budget failed at node level.
    #[error("RPC exhausted after {attempts} attempts, last error: {last_error}")]
    Exhausted { attempts: u32, last_error: String },

    /// The node processed the call and returned an application error.
    #[error("remote error {code}: {message}")]
    Remote { code: i64, message: String },

    /// A result did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;
