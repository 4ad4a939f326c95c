//! Wire transport for JSON-RPC requests.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::rpc::types::{RpcError, RpcRequest, RpcResponse, RpcResult};

/// Failure to obtain a well-formed response from one node.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Sends one JSON-RPC request to one node.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, url: &Url, request: &RpcRequest) -> Result<RpcResponse, TransportError>;
}

/// HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> RpcResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, url: &Url, request: &RpcRequest) -> Result<RpcResponse, TransportError> {
        let response = self
            .client
            .post(url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| TransportError::Malformed(e.to_string()))
    }
}
