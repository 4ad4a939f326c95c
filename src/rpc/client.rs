//! JSON-RPC client with roster failover.
//!
//! # Responsibilities
//! - Translate logical calls into the current node's dialect
//! - Enforce a per-attempt timeout
//! - Rotate to the next node on node-level failure, within a retry budget
//! - Keep the cursor where the last healthy node was (sticky failover)

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::{sleep, timeout};

use crate::config::{BackoffConfig, ClientConfig};
use crate::observability::metrics;
use crate::resilience::backoff::backoff_for;
use crate::resilience::retries::RetryBudget;
use crate::rpc::dialect::{self, LogicalMethod};
use crate::rpc::roster::{Dialect, NodeEndpoint, NodeRoster};
use crate::rpc::transport::{HttpTransport, Transport};
use crate::rpc::types::{RpcError, RpcRequest, RpcResult};

/// Client behaviour derived from configuration.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Maximum attempts per logical call.
    pub num_retries: u32,
    /// Deadline for a single node attempt.
    pub timeout: Duration,
    pub backoff: BackoffConfig,
    /// Build and sign transactions without submitting them.
    pub nobroadcast: bool,
    /// Transaction expiration window.
    pub expiration: Duration,
    pub metrics_enabled: bool,
}

impl From<&ClientConfig> for ClientSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            num_retries: config.num_retries,
            timeout: Duration::from_secs(config.timeout_secs),
            backoff: config.backoff.clone(),
            nobroadcast: config.nobroadcast,
            expiration: Duration::from_secs(config.expiration_secs),
            metrics_enabled: config.observability.metrics_enabled,
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

/// Outcome of one attempt against one node.
enum AttemptError {
    /// The node could not serve the call; try another.
    Node(String),
    /// The node served the call and rejected it.
    Remote { code: i64, message: String },
}

/// Failover JSON-RPC client.
///
/// Share one instance through `Arc`; the roster cursor is the only
/// mutable state and is updated atomically.
pub struct RpcClient {
    roster: NodeRoster,
    settings: ClientSettings,
    transport: Arc<dyn Transport>,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a client speaking HTTP to the configured nodes.
    pub fn new(config: &ClientConfig) -> RpcResult<Self> {
        let roster = NodeRoster::from_config(&config.nodes)?;
        let settings = ClientSettings::from(config);
        let transport = Arc::new(HttpTransport::new(settings.timeout)?);

        tracing::info!(
            nodes = roster.len(),
            num_retries = settings.num_retries,
            nobroadcast = settings.nobroadcast,
            "RPC client initialized"
        );

        Ok(Self::with_transport(roster, settings, transport))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(
        roster: NodeRoster,
        settings: ClientSettings,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            roster,
            settings,
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn roster(&self) -> &NodeRoster {
        &self.roster
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// The node calls will be sent to next.
    pub fn current_node(&self) -> &NodeEndpoint {
        self.roster.current().1
    }

    pub fn current_dialect(&self) -> Dialect {
        self.current_node().dialect
    }

    pub fn nobroadcast(&self) -> bool {
        self.settings.nobroadcast
    }

    pub fn expiration(&self) -> Duration {
        self.settings.expiration
    }

    /// Execute a logical call, failing over across the roster.
    ///
    /// Node-level failures rotate the roster and retry until the budget is
    /// spent, which yields `RpcError::Exhausted`. A remote application error
    /// is returned immediately as `RpcError::Remote`.
    pub async fn call(&self, method: &LogicalMethod) -> RpcResult<Value> {
        let mut budget = RetryBudget::new(self.settings.num_retries, self.roster.len());
        let mut last_error: Option<RpcError> = None;

        while budget.try_acquire() {
            let (index, node) = self.roster.current();

            match self.attempt(node, method).await {
                Ok(value) => {
                    self.record_attempt(method, node, metrics::OUTCOME_OK);
                    return Ok(value);
                }
                Err(AttemptError::Remote { code, message }) => {
                    self.record_attempt(method, node, metrics::OUTCOME_REMOTE_ERROR);
                    tracing::debug!(
                        method = method.label(),
                        node = %node.url,
                        code,
                        message = %message,
                        "Remote error"
                    );
                    return Err(RpcError::Remote { code, message });
                }
                Err(AttemptError::Node(reason)) => {
                    self.record_attempt(method, node, metrics::OUTCOME_NODE_ERROR);
                    tracing::warn!(
                        method = method.label(),
                        node = %node.url,
                        attempt = budget.attempts(),
                        reason = %reason,
                        "Node failed, rotating roster"
                    );

                    let next = self.roster.rotate_from(index);
                    if self.settings.metrics_enabled {
                        metrics::record_failover(node.url.as_str());
                    }
                    tracing::info!(
                        from = %node.url,
                        to = %self.roster.nodes()[next].url,
                        "Switched node"
                    );

                    last_error = Some(RpcError::NodeUnavailable {
                        url: node.url.to_string(),
                        reason,
                    });

                    if budget.at_pass_boundary() && !budget.is_spent() {
                        let delay = backoff_for(&self.settings.backoff, budget.completed_passes());
                        if !delay.is_zero() {
                            sleep(delay).await;
                        }
                    }
                }
            }
        }

        let last_error = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempt made".to_string());
        tracing::error!(
            method = method.label(),
            attempts = budget.attempts(),
            last_error = %last_error,
            "RPC retries exhausted"
        );
        Err(RpcError::Exhausted {
            attempts: budget.attempts(),
            last_error,
        })
    }

    async fn attempt(&self, node: &NodeEndpoint, method: &LogicalMethod) -> Result<Value, AttemptError> {
        let (name, params) = dialect::request_for(method, node.dialect);
        let request = RpcRequest::new(self.next_id.fetch_add(1, Ordering::Relaxed), name, params);

        let response = match timeout(self.settings.timeout, self.transport.send(&node.url, &request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(AttemptError::Node(e.to_string())),
            Err(_) => {
                return Err(AttemptError::Node(format!(
                    "timeout after {:?}",
                    self.settings.timeout
                )))
            }
        };

        if let Some(id) = response.id {
            if id != request.id {
                return Err(AttemptError::Node(format!(
                    "response id {} does not match request id {}",
                    id, request.id
                )));
            }
        }

        if let Some(error) = response.error {
            if error.is_node_level() {
                return Err(AttemptError::Node(format!("{}: {}", error.code, error.message)));
            }
            return Err(AttemptError::Remote {
                code: error.code,
                message: error.message,
            });
        }

        let result = response
            .result
            .ok_or_else(|| AttemptError::Node("response has neither result nor error".to_string()))?;
        dialect::normalize(method, node.dialect, result).map_err(AttemptError::Node)
    }

    fn record_attempt(&self, method: &LogicalMethod, node: &NodeEndpoint, outcome: &'static str) {
        if self.settings.metrics_enabled {
            metrics::record_rpc_attempt(method.label(), node.url.as_str(), outcome);
        }
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("roster", &self.roster)
            .field("num_retries", &self.settings.num_retries)
            .field("timeout", &self.settings.timeout)
            .field("nobroadcast", &self.settings.nobroadcast)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::roster::NodeEndpoint;
    use crate::rpc::transport::TransportError;
    use crate::rpc::types::RpcResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use url::Url;

    /// Fails on every node whose URL contains "down", answers elsewhere.
    struct FlakyTransport {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Transport for FlakyTransport {
        async fn send(&self, url: &Url, request: &RpcRequest) -> Result<RpcResponse, TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), request.method.clone()));
            if url.as_str().contains("down") {
                return Err(TransportError::Connection("refused".into()));
            }
            Ok(RpcResponse::success(request.id, json!({"head_block_number": 1})))
        }
    }

    fn client(urls: &[(&str, Dialect)], num_retries: u32) -> (RpcClient, Arc<FlakyTransport>) {
        let nodes = urls
            .iter()
            .map(|(u, d)| NodeEndpoint::new(u, *d).unwrap())
            .collect();
        let transport = Arc::new(FlakyTransport {
            calls: Mutex::new(Vec::new()),
        });
        let settings = ClientSettings {
            num_retries,
            backoff: BackoffConfig {
                base_delay_ms: 0,
                max_delay_ms: 0,
            },
            metrics_enabled: false,
            ..ClientSettings::default()
        };
        let client = RpcClient::with_transport(
            NodeRoster::new(nodes).unwrap(),
            settings,
            transport.clone(),
        );
        (client, transport)
    }

    #[tokio::test]
    async fn test_fails_over_to_next_dialect() {
        let (client, transport) = client(
            &[("http://down.test", Dialect::Legacy), ("http://up.test", Dialect::Appbase)],
            3,
        );

        let result = client.call(&LogicalMethod::GetDynamicGlobalProperties).await.unwrap();
        assert_eq!(result["head_block_number"], 1);

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls[0].1, "get_dynamic_global_properties");
        assert_eq!(calls[1].1, "database_api.get_dynamic_global_properties");
        assert_eq!(client.current_dialect(), Dialect::Appbase);
    }

    #[tokio::test]
    async fn test_exhausts_budget() {
        let (client, transport) = client(
            &[("http://down1.test", Dialect::Legacy), ("http://down2.test", Dialect::Legacy)],
            5,
        );

        let err = client.call(&LogicalMethod::GetDynamicGlobalProperties).await.unwrap_err();
        assert!(matches!(err, RpcError::Exhausted { attempts: 5, .. }));
        assert_eq!(transport.calls.lock().unwrap().len(), 5);
    }
}
