//! Ordered list of candidate nodes with a sticky failover cursor.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::NodeConfig;
use crate::rpc::types::{RpcError, RpcResult};

/// API convention spoken by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Flat method names with positional parameters (`get_content`).
    Legacy,
    /// Namespaced methods with named parameters (`tags_api.get_discussion`).
    #[default]
    Appbase,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Legacy => write!(f, "legacy"),
            Dialect::Appbase => write!(f, "appbase"),
        }
    }
}

/// A single RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEndpoint {
    pub url: Url,
    pub dialect: Dialect,
}

impl NodeEndpoint {
    pub fn new(url: &str, dialect: Dialect) -> RpcResult<Self> {
        let url = Url::parse(url).map_err(|e| RpcError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { url, dialect })
    }
}

/// Candidate nodes in preference order.
///
/// The node list is fixed at construction; only the cursor moves.
#[derive(Debug)]
pub struct NodeRoster {
    nodes: Vec<NodeEndpoint>,
    cursor: AtomicUsize,
}

impl NodeRoster {
    /// Create a roster. Fails if `nodes` is empty.
    pub fn new(nodes: Vec<NodeEndpoint>) -> RpcResult<Self> {
        if nodes.is_empty() {
            return Err(RpcError::EmptyRoster);
        }
        Ok(Self {
            nodes,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Build a roster from configuration entries.
    pub fn from_config(configs: &[NodeConfig]) -> RpcResult<Self> {
        let nodes = configs
            .iter()
            .map(|c| NodeEndpoint::new(&c.url, c.dialect))
            .collect::<RpcResult<Vec<_>>>()?;
        Self::new(nodes)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[NodeEndpoint] {
        &self.nodes
    }

    /// The node the cursor currently points at.
    pub fn current(&self) -> (usize, &NodeEndpoint) {
        let index = self.cursor.load(Ordering::SeqCst) % self.nodes.len();
        (index, &self.nodes[index])
    }

    /// Advance past a failed node. Returns the index now current.
    ///
    /// Only moves if the cursor still points at `failed`, so two callers
    /// failing on the same node advance it once.
    pub fn rotate_from(&self, failed: usize) -> usize {
        let next = (failed + 1) % self.nodes.len();
        match self
            .cursor
            .compare_exchange(failed, next, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => next,
            Err(actual) => actual,
        }
    }
}
