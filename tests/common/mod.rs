//! Shared utilities for integration tests.
//!
//! `MockTransport` plays the part of a roster of nodes: each node host maps
//! method names to scripted replies, and every request is recorded.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use url::Url;

use steem_content::blockchain::{AuthorityLevel, RequiredAuthority, Signer, SignerError, Transaction};
use steem_content::config::BackoffConfig;
use steem_content::rpc::{
    ClientSettings, Dialect, NodeEndpoint, NodeRoster, RpcClient, RpcRequest, RpcResponse,
    Transport, TransportError,
};

/// What a scripted node does with one request.
#[derive(Debug, Clone)]
pub enum Reply {
    Result(Value),
    Error { code: i64, message: String },
    /// A well-formed envelope carrying neither `result` nor `error`.
    Empty,
    /// Connection-level failure.
    Fail(String),
    /// Never answers within any reasonable timeout.
    Hang,
}

impl Reply {
    pub fn error(code: i64, message: &str) -> Self {
        Reply::Error {
            code,
            message: message.to_string(),
        }
    }
}

type Handler = Box<dyn Fn(&Value) -> Reply + Send + Sync>;

enum Route {
    /// Replies served in order; the last one repeats.
    Queue(VecDeque<Reply>),
    Handler(Handler),
}

/// One recorded request.
#[derive(Debug, Clone)]
pub struct Call {
    pub host: String,
    pub method: String,
    pub params: Value,
}

#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(String, String), Route>>,
    down: Mutex<HashSet<String>>,
    log: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue `reply` for `method` on the node at `host`.
    pub fn on(&self, host: &str, method: &str, reply: Reply) {
        let mut routes = self.routes.lock().unwrap();
        let route = routes
            .entry((host.to_string(), method.to_string()))
            .or_insert_with(|| Route::Queue(VecDeque::new()));
        match route {
            Route::Queue(queue) => queue.push_back(reply),
            Route::Handler(_) => *route = Route::Queue(VecDeque::from([reply])),
        }
    }

    /// Answer `method` on `host` by computing a reply from the params.
    pub fn on_fn<F>(&self, host: &str, method: &str, handler: F)
    where
        F: Fn(&Value) -> Reply + Send + Sync + 'static,
    {
        self.routes
            .lock()
            .unwrap()
            .insert((host.to_string(), method.to_string()), Route::Handler(Box::new(handler)));
    }

    /// Make every request to `host` fail at connection level.
    pub fn take_down(&self, host: &str) {
        self.down.lock().unwrap().insert(host.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.method == method).collect()
    }

    pub fn hosts_called(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.host).collect()
    }

    fn reply_for(&self, host: &str, method: &str, params: &Value) -> Option<Reply> {
        if self.down.lock().unwrap().contains(host) {
            return Some(Reply::Fail(format!("{} is down", host)));
        }
        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(&(host.to_string(), method.to_string()))? {
            Route::Queue(queue) if queue.len() > 1 => queue.pop_front(),
            Route::Queue(queue) => queue.front().cloned(),
            Route::Handler(handler) => Some(handler(params)),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, url: &Url, request: &RpcRequest) -> Result<RpcResponse, TransportError> {
        let host = url.host_str().unwrap_or_default().to_string();
        self.log.lock().unwrap().push(Call {
            host: host.clone(),
            method: request.method.clone(),
            params: request.params.clone(),
        });

        match self.reply_for(&host, &request.method, &request.params) {
            Some(Reply::Result(value)) => Ok(RpcResponse::success(request.id, value)),
            Some(Reply::Error { code, message }) => Ok(RpcResponse::failure(request.id, code, message)),
            Some(Reply::Empty) => Ok(RpcResponse {
                jsonrpc: Some("2.0".to_string()),
                id: Some(request.id),
                result: None,
                error: None,
            }),
            Some(Reply::Fail(reason)) => Err(TransportError::Connection(reason)),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(TransportError::Connection("hung".to_string()))
            }
            None => Err(TransportError::Malformed(format!(
                "no script for {} on {}",
                request.method, host
            ))),
        }
    }
}

/// Settings for fast tests: no backoff delay, short attempt timeout.
pub fn test_settings(num_retries: u32) -> ClientSettings {
    ClientSettings {
        num_retries,
        timeout: Duration::from_millis(200),
        backoff: BackoffConfig {
            base_delay_ms: 0,
            max_delay_ms: 0,
        },
        nobroadcast: false,
        expiration: Duration::from_secs(60),
        metrics_enabled: false,
    }
}

/// Client over `transport` with nodes `http://<host>` in the given dialects.
pub fn client(nodes: &[(&str, Dialect)], settings: ClientSettings, transport: Arc<MockTransport>) -> Arc<RpcClient> {
    let endpoints = nodes
        .iter()
        .map(|(host, dialect)| NodeEndpoint::new(&format!("http://{}", host), *dialect).unwrap())
        .collect();
    let roster = NodeRoster::new(endpoints).unwrap();
    Arc::new(RpcClient::with_transport(roster, settings, transport))
}

/// Signer holding posting keys for the listed accounts.
pub struct TestSigner {
    keys: Vec<(String, AuthorityLevel)>,
}

impl TestSigner {
    pub fn posting(accounts: &[&str]) -> Self {
        Self {
            keys: accounts
                .iter()
                .map(|a| (a.to_string(), AuthorityLevel::Posting))
                .collect(),
        }
    }
}

#[async_trait]
impl Signer for TestSigner {
    fn has_key(&self, account: &str, level: AuthorityLevel) -> bool {
        self.keys.iter().any(|(a, l)| a == account && *l == level)
    }

    async fn sign(
        &self,
        mut transaction: Transaction,
        authorities: &[RequiredAuthority],
    ) -> Result<Transaction, SignerError> {
        for authority in authorities {
            transaction
                .signatures
                .push(format!("1f{}", hex::encode(&authority.account)));
        }
        Ok(transaction)
    }
}

// --- Fixtures ---

pub const AUTHOR: &str = "gtg";
pub const PERMLINK: &str = "witness-gtg-log";

/// A post as a legacy `get_content` result.
pub fn legacy_post() -> Value {
    json!({
        "id": 1234567,
        "author": AUTHOR,
        "permlink": PERMLINK,
        "category": "witness-category",
        "parent_author": "",
        "parent_permlink": "witness-category",
        "title": "Witness gtg log",
        "body": "Hello world",
        "json_metadata": "{\"tags\":[\"witness-category\",\"steem\"],\"app\":\"steemit/0.1\"}",
        "created": "2017-05-01T12:00:00",
        "last_update": "2017-05-01T12:00:00",
        "depth": 0,
        "children": 2,
        "net_votes": 2,
        "total_payout_value": "1.234 SBD",
        "curator_payout_value": "0.456 SBD",
        "pending_payout_value": "0.000 SBD",
        "max_accepted_payout": "1000000.000 SBD",
        "total_vote_weight": "5000",
        "author_reputation": "12345678901",
        "url": "/witness-category/@gtg/witness-gtg-log",
        "active_votes": [
            {"voter": "alice", "percent": 10000, "rshares": "1000000", "time": "2017-05-01T13:00:00"},
            {"voter": "bob", "percent": -5000, "rshares": "-500000", "time": "2017-05-01T14:00:00"}
        ]
    })
}

/// The same post as an appbase `tags_api.get_discussion` result.
pub fn appbase_post() -> Value {
    let mut post = legacy_post();
    post["total_payout_value"] = json!({"amount": "1234", "precision": 3, "nai": "@@000000013"});
    post["curator_payout_value"] = json!({"amount": "456", "precision": 3, "nai": "@@000000013"});
    post["pending_payout_value"] = json!({"amount": "0", "precision": 3, "nai": "@@000000013"});
    post["max_accepted_payout"] = json!({"amount": "1000000000", "precision": 3, "nai": "@@000000013"});
    // Appbase nodes format these differently; they are not compared.
    post["author_reputation"] = json!(12345678901u64);
    post["json_metadata"] = json!("{\"app\":\"steemit/0.1\",\"tags\":[\"witness-category\",\"steem\"]}");
    post["active_votes"] = json!([
        {"voter": "alice", "percent": "10000", "rshares": 1000000, "time": "2017-05-01T13:00:00"},
        {"voter": "bob", "percent": "-5000", "rshares": -500000, "time": "2017-05-01T14:00:00"}
    ]);
    post
}

/// Legacy "no such content" sentinel.
pub fn legacy_missing() -> Value {
    json!({"id": 0, "author": "", "permlink": "", "body": "", "active_votes": []})
}

/// A reply record under `parent`.
pub fn reply_record(author: &str, permlink: &str, parent_author: &str, parent_permlink: &str) -> Value {
    json!({
        "author": author,
        "permlink": permlink,
        "category": "witness-category",
        "parent_author": parent_author,
        "parent_permlink": parent_permlink,
        "title": "",
        "body": format!("reply by {}", author),
        "json_metadata": "{}",
        "depth": 1,
        "children": 0,
    })
}

/// A top-level post record in `category`.
pub fn post_record(author: &str, permlink: &str, category: &str) -> Value {
    json!({
        "author": author,
        "permlink": permlink,
        "category": category,
        "parent_author": "",
        "parent_permlink": category,
        "title": format!("{} in {}", permlink, category),
        "body": "",
        "json_metadata": "{}",
        "depth": 0,
        "children": 0,
    })
}

pub fn global_properties() -> Value {
    json!({
        "head_block_number": 20000000,
        "head_block_id": "01312d00a1b2c3d4e5f60718293a4b5c6d7e8f90",
        "time": "2018-02-01T12:00:00",
        "current_supply": "271000000.000 STEEM",
    })
}

/// Script a node to serve the post, global properties and broadcasts.
pub fn script_node(transport: &MockTransport, host: &str, dialect: Dialect) {
    match dialect {
        Dialect::Legacy => {
            transport.on(host, "get_content", Reply::Result(legacy_post()));
            transport.on(host, "get_dynamic_global_properties", Reply::Result(global_properties()));
            transport.on(host, "broadcast_transaction", Reply::Result(json!(null)));
        }
        Dialect::Appbase => {
            transport.on(host, "tags_api.get_discussion", Reply::Result(appbase_post()));
            transport.on(
                host,
                "database_api.get_dynamic_global_properties",
                Reply::Result(global_properties()),
            );
            transport.on(host, "network_broadcast_api.broadcast_transaction", Reply::Result(json!({})));
        }
    }
}
