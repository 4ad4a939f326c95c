//! Mapping from logical calls to each dialect's concrete request shape.
//!
//! # Responsibilities
//! - Resolve `(LogicalMethod, Dialect)` to a method name and parameters
//! - Unwrap appbase result envelopes (`{"discussions": [...]}`)
//! - Rewrite appbase asset objects into legacy asset strings
//!
//! # Design Decisions
//! - The dialect is a property of the configured node, decided once;
//!   nothing here inspects a node at runtime
//! - After `normalize`, callers see one result shape regardless of dialect

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::rpc::roster::Dialect;

/// Sort order for discussion queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscussionSort {
    #[default]
    Created,
    Trending,
    Hot,
    Promoted,
}

impl DiscussionSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscussionSort::Created => "created",
            DiscussionSort::Trending => "trending",
            DiscussionSort::Hot => "hot",
            DiscussionSort::Promoted => "promoted",
        }
    }
}

impl fmt::Display for DiscussionSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscussionSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(DiscussionSort::Created),
            "trending" => Ok(DiscussionSort::Trending),
            "hot" => Ok(DiscussionSort::Hot),
            "promoted" => Ok(DiscussionSort::Promoted),
            other => Err(format!("unknown discussion sort '{}'", other)),
        }
    }
}

/// Query object shared by the `get_discussions_by_*` family.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct DiscussionQuery {
    pub tag: String,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_permlink: Option<String>,
}

/// A dialect-independent RPC call.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalMethod {
    GetContent {
        author: String,
        permlink: String,
    },
    GetContentReplies {
        author: String,
        permlink: String,
    },
    GetActiveVotes {
        author: String,
        permlink: String,
    },
    GetRebloggedBy {
        author: String,
        permlink: String,
    },
    /// Replies to `start_author`'s content when `start_permlink` is empty;
    /// otherwise continues after the reply `start_author/start_permlink`.
    GetRepliesByLastUpdate {
        start_author: String,
        start_permlink: String,
        limit: u32,
    },
    GetDiscussions {
        sort: DiscussionSort,
        query: DiscussionQuery,
    },
    GetDynamicGlobalProperties,
    /// `trx` is the signed transaction in legacy JSON form.
    BroadcastTransaction {
        trx: Value,
    },
}

impl LogicalMethod {
    /// Stable label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            LogicalMethod::GetContent { .. } => "get_content",
            LogicalMethod::GetContentReplies { .. } => "get_content_replies",
            LogicalMethod::GetActiveVotes { .. } => "get_active_votes",
            LogicalMethod::GetRebloggedBy { .. } => "get_reblogged_by",
            LogicalMethod::GetRepliesByLastUpdate { .. } => "get_replies_by_last_update",
            LogicalMethod::GetDiscussions { .. } => "get_discussions",
            LogicalMethod::GetDynamicGlobalProperties => "get_dynamic_global_properties",
            LogicalMethod::BroadcastTransaction { .. } => "broadcast_transaction",
        }
    }

    fn result_shape(&self) -> ResultShape {
        match self {
            LogicalMethod::GetContent { .. } => ResultShape::ObjectOrNull,
            LogicalMethod::GetDynamicGlobalProperties => ResultShape::Object,
            LogicalMethod::BroadcastTransaction { .. } => ResultShape::Any,
            _ => ResultShape::List,
        }
    }

    /// Key wrapping the payload of an appbase result, if any.
    fn appbase_envelope(&self) -> Option<&'static str> {
        match self {
            LogicalMethod::GetContentReplies { .. }
            | LogicalMethod::GetRepliesByLastUpdate { .. }
            | LogicalMethod::GetDiscussions { .. } => Some("discussions"),
            LogicalMethod::GetActiveVotes { .. } => Some("votes"),
            LogicalMethod::GetRebloggedBy { .. } => Some("accounts"),
            _ => None,
        }
    }
}

/// Result shape a well-behaved node returns for a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResultShape {
    List,
    Object,
    /// `null` is the "no such content" answer on some nodes.
    ObjectOrNull,
    Any,
}

impl ResultShape {
    fn accepts(self, value: &Value) -> bool {
        match self {
            ResultShape::List => value.is_array(),
            ResultShape::Object => value.is_object(),
            ResultShape::ObjectOrNull => value.is_object() || value.is_null(),
            ResultShape::Any => true,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            ResultShape::List => "a list",
            ResultShape::Object => "an object",
            ResultShape::ObjectOrNull => "an object or null",
            ResultShape::Any => "anything",
        }
    }
}

/// Concrete method name and parameters for `method` on a `dialect` node.
pub fn request_for(method: &LogicalMethod, dialect: Dialect) -> (String, Value) {
    use LogicalMethod::*;

    match (method, dialect) {
        (GetContent { author, permlink }, Dialect::Legacy) => {
            ("get_content".into(), json!([author, permlink]))
        }
        (GetContent { author, permlink }, Dialect::Appbase) => (
            "tags_api.get_discussion".into(),
            json!({ "author": author, "permlink": permlink }),
        ),
        (GetContentReplies { author, permlink }, Dialect::Legacy) => {
            ("get_content_replies".into(), json!([author, permlink]))
        }
        (GetContentReplies { author, permlink }, Dialect::Appbase) => (
            "tags_api.get_content_replies".into(),
            json!({ "author": author, "permlink": permlink }),
        ),
        (GetActiveVotes { author, permlink }, Dialect::Legacy) => {
            ("get_active_votes".into(), json!([author, permlink]))
        }
        (GetActiveVotes { author, permlink }, Dialect::Appbase) => (
            "tags_api.get_active_votes".into(),
            json!({ "author": author, "permlink": permlink }),
        ),
        (GetRebloggedBy { author, permlink }, Dialect::Legacy) => {
            ("get_reblogged_by".into(), json!([author, permlink]))
        }
        (GetRebloggedBy { author, permlink }, Dialect::Appbase) => (
            "follow_api.get_reblogged_by".into(),
            json!({ "author": author, "permlink": permlink }),
        ),
        (
            GetRepliesByLastUpdate {
                start_author,
                start_permlink,
                limit,
            },
            Dialect::Legacy,
        ) => (
            "get_replies_by_last_update".into(),
            json!([start_author, start_permlink, limit]),
        ),
        (
            GetRepliesByLastUpdate {
                start_author,
                start_permlink,
                limit,
            },
            Dialect::Appbase,
        ) => (
            "tags_api.get_replies_by_last_update".into(),
            json!({
                "start_parent_author": start_author,
                "start_permlink": start_permlink,
                "limit": limit,
            }),
        ),
        (GetDiscussions { sort, query }, Dialect::Legacy) => (
            format!("get_discussions_by_{}", sort),
            json!([query]),
        ),
        (GetDiscussions { sort, query }, Dialect::Appbase) => (
            format!("tags_api.get_discussions_by_{}", sort),
            json!(query),
        ),
        (GetDynamicGlobalProperties, Dialect::Legacy) => {
            ("get_dynamic_global_properties".into(), json!([]))
        }
        (GetDynamicGlobalProperties, Dialect::Appbase) => (
            "database_api.get_dynamic_global_properties".into(),
            json!({}),
        ),
        (BroadcastTransaction { trx }, Dialect::Legacy) => {
            ("broadcast_transaction".into(), json!([trx]))
        }
        (BroadcastTransaction { trx }, Dialect::Appbase) => (
            "network_broadcast_api.broadcast_transaction".into(),
            json!({ "trx": appbase_transaction(trx) }),
        ),
    }
}

/// Bring a node's result into the dialect-independent shape.
///
/// Returns a description of the problem when the result is malformed for
/// the method; the client treats that as a node-level failure.
pub fn normalize(method: &LogicalMethod, dialect: Dialect, result: Value) -> Result<Value, String> {
    let unwrapped = match (dialect, method.appbase_envelope()) {
        (Dialect::Appbase, Some(key)) => match result {
            Value::Object(mut map) => map
                .remove(key)
                .ok_or_else(|| format!("{} result missing '{}'", method.label(), key))?,
            // Some appbase deployments answer with the bare list
            Value::Array(items) => Value::Array(items),
            other => {
                return Err(format!(
                    "{} returned unexpected {}",
                    method.label(),
                    json_kind(&other)
                ))
            }
        },
        _ => result,
    };

    let expected = method.result_shape();
    if !expected.accepts(&unwrapped) {
        return Err(format!(
            "{} returned {} instead of {}",
            method.label(),
            json_kind(&unwrapped),
            expected.describe()
        ));
    }

    Ok(normalize_assets(unwrapped))
}

/// Rewrite `{amount, precision, nai}` objects as legacy `"1.000 SBD"` strings.
pub fn normalize_assets(value: Value) -> Value {
    match value {
        Value::Object(map) => match legacy_asset(&map) {
            Some(asset) => Value::String(asset),
            None => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, normalize_assets(v)))
                    .collect(),
            ),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_assets).collect()),
        other => other,
    }
}

fn legacy_asset(map: &Map<String, Value>) -> Option<String> {
    if map.len() != 3 {
        return None;
    }
    let amount = map.get("amount")?.as_str()?;
    let precision = map.get("precision")?.as_u64()? as usize;
    let symbol = match map.get("nai")?.as_str()? {
        "@@000000013" => "SBD",
        "@@000000021" => "STEEM",
        "@@000000037" => "VESTS",
        _ => return None,
    };
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    if precision == 0 {
        return Some(format!("{} {}", amount, symbol));
    }
    let padded = format!("{:0>width$}", amount, width = precision + 1);
    let (whole, frac) = padded.split_at(padded.len() - precision);
    Some(format!("{}.{} {}", whole, frac, symbol))
}

/// Re-tag legacy `["vote", {...}]` operations as `{"type": "vote_operation", "value": {...}}`.
fn appbase_transaction(trx: &Value) -> Value {
    let mut trx = trx.clone();
    if let Some(ops) = trx.get_mut("operations").and_then(Value::as_array_mut) {
        for op in ops.iter_mut() {
            let retagged = match op.as_array().map(Vec::as_slice) {
                Some([Value::String(name), body]) => Some(json!({
                    "type": format!("{}_operation", name),
                    "value": body,
                })),
                _ => None,
            };
            if let Some(retagged) = retagged {
                *op = retagged;
            }
        }
    }
    trx
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
