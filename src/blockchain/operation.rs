//! Network operations and the authority each one requires.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Key role needed to authorize an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorityLevel {
    Posting,
    Active,
}

impl fmt::Display for AuthorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorityLevel::Posting => write!(f, "posting"),
            AuthorityLevel::Active => write!(f, "active"),
        }
    }
}

/// An account and the key role it must sign with.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequiredAuthority {
    pub account: String,
    pub level: AuthorityLevel,
}

impl RequiredAuthority {
    pub fn posting(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            level: AuthorityLevel::Posting,
        }
    }

    pub fn active(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            level: AuthorityLevel::Active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOperation {
    pub voter: String,
    pub author: String,
    pub permlink: String,
    pub weight: i16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentOperation {
    pub parent_author: String,
    pub parent_permlink: String,
    pub author: String,
    pub permlink: String,
    pub title: String,
    pub body: String,
    /// JSON object encoded as a string.
    pub json_metadata: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteCommentOperation {
    pub author: String,
    pub permlink: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomJsonOperation {
    pub required_auths: Vec<String>,
    pub required_posting_auths: Vec<String>,
    pub id: String,
    /// JSON payload encoded as a string.
    pub json: String,
}

impl CustomJsonOperation {
    /// A custom_json authorized by `account`'s posting key.
    pub fn posting(account: impl Into<String>, id: impl Into<String>, json: &Value) -> Self {
        Self {
            required_auths: Vec::new(),
            required_posting_auths: vec![account.into()],
            id: id.into(),
            json: json.to_string(),
        }
    }
}

/// A single typed mutation.
///
/// Serializes in the network's `["name", {body}]` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Vote(VoteOperation),
    Comment(CommentOperation),
    DeleteComment(DeleteCommentOperation),
    CustomJson(CustomJsonOperation),
}

const OPERATION_NAMES: &[&str] = &["vote", "comment", "delete_comment", "custom_json"];

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Vote(_) => "vote",
            Operation::Comment(_) => "comment",
            Operation::DeleteComment(_) => "delete_comment",
            Operation::CustomJson(_) => "custom_json",
        }
    }

    /// The one account whose authority the operation needs.
    ///
    /// `None` only for a custom_json that lists no accounts.
    pub fn required_authority(&self) -> Option<RequiredAuthority> {
        match self {
            Operation::Vote(op) => Some(RequiredAuthority::posting(&op.voter)),
            Operation::Comment(op) => Some(RequiredAuthority::posting(&op.author)),
            Operation::DeleteComment(op) => Some(RequiredAuthority::posting(&op.author)),
            Operation::CustomJson(op) => op
                .required_auths
                .first()
                .map(RequiredAuthority::active)
                .or_else(|| op.required_posting_auths.first().map(RequiredAuthority::posting)),
        }
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Operation::Vote(op) => (self.name(), op).serialize(serializer),
            Operation::Comment(op) => (self.name(), op).serialize(serializer),
            Operation::DeleteComment(op) => (self.name(), op).serialize(serializer),
            Operation::CustomJson(op) => (self.name(), op).serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (name, body): (String, Value) = Deserialize::deserialize(deserializer)?;
        let op = match name.as_str() {
            "vote" => serde_json::from_value(body).map(Operation::Vote),
            "comment" => serde_json::from_value(body).map(Operation::Comment),
            "delete_comment" => serde_json::from_value(body).map(Operation::DeleteComment),
            "custom_json" => serde_json::from_value(body).map(Operation::CustomJson),
            other => return Err(de::Error::unknown_variant(other, OPERATION_NAMES)),
        };
        op.map_err(de::Error::custom)
    }
}
