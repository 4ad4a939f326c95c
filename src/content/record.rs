//! Decoded content record.

use serde_json::{Map, Value};

use crate::content::metadata::Metadata;
use crate::content::types::{ContentError, ContentResult};
use crate::content::vote::Vote;

/// One content record as returned by `get_content` / `get_discussion`,
/// already normalized to a single shape by the RPC layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRecord {
    fields: Map<String, Value>,
    metadata: Metadata,
    votes: Vec<Vote>,
}

impl ContentRecord {
    /// Decode a record. `Ok(None)` means the node answered with the
    /// "no such content" sentinel (null, or an empty author/permlink).
    pub fn decode(value: Value) -> ContentResult<Option<Self>> {
        let fields = match value {
            Value::Null => return Ok(None),
            Value::Object(fields) => fields,
            other => {
                return Err(ContentError::Decode(format!(
                    "expected content object, got {}",
                    other
                )))
            }
        };

        let is_empty = |key: &str| fields.get(key).and_then(Value::as_str).map_or(true, str::is_empty);
        if is_empty("author") || is_empty("permlink") {
            return Ok(None);
        }

        let metadata = Metadata::parse(fields.get("json_metadata").and_then(Value::as_str).unwrap_or(""));
        let votes = match fields.get("active_votes") {
            Some(v @ Value::Array(_)) => serde_json::from_value(v.clone())
                .map_err(|e| ContentError::Decode(format!("active_votes: {}", e)))?,
            _ => Vec::new(),
        };

        Ok(Some(Self {
            fields,
            metadata,
            votes,
        }))
    }

    /// Decode a record that must exist (e.g., an entry of a listing).
    pub fn decode_present(value: Value) -> ContentResult<Self> {
        Self::decode(value)?.ok_or_else(|| ContentError::Decode("empty content record".to_string()))
    }

    pub fn str_field(&self, key: &str) -> &str {
        self.fields.get(key).and_then(Value::as_str).unwrap_or("")
    }

    pub fn u64_field(&self, key: &str) -> u64 {
        match self.fields.get(key) {
            Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
            Some(Value::String(s)) => s.parse().unwrap_or(0),
            _ => 0,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Votes embedded in the record (may be empty on some nodes).
    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}
