//! Decoded `json_metadata`.

use serde_json::{Map, Value};

/// Structured view of a post's metadata blob.
///
/// Decoding is lenient: list fields accept a single string, and a blob
/// that is not a JSON object decodes to empty metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    fields: Map<String, Value>,
}

impl Metadata {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(fields)) => Self { fields },
            Ok(other) => {
                tracing::debug!(kind = ?other, "json_metadata is not an object, ignoring");
                Self::default()
            }
            Err(e) => {
                tracing::debug!(error = %e, "json_metadata is not valid JSON, ignoring");
                Self::default()
            }
        }
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn tags(&self) -> Vec<String> {
        self.string_list("tags")
    }

    pub fn users(&self) -> Vec<String> {
        self.string_list("users")
    }

    pub fn image(&self) -> Vec<String> {
        self.string_list("image")
    }

    pub fn links(&self) -> Vec<String> {
        self.string_list("links")
    }

    pub fn app(&self) -> Option<&str> {
        self.fields.get("app").and_then(Value::as_str)
    }

    pub fn format(&self) -> Option<&str> {
        self.fields.get("format").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// A copy with `overlay`'s keys replacing this metadata's.
    pub fn merged(&self, overlay: &Map<String, Value>) -> Self {
        let mut fields = self.fields.clone();
        for (k, v) in overlay {
            fields.insert(k.clone(), v.clone());
        }
        Self { fields }
    }

    /// Encode back into the string form carried on the wire.
    pub fn to_json_string(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }

    fn string_list(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(s)) => vec![s.clone()],
            _ => Vec::new(),
        }
    }
}
