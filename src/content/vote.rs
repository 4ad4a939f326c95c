//! Votes cast on a piece of content.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::blockchain::vote_weight;

/// One account's vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter: String,
    /// Vote strength in network basis points, `[-10000, 10000]`.
    #[serde(rename = "percent", deserialize_with = "lenient_i16")]
    pub weight: i16,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub rshares: i64,
    #[serde(default)]
    pub time: Option<String>,
}

impl Vote {
    /// Vote strength as a percentage.
    pub fn weight_percent(&self) -> f64 {
        vote_weight::from_network(self.weight)
    }

    pub fn is_downvote(&self) -> bool {
        self.weight < 0
    }
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| D::Error::custom(format!("{} is not an integer", n))),
        Value::String(s) => s.parse().map_err(D::Error::custom),
        Value::Null => Ok(0),
        other => Err(D::Error::custom(format!("expected integer, got {}", other))),
    }
}

fn lenient_i16<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i16, D::Error> {
    use serde::de::Error;

    let value = lenient_i64(deserializer)?;
    i16::try_from(value).map_err(|_| D::Error::custom(format!("vote weight {} out of range", value)))
}
