//! Recent replies to an account's content.

use std::ops::Deref;
use std::sync::Arc;

use serde_json::Value;

use crate::content::{Comment, ContentResult};
use crate::rpc::{LogicalMethod, RpcClient, RpcError, RpcResult};
use crate::views::paging::{collect_pages, MAX_PAGE_SIZE};

/// The most recent replies to posts and comments by one account.
///
/// Materialized on construction; holds no connection to the network.
#[derive(Debug, Clone)]
pub struct RecentReplies {
    account: String,
    entries: Vec<Comment>,
}

impl RecentReplies {
    /// Fetch up to `limit` replies to `account`'s content, newest first.
    ///
    /// With `skip_own`, replies written by `account` itself are left out.
    pub async fn fetch(
        client: Arc<RpcClient>,
        account: &str,
        skip_own: bool,
        limit: usize,
    ) -> ContentResult<Self> {
        let raw = collect_pages(
            limit,
            MAX_PAGE_SIZE,
            |cursor, n| {
                let (start_author, start_permlink) = match cursor {
                    Some(c) => (c.author, c.permlink),
                    None => (account.to_string(), String::new()),
                };
                let client = client.clone();
                async move {
                    let method = LogicalMethod::GetRepliesByLastUpdate {
                        start_author,
                        start_permlink,
                        limit: n,
                    };
                    expect_list(client.call(&method).await?)
                }
            },
            |entry| !(skip_own && entry.get("author").and_then(Value::as_str) == Some(account)),
        )
        .await?;

        let entries = raw
            .into_iter()
            .map(|entry| Comment::from_record(client.clone(), entry))
            .collect::<ContentResult<Vec<_>>>()?;

        tracing::debug!(account, skip_own, count = entries.len(), "Recent replies fetched");

        Ok(Self {
            account: account.to_string(),
            entries,
        })
    }

    pub fn account(&self) -> &str {
        &self.account
    }
}

impl Deref for RecentReplies {
    type Target = [Comment];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl IntoIterator for RecentReplies {
    type Item = Comment;
    type IntoIter = std::vec::IntoIter<Comment>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

pub(crate) fn expect_list(value: Value) -> RpcResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(RpcError::Decode(format!("expected a list, got {}", other))),
    }
}
