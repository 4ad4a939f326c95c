//! Recent top-level posts in a category.

use std::ops::Deref;
use std::sync::Arc;

use serde_json::Value;

use crate::content::{Comment, ContentResult};
use crate::rpc::{DiscussionQuery, DiscussionSort, LogicalMethod, RpcClient};
use crate::views::paging::{collect_pages, MAX_PAGE_SIZE};
use crate::views::replies::expect_list;

/// Top-level posts whose category is `category`, in `sort` order.
///
/// Materialized on construction; holds no connection to the network.
#[derive(Debug, Clone)]
pub struct RecentByPath {
    category: String,
    sort: DiscussionSort,
    entries: Vec<Comment>,
}

impl RecentByPath {
    pub async fn fetch(
        client: Arc<RpcClient>,
        category: &str,
        sort: DiscussionSort,
        limit: usize,
    ) -> ContentResult<Self> {
        let raw = collect_pages(
            limit,
            MAX_PAGE_SIZE,
            |cursor, n| {
                let query = DiscussionQuery {
                    tag: category.to_string(),
                    limit: n,
                    start_author: cursor.as_ref().map(|c| c.author.clone()),
                    start_permlink: cursor.map(|c| c.permlink),
                };
                let client = client.clone();
                async move {
                    expect_list(client.call(&LogicalMethod::GetDiscussions { sort, query }).await?)
                }
            },
            |entry| {
                let field = |key: &str| entry.get(key).and_then(Value::as_str).unwrap_or("");
                field("category") == category && field("parent_author").is_empty()
            },
        )
        .await?;

        let entries = raw
            .into_iter()
            .map(|entry| Comment::from_record(client.clone(), entry))
            .collect::<ContentResult<Vec<_>>>()?;

        tracing::debug!(category, sort = %sort, count = entries.len(), "Posts by path fetched");

        Ok(Self {
            category: category.to_string(),
            sort,
            entries,
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn sort_order(&self) -> DiscussionSort {
        self.sort
    }
}

impl Deref for RecentByPath {
    type Target = [Comment];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl IntoIterator for RecentByPath {
    type Item = Comment;
    type IntoIter = std::vec::IntoIter<Comment>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
