//! Cursor pagination over listing calls.
//!
//! Listing methods take a start `author/permlink` and return that entry
//! first, so every page after the first repeats the previous page's last
//! entry. `collect_pages` drops the repeat and stops on a short page.

use std::future::Future;

use serde_json::Value;

use crate::rpc::RpcResult;

/// Largest page the network serves for listing calls.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Upper bound on pages fetched for one collection.
pub const MAX_PAGES: usize = 50;

/// Position to resume a listing from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    pub author: String,
    pub permlink: String,
}

impl PageCursor {
    fn of(entry: &Value) -> Option<Self> {
        let author = entry.get("author")?.as_str()?;
        let permlink = entry.get("permlink")?.as_str()?;
        Some(Self {
            author: author.to_string(),
            permlink: permlink.to_string(),
        })
    }
}

/// Fetch pages until `limit` entries satisfying `keep` are collected or the
/// listing ends.
///
/// `fetch` receives the resume cursor (`None` for the first page) and the
/// number of entries to request.
pub async fn collect_pages<F, Fut, K>(
    limit: usize,
    page_size: u32,
    mut fetch: F,
    keep: K,
) -> RpcResult<Vec<Value>>
where
    F: FnMut(Option<PageCursor>, u32) -> Fut,
    Fut: Future<Output = RpcResult<Vec<Value>>>,
    K: Fn(&Value) -> bool,
{
    let page_size = page_size.clamp(2, MAX_PAGE_SIZE);
    let mut entries = Vec::new();
    let mut cursor: Option<PageCursor> = None;

    for _ in 0..MAX_PAGES {
        if entries.len() >= limit {
            break;
        }

        let page = fetch(cursor.clone(), page_size).await?;
        let received = page.len();
        let last = page.last().and_then(PageCursor::of);

        let mut fresh = page.into_iter().peekable();
        let repeats_cursor = match (&cursor, fresh.peek()) {
            (Some(resume), Some(first)) => PageCursor::of(first).as_ref() == Some(resume),
            _ => false,
        };
        if repeats_cursor {
            fresh.next();
        }

        let mut progressed = false;
        for entry in fresh {
            progressed = true;
            if entries.len() < limit && keep(&entry) {
                entries.push(entry);
            }
        }

        if received < page_size as usize || !progressed || last.is_none() {
            break;
        }
        cursor = last;
    }

    Ok(entries)
}
