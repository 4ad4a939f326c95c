//! Materialized listings: recent replies and posts by path.

use serde_json::{json, Value};

use steem_content::rpc::{Dialect, DiscussionSort};
use steem_content::views::{RecentByPath, RecentReplies};

mod common;
use common::{client, post_record, reply_record, test_settings, MockTransport, Reply};

/// 200 replies to alice's content; every fifth is alice answering herself.
fn reply_listing() -> Vec<Value> {
    (0..200)
        .map(|i| {
            let author = if i % 5 == 0 { "alice".to_string() } else { format!("user{}", i) };
            reply_record(&author, &format!("re-{}", i), "alice", "post")
        })
        .collect()
}

/// Serve `listing` the way nodes page it: the start entry is included.
fn page(listing: &[Value], start_permlink: &str, limit: usize) -> Vec<Value> {
    let start = if start_permlink.is_empty() {
        0
    } else {
        listing
            .iter()
            .position(|e| e["permlink"] == start_permlink)
            .unwrap_or(listing.len())
    };
    listing.iter().skip(start).take(limit).cloned().collect()
}

#[tokio::test]
async fn test_recent_replies_skips_own_and_pages() {
    let transport = MockTransport::new();
    let listing = reply_listing();
    transport.on_fn("node.test", "get_replies_by_last_update", move |params| {
        let start_permlink = params[1].as_str().unwrap_or("");
        let limit = params[2].as_u64().unwrap_or(0) as usize;
        Reply::Result(Value::Array(page(&listing, start_permlink, limit)))
    });
    let client = client(&[("node.test", Dialect::Legacy)], test_settings(1), transport.clone());

    let replies = RecentReplies::fetch(client, "alice", true, 130).await.unwrap();

    assert_eq!(replies.account(), "alice");
    assert_eq!(replies.len(), 130);
    assert!(replies.iter().all(|c| c.author() != "alice"));
    assert!(replies.iter().all(|c| c.parent_author() == "alice"));

    let mut permlinks: Vec<&str> = replies.iter().map(|c| c.permlink()).collect();
    permlinks.dedup();
    assert_eq!(permlinks.len(), 130);
    assert_eq!(replies[0].permlink(), "re-1");

    let calls = transport.calls_to("get_replies_by_last_update");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].params, json!(["alice", "", 100]));
    assert_eq!(calls[1].params, json!(["user99", "re-99", 100]));
}

#[tokio::test]
async fn test_recent_replies_keeps_own_when_asked() {
    let transport = MockTransport::new();
    let listing: Vec<Value> = reply_listing().into_iter().take(10).collect();
    transport.on(
        "node.test",
        "tags_api.get_replies_by_last_update",
        Reply::Result(json!({ "discussions": listing })),
    );
    let client = client(&[("node.test", Dialect::Appbase)], test_settings(1), transport.clone());

    let replies = RecentReplies::fetch(client, "alice", false, 20).await.unwrap();
    assert_eq!(replies.len(), 10);
    assert_eq!(replies.iter().filter(|c| c.author() == "alice").count(), 2);

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].params["start_parent_author"], "alice");

    let owned: Vec<_> = replies.into_iter().collect();
    assert_eq!(owned.len(), 10);
}

#[tokio::test]
async fn test_recent_by_path_keeps_main_posts_in_category() {
    let transport = MockTransport::new();
    let listing = json!([
        post_record("alice", "first", "steem"),
        post_record("bob", "elsewhere", "photography"),
        reply_record("carol", "re-first", "alice", "first"),
        post_record("dave", "second", "steem"),
    ]);
    transport.on("legacy.test", "get_discussions_by_trending", Reply::Result(listing.clone()));
    transport.on(
        "appbase.test",
        "tags_api.get_discussions_by_trending",
        Reply::Result(json!({ "discussions": listing })),
    );

    for (host, dialect) in [("legacy.test", Dialect::Legacy), ("appbase.test", Dialect::Appbase)] {
        let client = client(&[(host, dialect)], test_settings(1), transport.clone());
        let posts = RecentByPath::fetch(client, "steem", DiscussionSort::Trending, 10)
            .await
            .unwrap();

        assert_eq!(posts.category(), "steem");
        assert_eq!(posts.sort_order(), DiscussionSort::Trending);
        let keys: Vec<String> = posts.iter().map(|c| c.authorperm().to_string()).collect();
        assert_eq!(keys, vec!["@alice/first", "@dave/second"]);
        assert!(posts.iter().all(|c| c.is_main_post()));
    }

    let legacy = transport.calls_to("get_discussions_by_trending");
    assert_eq!(legacy[0].params, json!([{"tag": "steem", "limit": 100}]));
    let appbase = transport.calls_to("tags_api.get_discussions_by_trending");
    assert_eq!(appbase[0].params, json!({"tag": "steem", "limit": 100}));
}

#[tokio::test]
async fn test_recent_by_path_respects_limit() {
    let transport = MockTransport::new();
    let listing: Vec<Value> = (0..8).map(|i| post_record("alice", &format!("p{}", i), "steem")).collect();
    transport.on("node.test", "get_discussions_by_created", Reply::Result(Value::Array(listing)));
    let client = client(&[("node.test", Dialect::Legacy)], test_settings(1), transport);

    let posts = RecentByPath::fetch(client, "steem", DiscussionSort::default(), 3)
        .await
        .unwrap();
    assert_eq!(posts.len(), 3);
    assert_eq!(posts[2].permlink(), "p2");
}

#[tokio::test]
async fn test_listing_failure_surfaces() {
    let transport = MockTransport::new();
    transport.take_down("node.test");
    let client = client(&[("node.test", Dialect::Legacy)], test_settings(2), transport);

    let err = RecentReplies::fetch(client, "alice", true, 10).await.unwrap_err();
    assert!(err.to_string().contains("exhausted"));
}
