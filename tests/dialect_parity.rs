//! The same content read through legacy and appbase nodes.

use serde_json::{json, Map, Value};

use steem_content::content::{Authorperm, Comment, ContentError};
use steem_content::rpc::Dialect;

mod common;
use common::{client, script_node, test_settings, MockTransport, Reply, AUTHOR, PERMLINK};

/// Fields whose encoding legitimately differs between node generations.
const UNCOMPARED: &[&str] = &["json_metadata", "author_reputation", "active_votes"];

fn comparable(mut fields: Map<String, Value>) -> Map<String, Value> {
    for key in UNCOMPARED {
        fields.remove(*key);
    }
    fields
}

async fn fetch_from(dialect: Dialect) -> Comment {
    let transport = MockTransport::new();
    script_node(&transport, "node.test", dialect);
    let client = client(&[("node.test", dialect)], test_settings(1), transport);
    Comment::fetch(client, &Authorperm::new(AUTHOR, PERMLINK)).await.unwrap()
}

#[tokio::test]
async fn test_json_export_matches_across_dialects() {
    let legacy = fetch_from(Dialect::Legacy).await;
    let appbase = fetch_from(Dialect::Appbase).await;

    assert_eq!(comparable(legacy.json()), comparable(appbase.json()));
    assert_eq!(appbase.json()["total_payout_value"], json!("1.234 SBD"));
    assert_eq!(appbase.json()["max_accepted_payout"], json!("1000000.000 SBD"));
    assert_eq!(appbase.json()["pending_payout_value"], json!("0.000 SBD"));
}

#[tokio::test]
async fn test_decoded_fields_match_across_dialects() {
    let mut legacy = fetch_from(Dialect::Legacy).await;
    let mut appbase = fetch_from(Dialect::Appbase).await;

    for comment in [&legacy, &appbase] {
        assert_eq!(comment.author(), AUTHOR);
        assert_eq!(comment.permlink(), PERMLINK);
        assert_eq!(comment.authorperm().to_string(), "@gtg/witness-gtg-log");
        assert_eq!(comment.id(), 1234567);
        assert_eq!(comment.category(), "witness-category");
        assert!(comment.is_main_post());
        assert_eq!(comment.children(), 2);
        assert_eq!(comment.metadata().tags(), vec!["witness-category", "steem"]);
        assert_eq!(comment.metadata().app(), Some("steemit/0.1"));
    }

    let legacy_votes = legacy.get_votes().await.unwrap().to_vec();
    let appbase_votes = appbase.get_votes().await.unwrap().to_vec();
    assert_eq!(legacy_votes, appbase_votes);
    assert_eq!(legacy_votes.len(), 2);
    assert_eq!(legacy_votes[0].weight_percent(), 100.0);
    assert!(legacy_votes[1].is_downvote());
    assert_eq!(legacy_votes[1].rshares, -500000);
}

#[tokio::test]
async fn test_not_found_under_both_dialects() {
    let transport = MockTransport::new();
    transport.on("legacy.test", "get_content", Reply::Result(common::legacy_missing()));
    transport.on("appbase.test", "tags_api.get_discussion", Reply::Result(Value::Null));

    for (host, dialect) in [("legacy.test", Dialect::Legacy), ("appbase.test", Dialect::Appbase)] {
        let client = client(&[(host, dialect)], test_settings(1), transport.clone());
        let err = Comment::from_authorperm(client, "@gtg/does-not-exist")
            .await
            .unwrap_err();
        match err {
            ContentError::ContentNotFound(key) => assert_eq!(key, "@gtg/does-not-exist"),
            other => panic!("{}: expected ContentNotFound, got {:?}", dialect, other),
        }
    }
}

#[tokio::test]
async fn test_invalid_authorperm_makes_no_call() {
    let transport = MockTransport::new();
    let client = client(&[("node.test", Dialect::Legacy)], test_settings(1), transport.clone());

    let err = Comment::from_authorperm(client, "gtg-without-permlink").await.unwrap_err();
    assert!(matches!(err, ContentError::InvalidAuthorperm(_)));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_relations_unwrap_appbase_envelopes() {
    let transport = MockTransport::new();
    script_node(&transport, "legacy.test", Dialect::Legacy);
    script_node(&transport, "appbase.test", Dialect::Appbase);

    let reply = common::reply_record("alice", "re-gtg", AUTHOR, PERMLINK);
    transport.on("legacy.test", "get_content_replies", Reply::Result(json!([reply.clone()])));
    transport.on(
        "appbase.test",
        "tags_api.get_content_replies",
        Reply::Result(json!({ "discussions": [reply] })),
    );
    transport.on("legacy.test", "get_reblogged_by", Reply::Result(json!(["gtg", "carol"])));
    transport.on(
        "appbase.test",
        "follow_api.get_reblogged_by",
        Reply::Result(json!({ "accounts": ["gtg", "carol"] })),
    );

    for (host, dialect) in [("legacy.test", Dialect::Legacy), ("appbase.test", Dialect::Appbase)] {
        let client = client(&[(host, dialect)], test_settings(1), transport.clone());
        let mut comment = Comment::fetch(client, &Authorperm::new(AUTHOR, PERMLINK)).await.unwrap();

        let replies = comment.get_replies().await.unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].author(), "alice");
        assert!(replies[0].is_comment());
        assert_eq!(replies[0].parent_author(), AUTHOR);

        let reblogged = comment.get_reblogged_by().await.unwrap();
        assert_eq!(reblogged, ["gtg".to_string(), "carol".to_string()]);
    }

    // Cached after the first request
    let client = client(&[("legacy.test", Dialect::Legacy)], test_settings(1), transport.clone());
    let mut comment = Comment::fetch(client, &Authorperm::new(AUTHOR, PERMLINK)).await.unwrap();
    let before = transport.calls_to("get_reblogged_by").len();
    comment.get_reblogged_by().await.unwrap();
    comment.get_reblogged_by().await.unwrap();
    assert_eq!(transport.calls_to("get_reblogged_by").len(), before + 1);
}

#[tokio::test]
async fn test_votes_fetched_when_not_embedded() {
    let transport = MockTransport::new();
    let mut post = common::appbase_post();
    post["active_votes"] = json!([]);
    transport.on("node.test", "tags_api.get_discussion", Reply::Result(post));
    transport.on(
        "node.test",
        "tags_api.get_active_votes",
        Reply::Result(json!({ "votes": [{"voter": "dave", "percent": 2500, "rshares": "42"}] })),
    );
    let client = client(&[("node.test", Dialect::Appbase)], test_settings(1), transport.clone());

    let mut comment = Comment::fetch(client, &Authorperm::new(AUTHOR, PERMLINK)).await.unwrap();
    let votes = comment.get_votes().await.unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].voter, "dave");
    assert_eq!(votes[0].weight_percent(), 25.0);
    assert_eq!(votes[0].rshares, 42);
    assert_eq!(transport.calls_to("tags_api.get_active_votes").len(), 1);
}
