//! A single post or comment, addressed by author and permlink.
//!
//! # Responsibilities
//! - Fetch and cache the backing record through the RPC client
//! - Expose decoded fields and the canonical JSON export
//! - Build vote, reply, edit, delete and resteem transactions
//!
//! A `Comment` is a snapshot: nothing changes until `refresh` is called.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Map, Value};

use crate::blockchain::vote_weight;
use crate::blockchain::{
    CommentOperation, CustomJsonOperation, DeleteCommentOperation, Operation, RequiredAuthority,
    Signer, Transaction, TransactionBuilder, VoteOperation,
};
use crate::content::authorperm::Authorperm;
use crate::content::metadata::Metadata;
use crate::content::permlink::derive_reply_permlink;
use crate::content::record::ContentRecord;
use crate::content::types::{ContentError, ContentResult};
use crate::content::vote::Vote;
use crate::rpc::{LogicalMethod, RpcClient};

/// custom_json id used for follow-plugin actions, including reblogs.
pub const FOLLOW_PLUGIN_ID: &str = "follow";

/// Optional fields for `Comment::reply`.
#[derive(Debug, Clone, Default)]
pub struct ReplyOptions {
    pub title: String,
    /// Explicit permlink; derived from the parent when `None`.
    pub permlink: Option<String>,
    /// Metadata object; defaults to the parent's category as the only tag.
    pub meta: Option<Map<String, Value>>,
}

/// A post or comment.
#[derive(Debug, Clone)]
pub struct Comment {
    client: Arc<RpcClient>,
    key: Authorperm,
    record: ContentRecord,
    votes: Option<Vec<Vote>>,
    reblogged_by: Option<Vec<String>>,
}

impl Comment {
    /// Fetch the content at `key`.
    ///
    /// Fails with `ContentError::ContentNotFound` if it does not exist.
    pub async fn fetch(client: Arc<RpcClient>, key: &Authorperm) -> ContentResult<Self> {
        let record = fetch_record(&client, key).await?;
        Ok(Self::with_record(client, key.clone(), record))
    }

    /// Parse an `@author/permlink` string and fetch it.
    pub async fn from_authorperm(client: Arc<RpcClient>, authorperm: &str) -> ContentResult<Self> {
        let key = Authorperm::parse(authorperm)?;
        Self::fetch(client, &key).await
    }

    /// Wrap a record obtained from a listing call, without refetching.
    pub fn from_record(client: Arc<RpcClient>, value: Value) -> ContentResult<Self> {
        let record = ContentRecord::decode_present(value)?;
        let key = Authorperm::new(record.str_field("author"), record.str_field("permlink"));
        Ok(Self::with_record(client, key, record))
    }

    fn with_record(client: Arc<RpcClient>, key: Authorperm, record: ContentRecord) -> Self {
        Self {
            client,
            key,
            record,
            votes: None,
            reblogged_by: None,
        }
    }

    /// Refetch the record, replacing every cached field.
    ///
    /// On failure the entity keeps its previous state.
    pub async fn refresh(&mut self) -> ContentResult<()> {
        let record = fetch_record(&self.client, &self.key).await?;
        self.record = record;
        self.votes = None;
        self.reblogged_by = None;
        Ok(())
    }

    // --- Accessors ---

    pub fn authorperm(&self) -> &Authorperm {
        &self.key
    }

    pub fn id(&self) -> u64 {
        self.record.u64_field("id")
    }

    pub fn author(&self) -> &str {
        &self.key.author
    }

    pub fn permlink(&self) -> &str {
        &self.key.permlink
    }

    pub fn category(&self) -> &str {
        self.record.str_field("category")
    }

    pub fn parent_author(&self) -> &str {
        self.record.str_field("parent_author")
    }

    pub fn parent_permlink(&self) -> &str {
        self.record.str_field("parent_permlink")
    }

    pub fn title(&self) -> &str {
        self.record.str_field("title")
    }

    pub fn body(&self) -> &str {
        self.record.str_field("body")
    }

    pub fn created(&self) -> &str {
        self.record.str_field("created")
    }

    pub fn depth(&self) -> u64 {
        self.record.u64_field("depth")
    }

    pub fn children(&self) -> u64 {
        self.record.u64_field("children")
    }

    /// Raw metadata string as stored on chain.
    pub fn json_metadata(&self) -> &str {
        self.record.str_field("json_metadata")
    }

    pub fn metadata(&self) -> &Metadata {
        self.record.metadata()
    }

    /// Any record field by its network name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.record.get(key)
    }

    pub fn is_main_post(&self) -> bool {
        self.parent_author().is_empty()
    }

    pub fn is_comment(&self) -> bool {
        !self.is_main_post()
    }

    /// The record in the network's field names, identical for both dialects.
    pub fn json(&self) -> Map<String, Value> {
        self.record.fields().clone()
    }

    pub fn client(&self) -> &Arc<RpcClient> {
        &self.client
    }

    // --- Lazily fetched relations ---

    /// Votes on this content. Uses the votes embedded in the record when
    /// present, otherwise asks the node once and caches the answer.
    pub async fn get_votes(&mut self) -> ContentResult<&[Vote]> {
        if self.votes.is_none() {
            let votes = if self.record.votes().is_empty() {
                let value = self
                    .client
                    .call(&LogicalMethod::GetActiveVotes {
                        author: self.key.author.clone(),
                        permlink: self.key.permlink.clone(),
                    })
                    .await?;
                serde_json::from_value(value)
                    .map_err(|e| ContentError::Decode(format!("active votes: {}", e)))?
            } else {
                self.record.votes().to_vec()
            };
            self.votes = Some(votes);
        }
        Ok(self.votes.as_deref().unwrap_or_default())
    }

    /// Accounts that reblogged this content (fetched once, then cached).
    pub async fn get_reblogged_by(&mut self) -> ContentResult<&[String]> {
        if self.reblogged_by.is_none() {
            let value = self
                .client
                .call(&LogicalMethod::GetRebloggedBy {
                    author: self.key.author.clone(),
                    permlink: self.key.permlink.clone(),
                })
                .await?;
            let accounts: Vec<String> = serde_json::from_value(value)
                .map_err(|e| ContentError::Decode(format!("reblogged_by: {}", e)))?;
            self.reblogged_by = Some(accounts);
        }
        Ok(self.reblogged_by.as_deref().unwrap_or_default())
    }

    /// Direct replies, materialized as comments.
    pub async fn get_replies(&self) -> ContentResult<Vec<Comment>> {
        let value = self
            .client
            .call(&LogicalMethod::GetContentReplies {
                author: self.key.author.clone(),
                permlink: self.key.permlink.clone(),
            })
            .await?;
        let entries = match value {
            Value::Array(entries) => entries,
            other => return Err(ContentError::Decode(format!("replies: expected list, got {}", other))),
        };
        entries
            .into_iter()
            .map(|entry| Comment::from_record(self.client.clone(), entry))
            .collect()
    }

    // --- Mutations ---

    /// Vote with `weight` percent in `[-100, 100]`.
    pub async fn vote(&self, weight: f64, account: &str, signer: &dyn Signer) -> ContentResult<Transaction> {
        let weight = vote_weight::to_network(weight)?;
        tracing::info!(authorperm = %self.key, voter = account, weight, "Voting");

        let op = Operation::Vote(VoteOperation {
            voter: account.to_string(),
            author: self.key.author.clone(),
            permlink: self.key.permlink.clone(),
            weight,
        });
        self.finalize(op, None, signer).await
    }

    /// Upvote; `weight` must be non-negative and is capped at 100.
    pub async fn upvote(&self, weight: f64, voter: &str, signer: &dyn Signer) -> ContentResult<Transaction> {
        let percent = vote_weight::upvote_percent(weight)?;
        self.vote(percent, voter, signer).await
    }

    /// Downvote; `weight` must be non-positive and its magnitude is capped at 100.
    pub async fn downvote(&self, weight: f64, voter: &str, signer: &dyn Signer) -> ContentResult<Transaction> {
        let percent = vote_weight::downvote_percent(weight)?;
        self.vote(percent, voter, signer).await
    }

    /// Reply to this content as `author`.
    pub async fn reply(
        &self,
        body: &str,
        author: &str,
        options: ReplyOptions,
        signer: &dyn Signer,
    ) -> ContentResult<Transaction> {
        let permlink = options
            .permlink
            .unwrap_or_else(|| derive_reply_permlink(self.author(), self.permlink(), Utc::now()));
        let meta = match options.meta {
            Some(meta) => Metadata::from_map(meta),
            None if !self.category().is_empty() => {
                let mut fields = Map::new();
                fields.insert("tags".to_string(), json!([self.category()]));
                Metadata::from_map(fields)
            }
            None => Metadata::default(),
        };

        tracing::info!(parent = %self.key, author, permlink = %permlink, "Replying");

        let op = Operation::Comment(CommentOperation {
            parent_author: self.key.author.clone(),
            parent_permlink: self.key.permlink.clone(),
            author: author.to_string(),
            permlink,
            title: options.title,
            body: body.to_string(),
            json_metadata: meta.to_json_string(),
        });
        self.finalize(op, None, signer).await
    }

    /// Republish this content with `new_body` as the complete body.
    ///
    /// With `replace`, metadata becomes `meta` (or empty); otherwise `meta`'s
    /// keys are merged over the existing metadata.
    pub async fn edit(
        &self,
        new_body: &str,
        meta: Option<&Map<String, Value>>,
        replace: bool,
        signer: &dyn Signer,
    ) -> ContentResult<Transaction> {
        let metadata = match (replace, meta) {
            (true, Some(meta)) => Metadata::from_map(meta.clone()),
            (true, None) => Metadata::default(),
            (false, Some(meta)) => self.metadata().merged(meta),
            (false, None) => self.metadata().clone(),
        };

        tracing::info!(authorperm = %self.key, replace, "Editing");

        let op = Operation::Comment(CommentOperation {
            parent_author: self.parent_author().to_string(),
            parent_permlink: self.parent_permlink().to_string(),
            author: self.key.author.clone(),
            permlink: self.key.permlink.clone(),
            title: self.title().to_string(),
            body: new_body.to_string(),
            json_metadata: metadata.to_json_string(),
        });
        self.finalize(op, None, signer).await
    }

    /// Delete this content, signing as `account`.
    ///
    /// The network refuses deletion of content with replies or votes; that
    /// surfaces as a broadcast rejection.
    pub async fn delete(&self, account: &str, signer: &dyn Signer) -> ContentResult<Transaction> {
        tracing::info!(authorperm = %self.key, account, "Deleting");

        let op = Operation::DeleteComment(DeleteCommentOperation {
            author: self.key.author.clone(),
            permlink: self.key.permlink.clone(),
        });
        self.finalize(op, Some(RequiredAuthority::posting(account)), signer)
            .await
    }

    /// Reblog this content to `account`'s followers.
    pub async fn resteem(&self, account: &str, signer: &dyn Signer) -> ContentResult<Transaction> {
        tracing::info!(authorperm = %self.key, account, "Resteeming");

        let payload = json!([
            "reblog",
            {
                "account": account,
                "author": self.key.author,
                "permlink": self.key.permlink,
            }
        ]);
        let op = Operation::CustomJson(CustomJsonOperation::posting(account, FOLLOW_PLUGIN_ID, &payload));
        self.finalize(op, None, signer).await
    }

    async fn finalize(
        &self,
        op: Operation,
        authority: Option<RequiredAuthority>,
        signer: &dyn Signer,
    ) -> ContentResult<Transaction> {
        let mut builder = TransactionBuilder::new(&self.client);
        match authority {
            Some(authority) => builder.append_op_as(op, authority),
            None => builder.append_op(op)?,
        }
        Ok(builder.build_and_broadcast(signer).await?)
    }
}

async fn fetch_record(client: &RpcClient, key: &Authorperm) -> ContentResult<ContentRecord> {
    let value = client
        .call(&LogicalMethod::GetContent {
            author: key.author.clone(),
            permlink: key.permlink.clone(),
        })
        .await?;
    ContentRecord::decode(value)?.ok_or_else(|| ContentError::ContentNotFound(key.to_string()))
}
