//! `steem-content`: read-only command line access to Steem content.
//!
//! Prints the requested post, replies or listing as JSON on stdout.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;

use steem_content::config::{load_config, ClientConfig};
use steem_content::instance;
use steem_content::observability::logging::init_logging;
use steem_content::rpc::{DiscussionSort, RpcClient};
use steem_content::views::DEFAULT_LIMIT;
use steem_content::{Comment, RecentByPath, RecentReplies};

#[derive(Parser)]
#[command(name = "steem-content")]
#[command(about = "Read posts and comments from Steem nodes", long_about = None)]
struct Cli {
    /// TOML config file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one post or comment
    Get {
        /// `@author/permlink`
        authorperm: String,
    },
    /// Most recent replies to an account's content
    Replies {
        account: String,
        /// Include replies written by the account itself
        #[arg(long)]
        include_own: bool,
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
    /// Top-level posts in a category
    Path {
        category: String,
        /// created, trending, hot or promoted
        #[arg(short, long, default_value = "created")]
        sort: DiscussionSort,
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    init_logging(&config.observability)?;

    tracing::info!(
        nodes = config.nodes.len(),
        num_retries = config.num_retries,
        timeout_secs = config.timeout_secs,
        "Configuration loaded"
    );

    let client = Arc::new(RpcClient::new(&config)?);
    if instance::set_shared_client(client.clone()).is_err() {
        tracing::warn!("Shared client already registered");
    }

    let output = match cli.command {
        Commands::Get { authorperm } => {
            let comment = Comment::from_authorperm(client, &authorperm).await?;
            Value::Object(comment.json())
        }
        Commands::Replies {
            account,
            include_own,
            limit,
        } => {
            let replies = RecentReplies::fetch(client, &account, !include_own, limit).await?;
            Value::Array(replies.iter().map(|c| Value::Object(c.json())).collect())
        }
        Commands::Path {
            category,
            sort,
            limit,
        } => {
            let posts = RecentByPath::fetch(client, &category, sort, limit).await?;
            Value::Array(posts.iter().map(|c| Value::Object(c.json())).collect())
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
