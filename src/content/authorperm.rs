//! `@author/permlink` identifiers.

use std::fmt;
use std::str::FromStr;

use crate::content::types::{ContentError, ContentResult};

/// Identity of one piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Authorperm {
    pub author: String,
    pub permlink: String,
}

impl Authorperm {
    pub fn new(author: impl Into<String>, permlink: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            permlink: permlink.into(),
        }
    }

    /// Parse `@author/permlink` (the leading `@` is optional).
    pub fn parse(s: &str) -> ContentResult<Self> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix('@').unwrap_or(trimmed);
        match body.split_once('/') {
            Some((author, permlink))
                if !author.is_empty() && !permlink.is_empty() && !permlink.contains('/') =>
            {
                Ok(Self::new(author, permlink))
            }
            _ => Err(ContentError::InvalidAuthorperm(s.to_string())),
        }
    }
}

impl FromStr for Authorperm {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Authorperm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}/{}", self.author, self.permlink)
    }
}
