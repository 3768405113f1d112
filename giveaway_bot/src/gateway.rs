//! The narrow chat-platform interface the giveaway engine talks through.
//!
//! Everything the engine does to the outside world goes through
//! [`ChatGateway`]; the production implementation lives in
//! [`crate::revolt_gateway`].

use std::collections::HashSet;
use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Handle to a message that can later be edited, reacted to or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub channel: String,
    pub id: String,
}

impl MessageRef {
    pub fn new(channel: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.channel, self.id)
    }
}

/// Failures at the gateway boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("message delivery failed: {0}")]
    Delivery(String),

    #[error("message edit failed: {0}")]
    Edit(String),

    #[error("direct message blocked: {0}")]
    Blocked(String),

    #[error("permission denied: {0}")]
    Permission(String),

    #[error("not found: {0}")]
    NotFound(String),
}

#[async_trait]
pub trait ChatGateway: Send + Sync + 'static {
    async fn send_message(&self, channel: &str, text: &str) -> Result<MessageRef, GatewayError>;

    async fn edit_message(&self, message: &MessageRef, text: &str) -> Result<(), GatewayError>;

    async fn delete_message(&self, message: &MessageRef) -> Result<(), GatewayError>;

    async fn add_reaction(&self, message: &MessageRef, symbol: &str) -> Result<(), GatewayError>;

    async fn send_direct_message(&self, user: &str, text: &str) -> Result<(), GatewayError>;

    async fn assign_role(&self, user: &str, role: &str) -> Result<(), GatewayError>;

    async fn list_roles(&self, user: &str) -> Result<HashSet<String>, GatewayError>;

    /// Delete up to `limit` of the most recent messages in `channel` and
    /// return how many were removed.
    async fn purge_channel(&self, channel: &str, limit: usize) -> Result<usize, GatewayError>;
}

/// Chat markup that pings `user`.
pub fn mention(user: &str) -> String {
    format!("<@{user}>")
}
