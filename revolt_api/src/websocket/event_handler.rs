use async_trait::async_trait;
use serde_json::Value;

use crate::{client::RevoltClient, types::message::Message};

/// Callbacks for socket events, analogous to Serenity's EventHandler.
/// Every method has an empty default; implement the ones you need.
#[async_trait]
pub trait EventHandler: Send + Sync + 'static {
    /// Called when an "Error" event is received (e.g. a failed authentication).
    async fn on_error_event(&self, _client: &RevoltClient, _error_id: &str) {}

    /// Called when the connection has been authenticated.
    async fn on_authenticated(&self, _client: &RevoltClient) {}

    /// Called when a "Ready" event is received (**includes full payload**).
    async fn on_ready(&self, _client: &RevoltClient, _ready: &ReadyEvent) {}

    /// Called when the server notifies us of a new message.
    async fn on_message(&self, _client: &RevoltClient, _message: &Message) {}

    /// Called when someone adds a reaction to a message.
    async fn on_message_react(&self, _client: &RevoltClient, _react: &MessageReactEvent) {}
}

/// Data for a "Ready" event, containing the full payload.
#[derive(Debug, Clone)]
pub struct ReadyEvent {
    pub users: Vec<Value>,
    pub servers: Vec<Value>,
    pub channels: Vec<Value>,
    pub members: Vec<Value>,
}

/// Data for a "MessageReact" event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReactEvent {
    /// Id of the message that was reacted to.
    pub id: String,
    pub channel_id: String,
    pub user_id: String,
    pub emoji_id: String,
}
