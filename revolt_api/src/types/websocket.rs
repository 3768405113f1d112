use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::message::Message;

/// Events the client sends to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "PascalCase")]
pub enum ClientToServerEvent {
    Authenticate { token: String },
    Ping { data: i64 },
}

/// Server → client events, based on the Revolt (Bonfire) protocol.
///
/// Only the events a bot acts on are typed; anything else decodes as
/// [`ServerToClientEvent::Unknown`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "PascalCase")]
pub enum ServerToClientEvent {
    /// Server responded with an error on authentication or other issue.
    Error { error: String },
    /// Connection has been authenticated successfully.
    Authenticated,
    /// The current session has been invalidated or reset.
    Logout,
    /// A bulk event containing multiple sub-events.
    Bulk { v: Vec<ServerToClientEvent> },
    /// Ping response from the server.
    Pong { data: i64 },

    /// Initial state for the client.
    Ready {
        #[serde(default)]
        users: Vec<Value>,
        #[serde(default)]
        servers: Vec<Value>,
        #[serde(default)]
        channels: Vec<Value>,
        #[serde(default)]
        members: Vec<Value>,
    },

    Message(Message),
    MessageReact {
        id: String,
        channel_id: String,
        user_id: String,
        emoji_id: String,
    },

    #[serde(other)]
    Unknown,
}
