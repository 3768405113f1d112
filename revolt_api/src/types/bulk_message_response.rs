use serde::{Deserialize, Serialize};

use super::{
    message::Message,
    user::{Member, User},
};

/// Bulk Message Response can be:
/// 1) An array of messages
/// 2) An object: { messages: [...], users: [...], members: [...] }
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BulkMessageResponse {
    Messages(Vec<Message>),
    MessagesWithUsers {
        messages: Vec<Message>,
        users: Vec<User>,
        members: Option<Vec<Member>>,
    },
}

impl BulkMessageResponse {
    pub fn messages(&self) -> &[Message] {
        match self {
            Self::Messages(messages) | Self::MessagesWithUsers { messages, .. } => messages,
        }
    }

    pub fn into_messages(self) -> Vec<Message> {
        match self {
            Self::Messages(messages) | Self::MessagesWithUsers { messages, .. } => messages,
        }
    }
}
