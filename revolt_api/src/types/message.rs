use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::user::Member;

/// For sending a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataMessageSend {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<ReplyIntent>>,
}

/// For editing the content of a message we authored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEditMessage {
    pub content: String,
}

/// Body of the bulk delete endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataBulkDelete {
    pub ids: Vec<String>,
}

/// A Message object as returned from the API and the event socket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: String,
    pub nonce: Option<String>,
    pub channel: String,
    pub author: String,
    pub member: Option<Member>,
    pub content: Option<String>,
    pub edited: Option<String>, // ISO8601
    pub mentions: Option<Vec<String>>,
    pub replies: Option<Vec<String>>,
    /// Emoji id -> ids of the users who reacted with it.
    pub reactions: Option<HashMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyIntent {
    pub id: String,
    pub mention: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_body_omits_missing_fields() {
        let body = DataMessageSend {
            nonce: None,
            content: Some("hi".into()),
            replies: None,
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"content":"hi"}"#);
    }

    #[test]
    fn decodes_minimal_message() {
        let raw = r#"{"_id":"M","channel":"C","author":"A","content":"!list_giveaways"}"#;
        let msg: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.content.as_deref(), Some("!list_giveaways"));
        assert!(msg.member.is_none());
        assert!(msg.reactions.is_none());
    }
}
