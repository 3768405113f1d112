use crate::{
    client::{parse_json_if_ok, require_success, RevoltClient},
    error::RevoltError,
    types::{
        bulk_message_response::BulkMessageResponse,
        message::{DataBulkDelete, DataEditMessage, DataMessageSend, Message, ReplyIntent},
    },
    util::build_url,
};
use async_trait::async_trait;
use serde::Serialize;
use ulid::Ulid;

#[derive(Debug, Default, Serialize)]
pub struct FetchMessagesOptions {
    pub limit: Option<i64>,
    pub before: Option<String>,
    pub after: Option<String>,
    pub sort: Option<String>, // e.g. "Relevance","Latest","Oldest"
    pub nearby: Option<String>,
    pub include_users: Option<bool>,
}

/// Trait that holds the methods for message endpoints.
#[async_trait]
pub trait MessagesApi {
    /// Fetch multiple messages from the given channel.
    async fn fetch_messages(
        &self,
        channel_id: &str,
        opts: Option<FetchMessagesOptions>,
    ) -> Result<BulkMessageResponse, RevoltError>;

    /// Send a message to the given channel. A fresh ULID nonce is attached.
    async fn send_message(
        &self,
        channel_id: &str,
        content: &str,
        replies: Option<Vec<ReplyIntent>>,
    ) -> Result<Message, RevoltError>;

    /// Replace the content of a message we authored.
    async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
    ) -> Result<Message, RevoltError>;

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<(), RevoltError>;

    /// Delete many messages at once. The server only accepts messages
    /// younger than a week.
    async fn bulk_delete_messages(
        &self,
        channel_id: &str,
        ids: Vec<String>,
    ) -> Result<(), RevoltError>;

    /// React to a message. `emoji` is a unicode emoji or a custom emoji id.
    async fn add_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        emoji: &str,
    ) -> Result<(), RevoltError>;
}

#[async_trait]
impl MessagesApi for RevoltClient {
    async fn fetch_messages(
        &self,
        channel_id: &str,
        opts: Option<FetchMessagesOptions>,
    ) -> Result<BulkMessageResponse, RevoltError> {
        let mut url = build_url(&self.base_url, &["channels", channel_id, "messages"])?;

        if let Some(o) = opts {
            let query = serde_urlencoded::to_string(o)
                .map_err(|e| RevoltError::Other(format!("Invalid fetch options: {e}")))?;
            if !query.is_empty() {
                url.set_query(Some(&query));
            }
        }

        let resp = self.authed_get(url).await?;
        parse_json_if_ok(resp).await
    }

    async fn send_message(
        &self,
        channel_id: &str,
        content: &str,
        replies: Option<Vec<ReplyIntent>>,
    ) -> Result<Message, RevoltError> {
        let url = build_url(&self.base_url, &["channels", channel_id, "messages"])?;

        let body = DataMessageSend {
            nonce: Some(Ulid::new().to_string()),
            content: Some(content.to_string()),
            replies,
        };

        let resp = self.authed_post(url, &body).await?;
        parse_json_if_ok(resp).await
    }

    async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
    ) -> Result<Message, RevoltError> {
        let url = build_url(
            &self.base_url,
            &["channels", channel_id, "messages", message_id],
        )?;
        let body = DataEditMessage {
            content: content.to_string(),
        };
        let resp = self.authed_patch(url, &body).await?;
        parse_json_if_ok(resp).await
    }

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<(), RevoltError> {
        let url = build_url(
            &self.base_url,
            &["channels", channel_id, "messages", message_id],
        )?;
        let resp = self.authed_delete(url).await?;
        require_success(resp).await
    }

    async fn bulk_delete_messages(
        &self,
        channel_id: &str,
        ids: Vec<String>,
    ) -> Result<(), RevoltError> {
        if ids.is_empty() {
            return Ok(());
        }
        let url = build_url(&self.base_url, &["channels", channel_id, "messages", "bulk"])?;
        let resp = self
            .authed_delete_with_body(url, &DataBulkDelete { ids })
            .await?;
        require_success(resp).await
    }

    async fn add_reaction(
        &self,
        channel_id: &str,
        message_id: &str,
        emoji: &str,
    ) -> Result<(), RevoltError> {
        let url = build_url(
            &self.base_url,
            &["channels", channel_id, "messages", message_id, "reactions", emoji],
        )?;
        let resp = self.authed_put_empty(url).await?;
        require_success(resp).await
    }
}
